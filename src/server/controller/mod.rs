pub mod command;
pub mod reconcile;
