//! SeaORM entity models for the command registry.

pub mod prelude;

pub mod command;
pub mod rate_limit_counter;
