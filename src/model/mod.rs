//! Data transfer objects exchanged over the admin HTTP API.
//!
//! These types define the JSON contract of the dashboard API. Server-side domain models in
//! `server::model` convert into these at the controller boundary.

pub mod api;
pub mod command;
pub mod rate_limit;
pub mod reconcile;
