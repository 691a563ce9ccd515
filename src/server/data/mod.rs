//! Database repository layer for all domain entities.
//!
//! This module contains repository structs that handle database operations for commands and
//! rate limit counters. Repositories use SeaORM entity models internally and return domain
//! models to maintain separation between the data layer and business logic layer.

pub mod command;
pub mod rate_limit;

#[cfg(test)]
mod test;
