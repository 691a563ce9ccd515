//! Service layer for business logic and orchestration.
//!
//! This module contains the service layer of the application, which sits between the
//! controller (API) layer and the data (repository) layer. Services are responsible for:
//!
//! - **Business Logic**: Validation-dependent rules, status transitions and rate limiting
//! - **Orchestration**: Coordinating repository calls with the remote command registry
//! - **Caching**: Read-through caching of command reads and invalidation on every mutation

pub mod cache;
pub mod command;
pub mod rate_limit;
pub mod reconcile;
