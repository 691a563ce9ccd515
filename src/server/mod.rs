//! Server-side API backend and business logic.
//!
//! This module contains the complete backend: the admin HTTP API, the command store, the
//! reconciliation engine that keeps Discord's registry in line with it, and the gateway
//! client that counts command usage. The backend uses Axum as the web framework, SeaORM
//! for database operations, and Serenity for Discord integration.
//!
//! # Architecture
//!
//! The server follows a layered architecture with clear separation of concerns:
//!
//! - **Controller Layer** (`controller/`) - HTTP request handlers, access control, and DTO conversion
//! - **Service Layer** (`service/`) - Command lifecycle, reconciliation, rate limiting and caching
//! - **Data Layer** (`data/`) - Database operations and entity-to-domain model conversion
//! - **Model Layer** (`model/`) - Domain models and operation-specific parameter types
//! - **Registry** (`registry/`) - Remote command registry trait and its Discord implementation
//! - **Error Layer** (`error/`) - Application error types and HTTP response mapping
//! - **Middleware** (`middleware/`) - Admin API token authentication
//!
//! # Infrastructure
//!
//! - **Configuration** (`config`) - Environment-based application configuration
//! - **State** (`state`) - Shared application state (DB, cache, registry)
//! - **Startup** (`startup`) - Database connection, migrations and HTTP layers
//! - **Router** (`router`) - Axum route configuration and API documentation
//! - **Bot** (`bot/`) - Discord gateway client recording command usage
//!
//! # Request Flow
//!
//! 1. **Router** receives HTTP request and routes to appropriate controller
//! 2. **Controller** checks the admin token, converts DTOs to params, calls service
//! 3. **Service** checks rate limits and the cache, calls the registry and data layer
//! 4. **Data** queries database, converts entities to domain models
//! 5. **Controller** converts domain model to DTO, returns HTTP response

pub mod bot;
pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod middleware;
pub mod model;
pub mod registry;
pub mod router;
pub mod service;
pub mod startup;
pub mod state;
