//! Factory methods for creating test data.
//!
//! This module provides factory methods for creating test entities with sensible defaults,
//! reducing boilerplate in tests.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), sea_orm::DbErr> {
//!     let db = /* ... */;
//!
//!     // Create with defaults
//!     let command = factory::command::create_command(&db).await?;
//!
//!     // Customize through the builder
//!     let command = factory::command::CommandFactory::new(&db)
//!         .name("ping")
//!         .guild_id("123456789")
//!         .enabled(false)
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Available Factories
//!
//! - `command` - Create command entities
//! - `rate_limit_counter` - Create rate limit counter entities
//! - `helpers` - Shared ID generation

pub mod command;
pub mod helpers;
pub mod rate_limit_counter;

pub use command::{create_command, create_named_command};
pub use rate_limit_counter::create_counter;
