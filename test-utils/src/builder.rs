use entity::prelude::*;
use sea_orm::{sea_query::TableCreateStatement, EntityTrait, Schema};

use crate::{context::TestContext, error::TestError};

/// Builder for creating test contexts with customizable database schemas.
///
/// Provides a fluent interface for configuring test environments with in-memory SQLite
/// databases. Use the builder pattern to add entity tables, then call `build()` to
/// create the configured test context.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::builder::TestBuilder;
/// use entity::prelude::Command;
///
/// let test = TestBuilder::new()
///     .with_table(Command)
///     .build()
///     .await?;
/// ```
pub struct TestBuilder {
    /// CREATE TABLE statements generated from entity models, executed in insertion order.
    tables: Vec<TableCreateStatement>,

    /// Raw statements executed after the tables exist (indexes the entity schema can't express).
    statements: Vec<&'static str>,
}

impl TestBuilder {
    /// Creates a new test builder with no tables configured.
    ///
    /// # Returns
    /// - New `TestBuilder` instance with empty table configuration
    pub fn new() -> Self {
        Self {
            tables: Vec::new(),
            statements: Vec::new(),
        }
    }

    /// Adds an entity table to the test database schema.
    ///
    /// Generates a CREATE TABLE statement from the provided SeaORM entity using SQLite
    /// backend syntax. The table will be created when `build()` is called.
    ///
    /// # Arguments
    /// - `entity` - SeaORM entity model implementing `EntityTrait` to create table for
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Adds a raw schema statement executed after all tables have been created.
    ///
    /// # Arguments
    /// - `stmt` - SQL statement to execute
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_statement(mut self, stmt: &'static str) -> Self {
        self.statements.push(stmt);
        self
    }

    /// Adds the command table together with its live (name, scope) unique index.
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_command_table(self) -> Self {
        self.with_table(Command)
            .with_statement(migration::COMMAND_LIVE_UNIQUE_INDEX)
    }

    /// Adds the rate limit counter table together with its (action, identifier) unique index.
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_rate_limit_table(self) -> Self {
        self.with_table(RateLimitCounter)
            .with_statement(migration::RATE_LIMIT_COUNTER_UNIQUE_INDEX)
    }

    /// Adds every table the command registry uses.
    ///
    /// Equivalent to `with_command_table()` followed by `with_rate_limit_table()`.
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let test = TestBuilder::new()
    ///     .with_command_tables()
    ///     .build()
    ///     .await?;
    /// ```
    pub fn with_command_tables(self) -> Self {
        self.with_command_table().with_rate_limit_table()
    }

    /// Builds and initializes the test context with configured tables.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Fully initialized test context with database and tables ready
    /// - `Err(TestError::Database)`- Failed to connect to database or create tables
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut setup = TestContext::new();

        setup.with_tables(self.tables).await?;
        setup.with_raw_statements(self.statements).await?;

        Ok(setup)
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
