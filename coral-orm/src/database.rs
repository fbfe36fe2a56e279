//! # Database Module
//!
//! The connection pool facade. A [`Database`] owns one sqlx `AnyPool` and is
//! passed explicitly to every query helper; cloning it shares the pool.

// ============================================================================
// External Crate Imports
// ============================================================================

use sqlx::{any::AnyPoolOptions, AnyPool};

// ============================================================================
// Internal Crate Imports
// ============================================================================

use crate::{config::PoolConfig, migration::Migrator, Entity, Error};

// ============================================================================
// Database Driver Enum
// ============================================================================

/// Supported database drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drivers {
    /// PostgreSQL driver
    Postgres,
    /// MySQL driver
    MySQL,
    /// SQLite driver
    SQLite,
}

impl Drivers {
    fn from_url(url: &str) -> Self {
        if url.starts_with("postgres") {
            Drivers::Postgres
        } else if url.starts_with("mysql") {
            Drivers::MySQL
        } else {
            Drivers::SQLite
        }
    }
}

// ============================================================================
// Database Struct
// ============================================================================

/// Handle to a connection pool.
///
/// Every statement acquires one connection from the pool and releases it
/// before returning, on success and failure alike.
#[derive(Debug, Clone)]
pub struct Database {
    /// The underlying SQLx connection pool
    pub(crate) pool: AnyPool,
    /// The detected database driver
    pub(crate) driver: Drivers,
    /// Default commit mode for writes issued by entities
    pub(crate) autocommit: bool,
    /// Whether a write touching other than one row is an error
    pub(crate) strict: bool,
}

impl Database {
    /// Creates a new DatabaseBuilder for configuring the connection.
    pub fn builder() -> DatabaseBuilder {
        DatabaseBuilder::new()
    }

    /// Connects with default pool settings.
    pub async fn connect(url: &str) -> Result<Self, Error> {
        DatabaseBuilder::new().connect(url).await
    }

    /// Creates a MySQL pool from a [`PoolConfig`].
    pub async fn create_pool(config: &PoolConfig) -> Result<Self, Error> {
        DatabaseBuilder::from_config(config).connect(&config.to_url()).await
    }

    /// Closes every connection and waits for the pool to drain.
    ///
    /// Calling it on an already closed pool does nothing.
    pub async fn destroy_pool(&self) {
        if self.pool.is_closed() {
            return;
        }
        log::info!("closing database connection pool...");
        self.pool.close().await;
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    pub fn driver(&self) -> Drivers {
        self.driver
    }

    pub fn autocommit(&self) -> bool {
        self.autocommit
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    /// Returns a new Migrator instance for creating entity tables.
    pub fn migrator(&self) -> Migrator<'_> {
        Migrator::new(self)
    }

    /// Creates the table of an entity if it does not exist yet.
    pub async fn create_table<E: Entity>(&self) -> Result<(), Error> {
        let meta = E::meta()?;
        self.execute(&meta.create_for(self.driver), Vec::new(), true).await?;
        Ok(())
    }

    /// Applies the rows-affected policy to the result of a single-row write.
    pub(crate) fn check_affected(&self, operation: &'static str, rows: u64) -> Result<u64, Error> {
        if rows != 1 {
            if self.strict {
                return Err(Error::RowsAffected { operation, actual: rows });
            }
            log::warn!("failed to {}: affected rows: {}", operation, rows);
        }
        Ok(rows)
    }
}

// ============================================================================
// DatabaseBuilder Struct
// ============================================================================

/// Pool settings applied when connecting.
pub struct DatabaseBuilder {
    max_connections: u32,
    min_connections: u32,
    autocommit: bool,
    strict: bool,
}

impl Default for DatabaseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DatabaseBuilder {
    pub fn new() -> Self {
        Self { max_connections: 10, min_connections: 1, autocommit: true, strict: false }
    }

    fn from_config(config: &PoolConfig) -> Self {
        Self {
            max_connections: config.maxsize,
            min_connections: config.minsize,
            autocommit: config.autocommit,
            strict: config.strict,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn autocommit(mut self, autocommit: bool) -> Self {
        self.autocommit = autocommit;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub async fn connect(self, url: &str) -> Result<Database, Error> {
        log::info!("create database connection pool...");
        sqlx::any::install_default_drivers();

        let pool = AnyPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections.min(self.max_connections))
            .connect(url)
            .await
            .map_err(Error::Connection)?;

        Ok(Database { pool, driver: Drivers::from_url(url), autocommit: self.autocommit, strict: self.strict })
    }
}
