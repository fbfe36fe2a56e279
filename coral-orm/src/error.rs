//! # Error Module
//!
//! Every fallible operation in coral-orm returns [`Error`]. Schema problems are
//! kept in their own [`SchemaError`] so entity metadata can cache them.

use thiserror::Error;

/// Violations of the mapping rules, detected when an entity schema is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// No field of the entity is flagged as primary key.
    #[error("primary key not found for entity '{0}'")]
    NoPrimaryKey(String),
    /// A second primary-key field was declared.
    #[error("duplicate primary key for field: {0}")]
    DuplicatePrimaryKey(String),
    /// The same attribute name was declared twice.
    #[error("duplicate field: {0}")]
    DuplicateField(String),
}

/// The error type of coral-orm.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The pool could not be created, or a connection could not be acquired.
    #[error("connection error: {0}")]
    Connection(#[source] sqlx::Error),

    /// A statement failed while executing or fetching.
    #[error("query error: {0}")]
    Query(#[source] sqlx::Error),

    #[error("invalid limit value: {0}")]
    InvalidLimit(String),

    #[error("entity has no attribute '{0}'")]
    AttributeNotFound(String),

    /// A value could not be converted into the type of the target field.
    #[error("cannot decode '{column}' as {expected}, found {found}")]
    Decode { column: String, expected: &'static str, found: &'static str },

    /// Only raised when the database handle runs in strict mode.
    #[error("{operation} affected {actual} rows, expected 1")]
    RowsAffected { operation: &'static str, actual: u64 },

    #[error("invalid configuration: {0}")]
    Config(String),
}
