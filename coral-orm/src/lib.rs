//! # coral-orm
//!
//! A minimal entity mapper on top of sqlx.
//!
//! Structs deriving [`Entity`] declare their columns once; coral-orm derives
//! the select, insert, update and delete statements for the table and offers
//! `find`, `find_all`, `find_number`, `save`, `update` and `remove` through the
//! [`Model`] trait.
//!
//! ```rust,ignore
//! use coral_orm::{Database, Entity, Model};
//!
//! #[derive(Entity, Debug)]
//! struct User {
//!     #[orm(primary_key)]
//!     id: i64,
//!     username: String,
//! }
//!
//! let db = Database::connect("sqlite::memory:").await?;
//! db.migrator().register::<User>().run().await?;
//!
//! let mut user = User { id: 8, username: "sly".to_string() };
//! user.save(&db).await?;
//! let found = User::find(&db, 8).await?;
//! ```

pub mod config;
pub mod database;
pub mod defaults;
pub mod error;
pub mod executor;
pub mod field;
pub mod migration;
pub mod model;
pub mod schema;
pub mod value;

pub use config::PoolConfig;
pub use coral_orm_macro::Entity;
pub use database::{Database, DatabaseBuilder, Drivers};
pub use error::{Error, SchemaError};
pub use field::{Field, FieldDefault, FieldKind};
pub use migration::Migrator;
pub use model::{Entity, FindAll, Limit, Model};
pub use schema::{EntityMeta, EntitySchema};
pub use value::{FromValue, Row, ToValue, Value};
