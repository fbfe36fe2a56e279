//! # Model Module
//!
//! The [`Entity`] trait implemented by `#[derive(Entity)]`, the [`FindAll`]
//! query options and the async [`Model`] helpers that read and write entities
//! through a [`Database`].

use async_trait::async_trait;

use crate::{
    database::{Database, Drivers},
    error::SchemaError,
    schema::{EntityMeta, EntitySchema},
    value::{Row, Value},
    Error,
};

/// A struct mapped to one database table.
///
/// This trait is usually implemented via `#[derive(Entity)]`.
///
/// # Example
///
/// ```rust,ignore
/// use coral_orm::Entity;
///
/// #[derive(Entity)]
/// struct User {
///     #[orm(primary_key)]
///     id: i64,
///     username: String,
/// }
/// ```
pub trait Entity: Sized + Send + Sync + Unpin + 'static {
    /// The field declarations of this entity, in declaration order.
    fn schema() -> EntitySchema;

    /// The metadata built from [`Entity::schema`], computed once per type.
    fn meta() -> Result<&'static EntityMeta, SchemaError>;

    /// Reads an attribute. Unset optional attributes read as `Value::Null`.
    fn value(&self, key: &str) -> Result<Value, Error>;

    /// Writes an attribute.
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), Error>;

    /// Builds an instance from a result row keyed by column name.
    fn from_row(row: &Row) -> Result<Self, Error>;

    /// Reads an attribute, falling back to its declared default when unset.
    ///
    /// A resolved default is written back, so generated values such as ids
    /// stay stable for the lifetime of the instance.
    fn value_or_default(&mut self, key: &str) -> Result<Value, Error> {
        let value = self.value(key)?;
        if !value.is_null() {
            return Ok(value);
        }

        let meta = Self::meta()?;
        let field = meta.field(key).ok_or_else(|| Error::AttributeNotFound(key.to_string()))?;
        match field.default.resolve() {
            Some(resolved) => {
                log::debug!("using default value for {}: {}", key, resolved);
                self.set_value(key, resolved.clone())?;
                Ok(resolved)
            }
            None => Ok(Value::Null),
        }
    }
}

// ============================================================================
// Query options
// ============================================================================

/// Row window of a [`FindAll`] query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Count(i64),
    Range { offset: i64, count: i64 },
}

impl Limit {
    /// Accepts one integer (`count`) or two (`offset`, `count`).
    pub fn from_values(values: &[Value]) -> Result<Self, Error> {
        let invalid = || {
            let shown: Vec<String> = values.iter().map(ToString::to_string).collect();
            Error::InvalidLimit(format!("[{}]", shown.join(", ")))
        };
        match values {
            [count] => count.as_i64().map(Limit::Count).ok_or_else(invalid),
            [offset, count] => match (offset.as_i64(), count.as_i64()) {
                (Some(offset), Some(count)) => Ok(Limit::Range { offset, count }),
                _ => Err(invalid()),
            },
            _ => Err(invalid()),
        }
    }
}

/// Options of [`Model::find_all`].
///
/// ```rust,ignore
/// let users = User::find_all(&db, FindAll::new().filter("age > ?").bind(18).order_by("id desc").limit(5)).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct FindAll {
    filter: Option<String>,
    args: Vec<Value>,
    order_by: Option<String>,
    limit: Option<Limit>,
}

impl FindAll {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a `where` clause, written with `?` placeholders.
    pub fn filter(mut self, clause: impl Into<String>) -> Self {
        self.filter = Some(clause.into());
        self
    }

    /// Binds the next placeholder of the filter.
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    pub fn order_by(mut self, clause: impl Into<String>) -> Self {
        self.order_by = Some(clause.into());
        self
    }

    pub fn limit(mut self, count: i64) -> Self {
        self.limit = Some(Limit::Count(count));
        self
    }

    pub fn range(mut self, offset: i64, count: i64) -> Self {
        self.limit = Some(Limit::Range { offset, count });
        self
    }

    /// Sets the limit from loosely typed values, see [`Limit::from_values`].
    pub fn limit_values(mut self, values: &[Value]) -> Result<Self, Error> {
        self.limit = Some(Limit::from_values(values)?);
        Ok(self)
    }

    /// Renders the statement and its arguments for an entity.
    pub fn to_sql(&self, meta: &EntityMeta, driver: Drivers) -> (String, Vec<Value>) {
        let mut sql = vec![meta.select.clone()];
        let mut args = self.args.clone();

        if let Some(filter) = &self.filter {
            sql.push("where".to_string());
            sql.push(filter.clone());
        }
        if let Some(order_by) = &self.order_by {
            sql.push("order by".to_string());
            sql.push(order_by.clone());
        }
        match self.limit {
            Some(Limit::Count(count)) => {
                sql.push("limit ?".to_string());
                args.push(Value::Int(count));
            }
            Some(Limit::Range { offset, count }) if driver == Drivers::Postgres => {
                sql.push("limit ? offset ?".to_string());
                args.push(Value::Int(count));
                args.push(Value::Int(offset));
            }
            Some(Limit::Range { offset, count }) => {
                sql.push("limit ?, ?".to_string());
                args.push(Value::Int(offset));
                args.push(Value::Int(count));
            }
            None => {}
        }

        (sql.join(" "), args)
    }
}

// ============================================================================
// Model Trait
// ============================================================================

/// Queries and writes available on every [`Entity`].
///
/// `save`, `update` and `remove` return the affected row count. A count other
/// than one is logged as a warning, or returned as [`Error::RowsAffected`]
/// when the database handle is strict.
#[async_trait]
pub trait Model: Entity {
    /// Loads the row with the given primary key.
    async fn find<K>(db: &Database, pk: K) -> Result<Option<Self>, Error>
    where
        K: Into<Value> + Send,
    {
        let meta = Self::meta()?;
        let sql = format!("{} where `{}`=?", meta.select, meta.primary_key_column());
        let rows = db.select(&sql, vec![pk.into()], Some(1)).await?;
        rows.first().map(Self::from_row).transpose()
    }

    async fn find_all(db: &Database, query: FindAll) -> Result<Vec<Self>, Error> {
        let meta = Self::meta()?;
        let (sql, args) = query.to_sql(meta, db.driver());
        let rows = db.select(&sql, args, None).await?;
        rows.iter().map(Self::from_row).collect()
    }

    /// Evaluates `select <expr> as _num_` over the table.
    ///
    /// Returns `None` when no row matches or the expression is `NULL`.
    async fn find_number(
        db: &Database,
        select_expr: &str,
        filter: Option<&str>,
        args: Vec<Value>,
    ) -> Result<Option<Value>, Error> {
        let meta = Self::meta()?;
        let mut sql = format!("select {} as _num_ from `{}`", select_expr, meta.table);
        if let Some(filter) = filter {
            sql.push_str(" where ");
            sql.push_str(filter);
        }
        let rows = db.select(&sql, args, Some(1)).await?;
        Ok(rows.first().and_then(|row| row.get("_num_")).filter(|v| !v.is_null()).cloned())
    }

    /// Inserts the instance, materializing defaults for unset fields first.
    async fn save(&mut self, db: &Database) -> Result<u64, Error> {
        let meta = Self::meta()?;
        let mut args = Vec::with_capacity(meta.fields.len() + 1);
        for field in &meta.fields {
            args.push(self.value_or_default(field)?);
        }
        args.push(self.value_or_default(&meta.primary_key)?);

        let rows = db.execute(&meta.insert, args, db.autocommit()).await?;
        db.check_affected("insert record", rows)
    }

    /// Writes the current values of every field, keyed by the primary key.
    async fn update(&self, db: &Database) -> Result<u64, Error> {
        let meta = Self::meta()?;
        let mut args = Vec::with_capacity(meta.fields.len() + 1);
        for field in &meta.fields {
            args.push(self.value(field)?);
        }
        args.push(self.value(&meta.primary_key)?);

        let rows = db.execute(&meta.update, args, db.autocommit()).await?;
        db.check_affected("update by primary key", rows)
    }

    async fn remove(&self, db: &Database) -> Result<u64, Error> {
        let meta = Self::meta()?;
        let args = vec![self.value(&meta.primary_key)?];

        let rows = db.execute(&meta.delete, args, db.autocommit()).await?;
        db.check_affected("remove by primary key", rows)
    }
}

impl<T: Entity> Model for T {}
