//! # Executor Module
//!
//! The two statement primitives everything else is built on:
//! [`Database::select`] and [`Database::execute`]. Callers write `?`
//! placeholders; the executor rewrites them for the active driver, binds the
//! arguments and converts result rows into [`Row`]s.

use std::fmt::Write as _;

use futures::{StreamExt, TryStreamExt};
use sqlx::{
    any::{AnyArguments, AnyRow},
    Arguments, Column, Row as _, ValueRef,
};

use crate::{
    database::{Database, Drivers},
    value::{Row, Value},
    Error,
};

impl Database {
    /// Runs a read and returns its rows.
    ///
    /// With a non-zero `size`, at most that many rows are pulled from the
    /// result stream. `Some(0)` fetches everything, like `None`.
    pub async fn select(&self, sql: &str, args: Vec<Value>, size: Option<usize>) -> Result<Vec<Row>, Error> {
        log::info!("SQL: {}", sql);
        let sql = normalize_sql(sql, self.driver);
        let arguments = bind_args(args)?;

        let mut conn = self.pool.acquire().await.map_err(Error::Connection)?;
        let query = sqlx::query_with(&sql, arguments);
        let rows: Vec<AnyRow> = match size {
            Some(size) if size > 0 => query.fetch(&mut *conn).take(size).try_collect().await,
            _ => query.fetch_all(&mut *conn).await,
        }
        .map_err(Error::Query)?;

        let rows = rows.iter().map(decode_row).collect::<Result<Vec<_>, _>>()?;
        log::info!("rows returned: {}", rows.len());
        Ok(rows)
    }

    /// Runs one write and returns the number of affected rows.
    ///
    /// Without `autocommit` the statement runs inside an explicit transaction
    /// that is committed on success and rolled back before the error is
    /// returned.
    pub async fn execute(&self, sql: &str, args: Vec<Value>, autocommit: bool) -> Result<u64, Error> {
        log::info!("SQL: {}", sql);
        let sql = normalize_sql(sql, self.driver);
        let arguments = bind_args(args)?;

        if autocommit {
            let mut conn = self.pool.acquire().await.map_err(Error::Connection)?;
            let result = sqlx::query_with(&sql, arguments).execute(&mut *conn).await.map_err(Error::Query)?;
            return Ok(result.rows_affected());
        }

        let mut tx = self.pool.begin().await.map_err(Error::Connection)?;
        match sqlx::query_with(&sql, arguments).execute(&mut *tx).await {
            Ok(result) => {
                tx.commit().await.map_err(Error::Query)?;
                Ok(result.rows_affected())
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    log::error!("rollback failed: {}", rollback);
                }
                Err(Error::Query(e))
            }
        }
    }
}

/// Rewrites `?` placeholders and backtick quoting for the driver.
///
/// MySQL and SQLite accept both as written. PostgreSQL wants `$1..$n` and
/// double-quoted identifiers. Single-quoted literals are copied verbatim.
pub(crate) fn normalize_sql(sql: &str, driver: Drivers) -> String {
    if driver != Drivers::Postgres {
        return sql.to_string();
    }

    let mut out = String::with_capacity(sql.len() + 8);
    let mut index = 0;
    let mut in_literal = false;

    for ch in sql.chars() {
        match ch {
            '\'' => {
                in_literal = !in_literal;
                out.push(ch);
            }
            '?' if !in_literal => {
                index += 1;
                let _ = write!(out, "${}", index);
            }
            '`' if !in_literal => out.push('"'),
            _ => out.push(ch),
        }
    }
    out
}

fn bind_args(args: Vec<Value>) -> Result<AnyArguments<'static>, Error> {
    let mut arguments = AnyArguments::default();
    for value in args {
        match value {
            Value::Null => arguments.add(Option::<String>::None),
            Value::Bool(b) => arguments.add(b),
            Value::Int(i) => arguments.add(i),
            Value::Float(x) => arguments.add(x),
            Value::Text(s) => arguments.add(s),
        }
        .map_err(|e| Error::Query(sqlx::Error::Encode(e)))?;
    }
    Ok(arguments)
}

fn decode_row(row: &AnyRow) -> Result<Row, Error> {
    let mut decoded = Row::new();
    for (index, column) in row.columns().iter().enumerate() {
        decoded.push(column.name(), decode_column(row, index)?);
    }
    Ok(decoded)
}

// The any driver reports a value's storage class, so the first compatible
// decode wins.
fn decode_column(row: &AnyRow, index: usize) -> Result<Value, Error> {
    if row.try_get_raw(index).map_err(Error::Query)?.is_null() {
        return Ok(Value::Null);
    }
    if let Ok(i) = row.try_get::<i64, _>(index) {
        return Ok(Value::Int(i));
    }
    if let Ok(x) = row.try_get::<f64, _>(index) {
        return Ok(Value::Float(x));
    }
    if let Ok(b) = row.try_get::<bool, _>(index) {
        return Ok(Value::Bool(b));
    }
    row.try_get::<String, _>(index).map(Value::Text).map_err(Error::Query)
}
