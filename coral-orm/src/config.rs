//! # Config Module
//!
//! Connection settings for [`Database::create_pool`](crate::Database::create_pool),
//! loadable from JSON or from `DB_*` environment variables.

use std::{env, str::FromStr};

use serde::Deserialize;
use sqlx::{mysql::MySqlConnectOptions, ConnectOptions};

use crate::Error;

/// MySQL pool settings. `user`, `password` and `db` are required.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PoolConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub user: String,
    pub password: String,
    pub db: String,
    #[serde(default = "default_charset")]
    pub charset: String,
    #[serde(default = "default_true")]
    pub autocommit: bool,
    #[serde(default = "default_maxsize")]
    pub maxsize: u32,
    #[serde(default = "default_minsize")]
    pub minsize: u32,
    /// Treat a save/update/remove that does not touch exactly one row as an error.
    #[serde(default)]
    pub strict: bool,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    3306
}

fn default_charset() -> String {
    "utf8".to_string()
}

fn default_true() -> bool {
    true
}

fn default_maxsize() -> u32 {
    10
}

fn default_minsize() -> u32 {
    1
}

impl PoolConfig {
    pub fn new(user: impl Into<String>, password: impl Into<String>, db: impl Into<String>) -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            user: user.into(),
            password: password.into(),
            db: db.into(),
            charset: default_charset(),
            autocommit: true,
            maxsize: default_maxsize(),
            minsize: default_minsize(),
            strict: false,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    /// Reads `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`,
    /// `DB_CHARSET`, `DB_AUTOCOMMIT`, `DB_MAXSIZE`, `DB_MINSIZE` and `DB_STRICT`.
    pub fn from_env() -> Result<Self, Error> {
        let mut config = Self::new(required("DB_USER")?, required("DB_PASSWORD")?, required("DB_NAME")?);

        if let Ok(host) = env::var("DB_HOST") {
            config.host = host;
        }
        if let Ok(charset) = env::var("DB_CHARSET") {
            config.charset = charset;
        }
        config.port = parsed("DB_PORT")?.unwrap_or(config.port);
        config.autocommit = parsed("DB_AUTOCOMMIT")?.unwrap_or(config.autocommit);
        config.maxsize = parsed("DB_MAXSIZE")?.unwrap_or(config.maxsize);
        config.minsize = parsed("DB_MINSIZE")?.unwrap_or(config.minsize);
        config.strict = parsed("DB_STRICT")?.unwrap_or(config.strict);

        Ok(config)
    }

    /// The `mysql://` connection URL for these settings.
    pub fn to_url(&self) -> String {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.db)
            .charset(&self.charset)
            .to_url_lossy()
            .to_string()
    }
}

fn required(key: &str) -> Result<String, Error> {
    env::var(key).map_err(|_| Error::Config(format!("missing environment variable {}", key)))
}

fn parsed<T: FromStr>(key: &str) -> Result<Option<T>, Error> {
    match env::var(key) {
        Ok(raw) => raw.parse().map(Some).map_err(|_| Error::Config(format!("invalid value for {}: {}", key, raw))),
        Err(_) => Ok(None),
    }
}
