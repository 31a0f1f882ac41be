//! Database connection factory
//!
//! The loader needs exactly one PostgreSQL connection for the whole load, so
//! this opens a single [`PgConnection`] rather than a pool.

use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;
use std::fmt;
use thiserror::Error;

/// Default database host.
pub const DEFAULT_DB_HOST: &str = "localhost";

/// Default database port.
pub const DEFAULT_DB_PORT: u16 = 5432;

/// Default database name.
pub const DEFAULT_DB_NAME: &str = "airbnb";

/// Default database user.
pub const DEFAULT_DB_USER: &str = "postgres";

/// Database operation errors with contextual information
#[derive(Error, Debug)]
pub enum DbError {
    /// SQL query or connection error
    #[error("Database query failed: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Database configuration is invalid
    #[error("Database configuration error: {0}. Check DATABASE_URL or the DB_* settings.")]
    Config(String),

    /// Destination table could not be created
    #[error("Failed to create table {table}: {source}")]
    Schema {
        table: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// A listing insert failed for a reason other than an existing id
    #[error("Failed to insert listing {id}: {source}")]
    Insert {
        id: i64,
        #[source]
        source: sqlx::Error,
    },
}

impl DbError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

pub type DbResult<T> = Result<T, DbError>;

/// Connection parameters for the destination database.
///
/// A full `url` takes precedence over the discrete fields. Neither `url` nor
/// `password` is ever serialized.
#[derive(Clone, Serialize, Deserialize)]
pub struct DbConfig {
    #[serde(skip_serializing)]
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    #[serde(skip_serializing)]
    pub password: Option<String>,
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: DEFAULT_DB_HOST.to_string(),
            port: DEFAULT_DB_PORT,
            database: DEFAULT_DB_NAME.to_string(),
            user: DEFAULT_DB_USER.to_string(),
            password: None,
        }
    }
}

impl DbConfig {
    /// Connect to a full `postgres://` URL
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Read `DATABASE_URL`, or `DB_HOST`, `DB_PORT`, `DB_NAME`, `DB_USER` and
    /// `DB_PASSWORD` with defaults for the unset ones.
    pub fn from_env() -> DbResult<Self> {
        let port = match std::env::var("DB_PORT") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| DbError::config(format!("DB_PORT is not a valid port: '{}'", raw)))?,
            Err(_) => DEFAULT_DB_PORT,
        };

        Ok(Self {
            url: std::env::var("DATABASE_URL").ok().filter(|u| !u.trim().is_empty()),
            host: std::env::var("DB_HOST").unwrap_or_else(|_| DEFAULT_DB_HOST.to_string()),
            port,
            database: std::env::var("DB_NAME").unwrap_or_else(|_| DEFAULT_DB_NAME.to_string()),
            user: std::env::var("DB_USER").unwrap_or_else(|_| DEFAULT_DB_USER.to_string()),
            password: std::env::var("DB_PASSWORD").ok(),
        })
    }

    pub fn validate(&self) -> DbResult<()> {
        if self.url.is_none() {
            if self.host.trim().is_empty() {
                return Err(DbError::config("DB_HOST cannot be empty"));
            }
            if self.port == 0 {
                return Err(DbError::config("DB_PORT must be greater than 0"));
            }
            if self.database.trim().is_empty() {
                return Err(DbError::config("DB_NAME cannot be empty"));
            }
        }
        Ok(())
    }

    /// Build sqlx connect options from this configuration
    pub fn connect_options(&self) -> DbResult<PgConnectOptions> {
        if let Some(ref url) = self.url {
            return url
                .parse::<PgConnectOptions>()
                .map_err(|e| DbError::config(format!("invalid DATABASE_URL: {}", e)));
        }

        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user);

        if let Some(ref password) = self.password {
            options = options.password(password);
        }

        Ok(options)
    }
}

/// Open one connection to the destination database.
pub async fn connect(config: &DbConfig) -> DbResult<PgConnection> {
    config.validate()?;
    let options = config.connect_options()?;

    let conn = PgConnection::connect_with(&options).await?;

    tracing::info!(
        host = options.get_host(),
        database = options.get_database().unwrap_or_default(),
        "Database connection established"
    );

    Ok(conn)
}
