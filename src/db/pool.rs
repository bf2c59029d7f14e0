//! Database connection pool abstraction
//!
//! `DynDatabasePool` hides whether the resource table lives in SQLite or
//! MySQL. The trait is implemented straight on sqlx's pools; callers that
//! run queries branch on `driver()` and borrow the concrete pool through
//! `as_sqlite` / `as_mysql`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{
    mysql::{MySqlPool, MySqlPoolOptions},
    sqlite::{SqlitePool, SqlitePoolOptions},
};
use std::path::Path;
use std::sync::Arc;

use crate::config::{DatabaseConfig, DatabaseDriver};

/// Backend-neutral handle to the store.
#[async_trait]
pub trait DatabasePool: Send + Sync {
    fn driver(&self) -> DatabaseDriver;

    fn as_sqlite(&self) -> Option<&SqlitePool> {
        None
    }

    fn as_mysql(&self) -> Option<&MySqlPool> {
        None
    }

    /// Round-trip a trivial query; used by the health endpoint.
    async fn ping(&self) -> Result<()>;

    async fn close(&self);
}

/// Shared handle to whichever backend the configuration selected
pub type DynDatabasePool = Arc<dyn DatabasePool>;

#[async_trait]
impl DatabasePool for SqlitePool {
    fn driver(&self) -> DatabaseDriver {
        DatabaseDriver::Sqlite
    }

    fn as_sqlite(&self) -> Option<&SqlitePool> {
        Some(self)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(self)
            .await
            .context("SQLite ping failed")?;
        Ok(())
    }

    async fn close(&self) {
        SqlitePool::close(self).await;
    }
}

#[async_trait]
impl DatabasePool for MySqlPool {
    fn driver(&self) -> DatabaseDriver {
        DatabaseDriver::Mysql
    }

    fn as_mysql(&self) -> Option<&MySqlPool> {
        Some(self)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(self)
            .await
            .context("MySQL ping failed")?;
        Ok(())
    }

    async fn close(&self) {
        MySqlPool::close(self).await;
    }
}

/// Open the store named by the configuration.
///
/// Errors never include the MySQL URL; it carries credentials.
pub async fn create_pool(config: &DatabaseConfig) -> Result<DynDatabasePool> {
    let pool: DynDatabasePool = match config.driver {
        DatabaseDriver::Sqlite => Arc::new(open_sqlite(&config.url).await?),
        DatabaseDriver::Mysql => Arc::new(open_mysql(&config.url).await?),
    };
    tracing::debug!(driver = ?config.driver, "Database pool ready");
    Ok(pool)
}

/// In-memory SQLite pool for tests
pub async fn create_test_pool() -> Result<DynDatabasePool> {
    create_pool(&DatabaseConfig {
        driver: DatabaseDriver::Sqlite,
        url: ":memory:".to_string(),
    })
    .await
}

async fn open_sqlite(location: &str) -> Result<SqlitePool> {
    let target = SqliteTarget::parse(location);

    let options = match &target {
        // Every in-memory connection is a separate database; pin a single one.
        SqliteTarget::Memory => SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None),
        SqliteTarget::File { path, .. } => {
            ensure_parent_dir(Path::new(path))?;
            SqlitePoolOptions::new().max_connections(10)
        }
    };

    options
        .connect(&target.url())
        .await
        .with_context(|| format!("Failed to open SQLite store at {}", location))
}

async fn open_mysql(location: &str) -> Result<MySqlPool> {
    let url = if location.starts_with("mysql://") {
        location.to_string()
    } else {
        format!("mysql://{}", location)
    };

    MySqlPoolOptions::new()
        .max_connections(10)
        .connect(&url)
        .await
        .context("Failed to connect to MySQL")
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create database directory {}", dir.display())),
        _ => Ok(()),
    }
}

/// Where a configured SQLite location points.
#[derive(Debug, PartialEq, Eq)]
enum SqliteTarget<'a> {
    Memory,
    /// `query` is whatever followed `?` in the configured URL.
    File { path: &'a str, query: Option<&'a str> },
}

impl<'a> SqliteTarget<'a> {
    /// Accepts a bare path, a `sqlite:` URL, `:memory:` or `sqlite::memory:`.
    fn parse(location: &'a str) -> Self {
        if location == ":memory:" || location.starts_with("sqlite::memory:") {
            return SqliteTarget::Memory;
        }
        let rest = location.strip_prefix("sqlite:").unwrap_or(location);
        match rest.split_once('?') {
            Some((path, query)) => SqliteTarget::File { path, query: Some(query) },
            None => SqliteTarget::File { path: rest, query: None },
        }
    }

    /// sqlx URL; files default to `mode=rwc` so the store is created on first run.
    fn url(&self) -> String {
        match self {
            SqliteTarget::Memory => "sqlite::memory:".to_string(),
            SqliteTarget::File { path, query: Some(query) } => format!("sqlite:{}?{}", path, query),
            SqliteTarget::File { path, query: None } => format!("sqlite:{}?mode=rwc", path),
        }
    }
}
