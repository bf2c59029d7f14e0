//! Database layer
//!
//! The resource list lives in a relational store reached only through
//! parameterized sqlx queries. Two backends are supported:
//! - SQLite (default, single-file deployment)
//! - MySQL
//!
//! ```ignore
//! use studyhub::config::DatabaseConfig;
//! use studyhub::db::{create_pool, migrations};
//!
//! let pool = create_pool(&DatabaseConfig::default()).await?;
//! migrations::run_migrations(&pool).await?;
//! pool.ping().await?;
//! ```

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool, DatabasePool, DynDatabasePool};
