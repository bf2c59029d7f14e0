//! Resource repository
//!
//! Every operation is a single round trip against the `resources` table.
//! Update and delete report a missing row as `None` instead of an error so the
//! service can turn it into a not-found response.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{Resource, ResourceFields};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

#[async_trait]
pub trait ResourceRepository: Send + Sync {
    async fn create(&self, fields: &ResourceFields) -> Result<Resource>;
    /// All resources, newest first
    async fn list(&self) -> Result<Vec<Resource>>;
    async fn update(&self, id: i64, fields: &ResourceFields) -> Result<Option<Resource>>;
    /// Delete a resource, returning the row as it was
    async fn delete(&self, id: i64) -> Result<Option<Resource>>;
}

pub struct SqlxResourceRepository {
    pool: DynDatabasePool,
}

impl SqlxResourceRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ResourceRepository> {
        Arc::new(Self::new(pool))
    }

    fn sqlite(&self) -> Result<&SqlitePool> {
        self.pool.as_sqlite().context("Expected a SQLite pool")
    }

    fn mysql(&self) -> Result<&MySqlPool> {
        self.pool.as_mysql().context("Expected a MySQL pool")
    }
}

const SELECT_COLUMNS: &str = "SELECT id, title, description, url, created_at FROM resources";

#[async_trait]
impl ResourceRepository for SqlxResourceRepository {
    async fn create(&self, fields: &ResourceFields) -> Result<Resource> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_sqlite(self.sqlite()?, fields).await,
            DatabaseDriver::Mysql => create_mysql(self.mysql()?, fields).await,
        }
    }

    async fn list(&self) -> Result<Vec<Resource>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_sqlite(self.sqlite()?).await,
            DatabaseDriver::Mysql => list_mysql(self.mysql()?).await,
        }
    }

    async fn update(&self, id: i64, fields: &ResourceFields) -> Result<Option<Resource>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => update_sqlite(self.sqlite()?, id, fields).await,
            DatabaseDriver::Mysql => update_mysql(self.mysql()?, id, fields).await,
        }
    }

    async fn delete(&self, id: i64) -> Result<Option<Resource>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => delete_sqlite(self.sqlite()?, id).await,
            DatabaseDriver::Mysql => delete_mysql(self.mysql()?, id).await,
        }
    }
}

// SQLite implementations

async fn create_sqlite(pool: &SqlitePool, fields: &ResourceFields) -> Result<Resource> {
    let row = sqlx::query(
        "INSERT INTO resources (title, description, url, created_at) VALUES (?, ?, ?, ?) \
         RETURNING id, title, description, url, created_at",
    )
    .bind(&fields.title)
    .bind(&fields.description)
    .bind(&fields.url)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .context("Failed to create resource")?;
    row_to_resource_sqlite(&row)
}

async fn list_sqlite(pool: &SqlitePool) -> Result<Vec<Resource>> {
    let rows = sqlx::query(&format!("{} ORDER BY created_at DESC, id DESC", SELECT_COLUMNS))
        .fetch_all(pool)
        .await
        .context("Failed to list resources")?;
    rows.iter().map(row_to_resource_sqlite).collect()
}

async fn update_sqlite(pool: &SqlitePool, id: i64, fields: &ResourceFields) -> Result<Option<Resource>> {
    let row = sqlx::query(
        "UPDATE resources SET title = ?, description = ?, url = ? WHERE id = ? \
         RETURNING id, title, description, url, created_at",
    )
    .bind(&fields.title)
    .bind(&fields.description)
    .bind(&fields.url)
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to update resource")?;
    row.as_ref().map(row_to_resource_sqlite).transpose()
}

async fn delete_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Resource>> {
    let row = sqlx::query(
        "DELETE FROM resources WHERE id = ? RETURNING id, title, description, url, created_at",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to delete resource")?;
    row.as_ref().map(row_to_resource_sqlite).transpose()
}

fn row_to_resource_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Resource> {
    Ok(Resource {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        url: row.try_get("url")?,
        created_at: row.try_get("created_at")?,
    })
}

// MySQL implementations (no RETURNING, so writes re-read the row)

async fn create_mysql(pool: &MySqlPool, fields: &ResourceFields) -> Result<Resource> {
    let now = Utc::now();
    let result = sqlx::query(
        "INSERT INTO resources (title, description, url, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(&fields.title)
    .bind(&fields.description)
    .bind(&fields.url)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create resource")?;

    get_by_id_mysql(pool, result.last_insert_id() as i64)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Resource not found after insert"))
}

async fn get_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Resource>> {
    let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get resource")?;
    row.as_ref().map(row_to_resource_mysql).transpose()
}

async fn list_mysql(pool: &MySqlPool) -> Result<Vec<Resource>> {
    let rows = sqlx::query(&format!("{} ORDER BY created_at DESC, id DESC", SELECT_COLUMNS))
        .fetch_all(pool)
        .await
        .context("Failed to list resources")?;
    rows.iter().map(row_to_resource_mysql).collect()
}

async fn update_mysql(pool: &MySqlPool, id: i64, fields: &ResourceFields) -> Result<Option<Resource>> {
    sqlx::query("UPDATE resources SET title = ?, description = ?, url = ? WHERE id = ?")
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.url)
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to update resource")?;

    // MySQL counts unchanged rows as unaffected; re-read instead of trusting rows_affected().
    get_by_id_mysql(pool, id).await
}

async fn delete_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Resource>> {
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    let row = sqlx::query(&format!("{} WHERE id = ? FOR UPDATE", SELECT_COLUMNS))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to get resource")?;
    let Some(row) = row else {
        return Ok(None);
    };
    let resource = row_to_resource_mysql(&row)?;

    sqlx::query("DELETE FROM resources WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to delete resource")?;
    tx.commit().await.context("Failed to commit delete")?;

    Ok(Some(resource))
}

fn row_to_resource_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Resource> {
    Ok(Resource {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        url: row.try_get("url")?,
        created_at: row.try_get("created_at")?,
    })
}
