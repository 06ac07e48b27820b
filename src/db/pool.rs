//! Database connection pool abstraction
//!
//! Repositories talk to a `DynDatabasePool` and branch on `driver()` to
//! reach the concrete SQLite or MySQL pool. Backends only expose their pool;
//! the shared operations dispatch on whichever one is present.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{
    mysql::{MySqlPool, MySqlPoolOptions},
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::{DatabaseConfig, DatabaseDriver};

/// Backend-agnostic handle to the blog store.
#[async_trait]
pub trait DatabasePool: Send + Sync {
    /// Get the database driver type
    fn driver(&self) -> DatabaseDriver;

    /// Get the underlying SQLite pool if this is a SQLite connection
    fn as_sqlite(&self) -> Option<&SqlitePool>;

    /// Get the underlying MySQL pool if this is a MySQL connection
    fn as_mysql(&self) -> Option<&MySqlPool>;

    /// Execute a raw SQL statement, returning the affected row count
    async fn execute(&self, query: &str) -> Result<u64> {
        let result = match (self.as_sqlite(), self.as_mysql()) {
            (Some(pool), _) => sqlx::query(query).execute(pool).await?.rows_affected(),
            (None, Some(pool)) => sqlx::query(query).execute(pool).await?.rows_affected(),
            (None, None) => anyhow::bail!("Database pool exposes no backend"),
        };
        Ok(result)
    }

    /// Check if the database connection is healthy
    async fn ping(&self) -> Result<()> {
        self.execute("SELECT 1").await.context("Database ping failed")?;
        Ok(())
    }

    /// Close the connection pool
    async fn close(&self) {
        if let Some(pool) = self.as_sqlite() {
            pool.close().await;
        }
        if let Some(pool) = self.as_mysql() {
            pool.close().await;
        }
    }
}

/// Type alias for a shared database pool
pub type DynDatabasePool = Arc<dyn DatabasePool>;

/// SQLite connection pool
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    /// Open (creating if needed) the database at `url`.
    ///
    /// Accepts `:memory:`, a bare path, or an `sqlite:` URL.
    pub async fn new(url: &str) -> Result<Self> {
        let options = if url == ":memory:" {
            SqliteConnectOptions::from_str("sqlite::memory:")?
        } else {
            let location = url.strip_prefix("sqlite:").unwrap_or(url);
            if !location.starts_with(":memory:") {
                let path = location.split('?').next().unwrap_or(location);
                create_parent_dir(Path::new(path))?;
            }
            SqliteConnectOptions::from_str(&format!("sqlite:{}", location))
                .with_context(|| format!("Invalid SQLite URL: {}", url))?
                .create_if_missing(true)
        }
        // Comment rows cascade with their blog
        .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(16)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to SQLite database: {}", url))?;

        Ok(Self { pool })
    }
}

fn create_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create database directory: {:?}", parent)),
        _ => Ok(()),
    }
}

impl DatabasePool for SqliteDatabase {
    fn driver(&self) -> DatabaseDriver {
        DatabaseDriver::Sqlite
    }

    fn as_sqlite(&self) -> Option<&SqlitePool> {
        Some(&self.pool)
    }

    fn as_mysql(&self) -> Option<&MySqlPool> {
        None
    }
}

/// MySQL connection pool
pub struct MysqlDatabase {
    pool: MySqlPool,
}

impl MysqlDatabase {
    pub async fn new(url: &str) -> Result<Self> {
        let connection_url = if url.starts_with("mysql://") {
            url.to_string()
        } else {
            format!("mysql://{}", url)
        };

        let pool = MySqlPoolOptions::new()
            .max_connections(16)
            .connect(&connection_url)
            .await
            .with_context(|| format!("Failed to connect to MySQL database: {}", url))?;

        Ok(Self { pool })
    }
}

impl DatabasePool for MysqlDatabase {
    fn driver(&self) -> DatabaseDriver {
        DatabaseDriver::Mysql
    }

    fn as_sqlite(&self) -> Option<&SqlitePool> {
        None
    }

    fn as_mysql(&self) -> Option<&MySqlPool> {
        Some(&self.pool)
    }
}

/// Create a database connection pool based on configuration.
pub async fn create_pool(config: &DatabaseConfig) -> Result<DynDatabasePool> {
    match config.driver {
        DatabaseDriver::Sqlite => Ok(Arc::new(SqliteDatabase::new(&config.url).await?)),
        DatabaseDriver::Mysql => Ok(Arc::new(MysqlDatabase::new(&config.url).await?)),
    }
}

/// Create a SQLite in-memory database pool for testing
pub async fn create_test_pool() -> Result<DynDatabasePool> {
    let config = DatabaseConfig {
        driver: DatabaseDriver::Sqlite,
        url: ":memory:".to_string(),
    };
    create_pool(&config).await
}
