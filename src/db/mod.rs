//! Database layer
//!
//! Persistence for blogs, comments and sessions. SQLite is the default
//! (single-binary deployment); MySQL is selected through configuration.
//!
//! ```ignore
//! use quill::config::DatabaseConfig;
//! use quill::db::{create_pool, migrations};
//!
//! let pool = create_pool(&DatabaseConfig::default()).await?;
//! migrations::run_migrations(&pool).await?;
//! ```

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{
    create_pool, create_test_pool, DatabasePool, DynDatabasePool, MysqlDatabase, SqliteDatabase,
};
