//! Shared test infrastructure for model layer tests.
//!
//! `setup_test_db()` builds a temporary file-backed SQLite pool with
//! the full schema applied. File-backed rather than :memory: so every
//! pooled connection sees the same database, which the concurrent
//! vote tests rely on.

use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tempfile::TempDir;

use easypoll::db::{DbPool, MIGRATIONS};

/// Temporary database for one test. The TempDir must be kept alive
/// for the pool's backing file to remain valid, so both travel
/// together.
pub struct TestDb {
    _dir: TempDir,
    pool: DbPool,
}

impl TestDb {
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Setup a test database with the schema applied.
pub async fn setup_test_db() -> TestDb {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("test.db");

    let options = SqliteConnectOptions::new()
        .filename(&db_path)
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await
        .expect("Failed to open test DB");

    sqlx::raw_sql(MIGRATIONS)
        .execute(&pool)
        .await
        .expect("Failed to run migrations");

    TestDb { _dir: dir, pool }
}
