//! Connection pool, schema bootstrap, and session factory.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::info;

use super::config::StorageConfig;
use super::error::StoreError;
use super::session::Session;

/// Tables for groups, students, courses, and the student/course association.
///
/// `IF NOT EXISTS` keeps [`Database::initialize`] idempotent across restarts.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS "groups" (
    id   INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS students (
    id         INTEGER PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name  TEXT NOT NULL,
    group_id   INTEGER REFERENCES "groups"(id)
);

CREATE TABLE IF NOT EXISTS courses (
    id          INTEGER PRIMARY KEY,
    name        TEXT NOT NULL UNIQUE,
    description TEXT
);

CREATE TABLE IF NOT EXISTS student_courses (
    student_id INTEGER NOT NULL REFERENCES students(id) ON DELETE CASCADE,
    course_id  INTEGER NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
    PRIMARY KEY (student_id, course_id)
);

CREATE INDEX IF NOT EXISTS students_group_id ON students(group_id);
CREATE INDEX IF NOT EXISTS student_courses_course_id ON student_courses(course_id);
"#;

/// Point-in-time view of the connection pool, reported by `/health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub size: u32,
    pub idle: usize,
}

/// Handle to the relational store. Cloning shares the underlying pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens a pool against `config.database_url`. Does not create tables;
    /// call [`initialize`](Self::initialize) before serving requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed or the database cannot be opened.
    pub async fn connect(config: &StorageConfig) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(&config.database_url)?
            .create_if_missing(config.create_if_missing)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        info!(url = %config.database_url, max_connections = config.max_connections, "database pool opened");
        Ok(Self { pool })
    }

    /// Opens a private in-memory database with the schema already applied.
    ///
    /// Every `SQLite` connection to `:memory:` is a separate database, so the
    /// pool is pinned to exactly one connection that never expires.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or schema bootstrap fails.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.initialize().await?;
        Ok(db)
    }

    /// Creates any missing tables and indexes.
    ///
    /// # Errors
    ///
    /// Returns an error if a DDL statement fails.
    pub async fn initialize(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    /// Begins a unit of work. See [`Session`] for commit/rollback rules.
    ///
    /// # Errors
    ///
    /// Returns an error if no connection can be acquired or `BEGIN` fails.
    pub async fn session(&self) -> Result<Session, StoreError> {
        Session::begin(&self.pool).await
    }

    /// Begins a unit of work that holds the write lock from the start.
    /// Every request that writes uses one of these.
    ///
    /// # Errors
    ///
    /// Returns an error if no connection can be acquired or the write lock
    /// is not granted within the busy timeout.
    pub async fn write_session(&self) -> Result<Session, StoreError> {
        Session::begin_write(&self.pool).await
    }

    #[must_use]
    pub fn pool_stats(&self) -> PoolStats {
        PoolStats {
            size: self.pool.size(),
            idle: self.pool.num_idle(),
        }
    }

    /// Closes every pooled connection, waiting for checked-out ones to return.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("database pool closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn initialize_is_idempotent() {
        let db = Database::in_memory().await.unwrap();
        db.initialize().await.unwrap();
        db.initialize().await.unwrap();

        let mut session = db.session().await.unwrap();
        assert!(session.all_groups().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn in_memory_pool_holds_one_connection() {
        let db = Database::in_memory().await.unwrap();
        assert_eq!(db.pool_stats().size, 1);
    }

    #[tokio::test]
    async fn file_database_persists_across_pools() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.db");
        let config = StorageConfig {
            database_url: format!("sqlite://{}", path.display()),
            ..StorageConfig::default()
        };

        let db = Database::connect(&config).await.unwrap();
        db.initialize().await.unwrap();
        let mut session = db.session().await.unwrap();
        session.insert_group("AB-12").await.unwrap();
        session.commit().await.unwrap();
        db.close().await;

        let reopened = Database::connect(&config).await.unwrap();
        reopened.initialize().await.unwrap();
        let mut session = reopened.session().await.unwrap();
        let names: Vec<_> = session
            .all_groups()
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, vec!["AB-12"]);
        drop(session);
        reopened.close().await;
    }
}
