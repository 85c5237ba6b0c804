//! Unit of work: one database transaction per request.
//!
//! A [`Session`] is opened at handler entry and either committed explicitly
//! or dropped. Dropping an uncommitted session rolls the transaction back,
//! so every exit path (early return, `?`, panic unwinding) releases the
//! connection and leaves no partial rows behind.
//!
//! Write sessions start with `BEGIN IMMEDIATE` and take the database write
//! lock up front. A deferred transaction that reads and then writes fails
//! with `SQLITE_BUSY` once another writer has committed in between, and the
//! busy timeout cannot retry that case.

use sqlx::sqlite::{Sqlite, SqliteConnection, SqlitePool};
use sqlx::Transaction;
use tracing::debug;

use super::error::StoreError;

/// Short-lived transactional handle. Entity operations live in the sibling
/// modules (`groups`, `students`, `courses`, `enrollments`) as `impl Session`
/// blocks.
#[derive(Debug)]
pub struct Session {
    tx: Transaction<'static, Sqlite>,
}

impl Session {
    pub(crate) async fn begin(pool: &SqlitePool) -> Result<Self, StoreError> {
        let tx = pool.begin().await?;
        debug!("session opened");
        Ok(Self { tx })
    }

    /// Waits (up to the busy timeout) for the write lock before returning.
    pub(crate) async fn begin_write(pool: &SqlitePool) -> Result<Self, StoreError> {
        let tx = pool.begin_with("BEGIN IMMEDIATE").await?;
        debug!("write session opened");
        Ok(Self { tx })
    }

    /// Makes every write in this session durable.
    ///
    /// # Errors
    ///
    /// Returns an error if `COMMIT` fails; the transaction is rolled back.
    pub async fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().await?;
        debug!("session committed");
        Ok(())
    }

    pub(crate) fn conn(&mut self) -> &mut SqliteConnection {
        &mut self.tx
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::Database;

    #[tokio::test]
    async fn dropped_session_rolls_back() {
        let db = Database::in_memory().await.unwrap();

        let mut session = db.session().await.unwrap();
        session.insert_group("AB-12").await.unwrap();
        drop(session);

        let mut session = db.session().await.unwrap();
        assert!(session.all_groups().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn dropped_write_session_rolls_back() {
        let db = Database::in_memory().await.unwrap();

        let mut session = db.write_session().await.unwrap();
        session.insert_course("Art", None).await.unwrap();
        drop(session);

        let mut session = db.session().await.unwrap();
        assert!(session.all_courses().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn committed_session_is_visible_to_the_next() {
        let db = Database::in_memory().await.unwrap();

        let mut session = db.session().await.unwrap();
        session.insert_group("AB-12").await.unwrap();
        session.commit().await.unwrap();

        let mut session = db.session().await.unwrap();
        assert_eq!(session.all_groups().await.unwrap().len(), 1);
    }
}
