use sqlx::error::ErrorKind;

/// Errors surfaced by the persistence layer.
///
/// Constraint violations are split out at conversion time so callers can
/// map them to a client error instead of treating them as faults.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique, foreign-key, not-null, or check constraint rejected a write.
    #[error("constraint violation: {0}")]
    Constraint(String),
    #[error(transparent)]
    Database(sqlx::Error),
}

impl StoreError {
    #[must_use]
    pub fn is_constraint(&self) -> bool {
        matches!(self, Self::Constraint(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            match db.kind() {
                ErrorKind::UniqueViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation => {
                    return Self::Constraint(db.message().to_string());
                }
                _ => {}
            }
        }
        Self::Database(err)
    }
}
