//! Storage configuration.

/// Connection settings for the `SQLite` database.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// `sqlx` connection URL, e.g. `sqlite://roster.db`.
    pub database_url: String,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
    /// Create the database file when it does not exist yet.
    pub create_if_missing: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://roster.db".to_string(),
            max_connections: 5,
            create_if_missing: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_config_defaults() {
        let config = StorageConfig::default();
        assert_eq!(config.database_url, "sqlite://roster.db");
        assert_eq!(config.max_connections, 5);
        assert!(config.create_if_missing);
    }
}
