//! Run configuration.

use anyhow::Context;
use serde::Deserialize;

/// Resolved configuration for one pipeline run.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path of the line-oriented mail-archive file.
    pub archive_path: String,
    /// Connection string for the primary document store.
    pub mongo_uri: String,
    /// Primary store database name.
    pub mongo_db: String,
    /// Primary store collection name.
    pub mongo_collection: String,
    /// Path of the relational mirror database.
    pub sqlite_path: String,
}

impl Config {
    /// Loads configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub async fn load(path: &str) -> anyhow::Result<Self> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading config file {path}"))?;

        serde_json::from_str(&contents).with_context(|| format!("parsing config file {path}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parses_all_fields() {
        let raw = r#"{
            "archive_path": "archive.mbox",
            "mongo_uri": "mongodb://localhost:27017",
            "mongo_db": "user_history_db",
            "mongo_collection": "user_history",
            "sqlite_path": "user_history.db"
        }"#;

        let config: Config = serde_json::from_str(raw).unwrap();

        assert_eq!(config.archive_path, "archive.mbox");
        assert_eq!(config.mongo_uri, "mongodb://localhost:27017");
        assert_eq!(config.mongo_db, "user_history_db");
        assert_eq!(config.mongo_collection, "user_history");
        assert_eq!(config.sqlite_path, "user_history.db");
    }

    #[test]
    fn test_config_rejects_missing_fields() {
        let raw = r#"{ "archive_path": "archive.mbox" }"#;
        assert!(serde_json::from_str::<Config>(raw).is_err());
    }
}
