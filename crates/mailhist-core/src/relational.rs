//! Relational mirror of the user history.

use mailhist_scan::HistoryRecord;
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::debug;

use crate::error::Result;

/// Repository for the `user_history` mirror table.
pub struct HistoryRepository {
    pool: SqlitePool,
}

impl HistoryRepository {
    /// Create a new repository with the given database path.
    ///
    /// Creates the database and table if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation
    /// fails.
    pub async fn new(database_path: &str) -> Result<Self> {
        let url = format!("sqlite:{database_path}?mode=rwc");
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await?;

        let repo = Self { pool };
        repo.initialize().await?;
        Ok(repo)
    }

    /// Create an in-memory repository for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation
    /// fails.
    #[allow(dead_code)]
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let repo = Self { pool };
        repo.initialize().await?;
        Ok(repo)
    }

    /// Initialize database schema.
    async fn initialize(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS user_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL,
                date TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub(crate) const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Replaces the table contents with `records`.
    ///
    /// The table holds exactly one generation of records: rows are deleted
    /// and reinserted, never upserted.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn replace_all(&self, records: &[HistoryRecord]) -> Result<()> {
        sqlx::query("DELETE FROM user_history")
            .execute(&self.pool)
            .await?;

        for record in records {
            sqlx::query("INSERT INTO user_history (email, date) VALUES (?, ?)")
                .bind(&record.email)
                .bind(&record.date)
                .execute(&self.pool)
                .await?;
        }

        debug!("Mirrored {} rows into user_history", records.len());
        Ok(())
    }

    /// Number of rows currently mirrored.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM user_history")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("count"))
    }

    /// Reads back all mirrored records in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn fetch_all(&self) -> Result<Vec<HistoryRecord>> {
        let rows = sqlx::query("SELECT email, date FROM user_history ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        let records = rows
            .iter()
            .map(|row| HistoryRecord {
                email: row.get("email"),
                date: row.get("date"),
            })
            .collect();

        Ok(records)
    }
}
