//! Canned analytic queries over the relational mirror.

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::error::Result;

/// Fixed catalog of read-only analytic statements.
///
/// Statement bodies are immutable and selected by variant; no query text is
/// ever composed from user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyticsQuery {
    /// Distinct sender addresses.
    UniqueEmails,
    /// Message counts grouped by calendar day, ascending.
    EmailsPerDay,
    /// Earliest and latest message date per sender.
    FirstAndLastDates,
    /// Message counts grouped by sender domain, descending.
    CountByDomain,
}

impl AnalyticsQuery {
    /// Every catalog entry, in menu order.
    pub const ALL: [Self; 4] = [
        Self::UniqueEmails,
        Self::EmailsPerDay,
        Self::FirstAndLastDates,
        Self::CountByDomain,
    ];

    /// Human-readable label for menus and report headings.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::UniqueEmails => "Unique Emails",
            Self::EmailsPerDay => "Emails Per Day",
            Self::FirstAndLastDates => "First and Last Dates per Email",
            Self::CountByDomain => "Count by Domain",
        }
    }
}

/// Executes catalog queries against the relational mirror.
pub struct QueryEngine {
    pool: SqlitePool,
}

impl QueryEngine {
    /// Opens the engine over the mirror database at `database_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails.
    pub async fn open(database_path: &str) -> Result<Self> {
        let url = format!("sqlite:{database_path}?mode=rwc");
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(&url)
            .await?;

        Ok(Self { pool })
    }

    /// Engine over an existing pool, for tests sharing an in-memory mirror.
    #[allow(dead_code)]
    pub(crate) const fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Runs a catalog query and returns its rows as display cells.
    ///
    /// Rows come back in the statement's own result order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn run(&self, query: AnalyticsQuery) -> Result<Vec<Vec<String>>> {
        let rows = match query {
            AnalyticsQuery::UniqueEmails => {
                sqlx::query_as::<_, (String,)>("SELECT DISTINCT email FROM user_history")
                    .fetch_all(&self.pool)
                    .await?
                    .into_iter()
                    .map(|(email,)| vec![email])
                    .collect()
            }
            AnalyticsQuery::EmailsPerDay => sqlx::query_as::<_, (String, i64)>(
                "SELECT date(date) AS day, COUNT(*) FROM user_history \
                 GROUP BY day ORDER BY day",
            )
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(|(day, count)| vec![day, count.to_string()])
            .collect(),
            AnalyticsQuery::FirstAndLastDates => sqlx::query_as::<_, (String, String, String)>(
                "SELECT email, MIN(date), MAX(date) FROM user_history GROUP BY email",
            )
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(|(email, first, last)| vec![email, first, last])
            .collect(),
            AnalyticsQuery::CountByDomain => sqlx::query_as::<_, (String, i64)>(
                "SELECT SUBSTR(email, INSTR(email, '@') + 1) AS domain, COUNT(*) \
                 FROM user_history GROUP BY domain ORDER BY COUNT(*) DESC",
            )
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(|(domain, count)| vec![domain, count.to_string()])
            .collect(),
        };

        Ok(rows)
    }
}
