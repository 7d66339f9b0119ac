//! Primary document-store client.

use std::time::Duration;

use futures::TryStreamExt;
use mailhist_scan::HistoryRecord;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use tracing::{debug, info};

use crate::error::Result;

/// Upper bound on server selection; the liveness probe is the only
/// time-bounded call in the pipeline.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for the primary document store holding the current record set.
pub struct DocumentStore {
    client: Client,
    database: String,
    collection: String,
}

impl DocumentStore {
    /// Connects to the store at `uri`, targeting `database`.`collection`.
    ///
    /// The driver connects lazily; only [`ping`](Self::ping) and the data
    /// calls touch the network.
    ///
    /// # Errors
    ///
    /// Returns an error if `uri` cannot be parsed into client options.
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self> {
        let mut options = ClientOptions::parse(uri).await?;
        options.server_selection_timeout = Some(PROBE_TIMEOUT);
        let client = Client::with_options(options)?;

        Ok(Self {
            client,
            database: database.to_owned(),
            collection: collection.to_owned(),
        })
    }

    fn records(&self) -> Collection<HistoryRecord> {
        self.client
            .database(&self.database)
            .collection(&self.collection)
    }

    /// Probes the store with the `ping` admin command.
    ///
    /// # Errors
    ///
    /// Returns an error if no server can be selected within the probe
    /// timeout or the command fails.
    pub async fn ping(&self) -> Result<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }

    /// Replaces the collection contents with `records`.
    ///
    /// Delete and insert are two separate steps against a store without
    /// multi-document transactions; a crash between them leaves the
    /// collection empty.
    ///
    /// # Errors
    ///
    /// Returns an error if either store call fails.
    pub async fn replace_all(&self, records: &[HistoryRecord]) -> Result<()> {
        let collection = self.records();

        let deleted = collection.delete_many(doc! {}).await?;
        debug!(
            "Cleared {} documents from {}",
            deleted.deleted_count, self.collection
        );

        // The driver rejects empty insert batches.
        if !records.is_empty() {
            collection.insert_many(records).await?;
        }
        info!(
            "Inserted {} documents into {}",
            records.len(),
            self.collection
        );

        Ok(())
    }

    /// Reads back every record currently in the collection, in the store's
    /// natural order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query or cursor iteration fails.
    pub async fn fetch_all(&self) -> Result<Vec<HistoryRecord>> {
        let mut cursor = self.records().find(doc! {}).await?;
        let mut records = Vec::new();
        while let Some(record) = cursor.try_next().await? {
            records.push(record);
        }
        Ok(records)
    }
}
