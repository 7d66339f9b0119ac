//! Dual-store republish pipeline.

use mailhist_scan::HistoryRecord;
use tracing::info;

use crate::document::DocumentStore;
use crate::error::{Error, Result};
use crate::relational::HistoryRepository;

/// Replaces the primary store's record set and mirrors it into the
/// relational store.
///
/// Publishing is a full replace on both sides: each store holds exactly one
/// generation of records at a time.
pub struct DualStorePublisher {
    primary: DocumentStore,
    secondary: HistoryRepository,
}

impl DualStorePublisher {
    /// Creates a publisher over the two stores.
    #[must_use]
    pub const fn new(primary: DocumentStore, secondary: HistoryRepository) -> Self {
        Self { primary, secondary }
    }

    /// Replaces the primary store's contents with `records`.
    ///
    /// The primary is probed first; a failed probe aborts before anything
    /// is written to either store. Delete and insert are two separate,
    /// independently retryable steps — a crash between them leaves the
    /// primary empty, an accepted risk of the non-transactional replace.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreUnavailable`] if the probe fails, or a store
    /// error if the replace does.
    pub async fn publish_primary(&self, records: &[HistoryRecord]) -> Result<()> {
        self.primary
            .ping()
            .await
            .map_err(|err| Error::StoreUnavailable(err.to_string()))?;
        info!("Document store probe successful");

        self.primary.replace_all(records).await
    }

    /// Mirrors the primary store's current contents into the relational
    /// store and returns them.
    ///
    /// The mirror is driven by a read-back of the primary, not by the
    /// record set handed to [`publish_primary`](Self::publish_primary), so
    /// the secondary always reflects what the primary actually persisted.
    ///
    /// # Errors
    ///
    /// Returns an error if the read-back or the relational replace fails.
    pub async fn mirror_to_secondary(&self) -> Result<Vec<HistoryRecord>> {
        let records = self.primary.fetch_all().await?;
        self.secondary.replace_all(&records).await?;

        info!("Mirrored {} records into user_history", records.len());
        Ok(records)
    }
}
