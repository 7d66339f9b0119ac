//! User-history record model.

use chrono::NaiveDateTime;

use crate::scanner::ScannedAddress;

/// Fixed render format for record dates: sortable, second precision, no zone.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The persisted `{email, date}` shape shared by both stores.
///
/// Records are immutable once created and are never deduplicated; repeated
/// addresses in the archive produce repeated records, and the analytics
/// aggregate over them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistoryRecord {
    /// Sender address.
    pub email: String,
    /// Message timestamp rendered with [`DATE_FORMAT`].
    pub date: String,
}

impl HistoryRecord {
    /// Creates a record, rendering the timestamp with [`DATE_FORMAT`].
    #[must_use]
    pub fn new(email: impl Into<String>, timestamp: NaiveDateTime) -> Self {
        Self {
            email: email.into(),
            date: timestamp.format(DATE_FORMAT).to_string(),
        }
    }
}

/// Projects scanned addresses into history records, one to one.
///
/// Order-preserving and duplicate-preserving; this stage filters nothing.
#[must_use]
pub fn transform(entries: &[ScannedAddress]) -> Vec<HistoryRecord> {
    entries
        .iter()
        .map(|entry| HistoryRecord::new(entry.email.clone(), entry.timestamp))
        .collect()
}
