//! # mailhist-scan
//!
//! Mail-archive scanning and user-history record extraction.
//!
//! ## Features
//!
//! - **Archive scanning**: line-oriented walk of a mail archive, pairing
//!   sender addresses with the most recent `Date:` header
//! - **Permissive date grammar**: RFC 2822, RFC 3339, and common calendar
//!   forms; unparseable headers reset the context instead of erroring
//! - **Record normalization**: projection into the persisted `{email, date}`
//!   shape with a fixed, sortable date format
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailhist_scan::{ArchiveScanner, transform};
//!
//! let scanner = ArchiveScanner::new()?;
//! let entries = scanner.scan_path("archive.mbox")?;
//! let records = transform(&entries);
//! println!("{} records extracted", records.len());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
mod record;
mod scanner;

pub use error::{Error, Result};
pub use record::{DATE_FORMAT, HistoryRecord, transform};
pub use scanner::{ArchiveScanner, ScannedAddress};
