//! # mailhist-core
//!
//! Core pipeline for `MailHist`.
//!
//! This crate provides:
//! - Primary document-store publishing (`MongoDB`)
//! - Relational mirroring (`SQLite`)
//! - The dual-store republish pipeline
//! - The fixed catalog of analytic queries over the mirror

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod analytics;
mod document;
mod error;
mod publisher;
mod relational;

pub use analytics::{AnalyticsQuery, QueryEngine};
pub use document::DocumentStore;
pub use error::{Error, Result};
pub use publisher::DualStorePublisher;
pub use relational::HistoryRepository;
