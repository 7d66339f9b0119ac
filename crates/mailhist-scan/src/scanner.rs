//! Archive scanning.
//!
//! Walks a line-oriented mail archive, tracking the most recent `Date:`
//! header as context, and extracts every sender address seen under it.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::error::Result;

/// A sender address paired with the date context it was seen under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedAddress {
    /// The extracted email address.
    pub email: String,
    /// Wall-clock timestamp of the most recent date header.
    pub timestamp: NaiveDateTime,
}

/// Date context carried across archive lines.
///
/// Exactly one slot: either the wall-clock time of the last parseable
/// header, or nothing. An unparseable header forces `Unset` so addresses
/// are never attributed to a stale date.
#[derive(Debug, Clone, Copy)]
enum DateContext {
    /// No usable date header seen yet, or the last one failed to parse.
    Unset,
    /// Timestamp of the most recent parseable date header.
    Active(NaiveDateTime),
}

/// Scans mail-archive text for sender addresses and their date context.
#[derive(Debug)]
pub struct ArchiveScanner {
    date_header: Regex,
    address: Regex,
}

impl ArchiveScanner {
    /// Creates a scanner with the archive line patterns compiled.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern fails to compile.
    pub fn new() -> Result<Self> {
        Ok(Self {
            date_header: Regex::new(r"(?i)^Date: (.*)$")?,
            address: Regex::new(r"\b[\w.-]+@[\w.-]+\.[A-Za-z]{2,6}\b")?,
        })
    }

    /// Scans archive text line by line, in input order.
    ///
    /// A `Date:` header line updates the context and is never itself
    /// scanned for addresses. Every other line yields one entry per
    /// address token while the context is active; addresses seen without
    /// a context are discarded silently.
    ///
    /// # Errors
    ///
    /// Returns an error if reading a line fails. Unparseable header dates
    /// are not errors; they reset the context and the scan continues.
    pub fn scan<R: BufRead>(&self, reader: R) -> Result<Vec<ScannedAddress>> {
        let mut context = DateContext::Unset;
        let mut found = Vec::new();

        for line in reader.lines() {
            let line = line?;

            if let Some(captures) = self.date_header.captures(&line) {
                context = match parse_timestamp(&captures[1]) {
                    Some(timestamp) => DateContext::Active(timestamp),
                    None => DateContext::Unset,
                };
                continue;
            }

            if let DateContext::Active(timestamp) = context {
                for address in self.address.find_iter(&line) {
                    found.push(ScannedAddress {
                        email: address.as_str().to_owned(),
                        timestamp,
                    });
                }
            }
        }

        Ok(found)
    }

    /// Scans the archive file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    pub fn scan_path(&self, path: impl AsRef<Path>) -> Result<Vec<ScannedAddress>> {
        let file = File::open(path)?;
        self.scan(BufReader::new(file))
    }
}

/// Datetime forms accepted after the RFC 2822 / RFC 3339 attempts.
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d %b %Y %H:%M:%S",
    "%a, %d %b %Y %H:%M:%S",
];

/// Date-only forms, read as midnight.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d %b %Y"];

/// Parses a date-header value with a permissive grammar.
///
/// Offset-bearing forms are reduced to their wall-clock reading; the
/// rendered record format carries no zone either way.
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = strip_zone_comment(raw);

    if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
        return Some(parsed.naive_local());
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_local());
    }
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(raw, format) {
            return parsed.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// Drops a trailing parenthesized zone comment such as `(UTC)`.
fn strip_zone_comment(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.ends_with(')')
        && let Some(open) = trimmed.rfind('(')
    {
        return trimmed[..open].trim_end();
    }
    trimmed
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn timestamp(text: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn scan(text: &str) -> Vec<ScannedAddress> {
        ArchiveScanner::new().unwrap().scan(text.as_bytes()).unwrap()
    }

    #[test]
    fn test_scan_pairs_addresses_with_current_date() {
        let found = scan(concat!(
            "Date: Mon, 1 Jan 2024 10:00:00 +0000\n",
            "contact me at a@example.com or b@test.org\n",
        ));

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].email, "a@example.com");
        assert_eq!(found[1].email, "b@test.org");
        assert_eq!(found[0].timestamp, timestamp("2024-01-01 10:00:00"));
        assert_eq!(found[1].timestamp, timestamp("2024-01-01 10:00:00"));
    }

    #[test]
    fn test_scan_discards_addresses_before_any_header() {
        let found = scan("hello a@example.com\n");
        assert!(found.is_empty());
    }

    #[test]
    fn test_scan_resets_context_on_unparseable_header() {
        let found = scan(concat!(
            "Date: Mon, 1 Jan 2024 10:00:00 +0000\n",
            "first a@example.com\n",
            "Date: not-a-date\n",
            "later c@example.com\n",
        ));

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].email, "a@example.com");
    }

    #[test]
    fn test_scan_never_extracts_addresses_from_header_lines() {
        let found = scan(concat!(
            "Date: ask admin@example.com\n",
            "then b@example.com\n",
        ));

        // The header line is skipped for addresses, and its failed parse
        // leaves no context for the following line either.
        assert!(found.is_empty());
    }

    #[test]
    fn test_scan_context_persists_until_next_header() {
        let found = scan(concat!(
            "Date: 2024-02-03 08:15:00\n",
            "one a@example.com\n",
            "nothing on this line\n",
            "two b@example.com\n",
        ));

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].timestamp, timestamp("2024-02-03 08:15:00"));
        assert_eq!(found[1].timestamp, timestamp("2024-02-03 08:15:00"));
    }

    #[test]
    fn test_scan_header_prefix_is_case_insensitive() {
        let found = scan(concat!(
            "DATE: 2024-02-03 08:15:00\n",
            "a@example.com\n",
        ));

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].timestamp, timestamp("2024-02-03 08:15:00"));
    }

    #[test]
    fn test_scan_extracts_multiple_addresses_left_to_right() {
        let found = scan(concat!(
            "Date: 2024-02-03 08:15:00\n",
            "cc z@last.org, m@middle.net and a@first.com\n",
        ));

        let emails: Vec<&str> = found.iter().map(|entry| entry.email.as_str()).collect();
        assert_eq!(emails, ["z@last.org", "m@middle.net", "a@first.com"]);
    }

    #[test]
    fn test_scan_later_header_overwrites_context() {
        let found = scan(concat!(
            "Date: 2024-01-01 00:00:00\n",
            "a@example.com\n",
            "Date: 2024-06-15 12:30:00\n",
            "b@example.com\n",
        ));

        assert_eq!(found[0].timestamp, timestamp("2024-01-01 00:00:00"));
        assert_eq!(found[1].timestamp, timestamp("2024-06-15 12:30:00"));
    }

    #[test]
    fn test_scan_then_transform_yields_canonical_records() {
        let found = scan(concat!(
            "Date: Mon, 1 Jan 2024 10:00:00 +0000\n",
            "contact me at a@example.com or b@test.org\n",
        ));

        let records = crate::record::transform(&found);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].email, "a@example.com");
        assert_eq!(records[0].date, "2024-01-01 10:00:00");
        assert_eq!(records[1].email, "b@test.org");
        assert_eq!(records[1].date, "2024-01-01 10:00:00");
    }

    #[test]
    fn test_parse_timestamp_accepts_rfc2822() {
        assert_eq!(
            parse_timestamp("Mon, 1 Jan 2024 10:00:00 +0000"),
            Some(timestamp("2024-01-01 10:00:00"))
        );
    }

    #[test]
    fn test_parse_timestamp_keeps_wall_clock_of_offset_forms() {
        // The rendered format carries no zone, so the local reading wins.
        assert_eq!(
            parse_timestamp("Mon, 1 Jan 2024 10:00:00 +0530"),
            Some(timestamp("2024-01-01 10:00:00"))
        );
        assert_eq!(
            parse_timestamp("2024-01-01T10:00:00-05:00"),
            Some(timestamp("2024-01-01 10:00:00"))
        );
    }

    #[test]
    fn test_parse_timestamp_strips_zone_comment() {
        assert_eq!(
            parse_timestamp("Sat, 5 Jan 2008 09:12:18 -0500 (EST)"),
            Some(timestamp("2008-01-05 09:12:18"))
        );
    }

    #[test]
    fn test_parse_timestamp_accepts_date_only_as_midnight() {
        assert_eq!(
            parse_timestamp("2024-03-05"),
            Some(timestamp("2024-03-05 00:00:00"))
        );
        assert_eq!(
            parse_timestamp("5 Mar 2024"),
            Some(timestamp("2024-03-05 00:00:00"))
        );
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert_eq!(parse_timestamp("not-a-date"), None);
        assert_eq!(parse_timestamp(""), None);
    }
}
