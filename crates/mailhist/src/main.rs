//! `MailHist` - mail-archive user-history extraction and analytics.
//!
//! Scans a mail archive for sender addresses and their date context,
//! republishes the record set into the primary document store, mirrors it
//! into the relational store, and serves a small menu of canned analytic
//! queries over the mirror.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod config;

use std::io::{BufRead, Write};

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mailhist_core::{
    AnalyticsQuery, DocumentStore, DualStorePublisher, HistoryRepository, QueryEngine,
};
use mailhist_scan::{ArchiveScanner, transform};

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailhist=info,mailhist_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "mailhist.json".to_string());
    let config = Config::load(&config_path).await?;
    info!("Loaded configuration from {}", config_path);

    let scanner = ArchiveScanner::new()?;
    let entries = scanner
        .scan_path(&config.archive_path)
        .with_context(|| format!("scanning archive {}", config.archive_path))?;
    println!("Extracted {} email-date pairs.", entries.len());

    let records = transform(&entries);
    println!("Transformed {} records.", records.len());

    let primary = DocumentStore::connect(
        &config.mongo_uri,
        &config.mongo_db,
        &config.mongo_collection,
    )
    .await?;
    let secondary = HistoryRepository::new(&config.sqlite_path).await?;
    let publisher = DualStorePublisher::new(primary, secondary);

    publisher.publish_primary(&records).await?;
    println!("Saved records to the document store.");

    let mirrored = publisher.mirror_to_secondary().await?;
    println!(
        "Mirrored {} records into {}.",
        mirrored.len(),
        config.sqlite_path
    );

    let engine = QueryEngine::open(&config.sqlite_path).await?;
    run_query_menu(&engine).await?;

    Ok(())
}

/// Runs the interactive query-selection loop until the Exit choice or EOF.
///
/// Out-of-range and non-numeric selections are rejected with a re-prompt
/// and never reach the query engine.
async fn run_query_menu(engine: &QueryEngine) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let exit_choice = AnalyticsQuery::ALL.len() + 1;

    loop {
        println!("Select a query to run:");
        for (index, query) in AnalyticsQuery::ALL.iter().enumerate() {
            println!("  {}. {}", index + 1, query.label());
        }
        println!("  {exit_choice}. Exit");
        print!("Enter choice number: ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let Ok(choice) = line.trim().parse::<usize>() else {
            println!("Invalid choice, try again.");
            continue;
        };
        if choice == 0 || choice > exit_choice {
            println!("Invalid choice, try again.");
            continue;
        }
        if choice == exit_choice {
            break;
        }

        let query = AnalyticsQuery::ALL[choice - 1];
        println!("-- {} --", query.label());
        for row in engine.run(query).await? {
            println!("{}", row.join(" | "));
        }
    }

    println!("Finished");
    Ok(())
}
