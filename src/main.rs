//! # newsapi_trends
//!
//! Command-line front end: fetch articles from NewsAPI, print them as a
//! table, and optionally chart how often a term appears in titles per day.
//!
//! ## Usage
//!
//! ```sh
//! newsapi_trends everything bitcoin --language en --plot bitcoin
//! ```
//!
//! Logs go to stderr (`RUST_LOG` controls the level, default `info`) so the
//! table on stdout can be piped.

use clap::Parser;
use newsapi_trends::{ArticleClient, ArticleTable, SvgSink, TermFrequencyReport, TextSink};
use std::error::Error;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;

use cli::{Cli, svg_target};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    let endpoint = args.command.endpoint();
    let fetch = args.command.args();
    debug!(?fetch, %endpoint, "Parsed CLI arguments");

    // ---- Fetch ----
    let client = ArticleClient::from_key_file(&fetch.key_file)?.with_base_url(&fetch.base_url)?;
    let articles = client.fetch(endpoint, &fetch.query()).await?;
    info!(count = articles.len(), %endpoint, "Articles received");

    // ---- Table ----
    let mut builder = ArticleTable::builder(&articles);
    if let Some(source) = fetch.source.as_deref() {
        builder = builder.filter(move |a| {
            a.source
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case(source))
        });
    }
    if let Some(column) = fetch.sort_by {
        builder = builder.sort_by_column(column);
    }
    let table = builder.build();

    if fetch.json {
        println!("{}", table.to_json()?);
    } else {
        print!("{}", table.to_pretty_columns(fetch.columns()));
    }

    // ---- Term frequency ----
    if let Some(term) = fetch.plot.as_deref() {
        let report = TermFrequencyReport::compute(&articles, term);
        match fetch.svg.as_deref() {
            Some(path) => {
                let target = svg_target(path, term)?;
                report.plot(&mut SvgSink::new(&target))?;
                info!(path = %target.display(), "Chart written");
            }
            None => {
                println!();
                report.plot(&mut TextSink::stdout())?;
            }
        }
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, rows = table.len(), "Execution complete");
    Ok(())
}
