//! Command-line interface definitions.
//!
//! Each subcommand picks an endpoint; the shared [`FetchArgs`] carry the
//! query filters and the output options. The key file and base URL can also
//! come from the environment.

use chrono::{NaiveDate, NaiveDateTime};
use clap::{Args, Parser, Subcommand};
use newsapi_trends::api::DEFAULT_BASE_URL;
use newsapi_trends::utils::slugify;
use newsapi_trends::{ArticleQuery, Column, Endpoint};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Columns printed when `--columns` is not given.
pub const DEFAULT_COLUMNS: [Column; 3] = [Column::Source, Column::Title, Column::PublishedAt];

/// Fetch NewsAPI articles, print them as a table, and optionally chart a term.
///
/// # Examples
///
/// ```sh
/// # Top headlines from the BBC
/// newsapi_trends headlines --domain bbc.co.uk
///
/// # Everything about bitcoin since a date, charted to the terminal
/// newsapi_trends everything bitcoin crypto --date 2024-10-20 --plot bitcoin
///
/// # Same, written to an SVG file
/// newsapi_trends everything bitcoin --plot bitcoin --svg ./plots/
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Query the top-headlines endpoint
    Headlines(FetchArgs),
    /// Query the everything endpoint
    Everything(FetchArgs),
}

impl Command {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Command::Headlines(_) => Endpoint::TopHeadlines,
            Command::Everything(_) => Endpoint::Everything,
        }
    }

    pub fn args(&self) -> &FetchArgs {
        match self {
            Command::Headlines(args) | Command::Everything(args) => args,
        }
    }
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Search terms, sent space-joined as the free-text query
    pub terms: Vec<String>,

    /// File holding the NewsAPI key
    #[arg(short, long, env = "NEWSAPI_KEY_FILE", default_value = "api_key.txt")]
    pub key_file: PathBuf,

    /// API base URL
    #[arg(long, env = "NEWSAPI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Earliest publication date (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS)
    #[arg(short, long, value_parser = parse_date)]
    pub date: Option<String>,

    /// Publisher domain to restrict to (repeatable)
    #[arg(long = "domain")]
    pub domains: Vec<String>,

    /// Two-letter language code
    #[arg(short, long)]
    pub language: Option<String>,

    /// Only show articles from this publisher (case-insensitive)
    #[arg(long)]
    pub source: Option<String>,

    /// Sort rows by this column
    #[arg(long, value_enum)]
    pub sort_by: Option<Column>,

    /// Columns to print, comma separated
    #[arg(long, value_enum, value_delimiter = ',')]
    pub columns: Vec<Column>,

    /// Print the table as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Chart how often this term appears in titles per day
    #[arg(long)]
    pub plot: Option<String>,

    /// Write the chart as SVG to this file (or directory) instead of the terminal
    #[arg(long, requires = "plot")]
    pub svg: Option<PathBuf>,
}

impl FetchArgs {
    pub fn query(&self) -> ArticleQuery {
        let mut query = ArticleQuery::new()
            .terms(self.terms.iter().cloned())
            .domains(self.domains.iter().cloned());
        if let Some(date) = &self.date {
            query = query.date(date.clone());
        }
        if let Some(language) = &self.language {
            query = query.language(language.clone());
        }
        query
    }

    pub fn columns(&self) -> &[Column] {
        if self.columns.is_empty() {
            &DEFAULT_COLUMNS
        } else {
            &self.columns
        }
    }
}

/// Accept a calendar date or a local date-time, as the API does.
fn parse_date(s: &str) -> Result<String, String> {
    let s = s.trim();
    if NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").is_ok()
    {
        Ok(s.to_string())
    } else {
        Err(format!(
            "invalid date '{s}': expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS"
        ))
    }
}

/// Resolve `--svg` to the file the chart is written to.
///
/// A path names a directory when it already is one, ends in a separator, or
/// has no extension. The directory is created if needed and the chart goes to
/// `{term-slug}_frequency.svg` inside it. Any other path is used as is.
///
/// # Examples
///
/// ```ignore
/// svg_target(Path::new("plots/"), "Bitcoin ETF")?; // plots/bitcoin-etf_frequency.svg
/// svg_target(Path::new("chart.svg"), "bitcoin")?;  // chart.svg
/// ```
pub fn svg_target(path: &Path, term: &str) -> io::Result<PathBuf> {
    let names_dir = path.is_dir()
        || path
            .as_os_str()
            .to_string_lossy()
            .ends_with(|c: char| c == '/' || c == std::path::MAIN_SEPARATOR)
        || path.extension().is_none();
    if !names_dir {
        return Ok(path.to_path_buf());
    }
    fs::create_dir_all(path)?;
    Ok(path.join(format!("{}_frequency.svg", slugify(term))))
}
