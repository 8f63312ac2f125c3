//! # newsapi_trends
//!
//! Fetch articles from the NewsAPI search service, look at them as a table,
//! and chart how often a term shows up in headlines day by day.
//!
//! ## Pipeline
//!
//! 1. **Fetch**: [`ArticleClient`] queries `top-headlines` or `everything`
//!    and returns [`ArticleRecord`]s
//! 2. **Tabulate**: [`ArticleTable`] filters, sorts and materializes rows
//! 3. **Report**: [`TermFrequencyReport`] counts matching titles per day and
//!    plots them on a [`FigureSink`]
//!
//! ```ignore
//! let client = ArticleClient::from_key_file("api_key.txt")?;
//! let articles = client
//!     .fetch_everything(&ArticleQuery::new().terms(["bitcoin"]).language("en"))
//!     .await?;
//! println!("{}", ArticleTable::new(&articles).to_pretty());
//! TermFrequencyReport::compute(&articles, "bitcoin").plot(&mut TextSink::stdout())?;
//! ```

pub mod api;
pub mod error;
pub mod models;
pub mod outputs;
pub mod utils;

pub use api::{ArticleClient, ArticleQuery, Endpoint, HttpResponse, ReqwestTransport, Transport};
pub use error::{NewsError, Result};
pub use models::ArticleRecord;
pub use outputs::figure::{CaptureSink, Figure, FigureSink, NoopSink, SvgSink, TextSink};
pub use outputs::report::{TermFrequencyReport, plot_word_popularity};
pub use outputs::table::{ArticleTable, Column, TableBuilder};
