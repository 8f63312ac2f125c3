//! Data models for NewsAPI articles.
//!
//! This module defines the record type handed to callers and the wire types
//! used to decode the API's JSON:
//! - [`ArticleRecord`]: one normalized article, every field optional
//! - [`ApiResponse`] / [`WireArticle`]: the `{ "articles": [...] }` envelope
//!
//! The wire types mirror the API's camelCase names (`publishedAt`) and its
//! nested `source` object; [`ArticleRecord`] flattens `source.name` and uses
//! snake_case throughout.

use crate::utils::{contains_ignore_case, date_prefix};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single news article as returned by the search API.
///
/// Every field is optional: the API omits or nulls fields freely, and that
/// absence is carried through to tables and reports instead of being turned
/// into an error or an empty string. A field the API sent as `""` stays
/// `Some("")`.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArticleRecord {
    /// Link to the article.
    pub url: Option<String>,
    /// Publisher name (the API's `source.name`).
    pub source: Option<String>,
    pub author: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    /// ISO-8601 timestamp with zone suffix, e.g. `2024-10-24T12:00:00Z`.
    pub published_at: Option<String>,
    /// Truncated article body as provided by the API.
    pub content: Option<String>,
}

impl ArticleRecord {
    /// Calendar date of publication: the part of `published_at` before the first `T`.
    ///
    /// ```ignore
    /// let a = ArticleRecord { published_at: Some("2024-10-24T12:00:00Z".into()), ..Default::default() };
    /// assert_eq!(a.published_date(), Some("2024-10-24"));
    /// ```
    pub fn published_date(&self) -> Option<&str> {
        self.published_at.as_deref().map(date_prefix)
    }

    /// Whether the title contains `term`, ignoring case. `false` without a title.
    pub fn title_contains(&self, term: &str) -> bool {
        self.title
            .as_deref()
            .is_some_and(|title| contains_ignore_case(title, term))
    }
}

impl fmt::Display for ArticleRecord {
    /// `"{title} by {author} from {source} on {published_at}"`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let or_unknown = |v: &Option<String>| v.as_deref().unwrap_or("unknown").to_string();
        write!(
            f,
            "{} by {} from {} on {}",
            or_unknown(&self.title),
            or_unknown(&self.author),
            or_unknown(&self.source),
            or_unknown(&self.published_at)
        )
    }
}

impl fmt::Debug for ArticleRecord {
    /// `Article(title='…', author='…', source='…', publishedAt='…')`, with a
    /// bare `None` for absent fields.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quoted = |v: &Option<String>| match v.as_deref() {
            Some(s) => format!("'{s}'"),
            None => "None".to_string(),
        };
        write!(
            f,
            "Article(title={}, author={}, source={}, publishedAt={})",
            quoted(&self.title),
            quoted(&self.author),
            quoted(&self.source),
            quoted(&self.published_at)
        )
    }
}

/// Envelope of a successful search response.
///
/// Only `articles` is required; `status` and `totalResults` are ignored.
#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    pub articles: Vec<WireArticle>,
}

/// One element of the `articles` array, as sent on the wire.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WireArticle {
    pub url: Option<String>,
    pub source: Option<WireSource>,
    pub author: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<String>,
    pub content: Option<String>,
}

/// The nested `source` object. `id` is dropped.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WireSource {
    pub name: Option<String>,
}

impl From<WireArticle> for ArticleRecord {
    fn from(wire: WireArticle) -> Self {
        ArticleRecord {
            url: wire.url,
            source: wire.source.and_then(|s| s.name),
            author: wire.author,
            title: wire.title,
            description: wire.description,
            published_at: wire.published_at,
            content: wire.content,
        }
    }
}
