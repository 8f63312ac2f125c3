//! Tabular view over article records.
//!
//! A table always has the same seven columns, in this order:
//!
//! ```text
//! url | source | author | title | description | published_at | content
//! ```
//!
//! Rows are built by [`TableBuilder`], which applies an optional filter and
//! then an optional stable sort before materializing cells. Absent fields stay
//! `None` in the cells; they are never replaced with an empty string.

use crate::models::ArticleRecord;
use prettytable::{Cell, Row, Table};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use tracing::debug;

/// Marker printed for absent cells in the pretty table.
const MISSING_MARKER: &str = "-";

/// Display width limit for a single cell in [`ArticleTable::to_pretty`].
const MAX_CELL_CHARS: usize = 48;

/// One column of an [`ArticleTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Column {
    Url,
    Source,
    Author,
    Title,
    Description,
    #[value(name = "published_at")]
    PublishedAt,
    Content,
}

impl Column {
    /// Every column, in table order.
    pub const ALL: [Column; 7] = [
        Column::Url,
        Column::Source,
        Column::Author,
        Column::Title,
        Column::Description,
        Column::PublishedAt,
        Column::Content,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Column::Url => "url",
            Column::Source => "source",
            Column::Author => "author",
            Column::Title => "title",
            Column::Description => "description",
            Column::PublishedAt => "published_at",
            Column::Content => "content",
        }
    }

    pub fn from_name(name: &str) -> Option<Column> {
        Column::ALL.into_iter().find(|c| c.name() == name)
    }

    fn index(self) -> usize {
        self as usize
    }

    /// The record field this column shows.
    pub fn value(self, record: &ArticleRecord) -> Option<&str> {
        match self {
            Column::Url => record.url.as_deref(),
            Column::Source => record.source.as_deref(),
            Column::Author => record.author.as_deref(),
            Column::Title => record.title.as_deref(),
            Column::Description => record.description.as_deref(),
            Column::PublishedAt => record.published_at.as_deref(),
            Column::Content => record.content.as_deref(),
        }
    }
}

type Filter<'a> = Box<dyn Fn(&ArticleRecord) -> bool + 'a>;
type Order<'a> = Box<dyn Fn(&ArticleRecord, &ArticleRecord) -> Ordering + 'a>;

/// Builds an [`ArticleTable`]: filter first, then sort, then materialize.
pub struct TableBuilder<'a> {
    records: &'a [ArticleRecord],
    filter: Option<Filter<'a>>,
    order: Option<Order<'a>>,
}

impl<'a> TableBuilder<'a> {
    /// Keep only records for which `predicate` returns `true`, preserving order.
    pub fn filter<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&ArticleRecord) -> bool + 'a,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Sort ascending by `key`. The sort is stable: equal keys keep their
    /// relative order.
    pub fn sort_by_key<K, F>(mut self, key: F) -> Self
    where
        K: Ord,
        F: Fn(&ArticleRecord) -> K + 'a,
    {
        self.order = Some(Box::new(move |a: &ArticleRecord, b: &ArticleRecord| {
            key(a).cmp(&key(b))
        }));
        self
    }

    /// Sort ascending by one column's value; absent values sort first.
    pub fn sort_by_column(self, column: Column) -> Self {
        self.sort_by_key(move |record| column.value(record).map(str::to_owned))
    }

    pub fn build(self) -> ArticleTable {
        let mut kept: Vec<&ArticleRecord> = match &self.filter {
            Some(predicate) => self.records.iter().filter(|r| predicate(*r)).collect(),
            None => self.records.iter().collect(),
        };
        if let Some(order) = &self.order {
            kept.sort_by(|a, b| order(*a, *b));
        }

        let rows = kept
            .into_iter()
            .map(|record| Column::ALL.map(|c| c.value(record).map(str::to_owned)))
            .collect::<Vec<_>>();
        debug!(
            input = self.records.len(),
            rows = rows.len(),
            "Materialized article table"
        );
        ArticleTable { rows }
    }
}

/// Row/column view over a sequence of [`ArticleRecord`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleTable {
    rows: Vec<[Option<String>; 7]>,
}

impl ArticleTable {
    /// Column names, in order.
    pub const COLUMNS: [&'static str; 7] = [
        "url",
        "source",
        "author",
        "title",
        "description",
        "published_at",
        "content",
    ];

    /// One row per record, no filter and no sort.
    pub fn new(records: &[ArticleRecord]) -> Self {
        Self::builder(records).build()
    }

    /// Start building a table over `records`.
    ///
    /// # Arguments
    ///
    /// * `records` - Source articles; one row per record that passes the filter
    ///
    /// # Returns
    ///
    /// A [`TableBuilder`] with no filter and no sort. The filter always runs
    /// before the sort, whatever order the calls are made in.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let table = ArticleTable::builder(&articles)
    ///     .filter(|a| a.author.is_some())
    ///     .sort_by_column(Column::PublishedAt)
    ///     .build();
    /// ```
    pub fn builder(records: &[ArticleRecord]) -> TableBuilder<'_> {
        TableBuilder {
            records,
            filter: None,
            order: None,
        }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &Self::COLUMNS
    }

    pub fn rows(&self) -> &[[Option<String>; 7]] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at `row` in `column`; `None` when the row is out of range or the
    /// value is absent.
    pub fn cell(&self, row: usize, column: Column) -> Option<&str> {
        self.rows.get(row)?[column.index()].as_deref()
    }

    /// All values of one column, top to bottom.
    pub fn column(&self, column: Column) -> Vec<Option<&str>> {
        self.rows
            .iter()
            .map(|row| row[column.index()].as_deref())
            .collect()
    }

    /// Render every column as a text table.
    pub fn to_pretty(&self) -> String {
        self.to_pretty_columns(&Column::ALL)
    }

    /// Render the chosen columns as a text table. Long cells are shortened
    /// and absent cells show as `-`.
    pub fn to_pretty_columns(&self, columns: &[Column]) -> String {
        let mut table = Table::new();
        table.set_titles(Row::new(
            columns.iter().map(|c| Cell::new(c.name())).collect(),
        ));
        for row in &self.rows {
            table.add_row(Row::new(
                columns
                    .iter()
                    .map(|c| {
                        let shown = row[c.index()]
                            .as_deref()
                            .map(|v| shorten(v, MAX_CELL_CHARS))
                            .unwrap_or_else(|| MISSING_MARKER.to_string());
                        Cell::new(&shown)
                    })
                    .collect(),
            ));
        }
        table.to_string()
    }

    /// Serialize rows as a JSON array of objects keyed by column name.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for ArticleTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&RowRef(row))?;
        }
        seq.end()
    }
}

/// Serializes one row as a map in fixed column order.
struct RowRef<'a>(&'a [Option<String>; 7]);

impl Serialize for RowRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(ArticleTable::COLUMNS.len()))?;
        for (name, value) in ArticleTable::COLUMNS.iter().zip(self.0.iter()) {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

fn shorten(value: &str, max_chars: usize) -> String {
    let flat = value.replace(['\n', '\r'], " ");
    if flat.chars().count() <= max_chars {
        flat
    } else {
        let head: String = flat.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{head}…")
    }
}
