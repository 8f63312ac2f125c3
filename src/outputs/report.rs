//! Per-day frequency of a term in article titles.
//!
//! Records without a title or a publication timestamp are ignored. The date
//! of a record is the part of `published_at` before the first `T`. Only dates
//! with at least one matching title appear in the series: there are no
//! zero-count entries.

use crate::error::Result;
use crate::models::ArticleRecord;
use crate::outputs::figure::{Figure, FigureSink};
use itertools::Itertools;
use tracing::{debug, info, instrument};

/// Date-ordered `(date, count)` series for one search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermFrequencyReport {
    term: String,
    points: Vec<(String, usize)>,
}

impl TermFrequencyReport {
    /// Count, per publication date, the titles containing `term` (case-insensitive).
    ///
    /// # Arguments
    ///
    /// * `records` - Articles to scan; those without a title or timestamp are skipped
    /// * `term` - Text to look for in titles; an empty term matches every title
    ///
    /// # Returns
    ///
    /// A report whose points are `(date, count)` pairs in ascending date order.
    /// A title counts once however often the term appears in it.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let report = TermFrequencyReport::compute(&articles, "bitcoin");
    /// assert_eq!(report.dates(), vec!["2024-10-23", "2024-10-24"]);
    /// assert_eq!(report.counts(), vec![1, 2]);
    /// ```
    #[instrument(level = "debug", skip(records), fields(count = records.len()))]
    pub fn compute(records: &[ArticleRecord], term: &str) -> Self {
        let points = records
            .iter()
            .filter(|r| r.title.is_some())
            .filter_map(|r| Some((r, r.published_date()?)))
            .filter(|(r, _)| r.title_contains(term))
            .map(|(_, date)| date)
            .counts()
            .into_iter()
            .sorted()
            .map(|(date, count)| (date.to_string(), count))
            .collect::<Vec<_>>();

        debug!(dates = points.len(), "Computed term frequency");
        Self {
            term: term.to_string(),
            points,
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn points(&self) -> &[(String, usize)] {
        &self.points
    }

    pub fn dates(&self) -> Vec<&str> {
        self.points.iter().map(|(d, _)| d.as_str()).collect()
    }

    pub fn counts(&self) -> Vec<usize> {
        self.points.iter().map(|(_, c)| *c).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Line figure with dates on x, counts on y and rotated date labels.
    pub fn figure(&self) -> Figure {
        Figure {
            title: format!(
                "Frequency of \"{}\" in Article Titles Over Time",
                self.term
            ),
            x_label: "Date".to_string(),
            y_label: "Frequency".to_string(),
            x: self.dates().into_iter().map(str::to_owned).collect(),
            y: self.points.iter().map(|(_, c)| *c as f64).collect(),
            x_tick_rotation: 45.0,
            markers: true,
            size_inches: (10.0, 6.0),
        }
    }

    /// Display the figure on `sink`; returns after the sink has shown it.
    pub fn plot<S: FigureSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        info!(term = %self.term, dates = self.points.len(), "Plotting term frequency");
        sink.show(&self.figure())
    }
}

/// Compute the report for `term` and display it on `sink`.
pub fn plot_word_popularity<S: FigureSink + ?Sized>(
    records: &[ArticleRecord],
    term: &str,
    sink: &mut S,
) -> Result<()> {
    TermFrequencyReport::compute(records, term).plot(sink)
}
