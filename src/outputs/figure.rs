//! Line figures and the surfaces that display them.
//!
//! A [`Figure`] is a renderer-independent description of a single line
//! series with labelled axes. It is handed to a [`FigureSink`], whose `show`
//! call is the synchronous "display the figure" step:
//!
//! | Sink | Output |
//! |------|--------|
//! | [`TextSink`] | text chart written to any `io::Write` (stdout by default) |
//! | [`SvgSink`] | SVG file on disk |
//! | [`CaptureSink`] | keeps every figure in memory |
//! | [`NoopSink`] | discards |
//!
//! Every sink accepts an empty series and draws empty axes instead of failing.

use crate::error::{NewsError, Result};
use crate::utils::ensure_parent_dir;
use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Pixels per inch when converting [`Figure::size_inches`] to SVG dimensions.
const DPI: f64 = 100.0;

/// Widest bar in the text chart.
const TEXT_BAR_WIDTH: usize = 40;

/// A single-series line plot.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Category labels along the x axis, in plotting order.
    pub x: Vec<String>,
    /// One value per x label.
    pub y: Vec<f64>,
    /// Rotation of x tick labels, in degrees counter-clockwise.
    pub x_tick_rotation: f64,
    /// Draw a marker at every point in addition to the connecting line.
    pub markers: bool,
    /// (width, height)
    pub size_inches: (f64, f64),
}

impl Figure {
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    fn points(&self) -> impl Iterator<Item = (&str, f64)> {
        self.x.iter().map(String::as_str).zip(self.y.iter().copied())
    }

    fn y_max(&self) -> f64 {
        self.y.iter().copied().fold(0.0, f64::max)
    }

    fn check(&self) -> Result<()> {
        if self.x.len() != self.y.len() {
            return Err(NewsError::Render(format!(
                "series length mismatch: {} x labels, {} y values",
                self.x.len(),
                self.y.len()
            )));
        }
        Ok(())
    }
}

/// Trait for a surface that can display a [`Figure`].
///
/// `show` returns once the figure has been displayed or written.
pub trait FigureSink {
    fn show(&mut self, figure: &Figure) -> Result<()>;
}

/// Discards every figure.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl FigureSink for NoopSink {
    fn show(&mut self, _figure: &Figure) -> Result<()> {
        Ok(())
    }
}

/// Keeps every shown figure, in order.
#[derive(Debug, Default, Clone)]
pub struct CaptureSink {
    pub figures: Vec<Figure>,
}

impl CaptureSink {
    pub fn last(&self) -> Option<&Figure> {
        self.figures.last()
    }
}

impl FigureSink for CaptureSink {
    fn show(&mut self, figure: &Figure) -> Result<()> {
        self.figures.push(figure.clone());
        Ok(())
    }
}

/// Writes a text rendering of the figure to a writer.
#[derive(Debug)]
pub struct TextSink<W> {
    out: W,
}

impl TextSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FigureSink for TextSink<W> {
    fn show(&mut self, figure: &Figure) -> Result<()> {
        figure.check()?;
        self.out.write_all(render_text(figure).as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

/// Writes the figure as an SVG document to a file.
#[derive(Debug, Clone)]
pub struct SvgSink {
    path: PathBuf,
}

impl SvgSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FigureSink for SvgSink {
    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    fn show(&mut self, figure: &Figure) -> Result<()> {
        figure.check()?;
        let svg = render_svg(figure);
        ensure_parent_dir(&self.path)?;
        fs::write(&self.path, svg)?;
        info!(points = figure.x.len(), "Wrote SVG figure");
        Ok(())
    }
}

/// Render a horizontal bar-per-point text chart.
///
/// ```text
/// Frequency of "bitcoin" in Article Titles Over Time
///
/// Date        Frequency
/// 2024-10-23  ####################                      1
/// 2024-10-24  ########################################  2
/// ```
pub fn render_text(figure: &Figure) -> String {
    let mut out = String::new();
    writeln!(out, "{}\n", figure.title).unwrap();

    let label_width = figure
        .x
        .iter()
        .map(|x| x.chars().count())
        .chain(std::iter::once(figure.x_label.chars().count()))
        .max()
        .unwrap_or(0);
    writeln!(out, "{:<label_width$}  {}", figure.x_label, figure.y_label).unwrap();

    if figure.is_empty() {
        writeln!(out, "(no data)").unwrap();
        return out;
    }

    let max = figure.y_max();
    for (label, value) in figure.points() {
        let filled = if max > 0.0 {
            ((value / max) * TEXT_BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        writeln!(
            out,
            "{:<label_width$}  {:<bar$}  {}",
            label,
            "#".repeat(filled),
            format_value(value),
            bar = TEXT_BAR_WIDTH
        )
        .unwrap();
    }
    out
}

/// Render the figure as a standalone SVG document.
pub fn render_svg(figure: &Figure) -> String {
    let width = figure.size_inches.0 * DPI;
    let height = figure.size_inches.1 * DPI;
    let (left, right, top, bottom) = (80.0, 30.0, 50.0, 110.0);
    let plot_w = width - left - right;
    let plot_h = height - top - bottom;

    let y_top = nice_ceiling(figure.y_max());
    let n = figure.x.len();
    let x_at = |i: usize| {
        if n <= 1 {
            left + plot_w / 2.0
        } else {
            left + plot_w * i as f64 / (n - 1) as f64
        }
    };
    let y_at = |v: f64| top + plot_h - plot_h * (v / y_top);

    let mut svg = String::new();
    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width:.0}" height="{height:.0}" viewBox="0 0 {width:.0} {height:.0}" font-family="sans-serif" font-size="12">"#
    )
    .unwrap();
    writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#).unwrap();
    writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="16">{}</text>"#,
        width / 2.0,
        top / 2.0 + 6.0,
        escape_xml(&figure.title)
    )
    .unwrap();

    // axes
    writeln!(
        svg,
        r#"<line x1="{left:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="black"/>"#,
        top + plot_h,
        left + plot_w,
        top + plot_h
    )
    .unwrap();
    writeln!(
        svg,
        r#"<line x1="{left:.1}" y1="{top:.1}" x2="{left:.1}" y2="{:.1}" stroke="black"/>"#,
        top + plot_h
    )
    .unwrap();

    // y ticks
    let steps = 5;
    for s in 0..=steps {
        let v = y_top * s as f64 / steps as f64;
        let y = y_at(v);
        writeln!(
            svg,
            r##"<line x1="{:.1}" y1="{y:.1}" x2="{left:.1}" y2="{y:.1}" stroke="black"/><text x="{:.1}" y="{:.1}" text-anchor="end">{}</text>"##,
            left - 5.0,
            left - 8.0,
            y + 4.0,
            format_value(v)
        )
        .unwrap();
    }

    // x ticks, rotated
    for (i, label) in figure.x.iter().enumerate() {
        let x = x_at(i);
        let y = top + plot_h + 16.0;
        writeln!(
            svg,
            r#"<text x="{x:.1}" y="{y:.1}" text-anchor="end" transform="rotate({:.1} {x:.1} {y:.1})">{}</text>"#,
            -figure.x_tick_rotation,
            escape_xml(label)
        )
        .unwrap();
    }

    // axis labels
    writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
        left + plot_w / 2.0,
        height - 12.0,
        escape_xml(&figure.x_label)
    )
    .unwrap();
    writeln!(
        svg,
        r#"<text x="18" y="{:.1}" text-anchor="middle" transform="rotate(-90 18 {:.1})">{}</text>"#,
        top + plot_h / 2.0,
        top + plot_h / 2.0,
        escape_xml(&figure.y_label)
    )
    .unwrap();

    // series
    if !figure.is_empty() {
        let points = figure
            .y
            .iter()
            .enumerate()
            .map(|(i, v)| format!("{:.1},{:.1}", x_at(i), y_at(*v)))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(
            svg,
            r##"<polyline points="{points}" fill="none" stroke="#1f77b4" stroke-width="2"/>"##
        )
        .unwrap();
        if figure.markers {
            for (i, v) in figure.y.iter().enumerate() {
                writeln!(
                    svg,
                    r##"<circle cx="{:.1}" cy="{:.1}" r="4" fill="#1f77b4"/>"##,
                    x_at(i),
                    y_at(*v)
                )
                .unwrap();
            }
        }
    }

    svg.push_str("</svg>\n");
    svg
}

/// Smallest whole number ≥ `max`, and at least 1 so an all-zero or empty
/// series still gets a usable axis.
fn nice_ceiling(max: f64) -> f64 {
    max.ceil().max(1.0)
}

fn format_value(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{v:.1}")
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
