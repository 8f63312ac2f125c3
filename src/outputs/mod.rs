//! Output generation for fetched articles.
//!
//! # Submodules
//!
//! - [`table`]: row/column view with filtering, sorting, text and JSON rendering
//! - [`report`]: per-day term frequency series over article titles
//! - [`figure`]: line figures and the sinks that display them (text, SVG, capture)

pub mod figure;
pub mod report;
pub mod table;
