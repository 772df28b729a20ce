//! Structural report writers.
//!
//! Writers render already filtered trees; they never re-apply the tag
//! filter. Two views exist: the feature view mirrors the tree, and the tag
//! view groups scenarios under each tag via [`TagIndex`].

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::batch::FileFailure;
use crate::node::Node;
use crate::tag_index::TagIndex;

mod escape;
/// JSON writer.
pub mod json;
/// Indented plain-text writer.
pub mod text;
/// XML writer.
pub mod xml;


/// Serialisation format of a report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Indented text tree.
    Text,
    /// JSON document.
    Json,
    /// XML document.
    Xml,
}

impl OutputFormat {
    /// Infer the format from a file extension (`txt`, `json` or `xml`).
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use cukedex::reporting::OutputFormat;
    ///
    /// let json = OutputFormat::from_extension(Path::new("out/report.JSON"));
    /// assert_eq!(json, Some(OutputFormat::Json));
    /// assert_eq!(OutputFormat::from_extension(Path::new("report.html")), None);
    /// ```
    #[must_use]
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "txt" | "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            "xml" => Some(Self::Xml),
            _ => None,
        }
    }

    /// Lowercase name of the format.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }
}

/// Report layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// Features with their scenarios.
    #[default]
    Feature,
    /// Tags with the features and scenarios using them.
    Tag,
}

impl FromStr for View {
    type Err = ReportError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "feature" => Ok(Self::Feature),
            "tag" => Ok(Self::Tag),
            other => Err(ReportError::UnknownView(other.to_string())),
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Feature => "feature",
            Self::Tag => "tag",
        })
    }
}

/// Errors raised while rendering or writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Writing to the destination failed.
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
    /// JSON serialisation failed.
    #[error("failed to serialise report: {0}")]
    Json(#[from] serde_json::Error),
    /// Formatting a text or XML document failed.
    #[error("failed to format report")]
    Fmt(#[from] fmt::Error),
    /// A view name was not recognised.
    #[error("unknown report view `{0}` (expected `feature` or `tag`)")]
    UnknownView(String),
}

/// Everything a writer needs: the parsed trees and the files that failed.
#[derive(Clone, Copy, Debug)]
pub struct Report<'a> {
    /// Feature trees in input order.
    pub features: &'a [Node],
    /// Files that could not be parsed.
    pub failures: &'a [FileFailure],
}

/// Order features by display text, and the scenarios and outlines of each
/// feature the same way, for reports listed by name.
///
/// The trees passed in are not touched. Examples blocks and table rows keep
/// source order. Equal texts keep their relative order, so numbered
/// duplicates still follow the first occurrence.
///
/// # Examples
///
/// ```
/// use cukedex::reporting::sorted_by_name;
/// use cukedex::{TagFilter, parse_feature_source};
///
/// let text = "Feature: f\n  Scenario: b\n  Scenario: a\n";
/// let feature = parse_feature_source(text, None, &TagFilter::unfiltered())?;
/// let sorted = sorted_by_name(std::slice::from_ref(&feature));
/// let names = sorted.first().map(|feature| feature.child_names());
/// assert_eq!(names, Some(vec!["Scenario: a", "Scenario: b"]));
/// assert_eq!(feature.child_names(), ["Scenario: b", "Scenario: a"]);
/// # Ok::<(), cukedex::ParseError>(())
/// ```
#[must_use]
pub fn sorted_by_name(features: &[Node]) -> Vec<Node> {
    let mut sorted: Vec<Node> = features.iter().map(Node::with_sorted_children).collect();
    sorted.sort_by(|left, right| left.display_text().cmp(right.display_text()));
    sorted
}

/// Render `report` in the given format and view.
///
/// # Errors
///
/// Returns [`ReportError`] when serialisation fails.
///
/// # Examples
///
/// ```
/// use cukedex::reporting::{OutputFormat, Report, View, render};
/// use cukedex::{TagFilter, parse_feature_source};
///
/// let source = "Feature: f\n  Scenario: s\n";
/// let feature = parse_feature_source(source, None, &TagFilter::unfiltered())?;
/// let report = Report { features: std::slice::from_ref(&feature), failures: &[] };
/// let text = render(OutputFormat::Text, View::Feature, report)?;
/// assert_eq!(text, "Feature: f\n  Scenario: s\n");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn render(format: OutputFormat, view: View, report: Report<'_>) -> Result<String, ReportError> {
    if format == OutputFormat::Json {
        return Ok(match view {
            View::Feature => json::to_string(report)?,
            View::Tag => json::tags_to_string(&TagIndex::build(report.features))?,
        });
    }
    let mut out = String::new();
    match (format, view) {
        (OutputFormat::Xml, View::Feature) => xml::write(&mut out, report)?,
        (OutputFormat::Xml, View::Tag) => {
            xml::write_tags(&mut out, &TagIndex::build(report.features))?;
        }
        (_, View::Feature) => text::write(&mut out, report)?,
        (_, View::Tag) => text::write_tags(&mut out, &TagIndex::build(report.features))?,
    }
    Ok(out)
}

/// Render `report` and write it to `writer`.
///
/// # Errors
///
/// Returns [`ReportError`] when rendering or writing fails.
pub fn write_report<W: std::io::Write>(
    writer: &mut W,
    format: OutputFormat,
    view: View,
    report: Report<'_>,
) -> Result<(), ReportError> {
    let rendered = render(format, view, report)?;
    writer.write_all(rendered.as_bytes())?;
    writer.flush()?;
    Ok(())
}
