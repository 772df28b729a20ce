//! Building filtered feature trees from Gherkin source.
//!
//! Parsing is line oriented. Each line is classified on its own and fed to a
//! per-file [`state::ParseState`], which opens constructs on their header
//! line and only attaches them to a parent once a later header (or the end
//! of the file) shows they are complete. The tag filter is applied at that
//! point, so rejected constructs never touch the tree.

mod state;


use std::path::Path;

use camino::{Utf8Path, Utf8PathBuf};
use cukedex_patterns::{ENGLISH, select_locale};
use thiserror::Error;

use crate::filter::TagFilter;
use crate::node::Node;
use crate::source::{read_feature_text, relative_feature_path, strip_byte_order_mark};
use state::ParseState;

/// Structural problems that stop a file from producing a tree.
///
/// Every variant records the 1-based line at which processing stopped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A `Scenario` or `Scenario Outline` header appeared before any
    /// `Feature` header.
    #[error("line {line}: scenario header appears before the feature header")]
    ScenarioOutsideFeature {
        /// Line of the offending header.
        line: usize,
    },
    /// An `Examples` header appeared with no open scenario outline.
    #[error("line {line}: examples header appears outside a scenario outline")]
    ExamplesOutsideOutline {
        /// Line of the offending header.
        line: usize,
    },
    /// A second `Feature` header appeared in the same file.
    #[error("line {line}: only one feature header is allowed per file")]
    DuplicateFeature {
        /// Line of the second header.
        line: usize,
    },
    /// The file ended without a `Feature` header.
    #[error("line {line}: no feature header found")]
    MissingFeature {
        /// Last line of the file.
        line: usize,
    },
}

impl ParseError {
    /// The 1-based line at which parsing stopped.
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            Self::ScenarioOutsideFeature { line }
            | Self::ExamplesOutsideOutline { line }
            | Self::DuplicateFeature { line }
            | Self::MissingFeature { line } => *line,
        }
    }
}

/// Failure to turn one feature file into a tree.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// The file could not be read as UTF-8 text.
    #[error("failed to read feature file {path}: {source}")]
    Read {
        /// File that failed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file was read but its structure was rejected.
    #[error("failed to parse feature file {path}: {source}")]
    Parse {
        /// File that failed.
        path: Utf8PathBuf,
        /// Structural error with its line.
        #[source]
        source: ParseError,
    },
}

impl FeatureError {
    /// The file the error belongs to.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        match self {
            Self::Read { path, .. } | Self::Parse { path, .. } => path,
        }
    }

    /// Line at which parsing stopped, when the file was read at all.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Read { .. } => None,
            Self::Parse { source, .. } => Some(source.line()),
        }
    }
}

/// Parse in-memory feature text into a filtered tree.
///
/// The keyword locale is taken from a `# language:` declaration on the first
/// line. An unsupported declaration falls back to English with a warning.
///
/// # Errors
///
/// Returns a [`ParseError`] when the file has no `Feature` header, has more
/// than one, or places a scenario or examples header where no parent can
/// own it.
///
/// # Examples
///
/// ```
/// use cukedex::{TagFilter, parse_feature_source};
///
/// let text = "@wip\nFeature: cart\n  Scenario: add\n  Scenario: remove\n";
/// let filter = TagFilter::unfiltered().with_none(["@wip"]);
/// let feature = parse_feature_source(text, None, &filter)?;
/// assert_eq!(feature.display_text(), "Feature: cart");
/// assert!(!feature.has_children());
/// # Ok::<(), cukedex::ParseError>(())
/// ```
pub fn parse_feature_source(
    text: &str,
    file_path: Option<&Utf8Path>,
    filter: &TagFilter,
) -> Result<Node, ParseError> {
    let text = strip_byte_order_mark(text);
    let keywords = select_locale(text.lines().next()).unwrap_or_else(|err| {
        tracing::warn!(
            file = file_path.map(Utf8Path::as_str),
            error = %err,
            "falling back to English keywords"
        );
        &ENGLISH
    });
    let mut state = ParseState::new(filter, file_path, keywords);
    for line in text.lines() {
        state.handle_line(line)?;
    }
    state.finish()
}

/// Read and parse one feature file.
///
/// The Feature node records the path relative to the `root` directory
/// marker (see [`relative_feature_path`]).
///
/// # Errors
///
/// Returns [`FeatureError::Read`] when the file cannot be read and
/// [`FeatureError::Parse`] when its structure is rejected.
pub fn parse_feature_file(
    path: &Path,
    filter: &TagFilter,
    root: &str,
) -> Result<Node, FeatureError> {
    let relative = relative_feature_path(path, root);
    let text = read_feature_text(path).map_err(|source| FeatureError::Read {
        path: relative.clone(),
        source,
    })?;
    parse_feature_source(&text, Some(&relative), filter).map_err(|source| FeatureError::Parse {
        path: relative,
        source,
    })
}
