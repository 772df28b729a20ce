//! Classification of single feature-file lines.
//!
//! [`classify`] tests a line against each structural kind in a fixed order
//! and returns the first match, so a line never has two kinds:
//!
//! 1. doc-string delimiter
//! 2. tag line
//! 3. `Feature` header
//! 4. `Scenario` header
//! 5. `Scenario Outline` header
//! 6. `Examples` header
//! 7. example-table row
//!
//! The classifier is stateless. Whether a doc string is currently open, or
//! whether a table row belongs to an Examples block, is decided by the caller.

use crate::keyword::LocaleKeywordSet;

/// Fence used to open or close a doc string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocStringFence {
    /// Triple double quotes: `"""`.
    Quotes,
    /// Triple backticks.
    Backticks,
}

impl DocStringFence {
    /// The literal marker for this fence.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Quotes => "\"\"\"",
            Self::Backticks => "```",
        }
    }
}

/// A doc-string delimiter line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocStringDelimiter<'a> {
    /// Fence used on the line.
    pub fence: DocStringFence,
    /// Media type following an opening fence, such as `json` in `"""json`.
    pub media_type: Option<&'a str>,
}

impl DocStringDelimiter<'_> {
    /// Whether this line closes a doc string opened with `fence`.
    ///
    /// Only a bare fence of the same kind closes a block.
    #[must_use]
    pub fn closes(&self, fence: DocStringFence) -> bool {
        self.fence == fence && self.media_type.is_none()
    }
}

/// Structural kind of a line, carrying the captured text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// A doc-string delimiter.
    DocString(DocStringDelimiter<'a>),
    /// One or more tags, without any trailing comment.
    Tags(Vec<&'a str>),
    /// A `Feature` header (`keyword: title`).
    Feature(&'a str),
    /// A `Scenario` header.
    Scenario(&'a str),
    /// A `Scenario Outline` header.
    ScenarioOutline(&'a str),
    /// An `Examples` (or `Scenarios`) header.
    Examples(&'a str),
    /// A table row, bounded by `|` on both ends.
    TableRow(&'a str),
}

/// Classify a line using the given locale's keywords.
///
/// Returns `None` for lines with no structural meaning, such as steps,
/// comments, descriptions and blank lines.
///
/// # Examples
///
/// ```
/// use cukedex_patterns::{ENGLISH, LineKind, classify};
///
/// assert_eq!(
///     classify("  @wip @slow", &ENGLISH),
///     Some(LineKind::Tags(vec!["@wip", "@slow"]))
/// );
/// assert_eq!(
///     classify("Scenario: works", &ENGLISH),
///     Some(LineKind::Scenario("Scenario: works"))
/// );
/// assert_eq!(classify("    Given a step", &ENGLISH), None);
/// ```
#[must_use]
pub fn classify<'a>(line: &'a str, keywords: &LocaleKeywordSet) -> Option<LineKind<'a>> {
    if let Some(delimiter) = doc_string_delimiter(line) {
        return Some(LineKind::DocString(delimiter));
    }
    if let Some(tags) = tag_tokens(line) {
        return Some(LineKind::Tags(tags));
    }
    if let Some(text) = keywords.feature().capture(line) {
        return Some(LineKind::Feature(text));
    }
    if let Some(text) = keywords.scenario().capture(line) {
        return Some(LineKind::Scenario(text));
    }
    if let Some(text) = keywords.scenario_outline().capture(line) {
        return Some(LineKind::ScenarioOutline(text));
    }
    if let Some(text) = keywords.examples().capture(line) {
        return Some(LineKind::Examples(text));
    }
    table_row(line).map(LineKind::TableRow)
}

/// Recognise a doc-string delimiter line.
///
/// The fence may be followed by a media type made of non-whitespace
/// characters; anything else on the line disqualifies it.
#[must_use]
pub fn doc_string_delimiter(line: &str) -> Option<DocStringDelimiter<'_>> {
    let trimmed = line.trim();
    [DocStringFence::Quotes, DocStringFence::Backticks]
        .into_iter()
        .find_map(|fence| {
            let rest = trimmed.strip_prefix(fence.marker())?;
            if rest.is_empty() {
                return Some(DocStringDelimiter {
                    fence,
                    media_type: None,
                });
            }
            let marker_char = fence.marker().chars().next()?;
            let valid = !rest.contains(char::is_whitespace) && !rest.contains(marker_char);
            valid.then_some(DocStringDelimiter {
                fence,
                media_type: Some(rest),
            })
        })
}

/// Split a tag line into its tags.
///
/// Every whitespace-separated token must start with `@` and carry a name. A
/// token starting with `#` begins a comment and ends the tag list.
///
/// # Examples
///
/// ```
/// use cukedex_patterns::tag_tokens;
///
/// assert_eq!(tag_tokens("@a @b # later"), Some(vec!["@a", "@b"]));
/// assert_eq!(tag_tokens("@a and more"), None);
/// assert_eq!(tag_tokens("# @a"), None);
/// ```
#[must_use]
pub fn tag_tokens(line: &str) -> Option<Vec<&str>> {
    let mut tags = Vec::new();
    for token in line.split_whitespace() {
        if token.starts_with('#') {
            break;
        }
        if !token.starts_with('@') || token.len() == 1 {
            return None;
        }
        tags.push(token);
    }
    (!tags.is_empty()).then_some(tags)
}

/// Recognise an example-table row, returning the trimmed row text.
#[must_use]
pub fn table_row(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    let bounded = trimmed.len() > 1 && trimmed.starts_with('|') && trimmed.ends_with('|');
    bounded.then_some(trimmed)
}
