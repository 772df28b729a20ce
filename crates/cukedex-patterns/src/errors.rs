//! Error types raised while resolving locale keyword sets.

use thiserror::Error;

/// Errors surfaced when a feature file declares its locale.
///
/// # Examples
/// ```
/// use cukedex_patterns::{KeywordError, select_locale};
///
/// let err = select_locale(Some("# language: xx-unknown")).unwrap_err();
/// assert_eq!(err, KeywordError::UnknownLocale("xx-unknown".into()));
/// assert_eq!(err.to_string(), "unsupported feature language `xx-unknown`");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeywordError {
    /// The `# language:` declaration names a locale with no keyword table.
    #[error("unsupported feature language `{0}`")]
    UnknownLocale(String),
}
