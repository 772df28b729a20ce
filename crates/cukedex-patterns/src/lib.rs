//! Line-level Gherkin recognition shared by the cukedex parser.
//!
//! The crate knows two things: which keyword spellings each supported locale
//! uses for the structural headers (`Feature:`, `Scenario:`, ...), and how to
//! classify a single source line into one of the structural kinds the parser
//! tracks. Both are pure and allocation-light so they can be reused from the
//! parser, the command line and tests alike.

mod errors;
mod keyword;
mod line;

pub use errors::KeywordError;
pub use keyword::{
    ENGLISH, KeywordPattern, LocaleKeywordSet, declared_language, lookup, select_locale,
    supported_locales,
};
pub use line::{
    DocStringDelimiter, DocStringFence, LineKind, classify, doc_string_delimiter, table_row,
    tag_tokens,
};
