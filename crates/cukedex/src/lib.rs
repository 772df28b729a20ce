//! Filtered structural trees for Gherkin feature files.
//!
//! `cukedex` reads `.feature` files line by line, recognises their structural
//! headers in any supported locale, and builds a tree of features,
//! scenarios, scenario outlines, Examples blocks and example rows. A
//! [`TagFilter`] decides which constructs survive; the surviving tree is
//! what the report writers in [`reporting`] render.
//!
//! ```
//! use cukedex::{TagFilter, parse_feature_source};
//!
//! let text = "\
//! Feature: checkout
//!   @wip
//!   Scenario: pay later
//!   Scenario: pay now
//! ";
//! let filter = TagFilter::unfiltered().with_none(["@wip"]);
//! let feature = parse_feature_source(text, None, &filter)?;
//! assert_eq!(feature.child_names(), ["Scenario: pay now"]);
//! # Ok::<(), cukedex::ParseError>(())
//! ```

mod batch;
mod config;
mod discovery;
mod filter;
mod node;
mod parser;
pub mod reporting;
mod source;
mod tag_index;
mod tags;

pub use batch::{BatchError, BatchOptions, BatchReport, FileFailure, parse_files};
pub use config::{ConfigError, LogLevel, RunConfig};
pub use cukedex_patterns::{LocaleKeywordSet, supported_locales};
pub use discovery::{DEFAULT_ROOT, DiscoveryError, collect_feature_files, root_marker};
pub use filter::{FilterError, OneOrMany, TagFilter, TagFilterConfig};
pub use node::{Node, NodeKind, escape_apostrophes};
pub use parser::{FeatureError, ParseError, parse_feature_file, parse_feature_source};
pub use source::{read_feature_text, relative_feature_path, strip_byte_order_mark};
pub use tag_index::{TagIndex, TaggedFeature, TaggedScenario};
pub use tags::{TagSet, normalise_tag};
