//! JSON rendering of feature trees and the tag index.
//!
//! Node fields are serialised as stored: `kind`, `display_text`, `tags`,
//! and, when present, `file_path`, `sequence_number` and `children`.

use serde::Serialize;

use super::Report;
use crate::batch::FileFailure;
use crate::node::Node;
use crate::tag_index::TagIndex;

#[derive(Serialize)]
struct FeatureDocument<'a> {
    features: &'a [Node],
    failures: &'a [FileFailure],
}

#[derive(Serialize)]
struct TagDocument<'a> {
    tags: &'a TagIndex,
}

/// Serialise the feature view.
///
/// # Errors
///
/// Returns an error when serialisation fails.
pub fn to_string(report: Report<'_>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&FeatureDocument {
        features: report.features,
        failures: report.failures,
    })
}

/// Serialise the tag view.
///
/// # Errors
///
/// Returns an error when serialisation fails.
pub fn tags_to_string(index: &TagIndex) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&TagDocument { tags: index })
}
