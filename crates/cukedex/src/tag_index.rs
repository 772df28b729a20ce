//! Tag-grouped view of filtered feature trees.
//!
//! The index answers "where is this tag used?": every tag maps to the
//! features it appears in and, within each feature, the scenarios and
//! outlines that carry it. An outline counts as carrying the tags of its
//! surviving Examples blocks too.

use std::collections::BTreeMap;

use camino::Utf8PathBuf;
use serde::Serialize;

use crate::node::{Node, NodeKind};
use crate::tags::TagSet;

/// A scenario or outline listed under a tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TaggedScenario {
    /// Kind of the construct.
    pub kind: NodeKind,
    /// Display text as stored in the tree.
    pub display_text: String,
    /// Sequence number of the construct among its siblings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<usize>,
}

/// A feature listed under a tag, with the matching scenarios.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TaggedFeature {
    /// Display text of the feature header.
    pub display_text: String,
    /// Root-relative source path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<Utf8PathBuf>,
    /// Scenarios and outlines carrying the tag, in source order.
    pub scenarios: Vec<TaggedScenario>,
}

/// Tags in sorted order, each with the features using it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagIndex(BTreeMap<String, Vec<TaggedFeature>>);

impl TagIndex {
    /// Build the index from feature trees, keeping feature order.
    ///
    /// # Examples
    ///
    /// ```
    /// use cukedex::{TagFilter, TagIndex, parse_feature_source};
    ///
    /// let text = "@billing\nFeature: pay\n  @card\n  Scenario: by card\n  Scenario: by cash\n";
    /// let feature = parse_feature_source(text, None, &TagFilter::unfiltered())?;
    /// let index = TagIndex::build(std::slice::from_ref(&feature));
    /// assert_eq!(index.tags().collect::<Vec<_>>(), ["@billing", "@card"]);
    /// let card = index.features_for("@card").unwrap_or_default();
    /// assert_eq!(card.len(), 1);
    /// # Ok::<(), cukedex::ParseError>(())
    /// ```
    #[must_use]
    pub fn build(features: &[Node]) -> Self {
        let mut index: BTreeMap<String, Vec<TaggedFeature>> = BTreeMap::new();
        for feature in features {
            for (tag, scenarios) in scenarios_by_tag(feature) {
                index.entry(tag).or_default().push(TaggedFeature {
                    display_text: feature.display_text().to_string(),
                    file_path: feature.file_path().map(ToOwned::to_owned),
                    scenarios,
                });
            }
        }
        Self(index)
    }

    /// Tags in sorted order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Features using `tag`, if any.
    #[must_use]
    pub fn features_for(&self, tag: &str) -> Option<&[TaggedFeature]> {
        self.0.get(tag).map(Vec::as_slice)
    }

    /// Iterate over `(tag, features)` pairs in tag order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[TaggedFeature])> {
        self.0
            .iter()
            .map(|(tag, features)| (tag.as_str(), features.as_slice()))
    }

    /// Whether no tag was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Tags reachable from a scenario-level node, including its Examples blocks.
fn effective_tags(node: &Node) -> TagSet {
    let mut tags = node.tags().clone();
    if node.kind() == NodeKind::ScenarioOutline {
        for examples in node.children() {
            tags.extend_from(examples.tags());
        }
    }
    tags
}

fn scenarios_by_tag(feature: &Node) -> BTreeMap<String, Vec<TaggedScenario>> {
    let mut grouped: BTreeMap<String, Vec<TaggedScenario>> = BTreeMap::new();
    for tag in feature.tags().iter() {
        grouped.entry(tag.to_string()).or_default();
    }
    for child in feature.children() {
        for tag in effective_tags(child).iter() {
            grouped
                .entry(tag.to_string())
                .or_default()
                .push(TaggedScenario {
                    kind: child.kind(),
                    display_text: child.display_text().to_string(),
                    sequence_number: child.sequence_number(),
                });
        }
    }
    grouped
}
