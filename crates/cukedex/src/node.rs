//! The structural tree handed to report rendering.
//!
//! A [`Node`] owns its children. Nodes are only attached to a parent once
//! they are complete, so a tree never holds a half-parsed construct.

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;

use crate::filter::TagFilter;
use crate::tags::TagSet;

/// Kind of construct a node represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// A `Feature` header, the root of one file's tree.
    Feature,
    /// A plain `Scenario`.
    Scenario,
    /// A `Scenario Outline`, parent of Examples blocks.
    ScenarioOutline,
    /// An `Examples` table block.
    Examples,
    /// One row of an Examples table.
    ExampleRow,
}

impl NodeKind {
    /// Lowercase label used by the writers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Feature => "feature",
            Self::Scenario => "scenario",
            Self::ScenarioOutline => "scenario_outline",
            Self::Examples => "examples",
            Self::ExampleRow => "example_row",
        }
    }
}

/// One construct in the filtered tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Node {
    kind: NodeKind,
    display_text: String,
    tags: TagSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_path: Option<Utf8PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sequence_number: Option<usize>,
    #[serde(skip)]
    auto_number: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<Node>,
}

impl Node {
    /// Create a childless node.
    #[must_use]
    pub fn new(kind: NodeKind, display_text: impl Into<String>, tags: TagSet) -> Self {
        Self {
            kind,
            display_text: display_text.into(),
            tags,
            file_path: None,
            sequence_number: None,
            auto_number: false,
            children: Vec::new(),
        }
    }

    /// Record the root-relative path of the file the node came from.
    #[must_use]
    pub fn with_file_path(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// Ask for a sequence number when a sibling already uses the same text.
    #[must_use]
    pub fn numbered(mut self) -> Self {
        self.auto_number = true;
        self
    }

    /// Change the kind, keeping text, tags and numbering.
    #[must_use]
    pub(crate) fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = kind;
        self
    }

    /// A copy whose direct children are ordered by display text.
    ///
    /// The sort is stable, so duplicates keep source order and their
    /// sequence numbers still read `(2)`, `(3)` after the first.
    #[must_use]
    pub fn with_sorted_children(&self) -> Self {
        let mut sorted = self.clone();
        sorted
            .children
            .sort_by(|left, right| left.display_text.cmp(&right.display_text));
        sorted
    }

    /// Append `child` unconditionally.
    ///
    /// A numbered child whose text duplicates earlier siblings receives the
    /// number of its occurrence: the second `Scenario: x` gets `2`, the
    /// third `3`. The first keeps no number.
    ///
    /// # Examples
    ///
    /// ```
    /// use cukedex::{Node, NodeKind, TagSet};
    ///
    /// let mut feature = Node::new(NodeKind::Feature, "Feature: f", TagSet::new());
    /// for _ in 0..3 {
    ///     let scenario = Node::new(NodeKind::Scenario, "Scenario: s", TagSet::new());
    ///     feature.add_child(scenario.numbered());
    /// }
    /// let numbers: Vec<_> = feature.children().iter().map(|c| c.sequence_number()).collect();
    /// assert_eq!(numbers, [None, Some(2), Some(3)]);
    /// ```
    pub fn add_child(&mut self, mut child: Self) {
        if child.auto_number {
            let earlier = self
                .children
                .iter()
                .filter(|sibling| sibling.display_text == child.display_text)
                .count();
            if earlier > 0 {
                child.sequence_number = Some(earlier + 1);
            }
        }
        self.children.push(child);
    }

    /// Append `child` only if `filter` accepts its tags.
    ///
    /// Returns whether the child was attached.
    pub fn filter_and_add_child(&mut self, child: Self, filter: &TagFilter) -> bool {
        if !filter.accepts(&child.tags) {
            tracing::debug!(
                kind = child.kind.label(),
                text = %child.display_text,
                "construct filtered out"
            );
            return false;
        }
        self.add_child(child);
        true
    }

    /// The kind of construct.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Cleaned source line (`keyword: title`) with apostrophes escaped.
    #[must_use]
    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    /// Tags of the construct, including those inherited from its parent.
    #[must_use]
    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    /// Root-relative path of the source file, set on Feature nodes.
    #[must_use]
    pub fn file_path(&self) -> Option<&Utf8Path> {
        self.file_path.as_deref()
    }

    /// Number disambiguating this node from earlier same-text siblings.
    #[must_use]
    pub fn sequence_number(&self) -> Option<usize> {
        self.sequence_number
    }

    /// Children in source order.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Whether any child survived.
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Display texts of the direct children, in order.
    #[must_use]
    pub fn child_names(&self) -> Vec<&str> {
        self.children.iter().map(Self::display_text).collect()
    }

    /// First direct child of the given kind.
    #[must_use]
    pub fn find_child(&self, kind: NodeKind) -> Option<&Self> {
        self.children.iter().find(|child| child.kind == kind)
    }
}

/// Escape literal apostrophes as `\'` for embedding in quoted output.
///
/// # Examples
///
/// ```
/// use cukedex::escape_apostrophes;
///
/// assert_eq!(escape_apostrophes("Scenario: it's done"), r"Scenario: it\'s done");
/// ```
#[must_use]
pub fn escape_apostrophes(text: &str) -> String {
    text.replace('\'', "\\'")
}
