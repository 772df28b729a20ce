//! Per-file parse state.

use camino::Utf8Path;
use cukedex_patterns::{
    DocStringFence, LineKind, LocaleKeywordSet, classify, doc_string_delimiter,
};

use super::ParseError;
use crate::filter::TagFilter;
use crate::node::{Node, NodeKind, escape_apostrophes};
use crate::tags::TagSet;

/// Open constructs and accumulated tags for a single file.
///
/// A scenario or outline is only complete once the next scenario, outline
/// or the end of the file is seen, and an Examples block once the next
/// Examples header or the outline's end is seen. They are held here until
/// then and attached through [`ParseState::close_scenario`],
/// [`ParseState::close_outline`] and [`ParseState::close_examples`].
///
/// A plain scenario followed by an Examples header is a templated scenario
/// and is promoted to an outline.
pub(super) struct ParseState<'a> {
    filter: &'a TagFilter,
    file_path: Option<&'a Utf8Path>,
    keywords: &'a LocaleKeywordSet,
    pending_tags: TagSet,
    feature: Option<Node>,
    scenario: Option<Node>,
    outline: Option<Node>,
    examples: Option<Node>,
    doc_string: Option<DocStringFence>,
    line_no: usize,
}

impl<'a> ParseState<'a> {
    pub(super) fn new(
        filter: &'a TagFilter,
        file_path: Option<&'a Utf8Path>,
        keywords: &'a LocaleKeywordSet,
    ) -> Self {
        Self {
            filter,
            file_path,
            keywords,
            pending_tags: TagSet::new(),
            feature: None,
            scenario: None,
            outline: None,
            examples: None,
            doc_string: None,
            line_no: 0,
        }
    }

    pub(super) fn handle_line(&mut self, line: &str) -> Result<(), ParseError> {
        self.line_no += 1;
        if let Some(open) = self.doc_string {
            if doc_string_delimiter(line).is_some_and(|delimiter| delimiter.closes(open)) {
                self.doc_string = None;
            }
            return Ok(());
        }
        let Some(kind) = classify(line, self.keywords) else {
            return Ok(());
        };
        match kind {
            LineKind::DocString(delimiter) => self.doc_string = Some(delimiter.fence),
            LineKind::Tags(tags) => {
                for tag in tags {
                    self.pending_tags.insert(tag);
                }
            }
            LineKind::Feature(text) => self.open_feature(text)?,
            LineKind::Scenario(text) => self.add_scenario(text)?,
            LineKind::ScenarioOutline(text) => self.open_outline(text)?,
            LineKind::Examples(text) => self.open_examples(text)?,
            LineKind::TableRow(text) => self.add_row(text),
        }
        Ok(())
    }

    /// Flush any open outline and hand back the Feature node.
    pub(super) fn finish(mut self) -> Result<Node, ParseError> {
        self.close_scenario();
        self.close_outline();
        if self.doc_string.is_some() {
            tracing::debug!(
                file = self.file_path.map(Utf8Path::as_str),
                "doc string left open at end of file"
            );
        }
        self.feature.ok_or(ParseError::MissingFeature {
            line: self.line_no.max(1),
        })
    }

    fn open_feature(&mut self, text: &str) -> Result<(), ParseError> {
        if self.feature.is_some() {
            return Err(ParseError::DuplicateFeature { line: self.line_no });
        }
        let tags = std::mem::take(&mut self.pending_tags);
        let mut feature = Node::new(NodeKind::Feature, escape_apostrophes(text), tags);
        if let Some(path) = self.file_path {
            feature = feature.with_file_path(path);
        }
        self.feature = Some(feature);
        Ok(())
    }

    fn add_scenario(&mut self, text: &str) -> Result<(), ParseError> {
        let tags = self.inherit_from_feature()?;
        self.close_scenario();
        self.close_outline();
        self.scenario =
            Some(Node::new(NodeKind::Scenario, escape_apostrophes(text), tags).numbered());
        Ok(())
    }

    fn open_outline(&mut self, text: &str) -> Result<(), ParseError> {
        let tags = self.inherit_from_feature()?;
        self.close_scenario();
        self.close_outline();
        self.outline = Some(
            Node::new(NodeKind::ScenarioOutline, escape_apostrophes(text), tags).numbered(),
        );
        Ok(())
    }

    fn open_examples(&mut self, text: &str) -> Result<(), ParseError> {
        if let Some(scenario) = self.scenario.take() {
            tracing::debug!(
                text = %scenario.display_text(),
                "scenario with examples treated as an outline"
            );
            self.outline = Some(scenario.with_kind(NodeKind::ScenarioOutline));
        }
        let Some(outline_tags) = self.outline.as_ref().map(|outline| outline.tags().clone()) else {
            return Err(ParseError::ExamplesOutsideOutline { line: self.line_no });
        };
        self.close_examples();
        let tags = outline_tags.union(&std::mem::take(&mut self.pending_tags));
        self.examples = Some(Node::new(
            NodeKind::Examples,
            escape_apostrophes(text),
            tags,
        ));
        Ok(())
    }

    fn add_row(&mut self, text: &str) {
        let Some(examples) = self.examples.as_mut() else {
            return;
        };
        let row = Node::new(
            NodeKind::ExampleRow,
            escape_apostrophes(text),
            examples.tags().clone(),
        )
        .numbered();
        examples.add_child(row);
    }

    /// Feature tags merged with the pending tags, which are consumed.
    fn inherit_from_feature(&mut self) -> Result<TagSet, ParseError> {
        let Some(feature) = self.feature.as_ref() else {
            return Err(ParseError::ScenarioOutsideFeature { line: self.line_no });
        };
        Ok(feature
            .tags()
            .union(&std::mem::take(&mut self.pending_tags)))
    }

    /// Attach the open scenario to the feature if the filter accepts it.
    fn close_scenario(&mut self) {
        let Some(scenario) = self.scenario.take() else {
            return;
        };
        let filter = self.filter;
        if let Some(feature) = self.feature.as_mut() {
            feature.filter_and_add_child(scenario, filter);
        }
    }

    /// Attach the open Examples block to its outline if the filter accepts it.
    fn close_examples(&mut self) {
        let Some(examples) = self.examples.take() else {
            return;
        };
        let filter = self.filter;
        if let Some(outline) = self.outline.as_mut() {
            outline.filter_and_add_child(examples, filter);
        }
    }

    /// Close the open outline, keeping it only if an Examples block survived.
    fn close_outline(&mut self) {
        self.close_examples();
        let Some(outline) = self.outline.take() else {
            return;
        };
        if !outline.has_children() {
            tracing::debug!(
                text = %outline.display_text(),
                "outline dropped: no examples block survived filtering"
            );
            return;
        }
        if let Some(feature) = self.feature.as_mut() {
            feature.add_child(outline);
        }
    }
}
