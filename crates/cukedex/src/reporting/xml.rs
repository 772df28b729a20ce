//! XML rendering of feature trees and the tag index.
//!
//! The document root is `<report>`. In the feature view every node becomes
//! an element named after its kind (`feature`, `scenario`,
//! `scenario_outline`, `examples`, `example_row`) with `name`, `tags` and,
//! where set, `file` and `number` attributes. Failed files follow as
//! `<failure>` elements.

use std::fmt::{self, Write};

use super::Report;
use super::escape::Attribute;
use crate::node::Node;
use crate::tag_index::TagIndex;

const DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Write the feature view as an XML document.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn write<W: Write>(writer: &mut W, report: Report<'_>) -> fmt::Result {
    writer.write_str(DECLARATION)?;
    writer.write_str("<report view=\"feature\">\n")?;
    for feature in report.features {
        write_node(writer, feature, 1)?;
    }
    for failure in report.failures {
        writer.write_str("  <failure")?;
        attribute(writer, "file", failure.path.as_str())?;
        if let Some(line) = failure.line {
            write!(writer, " line=\"{line}\"")?;
        }
        attribute(writer, "message", &failure.message)?;
        writer.write_str(" />\n")?;
    }
    writer.write_str("</report>\n")
}

/// Write the tag view as an XML document.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn write_tags<W: Write>(writer: &mut W, index: &TagIndex) -> fmt::Result {
    writer.write_str(DECLARATION)?;
    writer.write_str("<report view=\"tag\">\n")?;
    for (tag, features) in index.iter() {
        writer.write_str("  <tag")?;
        attribute(writer, "name", tag)?;
        writer.write_str(">\n")?;
        for feature in features {
            writer.write_str("    <feature")?;
            attribute(writer, "name", &feature.display_text)?;
            if let Some(path) = &feature.file_path {
                attribute(writer, "file", path.as_str())?;
            }
            if feature.scenarios.is_empty() {
                writer.write_str(" />\n")?;
                continue;
            }
            writer.write_str(">\n")?;
            for scenario in &feature.scenarios {
                write!(writer, "      <{}", scenario.kind.label())?;
                attribute(writer, "name", &scenario.display_text)?;
                number(writer, scenario.sequence_number)?;
                writer.write_str(" />\n")?;
            }
            writer.write_str("    </feature>\n")?;
        }
        writer.write_str("  </tag>\n")?;
    }
    writer.write_str("</report>\n")
}

fn write_node<W: Write>(writer: &mut W, node: &Node, depth: usize) -> fmt::Result {
    let element = node.kind().label();
    indent(writer, depth)?;
    write!(writer, "<{element}")?;
    attribute(writer, "name", node.display_text())?;
    if let Some(path) = node.file_path() {
        attribute(writer, "file", path.as_str())?;
    }
    number(writer, node.sequence_number())?;
    if !node.tags().is_empty() {
        let tags: Vec<&str> = node.tags().iter().collect();
        attribute(writer, "tags", &tags.join(" "))?;
    }
    if !node.has_children() {
        return writer.write_str(" />\n");
    }
    writer.write_str(">\n")?;
    for child in node.children() {
        write_node(writer, child, depth + 1)?;
    }
    indent(writer, depth)?;
    writeln!(writer, "</{element}>")
}

fn attribute<W: Write>(writer: &mut W, name: &str, value: &str) -> fmt::Result {
    write!(writer, " {name}=\"{}\"", Attribute(value))
}

fn number<W: Write>(writer: &mut W, sequence_number: Option<usize>) -> fmt::Result {
    sequence_number.map_or(Ok(()), |number| write!(writer, " number=\"{number}\""))
}

fn indent<W: Write>(writer: &mut W, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        writer.write_str("  ")?;
    }
    Ok(())
}
