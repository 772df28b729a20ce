//! Indented plain-text rendering.
//!
//! Each node is printed on its own line, two spaces deeper than its parent.
//! Tags a node adds beyond its parent's are shown in brackets, and
//! duplicate names carry their sequence number as a ` (n)` suffix.

use std::fmt::{self, Write};

use super::Report;
use crate::node::Node;
use crate::tag_index::TagIndex;
use crate::tags::TagSet;

/// Write the feature view.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn write<W: Write>(writer: &mut W, report: Report<'_>) -> fmt::Result {
    for feature in report.features {
        write_node(writer, feature, &TagSet::new(), 0)?;
    }
    for failure in report.failures {
        write!(writer, "failed: {}", failure.path)?;
        if let Some(line) = failure.line {
            write!(writer, ":{line}")?;
        }
        writeln!(writer, ": {}", failure.message)?;
    }
    Ok(())
}

/// Write the tag view.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn write_tags<W: Write>(writer: &mut W, index: &TagIndex) -> fmt::Result {
    for (tag, features) in index.iter() {
        writeln!(writer, "{tag}")?;
        for feature in features {
            write!(writer, "  {}", feature.display_text)?;
            if let Some(path) = &feature.file_path {
                write!(writer, " ({path})")?;
            }
            writer.write_char('\n')?;
            for scenario in &feature.scenarios {
                write!(writer, "    {}", scenario.display_text)?;
                write_number(writer, scenario.sequence_number)?;
                writer.write_char('\n')?;
            }
        }
    }
    Ok(())
}

fn write_node<W: Write>(
    writer: &mut W,
    node: &Node,
    inherited: &TagSet,
    depth: usize,
) -> fmt::Result {
    for _ in 0..depth {
        writer.write_str("  ")?;
    }
    writer.write_str(node.display_text())?;
    write_number(writer, node.sequence_number())?;
    let own: Vec<&str> = node
        .tags()
        .iter()
        .filter(|tag| !inherited.contains(tag))
        .collect();
    if !own.is_empty() {
        write!(writer, " [{}]", own.join(" "))?;
    }
    writer.write_char('\n')?;
    for child in node.children() {
        write_node(writer, child, node.tags(), depth + 1)?;
    }
    Ok(())
}

fn write_number<W: Write>(writer: &mut W, number: Option<usize>) -> fmt::Result {
    number.map_or(Ok(()), |number| write!(writer, " ({number})"))
}
