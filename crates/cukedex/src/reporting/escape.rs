//! Escaping for XML attribute values.

use std::fmt::{self, Write};

/// Displays text as the value of a double-quoted XML attribute.
///
/// Markup characters become entities. Characters outside the XML 1.0
/// `Char` production become U+FFFD, since no entity can carry them.
pub(super) struct Attribute<'a>(pub &'a str);

impl fmt::Display for Attribute<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.chars().try_for_each(|character| escape_char(f, character))
    }
}

fn escape_char(f: &mut fmt::Formatter<'_>, character: char) -> fmt::Result {
    match character {
        '&' => f.write_str("&amp;"),
        '<' => f.write_str("&lt;"),
        '>' => f.write_str("&gt;"),
        '"' => f.write_str("&quot;"),
        '\'' => f.write_str("&apos;"),
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' => {
            f.write_char(character)
        }
        '\u{10000}'.. => f.write_char(character),
        _ => f.write_str("&#xFFFD;"),
    }
}
