use std::fmt::Write;

use crate::options::LineEnding;
use crate::section::Document;

/// Renders `document` in canonical form: each section as a `[name]` header, one `key=value`
/// line per entry and a blank line after every section, all ending in `line_ending`.
///
/// Values use the `Display` form of [`Value`](crate::Value), so a typed `Null` is
/// written as an empty value and reads back as `Bool(false)`.
#[must_use]
pub fn serialize(document: &Document, line_ending: LineEnding) -> String {
    let newline = line_ending.as_str();
    let mut output = String::with_capacity(256);

    for section in document.sections() {
        _ = write!(output, "[{}]{newline}", section.name());

        for entry in section.entries() {
            _ = write!(output, "{}={}{newline}", entry.key(), entry.value());
        }

        output.push_str(newline);
    }

    output
}
