use std::iter::Enumerate;
use std::str::Lines;

use crate::error::ParseError;
use crate::options::ScannerMode;
use crate::section::Document;
use crate::validate;
use crate::value::Value;

/// Byte Order Mark (BOM) is used to signal the endianness of an encoding. The order `0xFF 0xFE`
/// strongly suggests that the encoding is using little-endian byte order.
///
/// <https://en.wikipedia.org/wiki/Byte_order_mark>
const BOM_LE: &[u8] = &[0xFF, 0xFE];
const BOM_UTF8: &[u8] = &[0xEF, 0xBB, 0xBF];

const COMMENT_PREFIXES: [char; 2] = [';', '#'];

/// Parses INI text into a [`Document`].
///
/// Empty text yields an empty document.
///
/// # Errors
///
/// Returns a [`ParseError`] carrying the line number of the first line that does not fit the
/// grammar.
pub fn parse(text: &str, mode: ScannerMode) -> Result<Document, ParseError> {
    Parser::new(text, mode).into_document()
}

/// Decodes raw file content. UTF-16 LE is recognised by its BOM; everything else is read as
/// UTF-8, replacing invalid sequences.
#[must_use]
pub fn decode(data: &[u8]) -> String {
    if let Some(data) = data.strip_prefix(BOM_LE) {
        let chunks = data.chunks_exact(2);
        let odd_byte = !chunks.remainder().is_empty();
        let utf16 = chunks
            .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]))
            .collect::<Vec<u16>>();

        let mut text = char::decode_utf16(utf16)
            .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect::<String>();
        if odd_byte {
            text.push(char::REPLACEMENT_CHARACTER);
        }
        text
    } else {
        let data = data.strip_prefix(BOM_UTF8).unwrap_or(data);
        String::from_utf8_lossy(data).into_owned()
    }
}

/// Represents an on-going parse.
#[derive(Debug, Clone)]
struct Parser<'a> {
    lines: Enumerate<Lines<'a>>,
    mode: ScannerMode,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str, mode: ScannerMode) -> Self {
        Self {
            lines: text.lines().enumerate(),
            mode,
        }
    }
}

impl Parser<'_> {
    fn into_document(self) -> Result<Document, ParseError> {
        let mut document = Document::new();
        let mut current = None::<String>;

        for (index, line) in self.lines {
            let line_number = index + 1;
            let line = line.trim();

            if line.is_empty() || line.starts_with(COMMENT_PREFIXES) {
                continue;
            }

            if let Some(header) = line.strip_prefix('[') {
                let name = parse_section_name(header, line_number)?;
                // Repeated headers merge into the first occurrence.
                document.section_mut_or_insert(name);
                current = Some(name.to_owned());
                continue;
            }

            let Some(name) = current.as_deref() else {
                return Err(ParseError::EntryOutsideSection { line: line_number });
            };
            let (key, value) = parse_entry(line, line_number, self.mode)?;
            document.section_mut_or_insert(name).set(key, value);
        }

        Ok(document)
    }
}

fn parse_entry(
    line: &str,
    line_number: usize,
    mode: ScannerMode,
) -> Result<(String, Value), ParseError> {
    let Some((key, value)) = line.split_once('=') else {
        return Err(ParseError::MissingSeparator { line: line_number });
    };

    let key = key.trim();
    validate::key(key).map_err(|reason| ParseError::InvalidKey {
        line: line_number,
        reason,
    })?;

    Ok((key.to_owned(), scan_value(value.trim(), mode)))
}

/// Extracts the name from a header line whose leading `[` has already been stripped.
fn parse_section_name(header: &str, line_number: usize) -> Result<&str, ParseError> {
    let Some((name, rest)) = header.split_once(']') else {
        return Err(ParseError::UnterminatedSection { line: line_number });
    };

    // Only whitespace or a comment may follow the closing bracket.
    let rest = rest.trim_start();
    if let Some(c) = rest.chars().next().filter(|c| !COMMENT_PREFIXES.contains(c)) {
        return Err(ParseError::UnexpectedCharacter {
            line: line_number,
            c,
        });
    }

    let name = name.trim();
    validate::section_name(name).map_err(|reason| ParseError::InvalidSectionName {
        line: line_number,
        reason,
    })?;

    Ok(name)
}

/// Applies the scanner mode to a trimmed value.
fn scan_value(text: &str, mode: ScannerMode) -> Value {
    if mode == ScannerMode::Raw {
        return Value::String(text.to_owned());
    }

    if let Some(inner) = unquote(text) {
        return Value::String(inner.to_owned());
    }

    let lowercase = text.to_ascii_lowercase();
    match (mode, lowercase.as_str()) {
        (ScannerMode::Normal, "true" | "on" | "yes") => Value::String("1".to_owned()),
        (ScannerMode::Normal, "false" | "off" | "no" | "none" | "null") => {
            Value::String(String::new())
        }
        (ScannerMode::Typed, "true" | "on" | "yes") => Value::Bool(true),
        (ScannerMode::Typed, "" | "false" | "off" | "no" | "none") => Value::Bool(false),
        (ScannerMode::Typed, "null") => Value::Null,
        (ScannerMode::Typed, _) => {
            parse_number(text).unwrap_or_else(|| Value::String(text.to_owned()))
        }
        _ => Value::String(text.to_owned()),
    }
}

/// The text between matching surrounding quotes. A quote that is never closed is ordinary text.
fn unquote(text: &str) -> Option<&str> {
    let quote = text.chars().next().filter(|&c| c == '"' || c == '\'')?;

    text[1..].strip_suffix(quote)
}

/// Accepts an optional sign, digits with an optional fraction, and an optional exponent.
fn parse_number(text: &str) -> Option<Value> {
    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());

    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, Some(exponent)),
        None => (unsigned, None),
    };
    let (whole, fraction) = match mantissa.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (mantissa, None),
    };

    if whole.is_empty() && fraction.is_none_or(str::is_empty) {
        return None;
    }
    if !is_digits(whole) || !fraction.is_none_or(is_digits) {
        return None;
    }
    if let Some(exponent) = exponent {
        let digits = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
        if digits.is_empty() || !is_digits(digits) {
            return None;
        }
    }

    if fraction.is_none()
        && exponent.is_none()
        && let Ok(i) = text.parse::<i64>()
    {
        return Some(Value::Int(i));
    }

    // Overflowing exponents stay text; `inf` would not read back as a number.
    text.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(Value::Float)
}
