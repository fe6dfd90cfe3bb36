//! Syntax checks for names and values before they enter a [`Document`](crate::Document).
//!
//! All checks expect input that has already been trimmed.

use crate::error::ValidationError;

const COMMENT_PREFIXES: [char; 2] = [';', '#'];

/// Rejects empty names, `[`, `]`, CR, LF and a leading comment character.
///
/// # Errors
///
/// Returns the reason `name` cannot be used as a section name.
pub fn section_name(name: &str) -> Result<(), ValidationError> {
    check_name(name, &['[', ']', '\r', '\n'])
}

/// Same rules as [`section_name`], plus `=`.
///
/// # Errors
///
/// Returns the reason `key` cannot be used as a key.
pub fn key(key: &str) -> Result<(), ValidationError> {
    check_name(key, &['[', ']', '=', '\r', '\n'])
}

/// Values may be empty; only line breaks are rejected.
///
/// # Errors
///
/// Returns [`ValidationError::ForbiddenCharacter`] on CR or LF.
pub fn value(value: &str) -> Result<(), ValidationError> {
    forbid(value, &['\r', '\n'])
}

fn check_name(name: &str, forbidden: &[char]) -> Result<(), ValidationError> {
    match name.chars().next() {
        None => Err(ValidationError::Empty),
        Some(c) if COMMENT_PREFIXES.contains(&c) => Err(ValidationError::CommentPrefix(c)),
        Some(_) => forbid(name, forbidden),
    }
}

fn forbid(text: &str, forbidden: &[char]) -> Result<(), ValidationError> {
    match text.chars().find(|c| forbidden.contains(c)) {
        Some(c) => Err(ValidationError::ForbiddenCharacter(c)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Section")]
    #[case("Section 1")]
    #[case("a=b")]
    #[case("x;y")]
    fn accepts_section_names(#[case] name: &str) {
        assert_eq!(section_name(name), Ok(()));
    }

    #[rstest]
    #[case("", ValidationError::Empty)]
    #[case("Sec[1", ValidationError::ForbiddenCharacter('['))]
    #[case("Sec]", ValidationError::ForbiddenCharacter(']'))]
    #[case("a\rb", ValidationError::ForbiddenCharacter('\r'))]
    #[case("a\nb", ValidationError::ForbiddenCharacter('\n'))]
    #[case(";comment", ValidationError::CommentPrefix(';'))]
    #[case("#comment", ValidationError::CommentPrefix('#'))]
    fn rejects_section_names(#[case] name: &str, #[case] expected: ValidationError) {
        assert_eq!(section_name(name), Err(expected));
    }

    #[rstest]
    #[case("", ValidationError::Empty)]
    #[case("k=1", ValidationError::ForbiddenCharacter('='))]
    #[case("k[0]", ValidationError::ForbiddenCharacter('['))]
    #[case("#k", ValidationError::CommentPrefix('#'))]
    #[case("k\n", ValidationError::ForbiddenCharacter('\n'))]
    fn rejects_keys(#[case] input: &str, #[case] expected: ValidationError) {
        assert_eq!(key(input), Err(expected));
    }

    #[rstest]
    #[case("")]
    #[case("0")]
    #[case("a=b")]
    #[case("[not a section]")]
    #[case("; not a comment")]
    fn accepts_values(#[case] input: &str) {
        assert_eq!(value(input), Ok(()));
    }

    #[test]
    fn rejects_multiline_values() {
        assert_eq!(
            value("line1\nline2"),
            Err(ValidationError::ForbiddenCharacter('\n'))
        );
        assert_eq!(
            value("line1\r\nline2"),
            Err(ValidationError::ForbiddenCharacter('\r'))
        );
    }
}
