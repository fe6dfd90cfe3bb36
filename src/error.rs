use std::fmt::{self, Display};
use std::io;
use std::path::PathBuf;

/// Errors returned by [`IniDocument`](crate::IniDocument) and the option parsers.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("file does not exist: {}", path.display())]
    FileNotExist { path: PathBuf },

    #[error("file is not readable")]
    FileNotReadable {
        #[source]
        source: io::Error,
    },

    #[error("file is not writable")]
    FileNotWritable {
        #[source]
        source: io::Error,
    },

    #[error("failed to lock file")]
    FileLockFailed {
        #[source]
        source: io::Error,
    },

    #[error("failed to read or write file")]
    FileReadWriteFailed {
        #[source]
        source: io::Error,
    },

    #[error("failed to parse INI data")]
    IniParseFailed(#[from] ParseError),

    #[error("invalid {parameter} {input:?}: {reason}")]
    InvalidParameter {
        parameter: Parameter,
        input: String,
        #[source]
        reason: ValidationError,
    },

    #[error("document was opened in read-only mode")]
    ReadOnlyMode,
}

/// The kind of an [`Error`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    FileNotExist,
    FileNotReadable,
    FileNotWritable,
    FileLockFailed,
    FileReadWriteFailed,
    IniParseFailed,
    InvalidParameter,
    ReadOnlyMode,
}

impl Error {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match *self {
            Self::FileNotExist { .. } => ErrorKind::FileNotExist,
            Self::FileNotReadable { .. } => ErrorKind::FileNotReadable,
            Self::FileNotWritable { .. } => ErrorKind::FileNotWritable,
            Self::FileLockFailed { .. } => ErrorKind::FileLockFailed,
            Self::FileReadWriteFailed { .. } => ErrorKind::FileReadWriteFailed,
            Self::IniParseFailed(..) => ErrorKind::IniParseFailed,
            Self::InvalidParameter { .. } => ErrorKind::InvalidParameter,
            Self::ReadOnlyMode => ErrorKind::ReadOnlyMode,
        }
    }

    pub(crate) fn invalid(parameter: Parameter, input: &str, reason: ValidationError) -> Self {
        Self::InvalidParameter {
            parameter,
            input: input.to_owned(),
            reason,
        }
    }
}

/// Names the argument that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    Section,
    Key,
    Value,
    ScannerMode,
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Section => "section name".fmt(f),
            Self::Key => "key".fmt(f),
            Self::Value => "value".fmt(f),
            Self::ScannerMode => "scanner mode".fmt(f),
        }
    }
}

/// The reason a section name, key or value was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("cannot be empty")]
    Empty,
    #[error("contains forbidden character {0:?}")]
    ForbiddenCharacter(char),
    #[error("cannot start with {0:?}")]
    CommentPrefix(char),
    #[error("unrecognized value {0:?}")]
    Unrecognized(String),
}

/// A line of INI text that does not fit the grammar. Line numbers start at 1.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("line {line}: section header is missing its closing ']'")]
    UnterminatedSection { line: usize },

    #[error("line {line}: invalid section name: {reason}")]
    InvalidSectionName {
        line: usize,
        #[source]
        reason: ValidationError,
    },

    #[error("line {line}: unexpected character {c:?} after section header")]
    UnexpectedCharacter { line: usize, c: char },

    #[error("line {line}: expected a section header or key=value pair")]
    MissingSeparator { line: usize },

    #[error("line {line}: entry appears before any section header")]
    EntryOutsideSection { line: usize },

    #[error("line {line}: invalid key: {reason}")]
    InvalidKey {
        line: usize,
        #[source]
        reason: ValidationError,
    },
}

impl ParseError {
    #[must_use]
    pub fn line(&self) -> usize {
        match *self {
            Self::UnterminatedSection { line }
            | Self::InvalidSectionName { line, .. }
            | Self::UnexpectedCharacter { line, .. }
            | Self::MissingSeparator { line }
            | Self::EntryOutsideSection { line }
            | Self::InvalidKey { line, .. } => line,
        }
    }
}
