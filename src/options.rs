use std::fmt::{self, Display};
use std::str::FromStr;

use crate::error::{Error, Parameter, ValidationError};

/// Controls how values are coerced when a file is parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ScannerMode {
    /// Every value is kept as the exact trimmed text.
    Raw,
    /// Quotes are stripped and boolean words become `"1"` or `""`; values stay strings.
    Normal,
    /// Booleans, `null` and numbers become native values.
    #[default]
    Typed,
}

impl FromStr for ScannerMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(Self::Raw),
            "normal" => Ok(Self::Normal),
            "typed" => Ok(Self::Typed),
            _ => Err(Error::invalid(
                Parameter::ScannerMode,
                s,
                ValidationError::Unrecognized(s.to_owned()),
            )),
        }
    }
}

impl fmt::Display for ScannerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Raw => "raw".fmt(f),
            Self::Normal => "normal".fmt(f),
            Self::Typed => "typed".fmt(f),
        }
    }
}

/// The newline written after every line of a serialized document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// Settings fixed for the lifetime of an [`IniDocument`](crate::IniDocument).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    pub read_only: bool,
    pub scanner_mode: ScannerMode,
    pub line_ending: LineEnding,
}

impl Options {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    #[must_use]
    pub fn scanner_mode(mut self, mode: ScannerMode) -> Self {
        self.scanner_mode = mode;
        self
    }

    #[must_use]
    pub fn line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }
}
