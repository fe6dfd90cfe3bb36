use std::fmt::{self, Display};

/// A stored value.
///
/// Values read from a file in [`ScannerMode::Typed`](crate::ScannerMode::Typed) may be any
/// variant. Values set through [`IniDocument`](crate::IniDocument) are always
/// [`Value::String`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Written as an empty value, which reads back in [`ScannerMode::Typed`](crate::ScannerMode::Typed)
    /// as `Bool(false)`.
    Null,
}

impl Value {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Bool(b) => Some(b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Int(i) => Some(i),
            _ => None,
        }
    }

    /// Integers widen to `f64`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Float(f) => Some(f),
            Self::Int(i) => Some(i as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Renders the form written to disk: booleans as `1` or nothing, `Null` as nothing, floats
/// always with a fraction or exponent so they read back as floats.
///
/// `true` and `Null` do not keep their type through a typed save and reload: `1` reads back
/// as `Int(1)` and the empty value as `Bool(false)`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => s.fmt(f),
            Self::Bool(true) => "1".fmt(f),
            Self::Bool(false) | Self::Null => Ok(()),
            Self::Int(i) => i.fmt(f),
            Self::Float(x) => write!(f, "{x:?}"),
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}
