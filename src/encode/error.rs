//! Error handling for encoding.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::{error, fmt};
use std::borrow::Cow;


//------------ ErrorKind -----------------------------------------------------

/// The kind of problem encountered while encoding.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// The value is of a different type than the schema demands.
    TypeMismatch,

    /// A required component is missing from a SEQUENCE or SET value.
    MissingField,

    /// A SEQUENCE or SET value has a component the schema doesn’t know.
    UnknownField,

    /// A CHOICE value names an alternative the schema doesn’t know.
    UnknownVariant,

    /// The value cannot be expressed in the encoding.
    ///
    /// Examples are characters not allowed in a restricted string type,
    /// a UTCTime outside of its range, or an ANY value that isn’t exactly
    /// one encoded value.
    InvalidValue,
}

impl ErrorKind {
    fn as_str(self) -> &'static str {
        match self {
            ErrorKind::TypeMismatch => "type mismatch",
            ErrorKind::MissingField => "missing field",
            ErrorKind::UnknownField => "unknown field",
            ErrorKind::UnknownVariant => "unknown variant",
            ErrorKind::InvalidValue => "invalid value",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


//------------ EncodeError ---------------------------------------------------

/// A value could not be encoded with a schema.
///
/// Besides the kind and a message, the error keeps the path of component
/// and alternative names leading to the offending value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EncodeError {
    kind: ErrorKind,

    /// The path in reverse order, innermost name first.
    path: Vec<String>,

    message: Cow<'static, str>,
}

impl EncodeError {
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        EncodeError { kind, path: Vec::new(), message: message.into() }
    }

    /// Creates an error for a value of the wrong type.
    pub fn mismatch(expected: &str, found: &str) -> Self {
        Self::new(
            ErrorKind::TypeMismatch,
            format!("expected {}, found {}", expected, found)
        )
    }

    pub fn invalid(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidValue, message)
    }

    /// Adds a component or alternative name to the front of the path.
    pub fn in_field(mut self, name: &str) -> Self {
        self.path.push(name.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the path as a dot-separated string.
    pub fn path(&self) -> String {
        let mut res = String::new();
        for item in self.path.iter().rev() {
            if !res.is_empty() {
                res.push('.')
            }
            res.push_str(item)
        }
        res
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}: {}", self.kind, self.message)
        }
        else {
            write!(f, "{} in '{}': {}", self.kind, self.path(), self.message)
        }
    }
}

impl error::Error for EncodeError { }


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display() {
        let err = EncodeError::mismatch("BOOLEAN", "INTEGER")
            .in_field("critical").in_field("tbsCertificate");
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.path(), "tbsCertificate.critical");
        assert_eq!(
            err.to_string(),
            "type mismatch in 'tbsCertificate.critical': \
             expected BOOLEAN, found INTEGER"
        );
        assert_eq!(
            EncodeError::invalid("bad").to_string(), "invalid value: bad"
        );
    }
}
