//! Error handling for decoding.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::{error, fmt};
use std::borrow::Cow;


//------------ ErrorKind -----------------------------------------------------

/// The kind of problem encountered while decoding.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// The data ended before a declared length was satisfied.
    TruncatedInput,

    /// The data violates the encoding rules.
    ///
    /// This covers non-minimal lengths and integers, indefinite lengths,
    /// malformed object identifiers, trailing data and so on.
    InvalidEncoding,

    /// A value carried a tag other than the one the schema expects.
    TagMismatch,

    /// A required component of a SEQUENCE or SET was not present.
    MissingField,

    /// The content of a CHOICE matched none of its alternatives.
    NoMatchingVariant,
}

impl ErrorKind {
    fn as_str(self) -> &'static str {
        match self {
            ErrorKind::TruncatedInput => "truncated input",
            ErrorKind::InvalidEncoding => "invalid encoding",
            ErrorKind::TagMismatch => "tag mismatch",
            ErrorKind::MissingField => "missing field",
            ErrorKind::NoMatchingVariant => "no matching variant",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


//------------ DecodeError ---------------------------------------------------

/// An error happened while decoding data.
///
/// The error carries its kind, the position in the decoded buffer where
/// the offending element starts, and a human readable message.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecodeError {
    kind: ErrorKind,
    pos: Pos,
    message: Cow<'static, str>,
}

impl DecodeError {
    /// Creates a new error from its parts.
    pub fn new(
        kind: ErrorKind,
        message: impl Into<Cow<'static, str>>,
        pos: impl Into<Pos>,
    ) -> Self {
        DecodeError { kind, pos: pos.into(), message: message.into() }
    }

    /// Creates an error for input that ended too early.
    pub fn truncated(pos: impl Into<Pos>) -> Self {
        Self::new(ErrorKind::TruncatedInput, "unexpected end of data", pos)
    }

    /// Creates an error for data violating the encoding rules.
    pub fn content(
        message: impl Into<Cow<'static, str>>, pos: impl Into<Pos>
    ) -> Self {
        Self::new(ErrorKind::InvalidEncoding, message, pos)
    }

    /// Returns the kind of the error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the position where the error happened.
    pub fn pos(&self) -> Pos {
        self.pos
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}: {}", self.kind, self.pos, self.message)
    }
}

impl error::Error for DecodeError { }


//------------ ContentError --------------------------------------------------

/// The content octets of a primitive value are malformed.
///
/// The primitive types return this error since they don’t know where
/// their content lives. The decoder turns it into a [`DecodeError`] of
/// kind [`ErrorKind::InvalidEncoding`] at the right position.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContentError {
    message: Cow<'static, str>,
}

impl ContentError {
    /// Creates a content error from a static str.
    pub const fn from_static(msg: &'static str) -> Self {
        ContentError { message: Cow::Borrowed(msg) }
    }

    /// Creates a content error from an owned message.
    pub fn from_string(msg: String) -> Self {
        ContentError { message: Cow::Owned(msg) }
    }

    /// Converts the error into a decode error at the given position.
    pub fn at(self, pos: impl Into<Pos>) -> DecodeError {
        DecodeError::content(self.message, pos)
    }
}

impl From<&'static str> for ContentError {
    fn from(msg: &'static str) -> Self {
        Self::from_static(msg)
    }
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl error::Error for ContentError { }


//------------ Pos -----------------------------------------------------------

/// The octet offset into the buffer handed to the decoder.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Pos(usize);

impl Pos {
    /// Returns the offset as a `usize`.
    pub fn offset(self) -> usize {
        self.0
    }
}

impl From<usize> for Pos {
    fn from(pos: usize) -> Pos {
        Pos(pos)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "at position {}", self.0)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display() {
        let err = DecodeError::content("illegal length", 12);
        assert_eq!(err.kind(), ErrorKind::InvalidEncoding);
        assert_eq!(err.pos().offset(), 12);
        assert_eq!(
            err.to_string(),
            "invalid encoding at position 12: illegal length"
        );
        assert_eq!(
            ContentError::from_static("bad").at(3),
            DecodeError::new(ErrorKind::InvalidEncoding, "bad", 3)
        );
    }
}
