//! Strings and string-like values.
//!
//! This module provides the [`BitString`] type and the character set
//! checks for the restricted character string types.

pub use self::bit::BitString;
pub use self::restricted::{
    BmpCharSet, CharSet, CharSetError, Ia5CharSet, PrintableCharSet,
    Utf8CharSet, VisibleCharSet,
};

mod bit;
mod restricted;
