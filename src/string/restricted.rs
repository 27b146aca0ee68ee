//! Character sets of the restricted character string types.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::{error, fmt};
use crate::tag::Tag;


//------------ CharSet -------------------------------------------------------

/// The character set of a restricted character string type.
///
/// Values of all string types are kept as Rust strings. The character set
/// translates between those and the content octets and makes sure only
/// permitted characters are used.
pub trait CharSet {
    /// The natural tag of the related restricted character string type.
    const TAG: Tag;

    /// Decodes content octets into a string.
    fn decode(content: &[u8]) -> Result<String, CharSetError>;

    /// Encodes a string into content octets.
    fn encode(value: &str) -> Result<Vec<u8>, CharSetError>;
}


//------------ Utf8CharSet ---------------------------------------------------

/// The character set for the UTF8String type.
#[derive(Clone, Copy, Debug, Default)]
pub struct Utf8CharSet;

impl CharSet for Utf8CharSet {
    const TAG: Tag = Tag::UTF8_STRING;

    fn decode(content: &[u8]) -> Result<String, CharSetError> {
        String::from_utf8(content.into()).map_err(|_| CharSetError)
    }

    fn encode(value: &str) -> Result<Vec<u8>, CharSetError> {
        Ok(value.as_bytes().into())
    }
}


//------------ PrintableCharSet ----------------------------------------------

/// The character set for the PrintableString type.
///
/// This character string allows the following characters from the ASCII
/// character set:
///
/// * the letters `A` to `Z` and `a` to `z`,
/// * the digits `0` to `9`,
/// * the space character ` `,
/// * the symbols `'`, `(`, `)`, `+`, `,`, `-`, `.`, `/`, `:`, `=`, and `?`.
#[derive(Clone, Copy, Debug, Default)]
pub struct PrintableCharSet;

impl PrintableCharSet {
    fn is_printable(x: u8) -> bool {
        x.is_ascii_alphanumeric() || // A-Z a-z 0-9
        x == b' ' || x == b'\'' || x == b'(' || x == b')' ||
        x == b'+' || x == b',' || x == b'-' || x == b'.' ||
        x == b'/' || x == b':' || x == b'=' || x == b'?'
    }
}

impl CharSet for PrintableCharSet {
    const TAG: Tag = Tag::PRINTABLE_STRING;

    fn decode(content: &[u8]) -> Result<String, CharSetError> {
        ascii_subset(content, Self::is_printable)
    }

    fn encode(value: &str) -> Result<Vec<u8>, CharSetError> {
        ascii_subset(
            value.as_bytes(), Self::is_printable
        ).map(String::into_bytes)
    }
}


//------------ Ia5CharSet ----------------------------------------------------

/// The character set for the IA5String type, i.e., all of ASCII.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ia5CharSet;

impl CharSet for Ia5CharSet {
    const TAG: Tag = Tag::IA5_STRING;

    fn decode(content: &[u8]) -> Result<String, CharSetError> {
        ascii_subset(content, |x| x.is_ascii())
    }

    fn encode(value: &str) -> Result<Vec<u8>, CharSetError> {
        ascii_subset(
            value.as_bytes(), |x| x.is_ascii()
        ).map(String::into_bytes)
    }
}


//------------ VisibleCharSet ------------------------------------------------

/// The character set for the VisibleString type.
///
/// This is printable ASCII including the space character.
#[derive(Clone, Copy, Debug, Default)]
pub struct VisibleCharSet;

impl CharSet for VisibleCharSet {
    const TAG: Tag = Tag::VISIBLE_STRING;

    fn decode(content: &[u8]) -> Result<String, CharSetError> {
        ascii_subset(content, |x| (0x20..0x7F).contains(&x))
    }

    fn encode(value: &str) -> Result<Vec<u8>, CharSetError> {
        ascii_subset(
            value.as_bytes(), |x| (0x20..0x7F).contains(&x)
        ).map(String::into_bytes)
    }
}


//------------ BmpCharSet ----------------------------------------------------

/// The character set for the BMPString type.
///
/// The content is UCS-2 in big-endian order. We are lenient and accept
/// UTF-16 surrogate pairs.
#[derive(Clone, Copy, Debug, Default)]
pub struct BmpCharSet;

impl CharSet for BmpCharSet {
    const TAG: Tag = Tag::BMP_STRING;

    fn decode(content: &[u8]) -> Result<String, CharSetError> {
        if content.len() % 2 != 0 {
            return Err(CharSetError)
        }
        let units = content.chunks_exact(2).map(|chunk| {
            u16::from_be_bytes([chunk[0], chunk[1]])
        });
        char::decode_utf16(units).collect::<Result<String, _>>().map_err(|_| {
            CharSetError
        })
    }

    fn encode(value: &str) -> Result<Vec<u8>, CharSetError> {
        Ok(value.encode_utf16().flat_map(u16::to_be_bytes).collect())
    }
}


//------------ CharSetError --------------------------------------------------

/// An illegal character was encountered.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CharSetError;

impl fmt::Display for CharSetError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("illegal character in string")
    }
}

impl error::Error for CharSetError { }


//------------ Helpers -------------------------------------------------------

/// Converts a slice into a string if all octets satisfy `check`.
///
/// `check` must only accept ASCII characters.
fn ascii_subset(
    slice: &[u8], check: impl Fn(u8) -> bool
) -> Result<String, CharSetError> {
    if !slice.iter().copied().all(check) {
        return Err(CharSetError)
    }
    String::from_utf8(slice.into()).map_err(|_| CharSetError)
}


//============ Tests =========================================================
