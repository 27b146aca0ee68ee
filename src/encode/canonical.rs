//! Canonical ordering and re-encoding.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::{error, fmt};
use bytes::Bytes;
use crate::decode::{self, DecodeError, DecodeOptions};
use crate::schema::Schema;
use crate::tag::Tag;
use super::encoder;
use super::error::EncodeError;


//------------ Sorting -------------------------------------------------------

/// Sorts the encoded elements of a SET OF into DER order.
///
/// The elements are ordered by their complete encoding compared as
/// unsigned octet strings. A shorter encoding that is a prefix of a longer
/// one sorts first which is the same as padding it with zero octets.
pub fn sort_set_of(elements: &mut [Vec<u8>]) {
    elements.sort_unstable()
}

/// Sorts the encoded components of a SET into DER order.
///
/// The components are ordered by their tags, first by class and then by
/// number. Components are expected to have distinct tags. Elements that
/// don’t start with a valid tag sort last.
pub fn sort_set(elements: &mut [Vec<u8>]) {
    elements.sort_by_cached_key(|element| {
        match Tag::take_from(element, 0) {
            Ok((tag, _, _)) => (false, Some(tag)),
            Err(_) => (true, None),
        }
    })
}


//------------ canonicalize --------------------------------------------------

/// Re-encodes data in canonical form.
///
/// The data is decoded shallowly using `schema` and then encoded again.
/// This fixes the ordering of SET and SET OF values and drops DEFAULT
/// components that are present with their default value. Encoding the
/// result again produces the same octets.
pub fn canonicalize(data: Bytes, schema: &Schema) -> Result<Bytes, Error> {
    let value = decode::decode(data, schema, &DecodeOptions::shallow())?;
    Ok(encoder::encode_to_bytes(&value, schema)?)
}


//------------ Error ---------------------------------------------------------

/// Data could not be canonicalized.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    Decode(DecodeError),
    Encode(EncodeError),
}

impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self {
        Error::Decode(err)
    }
}

impl From<EncodeError> for Error {
    fn from(err: EncodeError) -> Self {
        Error::Encode(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Decode(ref err) => err.fmt(f),
            Error::Encode(ref err) => err.fmt(f),
        }
    }
}

impl error::Error for Error { }


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::schema::Fields;

    #[test]
    fn set_of_order() {
        let mut elements = vec![
            b"\x04\x02\x00\x01".to_vec(),
            b"\x02\x01\x05".to_vec(),
            b"\x04\x01\xff".to_vec(),
            b"\x04\x02\x00".to_vec(),
        ];
        sort_set_of(&mut elements);
        assert_eq!(
            elements,
            vec![
                b"\x02\x01\x05".to_vec(),
                b"\x04\x01\xff".to_vec(),
                b"\x04\x02\x00".to_vec(),
                b"\x04\x02\x00\x01".to_vec(),
            ]
        );
    }

    #[test]
    fn set_order() {
        let mut elements = vec![
            b"\xc1\x00".to_vec(),
            b"\x9f\x20\x00".to_vec(),
            b"\x81\x00".to_vec(),
            b"\x30\x00".to_vec(),
            b"\x02\x01\x00".to_vec(),
            b"\x41\x00".to_vec(),
        ];
        sort_set(&mut elements);
        assert_eq!(
            elements,
            vec![
                b"\x02\x01\x00".to_vec(),
                b"\x30\x00".to_vec(),
                b"\x41\x00".to_vec(),
                b"\x81\x00".to_vec(),
                b"\x9f\x20\x00".to_vec(),
                b"\xc1\x00".to_vec(),
            ]
        );
    }

    #[test]
    fn canonicalize_set_of() {
        let schema = Schema::sequence(
            Fields::new()
                .required("names", Schema::set_of(Schema::utf8_string()))
        );
        let data = Bytes::from_static(
            b"\x30\x0b\x31\x09\x0c\x01c\x0c\x01a\x0c\x01b"
        );
        let canonical = canonicalize(data, &schema).unwrap();
        assert_eq!(
            canonical.as_ref(),
            b"\x30\x0b\x31\x09\x0c\x01a\x0c\x01b\x0c\x01c"
        );
        assert_eq!(canonicalize(canonical.clone(), &schema).unwrap(), canonical);
    }

    #[test]
    fn canonicalize_error() {
        assert!(matches!(
            canonicalize(Bytes::from_static(b"\x30\x00"), &Schema::null()),
            Err(Error::Decode(_))
        ));
    }
}
