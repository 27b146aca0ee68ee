//! The identifier octets of a DER encoded value.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use crate::decode::DecodeError;


//------------ Class ---------------------------------------------------------

/// The class of a tag.
///
/// The ordering of the variants follows the encoded value of the class
/// bits which is the order DER uses when sorting the components of a SET.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Class {
    Universal,
    Application,
    Context,
    Private,
}

impl Class {
    /// Returns the class encoded in the top two bits of `octet`.
    pub fn from_u8(octet: u8) -> Self {
        match octet & Tag::CLASS_MASK {
            0x00 => Class::Universal,
            0x40 => Class::Application,
            0x80 => Class::Context,
            _ => Class::Private,
        }
    }

    /// Returns the class bits as the top two bits of an octet.
    pub fn into_u8(self) -> u8 {
        match self {
            Class::Universal => 0x00,
            Class::Application => 0x40,
            Class::Context => 0x80,
            Class::Private => 0xc0,
        }
    }
}


//------------ Tag -----------------------------------------------------------

/// The tag of a DER encoded value.
///
/// Each encoded value starts with one or more _identifier octets._ They
/// encode the class and number of the tag as well as whether the value
/// uses primitive or constructed encoding. The `Tag` type represents class
/// and number only. Whether a value is constructed is a property of its
/// [`Header`][crate::Header].
///
/// Tags are ordered first by class then by number. This is the canonical
/// order of the components of a SET under DER.
///
/// # Encoding
///
/// Tag numbers up to 30 are encoded in the low five bits of the first
/// octet. Larger numbers set those bits to all ones and follow with the
/// number in base 128, most significant digit first, with bit 8 set on all
/// but the last octet. DER requires the shortest of these forms.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Tag {
    class: Class,
    number: u32,
}

/// # Constants for Often Used Tag Values
///
impl Tag {
    /// The mask for the class bits.
    const CLASS_MASK: u8 = 0xc0;

    /// The bit marking constructed encoding.
    const CONSTRUCTED_MASK: u8 = 0x20;

    /// The mask for the tag number in the first octet.
    const SINGLEBYTE_DATA_MASK: u8 = 0x1f;

    /// The mask for data in subsequent octets.
    const MULTIBYTE_DATA_MASK: u8 = 0x7f;

    /// The bit marking that more octets follow.
    const MORE_OCTETS_MASK: u8 = 0x80;

    //--- Universal Tags
    //
    // See clause 8.4 of X.690.

    /// The tag for the BOOLEAN type, UNIVERSAL 1.
    pub const BOOLEAN: Self = Tag::universal(1);

    /// The tag for the INTEGER type, UNIVERSAL 2.
    pub const INTEGER: Self = Tag::universal(2);

    /// The tag for the BIT STRING type, UNIVERSAL 3.
    pub const BIT_STRING: Self = Tag::universal(3);

    /// The tag for the OCTET STRING type, UNIVERSAL 4.
    pub const OCTET_STRING: Self = Tag::universal(4);

    /// The tag for the NULL type, UNIVERSAL 5.
    pub const NULL: Self = Tag::universal(5);

    /// The tag for the OBJECT IDENTIFIER type, UNIVERSAL 6.
    pub const OID: Self = Tag::universal(6);

    /// The tag for the ENUMERATED type, UNIVERAL 10.
    pub const ENUMERATED: Self = Tag::universal(10);

    /// The tag for the UTF8String type, UNIVERSAL 12
    pub const UTF8_STRING: Self = Tag::universal(12);

    /// The tag for the SEQUENCE and SEQUENCE OF types, UNIVERSAL 16.
    pub const SEQUENCE: Self = Tag::universal(16);

    /// The tag for the SET and SET OF types, UNIVERSAL 17.
    pub const SET: Self = Tag::universal(17);

    /// The tag for the PrintableString type, UNIVERSAL 19.
    pub const PRINTABLE_STRING: Self = Tag::universal(19);

    /// The tag for the IA5String type, UNIVERSAL 22.
    pub const IA5_STRING: Self = Tag::universal(22);

    /// The tag for the UTCTime type, UNIVERSAL 23.
    pub const UTC_TIME: Self = Tag::universal(23);

    /// The tag for the GeneralizedType type, UNIVERAL 24.
    pub const GENERALIZED_TIME: Self = Tag::universal(24);

    /// The tag for the VisibleString type, UNIVERSAL 26.
    pub const VISIBLE_STRING: Self = Tag::universal(26);

    /// The tag for the BMPString type, UNIVERSAL 30.
    pub const BMP_STRING: Self = Tag::universal(30);

    //--- The first few context-specific tags.

    /// The tag context specific tag [0].
    pub const CTX_0: Self = Tag::ctx(0);

    /// The tag context specific tag [1].
    pub const CTX_1: Self = Tag::ctx(1);

    /// The tag context specific tag [2].
    pub const CTX_2: Self = Tag::ctx(2);

    /// The tag context specific tag [3].
    pub const CTX_3: Self = Tag::ctx(3);
}

impl Tag {
    /// Creates a new tag from class and number.
    pub const fn new(class: Class, number: u32) -> Self {
        Tag { class, number }
    }

    /// Creates a new tag in the universal class with the given tag number.
    pub const fn universal(number: u32) -> Self {
        Tag::new(Class::Universal, number)
    }

    /// Creates a new tag in the application class with the given tag number.
    pub const fn application(number: u32) -> Self {
        Tag::new(Class::Application, number)
    }

    /// Creates a new tag in the context specific class.
    pub const fn ctx(number: u32) -> Self {
        Tag::new(Class::Context, number)
    }

    /// Creates a new tag in the private class with the given tag number.
    pub const fn private(number: u32) -> Self {
        Tag::new(Class::Private, number)
    }

    /// Returns the class of the tag.
    pub fn class(self) -> Class {
        self.class
    }

    /// Returns the number of the tag.
    pub fn number(self) -> u32 {
        self.number
    }

    /// Returns whether the tag is of the universal class.
    pub fn is_universal(self) -> bool {
        self.class == Class::Universal
    }

    /// Returns whether the tag is of the context specific class.
    pub fn is_context_specific(self) -> bool {
        self.class == Class::Context
    }

    /// Takes the identifier octets from `data` starting at `offset`.
    ///
    /// Upon success, returns the tag, whether the value is constructed,
    /// and the offset of the first octet after the identifier. Positions
    /// in errors are offsets into `data`.
    pub fn take_from(
        data: &[u8], offset: usize
    ) -> Result<(Self, bool, usize), DecodeError> {
        let first = match data.get(offset) {
            Some(first) => *first,
            None => return Err(DecodeError::truncated(offset)),
        };
        let class = Class::from_u8(first);
        let constructed = first & Tag::CONSTRUCTED_MASK != 0;
        let low = first & Tag::SINGLEBYTE_DATA_MASK;
        if low != Tag::SINGLEBYTE_DATA_MASK {
            return Ok((
                Tag::new(class, u32::from(low)), constructed, offset + 1
            ))
        }

        let mut number = 0u32;
        let mut idx = offset + 1;
        loop {
            let octet = match data.get(idx) {
                Some(octet) => *octet,
                None => return Err(DecodeError::truncated(idx)),
            };
            if idx == offset + 1 && octet == Tag::MORE_OCTETS_MASK {
                return Err(DecodeError::content(
                    "non-minimal tag number", offset
                ))
            }
            if number > (u32::MAX >> 7) {
                return Err(DecodeError::content(
                    "excessive tag number", offset
                ))
            }
            number = (number << 7)
                | u32::from(octet & Tag::MULTIBYTE_DATA_MASK);
            idx += 1;
            if octet & Tag::MORE_OCTETS_MASK == 0 {
                break
            }
        }
        if number <= u32::from(Tag::SINGLEBYTE_DATA_MASK - 1) {
            return Err(DecodeError::content(
                "high tag number form for low tag number", offset
            ))
        }
        Ok((Tag::new(class, number), constructed, idx))
    }

    /// Returns the number of octets of the encoded form of the tag.
    pub fn encoded_len(self) -> usize {
        if self.number < u32::from(Tag::SINGLEBYTE_DATA_MASK) {
            1
        }
        else {
            1 + Self::base128_len(self.number)
        }
    }

    /// Appends the identifier octets to the end of `target`.
    pub fn append_encoded(self, constructed: bool, target: &mut Vec<u8>) {
        let mut first = self.class.into_u8();
        if constructed {
            first |= Tag::CONSTRUCTED_MASK
        }
        if self.number < u32::from(Tag::SINGLEBYTE_DATA_MASK) {
            target.push(first | self.number as u8);
            return
        }
        target.push(first | Tag::SINGLEBYTE_DATA_MASK);
        let len = Self::base128_len(self.number);
        for i in (0..len).rev() {
            let mut octet = ((self.number >> (7 * i)) as u8)
                & Tag::MULTIBYTE_DATA_MASK;
            if i > 0 {
                octet |= Tag::MORE_OCTETS_MASK
            }
            target.push(octet)
        }
    }

    /// Returns the number of base 128 digits needed for `number`.
    fn base128_len(number: u32) -> usize {
        let bits = 32 - number.leading_zeros() as usize;
        bits.max(1).div_ceil(7)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.class {
            Class::Universal => write!(f, "[UNIVERSAL {}]", self.number),
            Class::Application => write!(f, "[APPLICATION {}]", self.number),
            Class::Context => write!(f, "[{}]", self.number),
            Class::Private => write!(f, "[PRIVATE {}]", self.number),
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({})", self)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::decode::ErrorKind;

    fn encode(tag: Tag, constructed: bool) -> Vec<u8> {
        let mut res = Vec::new();
        tag.append_encoded(constructed, &mut res);
        assert_eq!(res.len(), tag.encoded_len());
        res
    }

    #[test]
    fn take_low_number() {
        assert_eq!(
            Tag::take_from(b"\x02\x01", 0).unwrap(),
            (Tag::INTEGER, false, 1)
        );
        assert_eq!(
            Tag::take_from(b"\x30", 0).unwrap(),
            (Tag::SEQUENCE, true, 1)
        );
        assert_eq!(
            Tag::take_from(b"\x00\xa3", 1).unwrap(),
            (Tag::CTX_3, true, 2)
        );
        assert_eq!(
            Tag::take_from(b"\x5e", 0).unwrap(),
            (Tag::application(30), false, 1)
        );
    }

    #[test]
    fn take_high_number() {
        assert_eq!(
            Tag::take_from(b"\x9f\x1f", 0).unwrap(),
            (Tag::ctx(31), false, 2)
        );
        assert_eq!(
            Tag::take_from(b"\xbf\x81\x00", 0).unwrap(),
            (Tag::ctx(128), true, 3)
        );
        assert_eq!(
            Tag::take_from(b"\xdf\x81\x80\x01", 0).unwrap(),
            (Tag::private(0x4001), false, 4)
        );
    }

    #[test]
    fn take_malformed() {
        assert_eq!(
            Tag::take_from(b"", 0).unwrap_err().kind(),
            ErrorKind::TruncatedInput
        );
        assert_eq!(
            Tag::take_from(b"\x9f\x81", 0).unwrap_err().kind(),
            ErrorKind::TruncatedInput
        );
        // Leading 0x80 octet.
        assert_eq!(
            Tag::take_from(b"\x9f\x80\x1f", 0).unwrap_err().kind(),
            ErrorKind::InvalidEncoding
        );
        // Number fits into the short form.
        assert_eq!(
            Tag::take_from(b"\x9f\x1e", 0).unwrap_err().kind(),
            ErrorKind::InvalidEncoding
        );
        assert_eq!(
            Tag::take_from(
                b"\x9f\x8f\xff\xff\xff\xff\x7f", 0
            ).unwrap_err().kind(),
            ErrorKind::InvalidEncoding
        );
    }

    #[test]
    fn append_encoded() {
        assert_eq!(encode(Tag::BOOLEAN, false), b"\x01");
        assert_eq!(encode(Tag::SET, true), b"\x31");
        assert_eq!(encode(Tag::ctx(30), false), b"\x9e");
        assert_eq!(encode(Tag::ctx(31), false), b"\x9f\x1f");
        assert_eq!(encode(Tag::ctx(128), true), b"\xbf\x81\x00");
        assert_eq!(encode(Tag::private(0x4001), false), b"\xdf\x81\x80\x01");
        assert_eq!(
            encode(Tag::application(u32::MAX), false),
            b"\x5f\x8f\xff\xff\xff\x7f"
        );
        let encoded = encode(Tag::application(u32::MAX), true);
        assert_eq!(
            Tag::take_from(&encoded, 0).unwrap(),
            (Tag::application(u32::MAX), true, 6)
        );
    }

    #[test]
    fn ordering() {
        assert!(Tag::INTEGER < Tag::SEQUENCE);
        assert!(Tag::SEQUENCE < Tag::application(0));
        assert!(Tag::ctx(1) < Tag::ctx(2));
        assert!(Tag::ctx(31) < Tag::private(0));
    }

    #[test]
    fn display() {
        assert_eq!(Tag::INTEGER.to_string(), "[UNIVERSAL 2]");
        assert_eq!(Tag::CTX_0.to_string(), "[0]");
        assert_eq!(Tag::application(4).to_string(), "[APPLICATION 4]");
    }
}
