//! DER-encoded bit strings.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use bytes::Bytes;
use crate::decode::ContentError;


//------------ BitString -----------------------------------------------------

/// A bit string value.
///
/// Bit strings are a sequence of bits. Unlike octet strings, they do not
/// need to contain a multiple of eight bits.
///
/// There are two types of methods for accessing the data in a bit string.
/// Methods starting with `bit` operate on the individual bits while those
/// prefixed with `octet` access entire octets and ignore the fact that there
/// may be unused bits in the final octet.
///
/// # Encoding
///
/// With DER, only the primitive encoding is allowed. The first octet of the
/// content contains the number of unused bits in the last octet and the
/// following octets contain the bits with the first bit in the most
/// significant bit of the octet. The number of unused bits is at most seven
/// and must be zero if there are no bits at all. The unused bits themselves
/// must be zero.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct BitString {
    /// The number of unused bits in the last byte.
    unused: u8,

    /// The bytes of the bit string.
    bits: Bytes,
}

impl BitString {
    /// Creates a new bit string.
    ///
    /// Fails if `unused` is out of range for `bits` or if any of the unused
    /// bits is set.
    pub fn new(unused: u8, bits: Bytes) -> Result<Self, ContentError> {
        if unused > 7 {
            return Err("invalid bit string with large initial octet".into())
        }
        match bits.last() {
            None if unused != 0 => {
                Err("invalid bit string (length zero but unused bits)".into())
            }
            Some(last) if last & ((1u8 << unused) - 1) != 0 => {
                Err("bit string with non-zero unused bits".into())
            }
            _ => Ok(BitString { unused, bits })
        }
    }

    /// Creates a bit string from a full octet sequence.
    pub fn from_octets(bits: Bytes) -> Self {
        BitString { unused: 0, bits }
    }

    /// Creates a bit string from its content octets.
    pub fn from_content(mut content: Bytes) -> Result<Self, ContentError> {
        if content.is_empty() {
            return Err("empty bit string".into())
        }
        let unused = content.split_to(1)[0];
        Self::new(unused, content)
    }

    /// Returns the value of the given bit.
    pub fn bit(&self, bit: usize) -> bool {
        if bit >= self.bit_len() {
            return false
        }
        self.bits[bit >> 3] & (0x80 >> (bit & 7)) != 0
    }

    /// Returns the number of bits in the bit string.
    pub fn bit_len(&self) -> usize {
        (self.bits.len() << 3) - (self.unused as usize)
    }

    /// Returns the number of unused bits in the last octet.
    pub fn unused(&self) -> u8 {
        self.unused
    }

    /// Returns the number of octets in the bit string.
    pub fn octet_len(&self) -> usize {
        self.bits.len()
    }

    /// Returns a slice of the octets in the bit string.
    pub fn octet_slice(&self) -> &[u8] {
        self.bits.as_ref()
    }

    /// Returns a bytes value of the octets of the bit string.
    pub fn octet_bytes(&self) -> Bytes {
        self.bits.clone()
    }

    /// Returns the length of the content octets.
    pub fn content_len(&self) -> usize {
        self.bits.len() + 1
    }

    /// Appends the content octets to `target`.
    pub fn append_content(&self, target: &mut Vec<u8>) {
        target.push(self.unused);
        target.extend_from_slice(self.bits.as_ref());
    }
}

impl fmt::Debug for BitString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "BitString(unused {}, ", self.unused)?;
        for octet in self.bits.iter() {
            write!(f, "{:02X}", octet)?;
        }
        f.write_str(")")
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn content(slice: &'static [u8]) -> Result<BitString, ContentError> {
        BitString::from_content(Bytes::from_static(slice))
    }

    #[test]
    fn from_content() {
        let bits = content(b"\x01\x86").unwrap();
        assert_eq!(bits.unused(), 1);
        assert_eq!(bits.bit_len(), 7);
        assert!(bits.bit(0));
        assert!(!bits.bit(1));
        assert!(bits.bit(5));
        assert!(bits.bit(6));
        assert!(!bits.bit(7));
        assert!(!bits.bit(100));

        assert_eq!(content(b"\x00").unwrap().bit_len(), 0);
        assert!(content(b"").is_err());
        assert!(content(b"\x01").is_err());
        assert!(content(b"\x08\x00").is_err());
        assert!(content(b"\x01\x87").is_err());
        assert!(content(b"\x07\x80").is_ok());
    }

    #[test]
    fn append_content() {
        let bits = BitString::new(4, Bytes::from_static(b"\xAB\xC0")).unwrap();
        let mut target = Vec::new();
        bits.append_content(&mut target);
        assert_eq!(target, b"\x04\xAB\xC0");
        assert_eq!(bits.content_len(), 3);
    }
}
