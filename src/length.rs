//! The length octets.
//!
//! This is a private module. Its public items are re-exported by the parent.

use crate::decode::DecodeError;


//------------ Length --------------------------------------------------------

/// The definite length of the content octets of an encoded value.
///
/// # Encoding
///
/// If the most significant bit of the first length octet is clear, the
/// octet is the length itself. Otherwise the remaining bits of the first
/// octet give the number of octets that follow with the big-endian
/// length.
///
/// DER only allows definite lengths in the shortest possible encoding: a
/// first octet of 0x80, which would introduce an indefinite length, is
/// rejected, as are long forms with a leading zero octet or a value that
/// would have fit into the short form.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Length(usize);

impl Length {
    const LEN: usize = 0usize.to_ne_bytes().len();

    /// Creates a length from a `usize`.
    pub fn new(len: usize) -> Self {
        Length(len)
    }

    /// Returns the length as a `usize`.
    pub fn get(self) -> usize {
        self.0
    }

    /// Takes the length octets from `data` starting at `offset`.
    ///
    /// Returns the length and the offset of the first octet after the
    /// length octets. This does not check that enough content octets
    /// follow.
    pub fn take_from(
        data: &[u8], offset: usize
    ) -> Result<(Self, usize), DecodeError> {
        let first = match data.get(offset) {
            Some(first) => *first,
            None => return Err(DecodeError::truncated(offset))
        };
        match first {
            // Bit 8 clear: short form.
            n if n & 0x80 == 0 => {
                return Ok((Length(usize::from(n)), offset + 1))
            }
            0x80 => {
                return Err(DecodeError::content(
                    "indefinite length not allowed in DER", offset
                ))
            }
            0xFF => {
                return Err(DecodeError::content(
                    "illegal length octets", offset
                ))
            }
            _ => { }
        }

        let count = usize::from(first & 0x7F);
        let octets = match data.get(offset + 1..offset + 1 + count) {
            Some(octets) => octets,
            None => return Err(DecodeError::truncated(offset))
        };

        // The second octet can’t be zero and it can’t be less than 0x80 if
        // it is the only one. In both cases, there is a shorter encoding.
        if octets[0] == 0 || (octets[0] < 0x80 && count == 1) {
            return Err(DecodeError::content("non-minimal length", offset))
        }
        if count > Self::LEN {
            return Err(DecodeError::content("excessive length", offset))
        }

        let mut res = 0usize.to_ne_bytes();
        res[Self::LEN - count..].copy_from_slice(octets);
        Ok((Length(usize::from_be_bytes(res)), offset + 1 + count))
    }

    /// Returns the length of the encoded representation of the value.
    pub fn encoded_len(self) -> usize {
        if self.0 > 0x7F {
            Self::LEN - self.encoded_start_idx() + 1
        }
        else {
            1
        }
    }

    /// Appends the encoded length to the end of `target`.
    pub fn append_encoded(self, target: &mut Vec<u8>) {
        if self.0 > 0x7F {
            let idx = self.encoded_start_idx();

            // LEN will never be greater than 126 bytes and `idx` is less
            // than LEN since the value isn’t zero.
            target.push(((Self::LEN - idx) | 0x80) as u8);
            target.extend_from_slice(&self.0.to_be_bytes()[idx..])
        }
        else {
            target.push(self.0 as u8)
        }
    }

    /// Returns the index of the first non-zero octet of the value.
    fn encoded_start_idx(self) -> usize {
        (self.0.leading_zeros() / 8) as usize
    }
}

impl From<usize> for Length {
    fn from(len: usize) -> Self {
        Length(len)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::decode::ErrorKind;

    fn take_from(src: &[u8]) -> Result<usize, DecodeError> {
        let (res, end) = Length::take_from(src, 0)?;
        assert_eq!(end, src.len());
        Ok(res.get())
    }

    fn kind(src: &[u8]) -> ErrorKind {
        Length::take_from(src, 0).unwrap_err().kind()
    }

    #[test]
    fn take_from_der() {
        assert_eq!(take_from(b"\x00").unwrap(), 0x00);
        assert_eq!(take_from(b"\x12").unwrap(), 0x12);
        assert_eq!(take_from(b"\x7f").unwrap(), 0x7f);
        assert_eq!(take_from(b"\x81\x80").unwrap(), 0x80);
        assert_eq!(take_from(b"\x81\xF0").unwrap(), 0xF0);
        assert_eq!(take_from(b"\x82\xF0\x0E").unwrap(), 0xF00E);
        assert_eq!(take_from(b"\x82\x01\x00").unwrap(), 0x100);
        assert_eq!(take_from(b"\x83\x01\x00\x00").unwrap(), 0x10000);
    }

    #[test]
    fn take_from_malformed() {
        assert_eq!(kind(b"\x80"), ErrorKind::InvalidEncoding);
        assert_eq!(kind(b"\x81\x00"), ErrorKind::InvalidEncoding);
        assert_eq!(kind(b"\x81\x7f"), ErrorKind::InvalidEncoding);
        assert_eq!(kind(b"\x82\x00\x0E"), ErrorKind::InvalidEncoding);
        assert_eq!(kind(b"\x82\x00\x00"), ErrorKind::InvalidEncoding);
        assert_eq!(kind(b"\xFF"), ErrorKind::InvalidEncoding);
        assert_eq!(
            kind(b"\x89\x01\x00\x00\x00\x00\x00\x00\x00\x00"),
            ErrorKind::InvalidEncoding
        );
        assert_eq!(kind(b""), ErrorKind::TruncatedInput);
        assert_eq!(kind(b"\x82\x01"), ErrorKind::TruncatedInput);
    }

    #[test]
    fn encode() {
        fn check(len: usize, expected: &[u8]) {
            let mut target = Vec::new();
            Length::new(len).append_encoded(&mut target);
            assert_eq!(target, expected);
            assert_eq!(Length::new(len).encoded_len(), expected.len());
            assert_eq!(take_from(&target).unwrap(), len);
        }

        check(0, b"\x00");
        check(0x12, b"\x12");
        check(0x7f, b"\x7f");
        check(0x80, b"\x81\x80");
        check(0xFF, b"\x81\xFF");
        check(0x100, b"\x82\x01\x00");
        check(0xF00E, b"\x82\xF0\x0E");
        check(0x01_0000, b"\x83\x01\x00\x00");
        check(0x1234_5678, b"\x84\x12\x34\x56\x78");
    }
}
