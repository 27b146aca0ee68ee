//! The identifier and length octets of an encoded value.
//!
//! This is a private module. Its public items are re-exported by the parent.

use crate::decode::DecodeError;
use crate::length::Length;
use crate::tag::Tag;


//------------ Header --------------------------------------------------------

/// The header of a DER encoded value.
///
/// The header consists of the identifier octets, providing the tag and
/// whether the value is constructed, and the length octets giving the
/// number of content octets that follow.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Header {
    tag: Tag,
    constructed: bool,
    content_len: usize,
}

impl Header {
    /// Creates a new header from its parts.
    pub fn new(tag: Tag, constructed: bool, content_len: usize) -> Self {
        Header { tag, constructed, content_len }
    }

    /// Returns the tag of the value.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Returns whether the value uses constructed encoding.
    pub fn is_constructed(&self) -> bool {
        self.constructed
    }

    /// Returns the number of content octets.
    pub fn content_len(&self) -> usize {
        self.content_len
    }

    /// Takes a header from `data` starting at `offset`.
    ///
    /// Returns the header and the offset of its first content octet. The
    /// function checks that all the content octets are present in `data`,
    /// i.e., that the value doesn’t extend past the end of the slice. All
    /// positions in errors are offsets into `data`.
    pub fn take_from(
        data: &[u8], offset: usize
    ) -> Result<(Self, usize), DecodeError> {
        let (tag, constructed, len_offset) = Tag::take_from(data, offset)?;
        let (len, start) = Length::take_from(data, len_offset)?;
        let len = len.get();
        if data.len() - start < len {
            return Err(DecodeError::truncated(offset))
        }
        Ok((Header::new(tag, constructed, len), start))
    }

    /// Returns the length of the encoded header.
    pub fn encoded_len(&self) -> usize {
        self.tag.encoded_len() + Length::new(self.content_len).encoded_len()
    }

    /// Appends the encoded header to `target`.
    pub fn append_encoded(&self, target: &mut Vec<u8>) {
        self.tag.append_encoded(self.constructed, target);
        Length::new(self.content_len).append_encoded(target)
    }

    /// Appends a complete value with the given header and content.
    pub fn append_value(
        tag: Tag, constructed: bool, content: &[u8], target: &mut Vec<u8>
    ) {
        Header::new(tag, constructed, content.len()).append_encoded(target);
        target.extend_from_slice(content)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::decode::ErrorKind;

    #[test]
    fn take_from() {
        assert_eq!(
            Header::take_from(b"\x30\x03\x02\x01\x05", 0).unwrap(),
            (Header::new(Tag::SEQUENCE, true, 3), 2)
        );
        assert_eq!(
            Header::take_from(b"\x30\x03\x02\x01\x05", 2).unwrap(),
            (Header::new(Tag::INTEGER, false, 1), 4)
        );
        assert_eq!(
            Header::take_from(b"\xbf\x1f\x00", 0).unwrap(),
            (Header::new(Tag::ctx(31), true, 0), 3)
        );
    }

    #[test]
    fn take_from_truncated() {
        assert_eq!(
            Header::take_from(b"\x04\x05abc", 0).unwrap_err().kind(),
            ErrorKind::TruncatedInput
        );
        assert_eq!(
            Header::take_from(b"\x04", 0).unwrap_err().kind(),
            ErrorKind::TruncatedInput
        );
        assert_eq!(
            Header::take_from(b"\x30\x80\x00\x00", 0).unwrap_err().kind(),
            ErrorKind::InvalidEncoding
        );
    }

    #[test]
    fn append_encoded() {
        let mut target = Vec::new();
        let header = Header::new(Tag::OCTET_STRING, false, 300);
        header.append_encoded(&mut target);
        assert_eq!(target, b"\x04\x82\x01\x2c");
        assert_eq!(header.encoded_len(), 4);

        let mut target = Vec::new();
        Header::append_value(Tag::ctx(40), true, b"\x05\x00", &mut target);
        assert_eq!(target, b"\xbf\x28\x02\x05\x00");
    }
}
