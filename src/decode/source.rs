//! Reading encoded elements from a buffer.
//!
//! This is a private module. Its public items are re-exported by the parent.

use bytes::Bytes;
use crate::header::Header;
use crate::tag::Tag;
use super::error::DecodeError;


//------------ Constructed ---------------------------------------------------

/// A cursor over the elements in the content of a constructed value.
///
/// The cursor keeps the complete buffer that decoding started with and
/// only moves its start and end positions around. This way, all positions
/// handed out, both by elements and errors, are offsets into that
/// top-level buffer, no matter how deeply nested the content is.
#[derive(Clone, Debug)]
pub struct Constructed {
    /// The complete buffer.
    data: Bytes,

    /// The position of the next element.
    pos: usize,

    /// The end of the content.
    end: usize,
}

impl Constructed {
    /// Creates a cursor over the range `start..end` of `data`.
    pub fn new(data: Bytes, start: usize, end: usize) -> Self {
        Constructed { data, pos: start, end }
    }

    /// Creates a cursor over all of `data`.
    pub fn from_bytes(data: Bytes) -> Self {
        let end = data.len();
        Constructed { data, pos: 0, end }
    }

    /// Returns the position of the next element.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Returns whether all elements have been taken.
    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.end
    }

    /// Returns the next element without advancing.
    ///
    /// Returns `Ok(None)` if the cursor is exhausted.
    pub fn peek(&self) -> Result<Option<Element>, DecodeError> {
        if self.is_exhausted() {
            return Ok(None)
        }
        let limited = &self.data.as_ref()[..self.end];
        let (header, content_start) = Header::take_from(limited, self.pos)?;
        Ok(Some(Element {
            data: self.data.clone(),
            header,
            start: self.pos,
            content_start,
            end: content_start + header.content_len(),
        }))
    }

    /// Advances the cursor past an element returned by [`peek`].
    ///
    /// [`peek`]: #method.peek
    pub fn skip(&mut self, element: &Element) {
        self.pos = element.end
    }

    /// Takes the next element if there is one.
    pub fn take_opt_element(&mut self) -> Result<Option<Element>, DecodeError> {
        let res = self.peek()?;
        if let Some(ref element) = res {
            self.skip(element)
        }
        Ok(res)
    }

    /// Takes the next element which must be present.
    pub fn take_element(&mut self) -> Result<Element, DecodeError> {
        match self.take_opt_element()? {
            Some(element) => Ok(element),
            None => Err(DecodeError::truncated(self.pos)),
        }
    }

    /// Checks that all elements have been taken.
    pub fn exhausted(&self) -> Result<(), DecodeError> {
        if self.is_exhausted() {
            Ok(())
        }
        else {
            Err(DecodeError::content("trailing data", self.pos))
        }
    }
}


//------------ Element -------------------------------------------------------

/// A single encoded value within a buffer.
#[derive(Clone, Debug)]
pub struct Element {
    data: Bytes,
    header: Header,
    start: usize,
    content_start: usize,
    end: usize,
}

impl Element {
    pub fn header(&self) -> Header {
        self.header
    }

    pub fn tag(&self) -> Tag {
        self.header.tag()
    }

    pub fn is_constructed(&self) -> bool {
        self.header.is_constructed()
    }

    /// Returns the position of the first identifier octet.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Returns the position of the first content octet.
    pub fn content_start(&self) -> usize {
        self.content_start
    }

    /// Returns the position right after the last content octet.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Returns the complete encoding of the element.
    pub fn tlv(&self) -> Bytes {
        self.data.slice(self.start..self.end)
    }

    /// Returns the content octets.
    pub fn content(&self) -> Bytes {
        self.data.slice(self.content_start..self.end)
    }

    pub fn content_slice(&self) -> &[u8] {
        &self.data.as_ref()[self.content_start..self.end]
    }

    /// Returns a cursor over the content interpreted as elements.
    pub fn content_reader(&self) -> Constructed {
        Constructed::new(self.data.clone(), self.content_start, self.end)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::decode::ErrorKind;

    #[test]
    fn nested_positions() {
        let mut source = Constructed::from_bytes(Bytes::from_static(
            b"\x30\x06\x02\x01\x05\x04\x01\xff\x05\x00"
        ));
        let seq = source.take_element().unwrap();
        assert_eq!(seq.tag(), Tag::SEQUENCE);
        assert_eq!((seq.start(), seq.content_start(), seq.end()), (0, 2, 8));

        let mut inner = seq.content_reader();
        let int = inner.take_element().unwrap();
        assert_eq!(int.content_slice(), b"\x05");
        let octets = inner.peek().unwrap().unwrap();
        assert_eq!(octets.start(), 5);
        assert_eq!(octets.tlv().as_ref(), b"\x04\x01\xff");
        inner.skip(&octets);
        assert!(inner.take_opt_element().unwrap().is_none());
        assert!(inner.exhausted().is_ok());

        assert!(source.exhausted().is_err());
        assert_eq!(source.take_element().unwrap().tag(), Tag::NULL);
        assert_eq!(
            source.take_element().unwrap_err().kind(),
            ErrorKind::TruncatedInput
        );
    }

    #[test]
    fn content_past_parent() {
        // The inner length reaches beyond the end of the sequence.
        let mut source = Constructed::from_bytes(Bytes::from_static(
            b"\x30\x03\x04\x02\x00\x00"
        ));
        let seq = source.take_element().unwrap();
        let err = seq.content_reader().take_element().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedInput);
        assert_eq!(err.pos().offset(), 2);
    }
}
