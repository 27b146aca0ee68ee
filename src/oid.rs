//! ASN.1 Object Identifiers.
//!
//! This module contains the [`Oid`] type that implements object
//! identifiers, a construct used by ASN.1 to uniquely identify all sorts of
//! things. The type is also re-exported at the top-level.

use std::{error, fmt, hash};
use std::str::FromStr;
use bytes::{BufMut, Bytes, BytesMut};
use smallvec::SmallVec;
use crate::decode::ContentError;


//------------ Oid -----------------------------------------------------------

/// An object identifer.
///
/// Object identifiers are globally unique, hierarchical values that are
/// used to identify objects or their type. When written, they are
/// presented as a sequence of integers separated by dots such as
/// ‘1.3.6.1.5.5.7.1’.
///
/// Values of this type keep a single object identifer in its encoded form,
/// i.e., as the content octets of a DER encoded value. Because different
/// representations may be useful, the type is generic over something that
/// can become a reference to a bytes slice. Constants are defined as
/// `Oid<&'static [u8]>` or its type alias [`ConstOid`]. This is also the
/// reason why the wrapped value is `pub`.
///
/// A value created through [`Oid::from_content`], [`Oid::from_arcs`] or
/// parsing a string always has at least two arcs and a first arc of 0, 1,
/// or 2 since the first encoded subidentifier carries both of them.
#[derive(Clone)]
pub struct Oid<T: AsRef<[u8]> = Bytes>(pub T);

/// A type alias for `Oid<&'static [u8]>`.
///
/// This is useful when defining object identifier constants.
pub type ConstOid = Oid<&'static [u8]>;

/// The type of a single arc.
///
/// Arcs can be arbitrarily large in theory. We support the 128 bits
/// needed for UUID based identifiers under 2.25.
pub type OidArc = u128;


/// # Creation
///
impl Oid<Bytes> {
    /// Creates an object identifier from its content octets.
    ///
    /// Checks that the content is not empty, that no subidentifier starts
    /// with an 0x80 octet, that the last octet ends a subidentifier, and
    /// that each subidentifier fits into an [`OidArc`].
    pub fn from_content(content: Bytes) -> Result<Self, ContentError> {
        check_content(content.as_ref())?;
        Ok(Oid(content))
    }

    /// Creates an object identifier from a sequence of arcs.
    pub fn from_arcs(arcs: &[OidArc]) -> Result<Self, InvalidOid> {
        let (first, second) = match arcs {
            [first, second, ..] => (*first, *second),
            _ => return Err(InvalidOid("fewer than two arcs"))
        };
        if first > 2 {
            return Err(InvalidOid("first arc greater than 2"))
        }
        if first < 2 && second >= 40 {
            return Err(InvalidOid("second arc out of range"))
        }
        let head = match (first * 40).checked_add(second) {
            Some(head) => head,
            None => return Err(InvalidOid("second arc out of range"))
        };
        let mut res = BytesMut::new();
        append_subidentifier(head, &mut res);
        for arc in &arcs[2..] {
            append_subidentifier(*arc, &mut res);
        }
        Ok(Oid(res.freeze()))
    }
}

impl ConstOid {
    /// Converts a constant into an owned object identifier.
    pub fn to_owned_oid(&self) -> Oid {
        Oid(Bytes::from_static(self.0))
    }
}

impl<T: AsRef<[u8]>> Oid<T> {
    /// Returns an iterator over the arcs of the identifier.
    pub fn arcs(&self) -> Arcs {
        Arcs::new(self.0.as_ref())
    }

    /// Returns the content octets of the identifier.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }
}


//--- AsRef

impl<T: AsRef<[u8]>> AsRef<[u8]> for Oid<T> {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}


//--- From

impl From<ConstOid> for Oid {
    fn from(oid: ConstOid) -> Self {
        oid.to_owned_oid()
    }
}


//--- FromStr

impl FromStr for Oid {
    type Err = InvalidOid;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let arcs = s.split('.').map(|arc| {
            arc.parse::<OidArc>().map_err(|_| InvalidOid("invalid arc"))
        }).collect::<Result<SmallVec<[OidArc; 16]>, _>>()?;
        Oid::from_arcs(&arcs)
    }
}


//--- PartialEq and Eq

impl<T: AsRef<[u8]>, U: AsRef<[u8]>> PartialEq<Oid<U>> for Oid<T> {
    fn eq(&self, other: &Oid<U>) -> bool {
        self.0.as_ref() == other.0.as_ref()
    }
}

impl<T: AsRef<[u8]>> Eq for Oid<T> { }


//--- Hash

impl<T: AsRef<[u8]>> hash::Hash for Oid<T> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.0.as_ref().hash(state)
    }
}


//--- Display and Debug

impl<T: AsRef<[u8]>> fmt::Display for Oid<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut arcs = self.arcs();
        match arcs.next() {
            Some(arc) => write!(f, "{}", arc)?,
            None => return f.write_str("<empty>"),
        }
        for arc in arcs {
            write!(f, ".{}", arc)?;
        }
        Ok(())
    }
}

impl<T: AsRef<[u8]>> fmt::Debug for Oid<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Oid({})", self)
    }
}


//------------ Arcs ----------------------------------------------------------

/// An iterator over the arcs of an object identifier.
///
/// The first encoded subidentifier yields two arcs. Subidentifiers that
/// overflow an [`OidArc`] saturate, which can only happen for identifiers
/// that did not go through validation.
#[derive(Clone, Debug)]
pub struct Arcs<'a> {
    slice: &'a [u8],
    pending: Option<OidArc>,
    first: bool,
}

impl<'a> Arcs<'a> {
    fn new(slice: &'a [u8]) -> Self {
        Arcs { slice, pending: None, first: true }
    }

    fn take_subidentifier(&mut self) -> Option<OidArc> {
        if self.slice.is_empty() {
            return None
        }
        let mut res: OidArc = 0;
        let mut idx = 0;
        while let Some(octet) = self.slice.get(idx) {
            res = res.saturating_mul(0x80) | OidArc::from(octet & 0x7F);
            idx += 1;
            if octet & 0x80 == 0 {
                break
            }
        }
        self.slice = &self.slice[idx..];
        Some(res)
    }
}

impl<'a> Iterator for Arcs<'a> {
    type Item = OidArc;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(pending) = self.pending.take() {
            return Some(pending)
        }
        let sub = self.take_subidentifier()?;
        if self.first {
            self.first = false;
            let (first, second) = match sub {
                0..=39 => (0, sub),
                40..=79 => (1, sub - 40),
                _ => (2, sub - 80),
            };
            self.pending = Some(second);
            Some(first)
        }
        else {
            Some(sub)
        }
    }
}


//------------ InvalidOid ----------------------------------------------------

/// A sequence of arcs or a string did not describe a valid identifier.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct InvalidOid(&'static str);

impl fmt::Display for InvalidOid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid object identifier: {}", self.0)
    }
}

impl error::Error for InvalidOid { }


//------------ Helpers -------------------------------------------------------

/// Checks the content octets of an object identifier.
fn check_content(content: &[u8]) -> Result<(), ContentError> {
    if content.is_empty() {
        return Err("empty object identifier".into())
    }
    let mut start = true;
    let mut value: OidArc = 0;
    for &octet in content {
        if start && octet == 0x80 {
            return Err("non-minimal object identifier arc".into())
        }
        if value >> (OidArc::BITS - 7) != 0 {
            return Err("excessive object identifier arc".into())
        }
        value = (value << 7) | OidArc::from(octet & 0x7F);
        start = octet & 0x80 == 0;
        if start {
            value = 0
        }
    }
    if !start {
        return Err("truncated object identifier arc".into())
    }
    Ok(())
}

/// Appends the base 128 encoding of a subidentifier.
fn append_subidentifier(value: OidArc, target: &mut BytesMut) {
    let bits = (OidArc::BITS - value.leading_zeros()).max(1);
    let len = bits.div_ceil(7);
    for i in (0..len).rev() {
        let mut octet = ((value >> (7 * i)) as u8) & 0x7F;
        if i > 0 {
            octet |= 0x80
        }
        target.put_u8(octet)
    }
}


//============ Tests =========================================================
