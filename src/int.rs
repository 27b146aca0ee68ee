//! DER encoded integers.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use bytes::Bytes;
use crate::decode::ContentError;


//------------ Integer -------------------------------------------------------

/// A DER encoded integer of arbitrary size.
///
/// As integers are variable length, this type is a simple wrapper atop
/// the underlying `Bytes` value containing the content octets. Because a
/// value can only be created with the minimal encoding, two integers are
/// equal if and only if their content octets are.
///
/// Values are also used for the ENUMERATED type which shares the encoding.
///
/// # Encoding
///
/// An INTEGER is encoded as a primitive value with the content octets
/// providing a variable-length, big-endian, two‘s complement byte sequence
/// of that integer. Thus, the most-significant bit of the first octet
/// serves as the sign bit. DER requires the shortest such sequence: the
/// first nine bits of the content must not all be the same.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct Integer(Bytes);

impl Integer {
    /// Creates an integer from its content octets.
    ///
    /// Fails if the content is empty or not minimal.
    pub fn from_content(content: Bytes) -> Result<Self, ContentError> {
        Self::check_head(content.as_ref())?;
        Ok(Integer(content))
    }

    /// Checks that an integer is started correctly.
    ///
    /// Specifically, checks that there is at least one octet and that the
    /// first nine bits of a multi-octet integer are not all the same.
    ///
    /// The latter ensures that an integer is encoded in the smallest
    /// possible number of octets. If we insist on this rule, we can use the
    /// content octets as the value for large integers and simply compare
    /// slices for comparision.
    fn check_head(content: &[u8]) -> Result<(), ContentError> {
        match (content.first(), content.get(1).map(|x| x & 0x80 != 0)) {
            (None, _) => Err("empty integer".into()),
            (Some(0), Some(false)) | (Some(0xFF), Some(true)) => {
                Err("non-minimal integer".into())
            }
            _ => Ok(())
        }
    }

    /// Creates an integer from a big-endian two’s complement slice.
    ///
    /// Superfluous leading octets are removed.
    fn from_twos_complement(octets: &[u8]) -> Self {
        let mut start = 0;
        while start + 1 < octets.len() {
            let redundant = match octets[start] {
                0x00 => octets[start + 1] & 0x80 == 0,
                0xFF => octets[start + 1] & 0x80 != 0,
                _ => false,
            };
            if !redundant {
                break
            }
            start += 1;
        }
        Integer(Bytes::copy_from_slice(&octets[start..]))
    }

    /// Returns the content octets.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Converts the integer into its content octets.
    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    /// Returns whether the integer is negative.
    pub fn is_negative(&self) -> bool {
        self.0.first().map(|x| x & 0x80 != 0).unwrap_or(false)
    }

    /// Returns the value as an `i128` if it fits.
    pub fn to_i128(&self) -> Option<i128> {
        if self.0.len() > 16 {
            return None
        }
        let fill = if self.is_negative() { 0xFF } else { 0 };
        let mut res = [fill; 16];
        res[16 - self.0.len()..].copy_from_slice(self.0.as_ref());
        Some(i128::from_be_bytes(res))
    }

    /// Returns the value as an `i64` if it fits.
    pub fn to_i64(&self) -> Option<i64> {
        self.to_i128().and_then(|x| i64::try_from(x).ok())
    }

    /// Returns the value as a `u64` if it fits.
    pub fn to_u64(&self) -> Option<u64> {
        self.to_i128().and_then(|x| u64::try_from(x).ok())
    }
}


//--- From

impl From<i128> for Integer {
    fn from(value: i128) -> Self {
        Self::from_twos_complement(&value.to_be_bytes())
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Self::from_twos_complement(&value.to_be_bytes())
    }
}

impl From<i32> for Integer {
    fn from(value: i32) -> Self {
        Self::from_twos_complement(&value.to_be_bytes())
    }
}

impl From<u64> for Integer {
    fn from(value: u64) -> Self {
        Self::from(i128::from(value))
    }
}

impl From<u32> for Integer {
    fn from(value: u32) -> Self {
        Self::from(i64::from(value))
    }
}


//--- Display and Debug

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.to_i128() {
            Some(value) => write!(f, "{}", value),
            None => {
                f.write_str("0x")?;
                for octet in self.0.iter() {
                    write!(f, "{:02X}", octet)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Debug for Integer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Integer({})", self)
    }
}


//============ Tests =========================================================
