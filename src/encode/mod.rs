//! Encoding data in DER.
//!
//! Encoding walks a [`Value`] alongside the [`Schema`] it should be
//! encoded with and produces the distinguished encoding of the value. In
//! particular, the elements of SET OF values are sorted by their encoding,
//! the components of SET values by their tags, and components of a
//! SEQUENCE or SET that are absent or equal to their default value are
//! left out. Integers, lengths, and tags are always encoded minimally.
//!
//! The entry points are [`encode`] and [`encode_to_bytes`]. Data that is
//! already encoded can be brought into canonical form via
//! [`canonicalize`].
//!
//! [`Value`]: crate::Value
//! [`Schema`]: crate::Schema

pub use self::canonical::{canonicalize, sort_set, sort_set_of, Error};
pub use self::encoder::{encode, encode_to_bytes};
pub use self::error::{EncodeError, ErrorKind};

mod canonical;
mod encoder;
mod error;
