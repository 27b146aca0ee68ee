//! Schema-driven handling of data in Distinguished Encoding Rules.
//!
//! This crate decodes and encodes values in DER, the distinguished
//! flavour of the Basic Encoding Rules defined in ITU recommendation
//! X.690. Rather than having a type for every ASN.1 type, the structure of
//! the data is described at runtime by a [`Schema`] and decoded into a
//! generic [`Value`].
//!
//! Open types, i.e., values whose type depends on an object identifier in
//! a sibling component, can be resolved during decoding through a set of
//! [`Registries`]. The [`catalog`] module provides schemas and registry
//! entries for a number of commonly used RFCs.
//!
//! Decoding is strict about the encoding of each element: lengths,
//! integers, and object identifiers must be minimal and indefinite lengths
//! are rejected. It does accept two things DER doesn’t allow, so that such
//! data can be brought into canonical form: components present with their
//! default value and SET or SET OF elements in any order. Encoding always
//! produces DER, in particular it sorts SET and SET OF values and leaves
//! out components equal to their default. [`canonicalize`] re-encodes
//! data that way.
//!
//! The modules [`tag`], [`length`], [`int`], [`oid`], [`string`], and
//! [`time`] provide the building blocks for the primitive types.

pub use self::decode::{decode, DecodeError, DecodeOptions};
pub use self::encode::{canonicalize, encode, EncodeError};
pub use self::header::Header;
pub use self::int::Integer;
pub use self::length::Length;
pub use self::oid::{ConstOid, Oid};
pub use self::registry::{Registries, Registry};
pub use self::schema::{Fields, Schema, Variants};
pub use self::string::BitString;
pub use self::tag::{Class, Tag};
pub use self::value::{Components, Value};

pub mod catalog;
pub mod decode;
pub mod encode;
pub mod header;
pub mod int;
pub mod length;
pub mod oid;
pub mod registry;
pub mod schema;
pub mod string;
pub mod tag;
pub mod time;
pub mod value;
