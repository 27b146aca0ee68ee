//! Decoding data.
//!
//! Decoding is driven by a [`Schema`] describing the expected structure of
//! the data. The entry point is [`decode`] which checks that the data
//! contains exactly one complete value and returns it as a [`Value`].
//! Use [`decode_document`] if the value may be followed by other data.
//!
//! How open types are treated is determined by the [`DecodeOptions`]. A
//! shallow decode leaves all of them as raw octets while a deep decode
//! resolves them through a set of [`Registries`], recursively.
//!
//! Errors are reported as a [`DecodeError`] giving the kind of the
//! problem and the position in the data where the offending element
//! starts.

use std::sync::Arc;
use bytes::Bytes;
use crate::registry::{self, Registries};
use crate::schema::Schema;
use crate::value::Value;
use self::decoder::Decoder;

pub use self::error::{ContentError, DecodeError, ErrorKind, Pos};
pub use self::source::{Constructed, Element};

mod decoder;
mod error;
mod source;


//------------ DecodeOptions -------------------------------------------------

/// Options for a decoding run.
#[derive(Clone, Debug, Default)]
pub struct DecodeOptions {
    /// The registries to resolve open types with.
    ///
    /// If this is `None`, open types are not resolved.
    registries: Option<Arc<Registries>>,
}

impl DecodeOptions {
    /// Options leaving all open types as raw octets.
    pub fn shallow() -> Self {
        DecodeOptions { registries: None }
    }

    /// Options resolving open types through the given registries.
    pub fn deep(registries: Arc<Registries>) -> Self {
        DecodeOptions { registries: Some(registries) }
    }

    /// Options resolving open types through the process-wide registries.
    ///
    /// The options use the snapshot current at the time of the call.
    pub fn deep_global() -> Self {
        Self::deep(registry::global::snapshot())
    }

    pub fn registries(&self) -> Option<&Registries> {
        self.registries.as_deref()
    }

    pub fn is_deep(&self) -> bool {
        self.registries.is_some()
    }
}


//------------ Document ------------------------------------------------------

/// A value decoded from the start of a buffer.
#[derive(Clone, Debug)]
pub struct Document {
    /// The decoded value.
    pub value: Value,

    /// The number of octets the value occupied.
    pub consumed: usize,

    /// The data following the value.
    pub rest: Bytes,
}


//------------ Functions -----------------------------------------------------

/// Decodes a single value that must fill all of `data`.
pub fn decode(
    data: Bytes, schema: &Schema, options: &DecodeOptions
) -> Result<Value, DecodeError> {
    let document = decode_document(data, schema, options)?;
    if !document.rest.is_empty() {
        return Err(DecodeError::content("trailing data", document.consumed))
    }
    Ok(document.value)
}

/// Decodes a value from the start of `data`.
///
/// Returns the value together with whatever follows it.
pub fn decode_document(
    data: Bytes, schema: &Schema, options: &DecodeOptions
) -> Result<Document, DecodeError> {
    let mut source = Constructed::from_bytes(data.clone());
    let element = source.take_element()?;
    let value = Decoder::new(options).decode_element(&element, schema, None)?;
    Ok(Document {
        value,
        consumed: element.end(),
        rest: data.slice(element.end()..),
    })
}

/// Decodes a single value from a slice.
///
/// The data is copied into a new buffer first.
pub fn decode_slice(
    data: &[u8], schema: &Schema, options: &DecodeOptions
) -> Result<Value, DecodeError> {
    decode(Bytes::copy_from_slice(data), schema, options)
}


//============ Tests =========================================================
