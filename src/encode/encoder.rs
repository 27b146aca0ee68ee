//! Encoding values guided by a schema.
//!
//! This is a private module. Its public items are re-exported by the parent.

use bytes::Bytes;
use crate::header::Header;
use crate::schema::{Carrier, Fields, Kind, OpenType, Schema, Tagging, Variants};
use crate::string::{
    BmpCharSet, CharSet, Ia5CharSet, PrintableCharSet, Utf8CharSet,
    VisibleCharSet,
};
use crate::tag::Tag;
use crate::time;
use crate::value::{Components, Value};
use super::canonical::{sort_set, sort_set_of};
use super::error::{EncodeError, ErrorKind};


//------------ Functions -----------------------------------------------------

/// Encodes a value using a schema.
///
/// The value is encoded in DER: SET and SET OF values are sorted and
/// components equal to their default value are left out.
pub fn encode(value: &Value, schema: &Schema) -> Result<Vec<u8>, EncodeError> {
    let mut target = Vec::new();
    encode_value(value, schema, &mut target)?;
    Ok(target)
}

/// Encodes a value into a bytes value.
pub fn encode_to_bytes(
    value: &Value, schema: &Schema
) -> Result<Bytes, EncodeError> {
    encode(value, schema).map(Bytes::from)
}


//------------ Values --------------------------------------------------------

/// Appends the encoding of a value including its tagging to `target`.
fn encode_value(
    value: &Value, schema: &Schema, target: &mut Vec<u8>
) -> Result<(), EncodeError> {
    match schema.tagging() {
        Tagging::Natural => encode_kind(value, schema.kind(), None, target),
        Tagging::Implicit(tag) => {
            encode_kind(value, schema.kind(), Some(tag), target)
        }
        Tagging::Explicit(tag) => {
            let mut content = Vec::new();
            encode_kind(value, schema.kind(), None, &mut content)?;
            Header::append_value(tag, true, &content, target);
            Ok(())
        }
    }
}

/// Appends the encoding of a value of the given kind to `target`.
///
/// If `tag` is given, it replaces the natural tag of the kind.
fn encode_kind(
    value: &Value, kind: &Kind, tag: Option<Tag>, target: &mut Vec<u8>
) -> Result<(), EncodeError> {
    let natural = |default: Tag| tag.unwrap_or(default);
    match (kind, value) {
        (Kind::Boolean, Value::Boolean(value)) => {
            let content = if *value { 0xFF } else { 0x00 };
            Header::append_value(
                natural(Tag::BOOLEAN), false, &[content], target
            );
        }
        (Kind::Integer, Value::Integer(value)) => {
            Header::append_value(
                natural(Tag::INTEGER), false, value.as_slice(), target
            );
        }
        (Kind::Enumerated, Value::Enumerated(value)) => {
            Header::append_value(
                natural(Tag::ENUMERATED), false, value.as_slice(), target
            );
        }
        (Kind::BitString, Value::BitString(value)) => {
            let mut content = Vec::with_capacity(value.content_len());
            value.append_content(&mut content);
            Header::append_value(
                natural(Tag::BIT_STRING), false, &content, target
            );
        }
        (Kind::OctetString, Value::OctetString(value)) => {
            Header::append_value(
                natural(Tag::OCTET_STRING), false, value, target
            );
        }
        (Kind::Null, Value::Null) => {
            Header::append_value(natural(Tag::NULL), false, b"", target);
        }
        (Kind::Oid, Value::Oid(value)) => {
            Header::append_value(
                natural(Tag::OID), false, value.as_slice(), target
            );
        }
        (Kind::Utf8String, Value::Utf8String(value)) => {
            encode_string::<Utf8CharSet>(value, tag, target)?
        }
        (Kind::PrintableString, Value::PrintableString(value)) => {
            encode_string::<PrintableCharSet>(value, tag, target)?
        }
        (Kind::Ia5String, Value::Ia5String(value)) => {
            encode_string::<Ia5CharSet>(value, tag, target)?
        }
        (Kind::VisibleString, Value::VisibleString(value)) => {
            encode_string::<VisibleCharSet>(value, tag, target)?
        }
        (Kind::BmpString, Value::BmpString(value)) => {
            encode_string::<BmpCharSet>(value, tag, target)?
        }
        (Kind::UtcTime, Value::UtcTime(value)) => {
            let content = time::utc_time_content(value).ok_or_else(|| {
                EncodeError::invalid("time not representable as UTCTime")
            })?;
            Header::append_value(
                natural(Tag::UTC_TIME), false, &content, target
            );
        }
        (Kind::GeneralizedTime, Value::GeneralizedTime(value)) => {
            let content = time::generalized_time_content(value).ok_or_else(
                || EncodeError::invalid(
                    "time not representable as GeneralizedTime"
                )
            )?;
            Header::append_value(
                natural(Tag::GENERALIZED_TIME), false, &content, target
            );
        }
        (Kind::Sequence(fields), Value::Sequence(components)) => {
            let elements = encode_components(components, fields)?;
            append_constructed(natural(Tag::SEQUENCE), &elements, target);
        }
        (Kind::Set(fields), Value::Set(components)) => {
            let mut elements = encode_components(components, fields)?;
            sort_set(&mut elements);
            append_constructed(natural(Tag::SET), &elements, target);
        }
        (Kind::SequenceOf(inner), Value::SequenceOf(values)) => {
            let elements = encode_elements(values, inner)?;
            append_constructed(natural(Tag::SEQUENCE), &elements, target);
        }
        (Kind::SetOf(inner), Value::SetOf(values)) => {
            let mut elements = encode_elements(values, inner)?;
            sort_set_of(&mut elements);
            append_constructed(natural(Tag::SET), &elements, target);
        }
        (Kind::Choice(variants), Value::Choice(choice)) => {
            encode_choice(choice.variant(), choice.value(), variants, target)?
        }
        (Kind::Any, Value::Any(value)) => {
            check_single_value(value)?;
            target.extend_from_slice(value);
        }
        (Kind::Any, Value::Open(open)) => {
            encode_value(open.value(), open.schema(), target)?
        }
        (Kind::OpenType(open), value) => {
            encode_open(value, open, tag, target)?
        }
        (kind, value) => {
            return Err(EncodeError::mismatch(kind.name(), value.kind_name()))
        }
    }
    Ok(())
}

/// Encodes the components of a SEQUENCE or SET in schema order.
///
/// Returns the encoded components followed by any extensions.
fn encode_components(
    components: &Components, fields: &Fields
) -> Result<Vec<Vec<u8>>, EncodeError> {
    if let Some((name, _)) = components.iter().find(|(name, _)| {
        fields.get(name).is_none()
    }) {
        return Err(EncodeError::new(
            ErrorKind::UnknownField, format!("unknown component '{}'", name)
        ))
    }
    let mut res = Vec::with_capacity(fields.len());
    for field in fields.iter() {
        let value = match components.get(field.name()) {
            Some(value) => value,
            None => {
                if field.is_required() {
                    return Err(EncodeError::new(
                        ErrorKind::MissingField,
                        format!("missing component '{}'", field.name())
                    ))
                }
                continue
            }
        };
        if field.default_value() == Some(value) {
            continue
        }
        let mut element = Vec::new();
        encode_value(value, field.schema(), &mut element).map_err(|err| {
            err.in_field(field.name())
        })?;
        res.push(element);
    }
    if !components.extensions().is_empty() {
        if !fields.is_extensible() {
            return Err(EncodeError::invalid(
                "extension elements for non-extensible type"
            ))
        }
        for element in components.extensions() {
            check_single_value(element)?;
            res.push(element.to_vec());
        }
    }
    Ok(res)
}

/// Encodes the elements of a SEQUENCE OF or SET OF.
fn encode_elements(
    values: &[Value], inner: &Schema
) -> Result<Vec<Vec<u8>>, EncodeError> {
    values.iter().map(|value| {
        let mut element = Vec::new();
        encode_value(value, inner, &mut element)?;
        Ok(element)
    }).collect()
}

/// Encodes the chosen alternative of a CHOICE.
fn encode_choice(
    name: &str, value: &Value, variants: &Variants, target: &mut Vec<u8>
) -> Result<(), EncodeError> {
    let variant = match variants.get(name) {
        Some(variant) => variant,
        None => {
            return Err(EncodeError::new(
                ErrorKind::UnknownVariant,
                format!("unknown alternative '{}'", name)
            ))
        }
    };
    encode_value(value, variant.schema(), target).map_err(|err| {
        err.in_field(name)
    })
}

/// Encodes the value of an open type.
///
/// Resolved values are encoded with the schema they were decoded with.
/// Unresolved values are written as they are.
fn encode_open(
    value: &Value, open: &OpenType, tag: Option<Tag>, target: &mut Vec<u8>
) -> Result<(), EncodeError> {
    match (open.carrier(), value) {
        (Carrier::Any, Value::Open(value)) => {
            encode_value(value.value(), value.schema(), target)
        }
        (Carrier::Any, Value::Any(value)) => {
            check_single_value(value)?;
            target.extend_from_slice(value);
            Ok(())
        }
        (Carrier::OctetString, Value::Open(value)) => {
            let mut content = Vec::new();
            encode_value(value.value(), value.schema(), &mut content)?;
            Header::append_value(
                tag.unwrap_or(Tag::OCTET_STRING), false, &content, target
            );
            Ok(())
        }
        (Carrier::OctetString, Value::OctetString(value)) => {
            Header::append_value(
                tag.unwrap_or(Tag::OCTET_STRING), false, value, target
            );
            Ok(())
        }
        (Carrier::Any, value) => {
            Err(EncodeError::mismatch("ANY", value.kind_name()))
        }
        (Carrier::OctetString, value) => {
            Err(EncodeError::mismatch("OCTET STRING", value.kind_name()))
        }
    }
}


//------------ Helpers -------------------------------------------------------

/// Appends a constructed value with the given elements as its content.
fn append_constructed(tag: Tag, elements: &[Vec<u8>], target: &mut Vec<u8>) {
    let len = elements.iter().map(Vec::len).sum();
    Header::new(tag, true, len).append_encoded(target);
    for element in elements {
        target.extend_from_slice(element)
    }
}

/// Appends a restricted character string.
fn encode_string<C: CharSet>(
    value: &str, tag: Option<Tag>, target: &mut Vec<u8>
) -> Result<(), EncodeError> {
    let content = C::encode(value).map_err(|err| {
        EncodeError::invalid(err.to_string())
    })?;
    Header::append_value(tag.unwrap_or(C::TAG), false, &content, target);
    Ok(())
}

/// Checks that raw octets contain exactly one encoded value.
fn check_single_value(data: &[u8]) -> Result<(), EncodeError> {
    match Header::take_from(data, 0) {
        Ok((header, start)) if start + header.content_len() == data.len() => {
            Ok(())
        }
        _ => Err(EncodeError::invalid("raw value is not a single element"))
    }
}


//============ Tests =========================================================
