//! Decoding elements into values guided by a schema.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::cell::Cell;
use std::sync::Arc;
use crate::int::Integer;
use crate::oid::Oid;
use crate::schema::{Carrier, Fields, Kind, OpenType, Schema, Tagging, Variants};
use crate::string::{
    BitString, BmpCharSet, CharSet, Ia5CharSet, PrintableCharSet, Utf8CharSet,
    VisibleCharSet,
};
use crate::tag::Tag;
use crate::time;
use crate::value::{Components, Open, Value};
use super::DecodeOptions;
use super::error::{ContentError, DecodeError, ErrorKind};
use super::source::Element;


//------------ Decoder -------------------------------------------------------

/// The maximum nesting of resolved open types.
///
/// Open types can contain themselves, e.g., signed data inside signed
/// data, so the input rather than the schema decides the depth.
const MAX_OPEN_DEPTH: usize = 32;

/// A single decoding run.
pub struct Decoder<'a> {
    options: &'a DecodeOptions,
    depth: Cell<usize>,
}

impl<'a> Decoder<'a> {
    pub fn new(options: &'a DecodeOptions) -> Self {
        Decoder { options, depth: Cell::new(0) }
    }

    /// Decodes a complete element including its tagging.
    ///
    /// `siblings` are the components decoded so far if the element is a
    /// component of a SEQUENCE or SET. They provide the governing values
    /// for open types.
    pub fn decode_element(
        &self,
        element: &Element,
        schema: &Schema,
        siblings: Option<&Components>,
    ) -> Result<Value, DecodeError> {
        match schema.tagging() {
            Tagging::Natural => {
                self.decode_natural(element, schema.kind(), siblings)
            }
            Tagging::Implicit(tag) => {
                check_tag(element, tag)?;
                self.decode_kind(element, schema.kind(), siblings)
            }
            Tagging::Explicit(tag) => {
                check_tag(element, tag)?;
                if !element.is_constructed() {
                    return Err(DecodeError::content(
                        "primitive encoding of explicitly tagged value",
                        element.start()
                    ))
                }
                let mut content = element.content_reader();
                let inner = match content.take_opt_element()? {
                    Some(inner) => inner,
                    None => {
                        return Err(DecodeError::content(
                            "empty explicitly tagged value", element.start()
                        ))
                    }
                };
                content.exhausted()?;
                self.decode_natural(&inner, schema.kind(), siblings)
            }
        }
    }

    /// Decodes an element that carries the natural tag of its kind.
    fn decode_natural(
        &self,
        element: &Element,
        kind: &Kind,
        siblings: Option<&Components>,
    ) -> Result<Value, DecodeError> {
        if let Some(tag) = kind.natural_tag() {
            check_tag(element, tag)?;
        }
        self.decode_kind(element, kind, siblings)
    }

    /// Decodes the content of an element whose tag has been checked.
    fn decode_kind(
        &self,
        element: &Element,
        kind: &Kind,
        siblings: Option<&Components>,
    ) -> Result<Value, DecodeError> {
        match kind.is_constructed() {
            Some(true) if !element.is_constructed() => {
                return Err(DecodeError::content(
                    format!("primitive encoding of {}", kind.name()),
                    element.start()
                ))
            }
            Some(false) if element.is_constructed() => {
                return Err(DecodeError::content(
                    format!("constructed encoding of {}", kind.name()),
                    element.start()
                ))
            }
            _ => { }
        }
        let at = |err: ContentError| err.at(element.start());
        match *kind {
            Kind::Boolean => {
                match element.content_slice() {
                    [0] => Ok(Value::Boolean(false)),
                    [0xFF] => Ok(Value::Boolean(true)),
                    [_] => Err(DecodeError::content(
                        "invalid boolean", element.start()
                    )),
                    _ => Err(DecodeError::content(
                        "invalid boolean length", element.start()
                    )),
                }
            }
            Kind::Integer => {
                Integer::from_content(element.content()).map(Value::Integer)
                    .map_err(at)
            }
            Kind::Enumerated => {
                Integer::from_content(element.content())
                    .map(Value::Enumerated).map_err(at)
            }
            Kind::BitString => {
                BitString::from_content(element.content())
                    .map(Value::BitString).map_err(at)
            }
            Kind::OctetString => Ok(Value::OctetString(element.content())),
            Kind::Null => {
                if element.content_slice().is_empty() {
                    Ok(Value::Null)
                }
                else {
                    Err(DecodeError::content(
                        "invalid NULL value", element.start()
                    ))
                }
            }
            Kind::Oid => {
                Oid::from_content(element.content()).map(Value::Oid)
                    .map_err(at)
            }
            Kind::Utf8String => {
                decode_string::<Utf8CharSet>(element).map(Value::Utf8String)
            }
            Kind::PrintableString => {
                decode_string::<PrintableCharSet>(element)
                    .map(Value::PrintableString)
            }
            Kind::Ia5String => {
                decode_string::<Ia5CharSet>(element).map(Value::Ia5String)
            }
            Kind::VisibleString => {
                decode_string::<VisibleCharSet>(element)
                    .map(Value::VisibleString)
            }
            Kind::BmpString => {
                decode_string::<BmpCharSet>(element).map(Value::BmpString)
            }
            Kind::UtcTime => {
                time::utc_time_from_content(element.content_slice())
                    .map(Value::UtcTime).map_err(at)
            }
            Kind::GeneralizedTime => {
                time::generalized_time_from_content(element.content_slice())
                    .map(Value::GeneralizedTime).map_err(at)
            }
            Kind::Sequence(ref fields) => {
                self.decode_sequence(element, fields).map(Value::Sequence)
            }
            Kind::Set(ref fields) => {
                self.decode_set(element, fields).map(Value::Set)
            }
            Kind::SequenceOf(ref inner) => {
                self.decode_elements(element, inner, siblings)
                    .map(Value::SequenceOf)
            }
            Kind::SetOf(ref inner) => {
                self.decode_elements(element, inner, siblings)
                    .map(Value::SetOf)
            }
            Kind::Choice(ref variants) => {
                self.decode_choice(element, variants, siblings)
            }
            Kind::Any => Ok(Value::Any(element.tlv())),
            Kind::OpenType(ref open) => {
                self.decode_open(element, open, siblings)
            }
        }
    }

    /// Decodes the components of a SEQUENCE.
    ///
    /// Components are matched strictly left to right with a lookahead of
    /// a single element.
    fn decode_sequence(
        &self, element: &Element, fields: &Fields
    ) -> Result<Components, DecodeError> {
        let mut source = element.content_reader();
        let mut res = Components::new();
        for (idx, field) in fields.iter().enumerate() {
            let next = match source.peek()? {
                Some(next) if field.schema().matches(next.tag()) => next,
                Some(next) => {
                    if field.is_required() {
                        return Err(DecodeError::new(
                            ErrorKind::TagMismatch,
                            format!(
                                "unexpected {} for component '{}'",
                                next.tag(), field.name()
                            ),
                            next.start()
                        ))
                    }
                    if let Some(value) = field.default_value() {
                        res.insert(field.name(), value.clone());
                    }
                    continue
                }
                None => {
                    if field.is_required() {
                        return Err(DecodeError::new(
                            ErrorKind::MissingField,
                            format!("missing component '{}'", field.name()),
                            source.pos()
                        ))
                    }
                    if let Some(value) = field.default_value() {
                        res.insert(field.name(), value.clone());
                    }
                    continue
                }
            };
            if !field.is_required() {
                let later = fields.iter().skip(idx + 1);
                for other in later {
                    if other.schema().matches(next.tag()) {
                        return Err(DecodeError::content(
                            format!(
                                "element could be component '{}' or '{}'",
                                field.name(), other.name()
                            ),
                            next.start()
                        ))
                    }
                    if other.is_required() {
                        break
                    }
                }
            }
            source.skip(&next);
            let value = self.decode_element(&next, field.schema(), Some(&res))?;
            res.insert(field.name(), value);
        }
        while let Some(next) = source.take_opt_element()? {
            if !fields.is_extensible() {
                return Err(DecodeError::content(
                    "unexpected trailing element", next.start()
                ))
            }
            res.push_extension(next.tlv());
        }
        Ok(res)
    }

    /// Decodes the components of a SET.
    ///
    /// Components may appear in any order. They are assigned by tag
    /// first and then decoded in schema order.
    fn decode_set(
        &self, element: &Element, fields: &Fields
    ) -> Result<Components, DecodeError> {
        let mut source = element.content_reader();
        let mut slots: Vec<Option<Element>> = fields.iter().map(|_| None)
            .collect();
        let mut res = Components::new();
        while let Some(next) = source.take_opt_element()? {
            let idx = fields.iter().position(|field| {
                field.schema().matches(next.tag())
            });
            match idx {
                Some(idx) => {
                    if slots[idx].is_some() {
                        return Err(DecodeError::content(
                            "duplicate component in SET", next.start()
                        ))
                    }
                    slots[idx] = Some(next);
                }
                None if fields.is_extensible() => {
                    res.push_extension(next.tlv())
                }
                None => {
                    return Err(DecodeError::new(
                        ErrorKind::TagMismatch,
                        format!("unexpected {} in SET", next.tag()),
                        next.start()
                    ))
                }
            }
        }
        for (field, slot) in fields.iter().zip(slots) {
            match slot {
                Some(next) => {
                    let value = self.decode_element(
                        &next, field.schema(), Some(&res)
                    )?;
                    res.insert(field.name(), value);
                }
                None => {
                    if field.is_required() {
                        return Err(DecodeError::new(
                            ErrorKind::MissingField,
                            format!("missing component '{}'", field.name()),
                            element.start()
                        ))
                    }
                    if let Some(value) = field.default_value() {
                        res.insert(field.name(), value.clone());
                    }
                }
            }
        }
        Ok(res)
    }

    /// Decodes the elements of a SEQUENCE OF or SET OF.
    ///
    /// Elements of a SET OF are accepted in any order.
    fn decode_elements(
        &self,
        element: &Element,
        inner: &Schema,
        siblings: Option<&Components>,
    ) -> Result<Vec<Value>, DecodeError> {
        let mut source = element.content_reader();
        let mut res = Vec::new();
        while let Some(next) = source.take_opt_element()? {
            res.push(self.decode_element(&next, inner, siblings)?);
        }
        Ok(res)
    }

    /// Decodes a CHOICE by picking the first alternative matching the tag.
    ///
    /// The CHOICE takes the place of its alternative, so open type
    /// alternatives are governed by the siblings of the CHOICE.
    fn decode_choice(
        &self,
        element: &Element,
        variants: &Variants,
        siblings: Option<&Components>,
    ) -> Result<Value, DecodeError> {
        match variants.find(element.tag()) {
            Some(variant) => {
                let value = self.decode_element(
                    element, variant.schema(), siblings
                )?;
                Ok(Value::choice(variant.name(), value))
            }
            None => {
                Err(DecodeError::new(
                    ErrorKind::NoMatchingVariant,
                    format!("no alternative for {}", element.tag()),
                    element.start()
                ))
            }
        }
    }

    /// Decodes an open type.
    ///
    /// If the type can be resolved, the carried value is decoded with the
    /// registered schema. Otherwise it is kept as raw octets.
    fn decode_open(
        &self,
        element: &Element,
        open: &OpenType,
        siblings: Option<&Components>,
    ) -> Result<Value, DecodeError> {
        let schema = match self.resolve(open, siblings) {
            Some(schema) => schema,
            None => {
                return Ok(match open.carrier() {
                    Carrier::Any => Value::Any(element.tlv()),
                    Carrier::OctetString => {
                        Value::OctetString(element.content())
                    }
                })
            }
        };
        let depth = self.depth.get();
        if depth >= MAX_OPEN_DEPTH {
            return Err(DecodeError::content(
                "open types nested too deeply", element.start()
            ))
        }
        self.depth.set(depth + 1);
        let res = match open.carrier() {
            Carrier::Any => self.decode_element(element, &schema, None),
            Carrier::OctetString => {
                let mut content = element.content_reader();
                content.take_opt_element().and_then(|inner| {
                    let inner = inner.ok_or_else(|| {
                        DecodeError::content(
                            "empty open type value", element.start()
                        )
                    })?;
                    let value = self.decode_element(&inner, &schema, None)?;
                    content.exhausted()?;
                    Ok(value)
                })
            }
        };
        self.depth.set(depth);
        Ok(Value::Open(Open::new(schema, res?)))
    }

    /// Looks up the schema for an open type.
    ///
    /// Returns `None` for shallow decoding, if the governing component is
    /// absent or not an object identifier, or if nothing is registered.
    fn resolve(
        &self, open: &OpenType, siblings: Option<&Components>
    ) -> Option<Arc<Schema>> {
        let registries = self.options.registries()?;
        let governing = siblings?.get(open.governing())?.as_oid()?;
        registries.lookup(open.registry(), governing).cloned()
    }
}


//------------ Helpers -------------------------------------------------------

/// Checks that an element has the given tag.
fn check_tag(element: &Element, tag: Tag) -> Result<(), DecodeError> {
    if element.tag() == tag {
        Ok(())
    }
    else {
        Err(DecodeError::new(
            ErrorKind::TagMismatch,
            format!("expected {}, found {}", tag, element.tag()),
            element.start()
        ))
    }
}

/// Decodes the content of a restricted character string.
fn decode_string<C: CharSet>(element: &Element) -> Result<String, DecodeError> {
    C::decode(element.content_slice()).map_err(|err| {
        DecodeError::content(err.to_string(), element.start())
    })
}
