//! Decoded values.
//!
//! Decoding data with a [`Schema`] results in a [`Value`], a tree that
//! mirrors the structure of the schema. Encoding goes the other way and
//! turns a value back into octets by walking it alongside the same schema.

use std::fmt;
use std::sync::Arc;
use bytes::Bytes;
use chrono::{DateTime, SecondsFormat, Utc};
use crate::int::Integer;
use crate::oid::Oid;
use crate::schema::Schema;
use crate::string::BitString;


//------------ Value ---------------------------------------------------------

/// A value of one of the supported types.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value {
    Boolean(bool),
    Integer(Integer),
    Enumerated(Integer),
    BitString(BitString),
    OctetString(Bytes),
    Null,
    Oid(Oid),
    Utf8String(String),
    PrintableString(String),
    Ia5String(String),
    VisibleString(String),
    BmpString(String),
    UtcTime(DateTime<Utc>),
    GeneralizedTime(DateTime<Utc>),

    /// The components of a SEQUENCE in schema order.
    Sequence(Components),

    /// The components of a SET in schema order.
    Set(Components),

    SequenceOf(Vec<Value>),
    SetOf(Vec<Value>),

    /// The alternative chosen for a CHOICE.
    Choice(Choice),

    /// A complete encoded value, header included.
    Any(Bytes),

    /// An open type value resolved through a registry.
    Open(Open),
}

impl Value {
    /// Creates a CHOICE value for the given alternative.
    pub fn choice(variant: impl Into<String>, value: Value) -> Self {
        Value::Choice(Choice::new(variant, value))
    }

    /// Returns the name of the variant for use in messages.
    pub fn kind_name(&self) -> &'static str {
        match *self {
            Value::Boolean(_) => "BOOLEAN",
            Value::Integer(_) => "INTEGER",
            Value::Enumerated(_) => "ENUMERATED",
            Value::BitString(_) => "BIT STRING",
            Value::OctetString(_) => "OCTET STRING",
            Value::Null => "NULL",
            Value::Oid(_) => "OBJECT IDENTIFIER",
            Value::Utf8String(_) => "UTF8String",
            Value::PrintableString(_) => "PrintableString",
            Value::Ia5String(_) => "IA5String",
            Value::VisibleString(_) => "VisibleString",
            Value::BmpString(_) => "BMPString",
            Value::UtcTime(_) => "UTCTime",
            Value::GeneralizedTime(_) => "GeneralizedTime",
            Value::Sequence(_) => "SEQUENCE",
            Value::Set(_) => "SET",
            Value::SequenceOf(_) => "SEQUENCE OF",
            Value::SetOf(_) => "SET OF",
            Value::Choice(_) => "CHOICE",
            Value::Any(_) => "ANY",
            Value::Open(_) => "open type",
        }
    }

    /// Returns the value with open types resolved to their inner value.
    pub fn resolved(&self) -> &Value {
        match *self {
            Value::Open(ref open) => open.value().resolved(),
            ref value => value,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self.resolved() {
            Value::Boolean(value) => Some(value),
            _ => None
        }
    }

    /// Returns the integer of an INTEGER or ENUMERATED value.
    pub fn as_integer(&self) -> Option<&Integer> {
        match *self.resolved() {
            Value::Integer(ref value) | Value::Enumerated(ref value) => {
                Some(value)
            }
            _ => None
        }
    }

    pub fn as_oid(&self) -> Option<&Oid> {
        match *self.resolved() {
            Value::Oid(ref value) => Some(value),
            _ => None
        }
    }

    pub fn as_bit_string(&self) -> Option<&BitString> {
        match *self.resolved() {
            Value::BitString(ref value) => Some(value),
            _ => None
        }
    }

    /// Returns the octets of an OCTET STRING or ANY value.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match *self.resolved() {
            Value::OctetString(ref value) | Value::Any(ref value) => {
                Some(value)
            }
            _ => None
        }
    }

    /// Returns the string of any of the character string types.
    pub fn as_str(&self) -> Option<&str> {
        match *self.resolved() {
            Value::Utf8String(ref value)
            | Value::PrintableString(ref value)
            | Value::Ia5String(ref value)
            | Value::VisibleString(ref value)
            | Value::BmpString(ref value) => Some(value),
            _ => None
        }
    }

    /// Returns the time of a UTCTime or GeneralizedTime value.
    pub fn as_time(&self) -> Option<DateTime<Utc>> {
        match *self.resolved() {
            Value::UtcTime(value) | Value::GeneralizedTime(value) => {
                Some(value)
            }
            _ => None
        }
    }

    /// Returns the components of a SEQUENCE or SET value.
    pub fn as_components(&self) -> Option<&Components> {
        match *self.resolved() {
            Value::Sequence(ref value) | Value::Set(ref value) => Some(value),
            _ => None
        }
    }

    /// Returns the elements of a SEQUENCE OF or SET OF value.
    pub fn as_elements(&self) -> Option<&[Value]> {
        match *self.resolved() {
            Value::SequenceOf(ref value) | Value::SetOf(ref value) => {
                Some(value)
            }
            _ => None
        }
    }

    pub fn as_choice(&self) -> Option<&Choice> {
        match *self.resolved() {
            Value::Choice(ref value) => Some(value),
            _ => None
        }
    }

    pub fn as_open(&self) -> Option<&Open> {
        match *self {
            Value::Open(ref value) => Some(value),
            _ => None
        }
    }

    /// Returns the component `name` of a SEQUENCE or SET value.
    ///
    /// For a CHOICE, the lookup happens in the chosen alternative.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match *self.resolved() {
            Value::Choice(ref choice) => choice.value().get(name),
            ref value => value.as_components()?.get(name),
        }
    }
}


//--- From

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<Integer> for Value {
    fn from(value: Integer) -> Self {
        Value::Integer(value)
    }
}

impl From<Oid> for Value {
    fn from(value: Oid) -> Self {
        Value::Oid(value)
    }
}

impl From<BitString> for Value {
    fn from(value: BitString) -> Self {
        Value::BitString(value)
    }
}


//--- Display

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

impl Value {
    fn fmt_indented(&self, f: &mut fmt::Formatter, indent: usize) -> fmt::Result {
        match *self {
            Value::Boolean(true) => f.write_str("TRUE"),
            Value::Boolean(false) => f.write_str("FALSE"),
            Value::Integer(ref value) | Value::Enumerated(ref value) => {
                write!(f, "{}", value)
            }
            Value::BitString(ref value) => {
                write_hex(f, value.octet_slice())?;
                if value.unused() != 0 {
                    write!(f, " (unused {})", value.unused())?;
                }
                Ok(())
            }
            Value::OctetString(ref value) => write_hex(f, value),
            Value::Null => f.write_str("NULL"),
            Value::Oid(ref value) => write!(f, "{}", value),
            Value::Utf8String(ref value)
            | Value::PrintableString(ref value)
            | Value::Ia5String(ref value)
            | Value::VisibleString(ref value)
            | Value::BmpString(ref value) => write!(f, "{:?}", value),
            Value::UtcTime(ref value) | Value::GeneralizedTime(ref value) => {
                f.write_str(
                    &value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
                )
            }
            Value::Sequence(ref value) => {
                f.write_str("SEQUENCE ")?;
                value.fmt_indented(f, indent)
            }
            Value::Set(ref value) => {
                f.write_str("SET ")?;
                value.fmt_indented(f, indent)
            }
            Value::SequenceOf(ref items) | Value::SetOf(ref items) => {
                if items.is_empty() {
                    return f.write_str("{ }")
                }
                f.write_str("{\n")?;
                for item in items {
                    write!(f, "{:width$}", "", width = indent + 2)?;
                    item.fmt_indented(f, indent + 2)?;
                    f.write_str("\n")?;
                }
                write!(f, "{:width$}}}", "", width = indent)
            }
            Value::Choice(ref value) => {
                write!(f, "{}: ", value.variant())?;
                value.value().fmt_indented(f, indent)
            }
            Value::Any(ref value) => {
                f.write_str("ANY ")?;
                write_hex(f, value)
            }
            Value::Open(ref value) => value.value().fmt_indented(f, indent),
        }
    }
}


//------------ Components ----------------------------------------------------

/// The named components of a SEQUENCE or SET value.
///
/// Absent optional components simply do not appear. After decoding,
/// absent components with a default value are present with that value.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Components {
    fields: Vec<(String, Value)>,
    extensions: Vec<Bytes>,
}

impl Components {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a component and returns the components.
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets the component `name`, returning its previous value.
    pub fn insert(
        &mut self, name: impl Into<String>, value: Value
    ) -> Option<Value> {
        let name = name.into();
        match self.get_mut(&name) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.fields.push((name, value));
                None
            }
        }
    }

    /// Removes the component `name`, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let idx = self.fields.iter().position(|item| item.0 == name)?;
        Some(self.fields.remove(idx).1)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|item| item.0 == name).map(|item| &item.1)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields.iter_mut().find(|item| item.0 == name).map(|item| {
            &mut item.1
        })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.fields.iter().map(|item| (item.0.as_str(), &item.1))
    }

    /// Returns the unknown trailing elements of an extensible type.
    ///
    /// Each element is kept in its complete encoding.
    pub fn extensions(&self) -> &[Bytes] {
        &self.extensions
    }

    pub fn push_extension(&mut self, element: Bytes) {
        self.extensions.push(element)
    }

    fn fmt_indented(
        &self, f: &mut fmt::Formatter, indent: usize
    ) -> fmt::Result {
        if self.fields.is_empty() && self.extensions.is_empty() {
            return f.write_str("{ }")
        }
        f.write_str("{\n")?;
        for (name, value) in &self.fields {
            write!(f, "{:width$}{} ", "", name, width = indent + 2)?;
            value.fmt_indented(f, indent + 2)?;
            f.write_str("\n")?;
        }
        for item in &self.extensions {
            write!(f, "{:width$}... ", "", width = indent + 2)?;
            write_hex(f, item)?;
            f.write_str("\n")?;
        }
        write!(f, "{:width$}}}", "", width = indent)
    }
}


//------------ Choice --------------------------------------------------------

/// The chosen alternative of a CHOICE value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Choice {
    variant: String,
    value: Box<Value>,
}

impl Choice {
    pub fn new(variant: impl Into<String>, value: Value) -> Self {
        Choice { variant: variant.into(), value: Box::new(value) }
    }

    /// Returns the name of the chosen alternative.
    pub fn variant(&self) -> &str {
        &self.variant
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        *self.value
    }
}


//------------ Open ----------------------------------------------------------

/// An open type value together with the schema it was decoded with.
///
/// Keeping the schema allows encoding the value again without consulting
/// a registry.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Open {
    schema: Arc<Schema>,
    value: Box<Value>,
}

impl Open {
    pub fn new(schema: impl Into<Arc<Schema>>, value: Value) -> Self {
        Open { schema: schema.into(), value: Box::new(value) }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        *self.value
    }
}


//------------ Helpers -------------------------------------------------------

fn write_hex(f: &mut fmt::Formatter, octets: &[u8]) -> fmt::Result {
    f.write_str("'")?;
    for octet in octets {
        write!(f, "{:02X}", octet)?;
    }
    f.write_str("'H")
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn components() {
        let mut comps = Components::new()
            .with("version", Value::Integer(1.into()))
            .with("critical", Value::Boolean(false));
        assert_eq!(comps.len(), 2);
        assert_eq!(
            comps.insert("critical", Value::Boolean(true)),
            Some(Value::Boolean(false))
        );
        assert_eq!(comps.get("critical"), Some(&Value::Boolean(true)));
        assert_eq!(comps.remove("version"), Some(Value::Integer(1.into())));
        assert_eq!(comps.remove("version"), None);
        assert_eq!(
            comps.iter().map(|item| item.0).collect::<Vec<_>>(),
            vec!["critical"]
        );
    }

    #[test]
    fn accessors() {
        let oid = Oid::from_str("2.5.29.19").unwrap();
        let value = Value::Open(Open::new(
            Schema::sequence(Default::default()),
            Value::Sequence(
                Components::new().with("extnID", Value::Oid(oid.clone()))
            )
        ));
        assert_eq!(value.get("extnID").and_then(Value::as_oid), Some(&oid));
        assert!(value.as_open().is_some());
        assert!(value.as_bool().is_none());

        let choice = Value::choice("utf8", Value::Utf8String("x".into()));
        assert_eq!(choice.as_choice().unwrap().value().as_str(), Some("x"));
    }

    #[test]
    fn display() {
        let value = Value::Sequence(
            Components::new()
                .with("algorithm", Value::Oid(
                    Oid::from_str("1.2.840.113549.1.1.1").unwrap()
                ))
                .with("parameters", Value::Null)
                .with("names", Value::SequenceOf(vec![
                    Value::PrintableString("CA".into())
                ]))
        );
        assert_eq!(
            value.to_string(),
            "SEQUENCE {\n  algorithm 1.2.840.113549.1.1.1\n  \
             parameters NULL\n  names {\n    \"CA\"\n  }\n}"
        );
        assert_eq!(
            Value::OctetString(Bytes::from_static(b"\x01\xab")).to_string(),
            "'01AB'H"
        );
    }
}
