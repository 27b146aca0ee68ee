//! Describing the structure of encoded values.
//!
//! A [`Schema`] describes how one value is encoded: which kind of value it
//! is, i.e., a primitive type, one of the constructed types SEQUENCE, SET,
//! SEQUENCE OF, SET OF, or CHOICE, an ANY value or an open type, and
//! whether the value’s natural tag is replaced or wrapped by a different
//! tag.
//!
//! Schemas are plain data. They are built through the constructor
//! functions and combinators on [`Schema`], [`Fields`], and [`Variants`]:
//!
//! ```
//! use derschema::{Fields, Schema};
//! use derschema::registry::ALGORITHM_IDENTIFIER_PARAMETERS;
//!
//! let algorithm_identifier = Schema::sequence(
//!     Fields::new()
//!         .required("algorithm", Schema::oid())
//!         .optional("parameters", Schema::open_type(
//!             "algorithm", ALGORITHM_IDENTIFIER_PARAMETERS
//!         ))
//! );
//! assert!(algorithm_identifier.check().is_ok());
//! ```

use std::{error, fmt};
use smallvec::{smallvec, SmallVec};
use crate::tag::Tag;
use crate::value::Value;


//------------ Schema --------------------------------------------------------

/// The description of how to decode and encode a value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Schema {
    tagging: Tagging,
    kind: Kind,
}

/// # Creation
///
impl Schema {
    /// Creates a naturally tagged schema for the given kind.
    pub fn new(kind: Kind) -> Self {
        Schema { tagging: Tagging::Natural, kind }
    }

    pub fn boolean() -> Self {
        Self::new(Kind::Boolean)
    }

    pub fn integer() -> Self {
        Self::new(Kind::Integer)
    }

    pub fn enumerated() -> Self {
        Self::new(Kind::Enumerated)
    }

    pub fn bit_string() -> Self {
        Self::new(Kind::BitString)
    }

    pub fn octet_string() -> Self {
        Self::new(Kind::OctetString)
    }

    pub fn null() -> Self {
        Self::new(Kind::Null)
    }

    pub fn oid() -> Self {
        Self::new(Kind::Oid)
    }

    pub fn utf8_string() -> Self {
        Self::new(Kind::Utf8String)
    }

    pub fn printable_string() -> Self {
        Self::new(Kind::PrintableString)
    }

    pub fn ia5_string() -> Self {
        Self::new(Kind::Ia5String)
    }

    pub fn visible_string() -> Self {
        Self::new(Kind::VisibleString)
    }

    pub fn bmp_string() -> Self {
        Self::new(Kind::BmpString)
    }

    pub fn utc_time() -> Self {
        Self::new(Kind::UtcTime)
    }

    pub fn generalized_time() -> Self {
        Self::new(Kind::GeneralizedTime)
    }

    /// Creates the schema of a SEQUENCE with the given components.
    pub fn sequence(fields: Fields) -> Self {
        Self::new(Kind::Sequence(fields))
    }

    /// Creates the schema of a SET with the given components.
    pub fn set(fields: Fields) -> Self {
        Self::new(Kind::Set(fields))
    }

    pub fn sequence_of(element: Schema) -> Self {
        Self::new(Kind::SequenceOf(Box::new(element)))
    }

    pub fn set_of(element: Schema) -> Self {
        Self::new(Kind::SetOf(Box::new(element)))
    }

    pub fn choice(variants: Variants) -> Self {
        Self::new(Kind::Choice(variants))
    }

    /// Creates the schema for a value of any type kept as raw octets.
    pub fn any() -> Self {
        Self::new(Kind::Any)
    }

    /// Creates the schema of an open type carried as an ANY value.
    ///
    /// The actual type of the value is determined by looking up the value
    /// of the sibling component `governing` in the registry `registry`.
    pub fn open_type(
        governing: impl Into<String>, registry: impl Into<String>
    ) -> Self {
        Self::new(Kind::OpenType(OpenType {
            governing: governing.into(),
            registry: registry.into(),
            carrier: Carrier::Any,
        }))
    }

    /// Creates the schema of an open type wrapped in an OCTET STRING.
    ///
    /// This is what certificate extensions and encapsulated CMS content
    /// use.
    pub fn open_octets(
        governing: impl Into<String>, registry: impl Into<String>
    ) -> Self {
        Self::new(Kind::OpenType(OpenType {
            governing: governing.into(),
            registry: registry.into(),
            carrier: Carrier::OctetString,
        }))
    }

    /// Replaces the tag of the value with `tag`.
    ///
    /// Since CHOICE and ANY values have no tag of their own that could be
    /// replaced, they are tagged explicitly instead (X.680, 31.2.7).
    /// Any previous tagging is replaced.
    pub fn implicit(self, tag: Tag) -> Self {
        let tagging = if self.kind.natural_tag().is_some() {
            Tagging::Implicit(tag)
        }
        else {
            Tagging::Explicit(tag)
        };
        Schema { tagging, kind: self.kind }
    }

    /// Wraps the value in a constructed value tagged with `tag`.
    ///
    /// Any previous tagging is replaced.
    pub fn explicit(self, tag: Tag) -> Self {
        Schema { tagging: Tagging::Explicit(tag), kind: self.kind }
    }
}

/// # Access to Properties
///
impl Schema {
    pub fn tagging(&self) -> Tagging {
        self.tagging
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Returns the tag of an encoded value if it is always the same.
    ///
    /// This is `None` for untagged CHOICE, ANY, and open type values.
    pub fn tag(&self) -> Option<Tag> {
        match self.tagging {
            Tagging::Explicit(tag) | Tagging::Implicit(tag) => Some(tag),
            Tagging::Natural => self.kind.natural_tag(),
        }
    }

    /// Returns whether a value with the given tag could be of this schema.
    ///
    /// This is what decides whether an optional component is present.
    pub fn matches(&self, tag: Tag) -> bool {
        match self.tagging {
            Tagging::Explicit(own) | Tagging::Implicit(own) => own == tag,
            Tagging::Natural => match self.kind {
                Kind::Choice(ref variants) => {
                    variants.iter().any(|item| item.schema.matches(tag))
                }
                ref kind => match kind.natural_tag() {
                    Some(own) => own == tag,
                    None => true,
                }
            }
        }
    }

    /// Returns the open types governed by the siblings of this schema.
    ///
    /// These are the open type itself, open types as elements of a
    /// SEQUENCE OF or SET OF, and open types among the alternatives of a
    /// CHOICE. Open types inside a SEQUENCE or SET are governed by their
    /// own siblings and are not included.
    pub fn open_types(&self) -> Vec<&OpenType> {
        let mut res = Vec::new();
        self.collect_open_types(&mut res);
        res
    }

    fn collect_open_types<'a>(&'a self, res: &mut Vec<&'a OpenType>) {
        match self.kind {
            Kind::OpenType(ref open) => res.push(open),
            Kind::SequenceOf(ref inner) | Kind::SetOf(ref inner) => {
                inner.collect_open_types(res)
            }
            Kind::Choice(ref variants) => {
                for item in variants.iter() {
                    item.schema.collect_open_types(res)
                }
            }
            _ => { }
        }
    }

    /// Returns the set of tags a value of this schema may start with.
    fn tag_set(&self) -> TagSet {
        match self.tagging {
            Tagging::Explicit(tag) | Tagging::Implicit(tag) => {
                TagSet::Tags(smallvec![tag])
            }
            Tagging::Natural => match self.kind {
                Kind::Choice(ref variants) => {
                    let mut res = TagSet::Tags(SmallVec::new());
                    for item in variants.iter() {
                        res.extend(item.schema.tag_set());
                    }
                    res
                }
                ref kind => match kind.natural_tag() {
                    Some(tag) => TagSet::Tags(smallvec![tag]),
                    None => TagSet::Any,
                }
            }
        }
    }
}

/// # Validation
///
impl Schema {
    /// Checks that the schema can be decoded unambiguously.
    ///
    /// Within a SEQUENCE, the tags of an optional component must differ
    /// from those of all following components up to and including the
    /// next required one. The components of a SET and the alternatives of
    /// a CHOICE must all have distinct tags. Every open type must name an
    /// earlier sibling component as its governing component.
    pub fn check(&self) -> Result<(), SchemaError> {
        match self.kind {
            Kind::Sequence(ref fields) => {
                fields.check_siblings()?;
                for (idx, field) in fields.iter().enumerate() {
                    if field.is_required() {
                        continue
                    }
                    let tags = field.schema.tag_set();
                    for later in fields.iter().skip(idx + 1) {
                        if tags.overlaps(&later.schema.tag_set()) {
                            return Err(SchemaError::ambiguous(
                                &field.name, &later.name
                            ))
                        }
                        if later.is_required() {
                            break
                        }
                    }
                }
                Ok(())
            }
            Kind::Set(ref fields) => {
                fields.check_siblings()?;
                for (idx, field) in fields.iter().enumerate() {
                    let tags = field.schema.tag_set();
                    for later in fields.iter().skip(idx + 1) {
                        if tags.overlaps(&later.schema.tag_set()) {
                            return Err(SchemaError::ambiguous(
                                &field.name, &later.name
                            ))
                        }
                    }
                }
                Ok(())
            }
            Kind::SequenceOf(ref inner) | Kind::SetOf(ref inner) => {
                inner.check()
            }
            Kind::Choice(ref variants) => {
                for (idx, item) in variants.iter().enumerate() {
                    item.schema.check()?;
                    let tags = item.schema.tag_set();
                    for later in variants.iter().skip(idx + 1) {
                        if tags.overlaps(&later.schema.tag_set()) {
                            return Err(SchemaError::ambiguous(
                                &item.name, &later.name
                            ))
                        }
                    }
                }
                Ok(())
            }
            _ => Ok(())
        }
    }
}


//------------ Tagging -------------------------------------------------------

/// How the tag of a value is derived.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Tagging {
    /// The value carries the natural tag of its kind.
    Natural,

    /// The natural tag of the value is replaced with the given tag.
    Implicit(Tag),

    /// The value is wrapped in a constructed value with the given tag.
    Explicit(Tag),
}


//------------ Kind ----------------------------------------------------------

/// The kind of a value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Kind {
    Boolean,
    Integer,
    Enumerated,
    BitString,
    OctetString,
    Null,
    Oid,
    Utf8String,
    PrintableString,
    Ia5String,
    VisibleString,
    BmpString,
    UtcTime,
    GeneralizedTime,

    /// A SEQUENCE with named components in the given order.
    Sequence(Fields),

    /// A SET with named components in any order.
    Set(Fields),

    SequenceOf(Box<Schema>),
    SetOf(Box<Schema>),

    /// A CHOICE between named alternatives.
    Choice(Variants),

    /// A value of any type kept as raw octets.
    Any,

    /// A value whose type depends on a sibling component.
    OpenType(OpenType),
}

impl Kind {
    /// Returns the universal tag of the kind.
    ///
    /// Returns `None` for CHOICE, ANY, and open types carried as ANY.
    pub fn natural_tag(&self) -> Option<Tag> {
        match *self {
            Kind::Boolean => Some(Tag::BOOLEAN),
            Kind::Integer => Some(Tag::INTEGER),
            Kind::Enumerated => Some(Tag::ENUMERATED),
            Kind::BitString => Some(Tag::BIT_STRING),
            Kind::OctetString => Some(Tag::OCTET_STRING),
            Kind::Null => Some(Tag::NULL),
            Kind::Oid => Some(Tag::OID),
            Kind::Utf8String => Some(Tag::UTF8_STRING),
            Kind::PrintableString => Some(Tag::PRINTABLE_STRING),
            Kind::Ia5String => Some(Tag::IA5_STRING),
            Kind::VisibleString => Some(Tag::VISIBLE_STRING),
            Kind::BmpString => Some(Tag::BMP_STRING),
            Kind::UtcTime => Some(Tag::UTC_TIME),
            Kind::GeneralizedTime => Some(Tag::GENERALIZED_TIME),
            Kind::Sequence(_) | Kind::SequenceOf(_) => Some(Tag::SEQUENCE),
            Kind::Set(_) | Kind::SetOf(_) => Some(Tag::SET),
            Kind::OpenType(ref open) => match open.carrier {
                Carrier::OctetString => Some(Tag::OCTET_STRING),
                Carrier::Any => None,
            },
            Kind::Choice(_) | Kind::Any => None,
        }
    }

    /// Returns whether values of this kind use constructed encoding.
    ///
    /// Returns `None` if this depends on the actual value.
    pub fn is_constructed(&self) -> Option<bool> {
        match *self {
            Kind::Sequence(_) | Kind::Set(_) |
            Kind::SequenceOf(_) | Kind::SetOf(_) => Some(true),
            Kind::Choice(_) | Kind::Any => None,
            Kind::OpenType(ref open) => match open.carrier {
                Carrier::OctetString => Some(false),
                Carrier::Any => None,
            },
            _ => Some(false)
        }
    }

    /// Returns a name of the kind for use in messages.
    pub fn name(&self) -> &'static str {
        match *self {
            Kind::Boolean => "BOOLEAN",
            Kind::Integer => "INTEGER",
            Kind::Enumerated => "ENUMERATED",
            Kind::BitString => "BIT STRING",
            Kind::OctetString => "OCTET STRING",
            Kind::Null => "NULL",
            Kind::Oid => "OBJECT IDENTIFIER",
            Kind::Utf8String => "UTF8String",
            Kind::PrintableString => "PrintableString",
            Kind::Ia5String => "IA5String",
            Kind::VisibleString => "VisibleString",
            Kind::BmpString => "BMPString",
            Kind::UtcTime => "UTCTime",
            Kind::GeneralizedTime => "GeneralizedTime",
            Kind::Sequence(_) => "SEQUENCE",
            Kind::Set(_) => "SET",
            Kind::SequenceOf(_) => "SEQUENCE OF",
            Kind::SetOf(_) => "SET OF",
            Kind::Choice(_) => "CHOICE",
            Kind::Any => "ANY",
            Kind::OpenType(_) => "open type",
        }
    }
}


//------------ OpenType ------------------------------------------------------

/// The description of an open type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OpenType {
    governing: String,
    registry: String,
    carrier: Carrier,
}

impl OpenType {
    /// Returns the name of the sibling component selecting the type.
    pub fn governing(&self) -> &str {
        &self.governing
    }

    /// Returns the name of the registry to look the type up in.
    pub fn registry(&self) -> &str {
        &self.registry
    }

    pub fn carrier(&self) -> Carrier {
        self.carrier
    }
}


//------------ Carrier -------------------------------------------------------

/// How the value of an open type is carried.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Carrier {
    /// The value is encoded directly in place of the component.
    Any,

    /// The encoded value is the content of an OCTET STRING.
    OctetString,
}


//------------ Fields --------------------------------------------------------

/// The components of a SEQUENCE or SET.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Fields {
    fields: Vec<Field>,
    extensible: bool,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a component that must be present.
    pub fn required(self, name: impl Into<String>, schema: Schema) -> Self {
        self.push(name.into(), schema, Presence::Required)
    }

    /// Adds a component that may be absent.
    pub fn optional(self, name: impl Into<String>, schema: Schema) -> Self {
        self.push(name.into(), schema, Presence::Optional)
    }

    /// Adds a component that takes the given value when absent.
    pub fn defaulted(
        self, name: impl Into<String>, schema: Schema, value: Value
    ) -> Self {
        self.push(name.into(), schema, Presence::Default(value))
    }

    /// Marks the type as extensible.
    ///
    /// Unknown trailing elements are then kept rather than rejected.
    pub fn extensible(mut self) -> Self {
        self.extensible = true;
        self
    }

    fn push(mut self, name: String, schema: Schema, presence: Presence) -> Self {
        self.fields.push(Field { name, schema, presence });
        self
    }

    pub fn is_extensible(&self) -> bool {
        self.extensible
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> + '_ {
        self.fields.iter()
    }

    /// Returns the component with the given name.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Checks the components themselves and their open types.
    fn check_siblings(&self) -> Result<(), SchemaError> {
        for (idx, field) in self.fields.iter().enumerate() {
            field.schema.check()?;
            if self.fields[..idx].iter().any(|prev| prev.name == field.name) {
                return Err(SchemaError(format!(
                    "duplicate component '{}'", field.name
                )))
            }
            for open in field.schema.open_types() {
                let known = self.fields[..idx].iter().any(|prev| {
                    prev.name == open.governing
                });
                if !known {
                    return Err(SchemaError(format!(
                        "open type '{}' not preceded by governing \
                         component '{}'",
                        field.name, open.governing
                    )))
                }
            }
        }
        Ok(())
    }
}


//------------ Field ---------------------------------------------------------

/// A named component of a SEQUENCE or SET.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Field {
    name: String,
    schema: Schema,
    presence: Presence,
}

impl Field {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn presence(&self) -> &Presence {
        &self.presence
    }

    pub fn is_required(&self) -> bool {
        matches!(self.presence, Presence::Required)
    }

    /// Returns the default value of the component if it has one.
    pub fn default_value(&self) -> Option<&Value> {
        match self.presence {
            Presence::Default(ref value) => Some(value),
            _ => None
        }
    }
}


//------------ Presence ------------------------------------------------------

/// Whether a component has to be present.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Presence {
    Required,
    Optional,

    /// The component has the given value if it is absent.
    Default(Value),
}


//------------ Variants ------------------------------------------------------

/// The alternatives of a CHOICE.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Variants {
    variants: Vec<Variant>,
}

impl Variants {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an alternative.
    pub fn variant(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.variants.push(Variant { name: name.into(), schema });
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variant> + '_ {
        self.variants.iter()
    }

    /// Returns the alternative with the given name.
    pub fn get(&self, name: &str) -> Option<&Variant> {
        self.variants.iter().find(|item| item.name == name)
    }

    /// Returns the first alternative matching a tag.
    pub fn find(&self, tag: Tag) -> Option<&Variant> {
        self.variants.iter().find(|item| item.schema.matches(tag))
    }
}


//------------ Variant -------------------------------------------------------

/// A named alternative of a CHOICE.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Variant {
    name: String,
    schema: Schema,
}

impl Variant {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}


//------------ TagSet --------------------------------------------------------

/// The tags a value may start with.
#[derive(Clone, Debug)]
enum TagSet {
    Any,
    Tags(SmallVec<[Tag; 4]>),
}

impl TagSet {
    fn extend(&mut self, other: TagSet) {
        match (self, other) {
            (TagSet::Any, _) => { }
            (this, TagSet::Any) => *this = TagSet::Any,
            (TagSet::Tags(ref mut tags), TagSet::Tags(other)) => {
                tags.extend(other)
            }
        }
    }

    fn overlaps(&self, other: &TagSet) -> bool {
        match (self, other) {
            (TagSet::Any, _) | (_, TagSet::Any) => true,
            (TagSet::Tags(left), TagSet::Tags(right)) => {
                left.iter().any(|tag| right.contains(tag))
            }
        }
    }
}


//------------ SchemaError ---------------------------------------------------

/// A schema cannot be used for decoding.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SchemaError(String);

impl SchemaError {
    fn ambiguous(left: &str, right: &str) -> Self {
        SchemaError(format!(
            "components '{}' and '{}' cannot be told apart by their tags",
            left, right
        ))
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl error::Error for SchemaError { }


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn implicit_choice_becomes_explicit() {
        let choice = Schema::choice(
            Variants::new().variant("a", Schema::null())
        ).implicit(Tag::CTX_0);
        assert_eq!(choice.tagging(), Tagging::Explicit(Tag::CTX_0));
        assert_eq!(
            Schema::any().implicit(Tag::CTX_1).tagging(),
            Tagging::Explicit(Tag::CTX_1)
        );
        assert_eq!(
            Schema::integer().implicit(Tag::CTX_1).tagging(),
            Tagging::Implicit(Tag::CTX_1)
        );
    }

    #[test]
    fn matches() {
        let time = Schema::choice(
            Variants::new()
                .variant("utcTime", Schema::utc_time())
                .variant("generalTime", Schema::generalized_time())
        );
        assert!(time.matches(Tag::UTC_TIME));
        assert!(time.matches(Tag::GENERALIZED_TIME));
        assert!(!time.matches(Tag::INTEGER));
        assert_eq!(time.tag(), None);

        assert!(Schema::any().matches(Tag::ctx(7)));
        assert!(Schema::open_type("a", "b").matches(Tag::SEQUENCE));
        assert!(Schema::open_octets("a", "b").matches(Tag::OCTET_STRING));
        assert!(!Schema::open_octets("a", "b").matches(Tag::SEQUENCE));
        assert!(Schema::integer().explicit(Tag::CTX_0).matches(Tag::CTX_0));
        assert!(!Schema::integer().explicit(Tag::CTX_0).matches(Tag::INTEGER));
    }

    #[test]
    fn check_sequence() {
        let good = Schema::sequence(
            Fields::new()
                .optional("a", Schema::integer().implicit(Tag::CTX_0))
                .optional("b", Schema::integer().implicit(Tag::CTX_1))
                .required("c", Schema::integer())
                .optional("d", Schema::integer())
        );
        assert!(good.check().is_ok());

        let clash = Schema::sequence(
            Fields::new()
                .optional("a", Schema::integer().implicit(Tag::CTX_0))
                .optional("b", Schema::boolean().implicit(Tag::CTX_0))
        );
        assert!(clash.check().is_err());

        let clash_required = Schema::sequence(
            Fields::new()
                .optional("a", Schema::integer())
                .required("b", Schema::integer())
        );
        assert!(clash_required.check().is_err());

        let any = Schema::sequence(
            Fields::new()
                .optional("a", Schema::any())
                .required("b", Schema::integer())
        );
        assert!(any.check().is_err());

        let nested = Schema::sequence_of(clash);
        assert!(nested.check().is_err());
    }

    #[test]
    fn check_set_and_choice() {
        assert!(Schema::set(
            Fields::new()
                .required("a", Schema::integer())
                .required("b", Schema::integer())
        ).check().is_err());
        assert!(Schema::set(
            Fields::new()
                .required("a", Schema::integer())
                .required("b", Schema::boolean())
        ).check().is_ok());
        assert!(Schema::choice(
            Variants::new()
                .variant("a", Schema::integer())
                .variant("b", Schema::any())
        ).check().is_err());
    }

    #[test]
    fn check_open_type() {
        assert!(Schema::sequence(
            Fields::new()
                .required("type", Schema::oid())
                .required("value", Schema::open_type("kind", "registry"))
        ).check().is_err());
        assert!(Schema::sequence(
            Fields::new()
                .required("type", Schema::oid())
                .required("values", Schema::set_of(
                    Schema::open_type("type", "registry")
                ))
        ).check().is_ok());
    }

    #[test]
    fn check_open_type_in_choice() {
        let choice = || Schema::choice(
            Variants::new()
                .variant("value", Schema::open_octets("type", "registry"))
                .variant("none", Schema::null())
        );
        assert!(Schema::sequence(
            Fields::new()
                .required("type", Schema::oid())
                .required("value", choice())
        ).check().is_ok());
        assert!(Schema::sequence(
            Fields::new()
                .required("value", choice())
                .required("type", Schema::oid())
        ).check().is_err());
    }
}
