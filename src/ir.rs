// Strongly-typed schema IR. No serde_json::Value here.
//
// Built by `inference`, resolved by `lower::finalize`, ordered by
// `lower::sorted`, printed by `codegen`.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};
use crate::inference::ValueSet;

/// Leaf type names, spelled the way they appear in the rendered interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    String,
    Number,
    Boolean,
    Date,
    ObjectId,
    Any,
    Null,
    Undefined,
}

impl TypeTag {
    pub const ALL: [TypeTag; 8] = [
        TypeTag::String,
        TypeTag::Number,
        TypeTag::Boolean,
        TypeTag::Date,
        TypeTag::ObjectId,
        TypeTag::Any,
        TypeTag::Null,
        TypeTag::Undefined,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TypeTag::String => "string",
            TypeTag::Number => "number",
            TypeTag::Boolean => "boolean",
            TypeTag::Date => "Date",
            TypeTag::ObjectId => "ObjectId(string)",
            TypeTag::Any => "any",
            TypeTag::Null => "null",
            TypeTag::Undefined => "undefined",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.as_str() == name)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What was inferred for one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Descriptor {
    Primitive(TypeTag),
    /// Finalized literal union, e.g. `'on' | 'off'`.
    Union(Vec<String>),
    Nested(Schema),
    /// Arrays are homogeneous: exactly one element descriptor.
    ArrayOf(Box<Descriptor>),
    /// String values seen so far; resolved by `lower::finalize`.
    Pending(ValueSet),
}

impl Descriptor {
    pub fn object_id() -> Self {
        Descriptor::Primitive(TypeTag::ObjectId)
    }

    /// Short name for log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Descriptor::Primitive(tag) => tag.as_str(),
            Descriptor::Union(_) => "union",
            Descriptor::Nested(_) => "object",
            Descriptor::ArrayOf(_) => "array",
            Descriptor::Pending(_) => "pending",
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Descriptor::Pending(_))
    }
}

/// Field name → descriptor. Insertion ordered until `lower::sorted` runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    pub fields: IndexMap<String, Descriptor>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, ty: Descriptor) -> Option<Descriptor> {
        self.fields.insert(name.into(), ty)
    }

    pub fn get(&self, name: &str) -> Option<&Descriptor> {
        self.fields.get(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Descriptor> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True if any `Pending` accumulator is left anywhere in the tree.
    pub fn has_pending(&self) -> bool {
        fn walk(ty: &Descriptor) -> bool {
            match ty {
                Descriptor::Pending(_) => true,
                Descriptor::Nested(schema) => schema.has_pending(),
                Descriptor::ArrayOf(elem) => walk(elem),
                Descriptor::Primitive(_) | Descriptor::Union(_) => false,
            }
        }
        self.fields.values().any(walk)
    }

    /// Parse a persisted schema (the plain mapping written by `serde_json`).
    /// Errors carry the JSON path of the offending field.
    pub fn from_json_str(src: &str) -> Result<Self> {
        let de = &mut serde_json::Deserializer::from_str(src);
        let schema = serde_path_to_error::deserialize(&mut *de).map_err(|err| Error::Schema {
            path: err.path().to_string(),
            message: err.into_inner().to_string(),
        })?;
        de.end().map_err(|err| Error::Schema {
            path: ".".to_owned(),
            message: err.to_string(),
        })?;
        Ok(schema)
    }
}

// ------------------------------ Type text -------------------------------- //

/// `'value'`, escaping quotes and backslashes.
pub fn quote_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        if matches!(c, '\'' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

pub fn union_text(values: &[String]) -> String {
    values.iter().map(|v| quote_literal(v)).collect::<Vec<_>>().join(" | ")
}

/// Inverse of `union_text`: `'a' | 'b'` → `["a", "b"]`.
fn parse_union(text: &str) -> Option<Vec<String>> {
    let mut values = Vec::new();
    let mut chars = text.trim().chars().peekable();
    loop {
        if chars.next()? != '\'' {
            return None;
        }
        let mut value = String::new();
        loop {
            match chars.next()? {
                '\\' => value.push(chars.next()?),
                '\'' => break,
                c => value.push(c),
            }
        }
        values.push(value);

        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        match chars.next() {
            None => return Some(values),
            Some('|') => while chars.next_if(|c| c.is_whitespace()).is_some() {},
            Some(_) => return None,
        }
    }
}

impl FromStr for Descriptor {
    type Err = String;

    fn from_str(text: &str) -> std::result::Result<Self, Self::Err> {
        if let Some(tag) = TypeTag::from_name(text) {
            return Ok(Descriptor::Primitive(tag));
        }
        parse_union(text)
            .map(Descriptor::Union)
            .ok_or_else(|| format!("unknown type `{text}`"))
    }
}

// -------------------------------- Serde ---------------------------------- //

impl Serialize for Descriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Descriptor::Primitive(tag) => serializer.serialize_str(tag.as_str()),
            Descriptor::Union(values) => serializer.serialize_str(&union_text(values)),
            Descriptor::Nested(schema) => schema.serialize(serializer),
            Descriptor::ArrayOf(elem) => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(elem.as_ref())?;
                seq.end()
            }
            // written as what it would finalize to
            Descriptor::Pending(values) => values.resolve().serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Descriptor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(DescriptorVisitor)
    }
}

struct DescriptorVisitor;

impl<'de> Visitor<'de> for DescriptorVisitor {
    type Value = Descriptor;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a type string, a nested schema object, or a one-element array")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Descriptor, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> std::result::Result<Descriptor, A::Error> {
        Schema::deserialize(de::value::MapAccessDeserializer::new(map)).map(Descriptor::Nested)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Descriptor, A::Error> {
        let elem: Descriptor = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        if seq.next_element::<de::IgnoredAny>()?.is_some() {
            return Err(de::Error::invalid_length(2, &self));
        }
        Ok(Descriptor::ArrayOf(Box::new(elem)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Schema {
        let mut address = Schema::new();
        address.insert("city", Descriptor::Primitive(TypeTag::String));
        let mut item = Schema::new();
        item.insert("sku", Descriptor::Primitive(TypeTag::String));

        let mut schema = Schema::new();
        schema.insert("_id", Descriptor::object_id());
        schema.insert("status", Descriptor::Union(vec!["active".into(), "blocked".into()]));
        schema.insert("address", Descriptor::Nested(address));
        schema.insert("items", Descriptor::ArrayOf(Box::new(Descriptor::Nested(item))));
        schema.insert("tags", Descriptor::ArrayOf(Box::new(Descriptor::Primitive(TypeTag::String))));
        schema
    }

    #[test]
    fn serializes_to_plain_mapping() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value, json!({
            "_id": "ObjectId(string)",
            "status": "'active' | 'blocked'",
            "address": { "city": "string" },
            "items": [{ "sku": "string" }],
            "tags": ["string"],
        }));
    }

    #[test]
    fn pending_serializes_as_resolved() {
        let mut values = ValueSet::new();
        values.observe("a");
        let mut schema = Schema::new();
        schema.insert("name", Descriptor::Pending(values));
        assert_eq!(serde_json::to_value(&schema).unwrap(), json!({ "name": "string" }));
    }

    #[test]
    fn parses_persisted_schema() {
        let src = serde_json::to_string(&sample()).unwrap();
        let parsed = Schema::from_json_str(&src).unwrap();
        assert_eq!(parsed, sample());
        let keys: Vec<_> = parsed.keys().collect();
        assert_eq!(keys, ["_id", "status", "address", "items", "tags"]);
    }

    #[test]
    fn parses_type_text() {
        assert_eq!("undefined".parse::<Descriptor>(), Ok(Descriptor::Primitive(TypeTag::Undefined)));
        assert_eq!(
            r"'it\'s' |'ok'".parse::<Descriptor>(),
            Ok(Descriptor::Union(vec!["it's".into(), "ok".into()]))
        );
        assert!("object".parse::<Descriptor>().is_err());
        assert!("'open".parse::<Descriptor>().is_err());
        assert!("'a' & 'b'".parse::<Descriptor>().is_err());
    }

    #[test]
    fn schema_errors_carry_json_path() {
        let err = Schema::from_json_str(r#"{"user": {"tags": ["strnig"]}}"#).unwrap_err();
        match err {
            Error::Schema { path, message } => {
                assert_eq!(path, "user.tags[0]");
                assert!(message.contains("strnig"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(Schema::from_json_str(r#"{"tags": []}"#).is_err());
        assert!(Schema::from_json_str(r#"{"tags": ["string", "number"]}"#).is_err());
    }

    #[test]
    fn quotes_escape_specials() {
        assert_eq!(quote_literal(r"a'b\c"), r"'a\'b\\c'");
        assert_eq!(union_text(&["x".into(), "y".into()]), "'x' | 'y'");
    }

    #[test]
    fn detects_leftover_pending() {
        let mut inner = Schema::new();
        inner.insert("s", Descriptor::Pending(ValueSet::new()));
        let mut schema = sample();
        assert!(!schema.has_pending());
        schema.insert("deep", Descriptor::ArrayOf(Box::new(Descriptor::Nested(inner))));
        assert!(schema.has_pending());
    }
}
