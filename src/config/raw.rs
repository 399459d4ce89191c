//! Untyped document tree produced by every configuration format.
//!
//! A [`RawValue`] is what a parser hands over before any target type is known.
//! It is built once per load and only read afterwards.

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use std::collections::BTreeMap;
use std::fmt;

/// Leaf value of a raw tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

/// A node of the parsed document: a scalar, a sequence or a string-keyed mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Scalar(Scalar),
    Sequence(Vec<RawValue>),
    Mapping(BTreeMap<String, RawValue>),
}

impl RawValue {
    /// Name of the node's shape, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            RawValue::Scalar(Scalar::Null) => "null",
            RawValue::Scalar(Scalar::Bool(_)) => "boolean",
            RawValue::Scalar(Scalar::Integer(_)) => "integer",
            RawValue::Scalar(Scalar::Float(_)) => "float",
            RawValue::Scalar(Scalar::String(_)) => "string",
            RawValue::Sequence(_) => "sequence",
            RawValue::Mapping(_) => "mapping",
        }
    }

    /// Look up `key` when this node is a mapping.
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        match self {
            RawValue::Mapping(entries) => entries.get(key),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawValue::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RawValue::Scalar(Scalar::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Scalar(Scalar::Null))
    }
}

impl Default for RawValue {
    fn default() -> Self {
        RawValue::Scalar(Scalar::Null)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Scalar(Scalar::String(value.to_string()))
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Scalar(Scalar::String(value))
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Scalar(Scalar::Bool(value))
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Scalar(Scalar::Integer(value))
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Scalar(Scalar::Float(value))
    }
}

impl<T: Into<RawValue>> From<Vec<T>> for RawValue {
    fn from(items: Vec<T>) -> Self {
        RawValue::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, RawValue>> for RawValue {
    fn from(entries: BTreeMap<String, RawValue>) -> Self {
        RawValue::Mapping(entries)
    }
}

impl<'de> Deserialize<'de> for RawValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(RawValueVisitor)
    }
}

struct RawValueVisitor;

impl<'de> Visitor<'de> for RawValueVisitor {
    type Value = RawValue;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("any configuration value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<RawValue, E> {
        Ok(RawValue::from(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<RawValue, E> {
        Ok(RawValue::from(v))
    }

    fn visit_i128<E>(self, v: i128) -> Result<RawValue, E> {
        Ok(i64::try_from(v).map(RawValue::from).unwrap_or(RawValue::from(v as f64)))
    }

    fn visit_u64<E>(self, v: u64) -> Result<RawValue, E> {
        Ok(i64::try_from(v).map(RawValue::from).unwrap_or(RawValue::from(v as f64)))
    }

    fn visit_u128<E>(self, v: u128) -> Result<RawValue, E> {
        Ok(i64::try_from(v).map(RawValue::from).unwrap_or(RawValue::from(v as f64)))
    }

    fn visit_f64<E>(self, v: f64) -> Result<RawValue, E> {
        Ok(RawValue::from(v))
    }

    fn visit_char<E>(self, v: char) -> Result<RawValue, E> {
        Ok(RawValue::from(v.to_string()))
    }

    fn visit_str<E>(self, v: &str) -> Result<RawValue, E> {
        Ok(RawValue::from(v))
    }

    fn visit_string<E>(self, v: String) -> Result<RawValue, E> {
        Ok(RawValue::from(v))
    }

    fn visit_none<E>(self) -> Result<RawValue, E> {
        Ok(RawValue::default())
    }

    fn visit_unit<E>(self) -> Result<RawValue, E> {
        Ok(RawValue::default())
    }

    fn visit_some<D>(self, deserializer: D) -> Result<RawValue, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawValue::deserialize(deserializer)
    }

    fn visit_newtype_struct<D>(self, deserializer: D) -> Result<RawValue, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawValue::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<RawValue, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<RawValue>()? {
            items.push(item);
        }
        Ok(RawValue::Sequence(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<RawValue, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = BTreeMap::new();
        while let Some((key, value)) = map.next_entry::<RawValue, RawValue>()? {
            let key = match key {
                RawValue::Scalar(Scalar::String(s)) => s,
                RawValue::Scalar(Scalar::Bool(b)) => b.to_string(),
                RawValue::Scalar(Scalar::Integer(n)) => n.to_string(),
                RawValue::Scalar(Scalar::Float(f)) => f.to_string(),
                other => {
                    return Err(de::Error::custom(format!(
                        "mapping keys must be scalars, got {}",
                        other.kind()
                    )))
                }
            };
            entries.insert(key, value);
        }
        Ok(RawValue::Mapping(entries))
    }
}
