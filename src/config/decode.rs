//! Typed decoding of a raw tree.
//!
//! `&RawValue` implements [`serde::Deserializer`], so any `Deserialize` type can
//! be mapped straight out of the tree. Scalars are weakly typed: the mismatches
//! that differ between YAML, TOML and JSON (`"1"` vs `1`, `"true"` vs `true`)
//! are coerced instead of rejected. Errors remember the key path they came from.
//!
//! There is no explicit hook registry. [`PathEntry`](super::PathEntry) owns a
//! `Deserialize` impl that captures the raw node and runs the path entry
//! classifier, so every field typed `PathEntry`, `Option<PathEntry>` or
//! `Box<PathEntry>` is routed there by the type system, once per entry.

use serde::de::{self, value::BorrowedStrDeserializer, Deserialize, Deserializer, Visitor};
use std::collections::btree_map;
use std::fmt;

use super::raw::{RawValue, Scalar};

/// Error raised while mapping a raw tree onto a typed destination.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeError {
    path: Vec<String>,
    message: String,
}

impl DecodeError {
    /// Key path of the failing field, outermost first.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Prefix the error's key path with `segment`.
    pub(crate) fn at(mut self, segment: impl Into<String>) -> Self {
        self.path.insert(0, segment.into());
        self
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.path.join("."), self.message)
        }
    }
}

impl std::error::Error for DecodeError {}

impl de::Error for DecodeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        DecodeError { path: Vec::new(), message: msg.to_string() }
    }
}

/// Map `raw` onto `T`.
///
/// Keys absent from the tree keep whatever default `T` declares. Decoding is
/// all-or-nothing: the first failing field aborts the whole pass.
pub fn decode<'de, T>(raw: &'de RawValue) -> Result<T, DecodeError>
where
    T: Deserialize<'de>,
{
    T::deserialize(raw)
}

fn mismatch(expected: &str, found: &RawValue) -> DecodeError {
    de::Error::custom(format!("expected {}, got {}", expected, found.kind()))
}

/// Boolean spellings accepted from strings, as Go's `strconv.ParseBool` does.
fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

impl RawValue {
    fn weak_bool(&self) -> Result<bool, DecodeError> {
        match self {
            RawValue::Scalar(Scalar::Null) => Ok(false),
            RawValue::Scalar(Scalar::Bool(b)) => Ok(*b),
            RawValue::Scalar(Scalar::Integer(n)) => Ok(*n != 0),
            RawValue::Scalar(Scalar::Float(f)) => Ok(*f != 0.0),
            RawValue::Scalar(Scalar::String(s)) if s.is_empty() => Ok(false),
            RawValue::Scalar(Scalar::String(s)) => parse_bool(s).ok_or_else(|| {
                de::Error::custom(format!("cannot parse {:?} as a boolean", s))
            }),
            other => Err(mismatch("a boolean", other)),
        }
    }

    fn weak_integer(&self) -> Result<i64, DecodeError> {
        match self {
            RawValue::Scalar(Scalar::Null) => Ok(0),
            RawValue::Scalar(Scalar::Bool(b)) => Ok(i64::from(*b)),
            RawValue::Scalar(Scalar::Integer(n)) => Ok(*n),
            RawValue::Scalar(Scalar::Float(f)) => Ok(*f as i64),
            RawValue::Scalar(Scalar::String(s)) if s.is_empty() => Ok(0),
            RawValue::Scalar(Scalar::String(s)) => s.parse().map_err(|_| {
                de::Error::custom(format!("cannot parse {:?} as an integer", s))
            }),
            other => Err(mismatch("an integer", other)),
        }
    }

    fn weak_float(&self) -> Result<f64, DecodeError> {
        match self {
            RawValue::Scalar(Scalar::Null) => Ok(0.0),
            RawValue::Scalar(Scalar::Bool(b)) => Ok(if *b { 1.0 } else { 0.0 }),
            RawValue::Scalar(Scalar::Integer(n)) => Ok(*n as f64),
            RawValue::Scalar(Scalar::Float(f)) => Ok(*f),
            RawValue::Scalar(Scalar::String(s)) if s.is_empty() => Ok(0.0),
            RawValue::Scalar(Scalar::String(s)) => s
                .parse()
                .map_err(|_| de::Error::custom(format!("cannot parse {:?} as a number", s))),
            other => Err(mismatch("a number", other)),
        }
    }
}

macro_rules! deserialize_integer {
    ($($method:ident)*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value, DecodeError>
            where
                V: Visitor<'de>,
            {
                visitor.visit_i64(self.weak_integer()?)
            }
        )*
    };
}

impl<'de> Deserializer<'de> for &'de RawValue {
    type Error = DecodeError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        match self {
            RawValue::Scalar(Scalar::Null) => visitor.visit_unit(),
            RawValue::Scalar(Scalar::Bool(b)) => visitor.visit_bool(*b),
            RawValue::Scalar(Scalar::Integer(n)) => visitor.visit_i64(*n),
            RawValue::Scalar(Scalar::Float(f)) => visitor.visit_f64(*f),
            RawValue::Scalar(Scalar::String(s)) => visitor.visit_borrowed_str(s),
            RawValue::Sequence(items) => visitor.visit_seq(SeqDeserializer::new(items)),
            RawValue::Mapping(entries) => visitor.visit_map(MapDeserializer::new(entries)),
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_bool(self.weak_bool()?)
    }

    deserialize_integer! {
        deserialize_i8 deserialize_i16 deserialize_i32 deserialize_i64
        deserialize_u8 deserialize_u16 deserialize_u32 deserialize_u64
    }

    fn deserialize_f32<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_f64(self.weak_float()?)
    }

    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_f64(self.weak_float()?)
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        match self {
            RawValue::Scalar(Scalar::String(s)) => visitor.visit_borrowed_str(s),
            RawValue::Scalar(Scalar::Null) => visitor.visit_borrowed_str(""),
            RawValue::Scalar(Scalar::Bool(b)) => {
                visitor.visit_borrowed_str(if *b { "1" } else { "0" })
            }
            RawValue::Scalar(Scalar::Integer(n)) => visitor.visit_string(n.to_string()),
            RawValue::Scalar(Scalar::Float(f)) => visitor.visit_string(f.to_string()),
            other => Err(mismatch("a string", other)),
        }
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_any(visitor)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_any(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        if self.is_null() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        if self.is_null() {
            visitor.visit_unit()
        } else {
            Err(mismatch("null", self))
        }
    }

    fn deserialize_unit_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        match self {
            RawValue::Sequence(items) => visitor.visit_seq(SeqDeserializer::new(items)),
            RawValue::Scalar(Scalar::Null) => visitor.visit_seq(SeqDeserializer::new(&[])),
            RawValue::Mapping(entries) if entries.is_empty() => {
                visitor.visit_seq(SeqDeserializer::new(&[]))
            }
            // A lone scalar stands in for a one-element list.
            RawValue::Scalar(_) => {
                visitor.visit_seq(SeqDeserializer::new(std::slice::from_ref(self)))
            }
            other => Err(mismatch("a sequence", other)),
        }
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        match self {
            RawValue::Mapping(entries) => visitor.visit_map(MapDeserializer::new(entries)),
            RawValue::Scalar(Scalar::Null) => visitor.visit_map(MapDeserializer::empty()),
            RawValue::Sequence(items) if items.is_empty() => {
                visitor.visit_map(MapDeserializer::empty())
            }
            other => Err(mismatch("a mapping", other)),
        }
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        match self {
            RawValue::Scalar(Scalar::String(s)) => {
                visitor.visit_enum(BorrowedStrDeserializer::<DecodeError>::new(s))
            }
            other => Err(mismatch("a variant name", other)),
        }
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value, DecodeError>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }
}

struct SeqDeserializer<'de> {
    iter: std::iter::Enumerate<std::slice::Iter<'de, RawValue>>,
}

impl<'de> SeqDeserializer<'de> {
    fn new(items: &'de [RawValue]) -> Self {
        SeqDeserializer { iter: items.iter().enumerate() }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer<'de> {
    type Error = DecodeError;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>, DecodeError>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((index, item)) => {
                seed.deserialize(item).map(Some).map_err(|e| e.at(index.to_string()))
            }
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct MapDeserializer<'de> {
    iter: Option<btree_map::Iter<'de, String, RawValue>>,
    pending: Option<(&'de str, &'de RawValue)>,
}

impl<'de> MapDeserializer<'de> {
    fn new(entries: &'de btree_map::BTreeMap<String, RawValue>) -> Self {
        MapDeserializer { iter: Some(entries.iter()), pending: None }
    }

    fn empty() -> Self {
        MapDeserializer { iter: None, pending: None }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer<'de> {
    type Error = DecodeError;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, DecodeError>
    where
        K: de::DeserializeSeed<'de>,
    {
        let Some((key, value)) = self.iter.as_mut().and_then(Iterator::next) else {
            return Ok(None);
        };
        self.pending = Some((key.as_str(), value));
        seed.deserialize(BorrowedStrDeserializer::<DecodeError>::new(key))
            .map(Some)
            .map_err(|e| e.at(key.as_str()))
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, DecodeError>
    where
        V: de::DeserializeSeed<'de>,
    {
        let (key, value) = self.pending.take().ok_or_else(|| {
            <DecodeError as de::Error>::custom("map value requested before its key")
        })?;
        seed.deserialize(value).map_err(|e| e.at(key))
    }

    fn size_hint(&self) -> Option<usize> {
        self.iter.as_ref().map(|iter| iter.len())
    }
}
