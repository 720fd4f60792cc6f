//! Structured exchange format for states and actions
//!
//! `ExchangeValue` is the JSON-like tree that games use to describe their
//! states and actions to the outside world. Hosts translate it to and from
//! their own native values, and `serde` can write it out as JSON text.
//!
//! Integers keep their signedness: signed sources always become `Int`, and
//! unsigned sources become `Int` when they fit in an `i64`, `UInt` otherwise.

use std::collections::HashMap;
use std::fmt;

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A JSON-like value exchanged between a game and its host
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ExchangeValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Array(Vec<ExchangeValue>),
    Object(ExchangeMap),
}

/// String-keyed mapping that remembers insertion order
///
/// Keys are unique. Order is kept for stable output only; two maps holding
/// the same entries compare equal regardless of order.
#[derive(Debug, Clone, Default)]
pub struct ExchangeMap {
    entries: Vec<(String, ExchangeValue)>,
    /// Position of each key in `entries`
    index: HashMap<String, usize>,
}

/// Error type for exchange decoding
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("Type mismatch: expected {expected} but got {found}")]
    TypeMismatch { expected: &'static str, found: String },
    #[error("Missing field: {0}")]
    MissingField(String),
    #[error("Value {value} is out of range for {target}")]
    OutOfRange { value: String, target: &'static str },
    #[error("Invalid object key: {0}")]
    InvalidKey(String),
    #[error("Duplicate object key: {0}")]
    DuplicateKey(String),
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    #[error("Decoding not supported: {0}")]
    Unsupported(String),
    #[error("{path}: {source}")]
    At {
        path: String,
        #[source]
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    /// Build a type mismatch against the variant actually found
    pub fn type_mismatch(expected: &'static str, found: &ExchangeValue) -> Self {
        DecodeError::TypeMismatch {
            expected,
            found: found.kind().to_string(),
        }
    }

    /// Prefix the error location with an object key
    pub fn at_field(self, key: &str) -> Self {
        self.nest(key.to_string())
    }

    /// Prefix the error location with an array index
    pub fn at_index(self, index: usize) -> Self {
        self.nest(format!("[{index}]"))
    }

    /// The innermost error, with any location wrapping removed
    pub fn root_cause(&self) -> &DecodeError {
        match self {
            DecodeError::At { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Dotted location of the failure, if any was recorded
    pub fn path(&self) -> Option<&str> {
        match self {
            DecodeError::At { path, .. } => Some(path),
            _ => None,
        }
    }

    fn nest(self, segment: String) -> Self {
        match self {
            DecodeError::At { path, source } => {
                let path = if path.starts_with('[') {
                    format!("{segment}{path}")
                } else {
                    format!("{segment}.{path}")
                };
                DecodeError::At { path, source }
            }
            other => DecodeError::At {
                path: segment,
                source: Box::new(other),
            },
        }
    }
}

impl ExchangeValue {
    /// Short name of the variant, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            ExchangeValue::Null => "null",
            ExchangeValue::Bool(_) => "bool",
            ExchangeValue::Int(_) => "int",
            ExchangeValue::UInt(_) => "uint",
            ExchangeValue::Float(_) => "float",
            ExchangeValue::String(_) => "string",
            ExchangeValue::Array(_) => "array",
            ExchangeValue::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ExchangeValue::Null)
    }

    /// Build an object from key/value pairs; later duplicates replace earlier ones
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ExchangeValue)>,
    {
        ExchangeValue::Object(entries.into_iter().collect())
    }

    pub fn as_object(&self) -> Result<&ExchangeMap, DecodeError> {
        match self {
            ExchangeValue::Object(map) => Ok(map),
            other => Err(DecodeError::type_mismatch("object", other)),
        }
    }

    pub fn as_array(&self) -> Result<&[ExchangeValue], DecodeError> {
        match self {
            ExchangeValue::Array(items) => Ok(items),
            other => Err(DecodeError::type_mismatch("array", other)),
        }
    }

    pub fn as_str(&self) -> Result<&str, DecodeError> {
        match self {
            ExchangeValue::String(s) => Ok(s),
            other => Err(DecodeError::type_mismatch("string", other)),
        }
    }

    /// Decode this value into a native type
    pub fn decode<T: FromExchange>(&self) -> Result<T, DecodeError> {
        T::from_exchange(self)
    }

    /// Decode a required field of an object
    pub fn field<T: FromExchange>(&self, key: &str) -> Result<T, DecodeError> {
        let value = self
            .as_object()?
            .get(key)
            .ok_or_else(|| DecodeError::MissingField(key.to_string()))?;
        T::from_exchange(value).map_err(|e| e.at_field(key))
    }

    /// Decode an optional field of an object; absent and null both yield `None`
    pub fn optional_field<T: FromExchange>(&self, key: &str) -> Result<Option<T>, DecodeError> {
        match self.as_object()?.get(key) {
            None | Some(ExchangeValue::Null) => Ok(None),
            Some(value) => T::from_exchange(value)
                .map(Some)
                .map_err(|e| e.at_field(key)),
        }
    }

    /// Convert any serializable value through its JSON representation
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(ExchangeValue::from)
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl ExchangeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or replace a value, keeping the original position of an existing key
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ExchangeValue>,
    ) -> Option<ExchangeValue> {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(&position) => Some(std::mem::replace(&mut self.entries[position].1, value)),
            None => {
                self.push(key, value);
                None
            }
        }
    }

    /// Insert a value, failing if the key is already present
    pub fn insert_unique(
        &mut self,
        key: impl Into<String>,
        value: ExchangeValue,
    ) -> Result<(), DecodeError> {
        let key = key.into();
        if self.contains_key(&key) {
            return Err(DecodeError::DuplicateKey(key));
        }
        self.push(key, value);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&ExchangeValue> {
        self.index
            .get(key)
            .map(|&position| &self.entries[position].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExchangeValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    fn push(&mut self, key: String, value: ExchangeValue) {
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
    }
}

impl PartialEq for ExchangeMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K: Into<String>> FromIterator<(K, ExchangeValue)> for ExchangeMap {
    fn from_iter<I: IntoIterator<Item = (K, ExchangeValue)>>(iter: I) -> Self {
        let mut map = ExchangeMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl IntoIterator for ExchangeMap {
    type Item = (String, ExchangeValue);
    type IntoIter = std::vec::IntoIter<(String, ExchangeValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// Native -> exchange

macro_rules! from_lossless_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ExchangeValue {
                fn from(v: $t) -> Self {
                    ExchangeValue::Int(i64::from(v))
                }
            }
        )*
    };
}

from_lossless_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for ExchangeValue {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(signed) => ExchangeValue::Int(signed),
            Err(_) => ExchangeValue::UInt(v),
        }
    }
}

impl From<usize> for ExchangeValue {
    fn from(v: usize) -> Self {
        ExchangeValue::from(v as u64)
    }
}

impl From<isize> for ExchangeValue {
    fn from(v: isize) -> Self {
        ExchangeValue::Int(v as i64)
    }
}

impl From<f32> for ExchangeValue {
    fn from(v: f32) -> Self {
        ExchangeValue::Float(f64::from(v))
    }
}

impl From<f64> for ExchangeValue {
    fn from(v: f64) -> Self {
        ExchangeValue::Float(v)
    }
}

impl From<bool> for ExchangeValue {
    fn from(v: bool) -> Self {
        ExchangeValue::Bool(v)
    }
}

impl From<String> for ExchangeValue {
    fn from(v: String) -> Self {
        ExchangeValue::String(v)
    }
}

impl From<&str> for ExchangeValue {
    fn from(v: &str) -> Self {
        ExchangeValue::String(v.to_string())
    }
}

impl From<ExchangeMap> for ExchangeValue {
    fn from(map: ExchangeMap) -> Self {
        ExchangeValue::Object(map)
    }
}

impl<T: Into<ExchangeValue>> From<Vec<T>> for ExchangeValue {
    fn from(items: Vec<T>) -> Self {
        ExchangeValue::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Clone + Into<ExchangeValue>> From<&[T]> for ExchangeValue {
    fn from(items: &[T]) -> Self {
        ExchangeValue::Array(items.iter().cloned().map(Into::into).collect())
    }
}

impl<T: Into<ExchangeValue>> From<Option<T>> for ExchangeValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(ExchangeValue::Null, Into::into)
    }
}

impl From<serde_json::Value> for ExchangeValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => ExchangeValue::Null,
            Value::Bool(b) => ExchangeValue::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    ExchangeValue::Int(i)
                } else if let Some(u) = n.as_u64() {
                    ExchangeValue::UInt(u)
                } else {
                    ExchangeValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => ExchangeValue::String(s),
            Value::Array(items) => {
                ExchangeValue::Array(items.into_iter().map(ExchangeValue::from).collect())
            }
            Value::Object(map) => ExchangeValue::Object(
                map.into_iter()
                    .map(|(k, v)| (k, ExchangeValue::from(v)))
                    .collect(),
            ),
        }
    }
}

// Exchange -> native

/// Types that can be decoded from an [`ExchangeValue`]
pub trait FromExchange: Sized {
    fn from_exchange(value: &ExchangeValue) -> Result<Self, DecodeError>;
}

impl FromExchange for ExchangeValue {
    fn from_exchange(value: &ExchangeValue) -> Result<Self, DecodeError> {
        Ok(value.clone())
    }
}

impl FromExchange for bool {
    fn from_exchange(value: &ExchangeValue) -> Result<Self, DecodeError> {
        match value {
            ExchangeValue::Bool(b) => Ok(*b),
            other => Err(DecodeError::type_mismatch("bool", other)),
        }
    }
}

macro_rules! from_exchange_int {
    ($($t:ty),*) => {
        $(
            impl FromExchange for $t {
                fn from_exchange(value: &ExchangeValue) -> Result<Self, DecodeError> {
                    let out_of_range = |v: String| DecodeError::OutOfRange {
                        value: v,
                        target: stringify!($t),
                    };
                    match value {
                        ExchangeValue::Int(v) => <$t>::try_from(*v).map_err(|_| out_of_range(v.to_string())),
                        ExchangeValue::UInt(v) => <$t>::try_from(*v).map_err(|_| out_of_range(v.to_string())),
                        other => Err(DecodeError::type_mismatch("int", other)),
                    }
                }
            }
        )*
    };
}

from_exchange_int!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl FromExchange for f64 {
    fn from_exchange(value: &ExchangeValue) -> Result<Self, DecodeError> {
        match value {
            ExchangeValue::Float(v) => Ok(*v),
            ExchangeValue::Int(v) => Ok(*v as f64),
            ExchangeValue::UInt(v) => Ok(*v as f64),
            other => Err(DecodeError::type_mismatch("float", other)),
        }
    }
}

impl FromExchange for f32 {
    fn from_exchange(value: &ExchangeValue) -> Result<Self, DecodeError> {
        let wide = f64::from_exchange(value)?;
        let narrow = wide as f32;
        if wide.is_finite() && !narrow.is_finite() {
            return Err(DecodeError::OutOfRange {
                value: wide.to_string(),
                target: "f32",
            });
        }
        Ok(narrow)
    }
}

impl FromExchange for String {
    fn from_exchange(value: &ExchangeValue) -> Result<Self, DecodeError> {
        value.as_str().map(str::to_string)
    }
}

impl<T: FromExchange> FromExchange for Vec<T> {
    fn from_exchange(value: &ExchangeValue) -> Result<Self, DecodeError> {
        value
            .as_array()?
            .iter()
            .enumerate()
            .map(|(i, item)| T::from_exchange(item).map_err(|e| e.at_index(i)))
            .collect()
    }
}

impl<T: FromExchange> FromExchange for Option<T> {
    fn from_exchange(value: &ExchangeValue) -> Result<Self, DecodeError> {
        match value {
            ExchangeValue::Null => Ok(None),
            other => T::from_exchange(other).map(Some),
        }
    }
}

// serde

impl Serialize for ExchangeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ExchangeValue::Null => serializer.serialize_unit(),
            ExchangeValue::Bool(b) => serializer.serialize_bool(*b),
            ExchangeValue::Int(v) => serializer.serialize_i64(*v),
            ExchangeValue::UInt(v) => serializer.serialize_u64(*v),
            ExchangeValue::Float(v) => serializer.serialize_f64(*v),
            ExchangeValue::String(s) => serializer.serialize_str(s),
            ExchangeValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            ExchangeValue::Object(map) => map.serialize(serializer),
        }
    }
}

impl Serialize for ExchangeMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut out = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            out.serialize_entry(key, value)?;
        }
        out.end()
    }
}

struct ExchangeVisitor;

impl<'de> Visitor<'de> for ExchangeVisitor {
    type Value = ExchangeValue;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON-like value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(ExchangeValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(ExchangeValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        ExchangeValue::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(ExchangeValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(ExchangeValue::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(ExchangeValue::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(ExchangeValue::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(ExchangeValue::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(ExchangeValue::String(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(1024));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(ExchangeValue::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = ExchangeMap::new();
        while let Some((key, value)) = access.next_entry::<String, ExchangeValue>()? {
            map.insert_unique(key, value).map_err(de::Error::custom)?;
        }
        Ok(ExchangeValue::Object(map))
    }
}

impl<'de> Deserialize<'de> for ExchangeValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ExchangeVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> ExchangeValue {
        ExchangeValue::object([
            ("grid", ExchangeValue::from(vec![vec![-1i8, 0], vec![1, -1]])),
            ("player", ExchangeValue::from(1u8)),
            ("winner", ExchangeValue::from(-1i8)),
        ])
    }

    #[test]
    fn test_integer_encoding_policy() {
        assert_eq!(ExchangeValue::from(-3i8), ExchangeValue::Int(-3));
        assert_eq!(ExchangeValue::from(7u32), ExchangeValue::Int(7));
        assert_eq!(
            ExchangeValue::from(i64::MAX as u64),
            ExchangeValue::Int(i64::MAX)
        );
        assert_eq!(
            ExchangeValue::from(u64::MAX),
            ExchangeValue::UInt(u64::MAX)
        );
        assert_eq!(ExchangeValue::from(0.5f32), ExchangeValue::Float(0.5));
    }

    #[test]
    fn test_map_equality_ignores_order() {
        let a = ExchangeValue::object([
            ("x", ExchangeValue::from(1)),
            ("y", ExchangeValue::from(2)),
        ]);
        let b = ExchangeValue::object([
            ("y", ExchangeValue::from(2)),
            ("x", ExchangeValue::from(1)),
        ]);
        assert_eq!(a, b);

        let c = ExchangeValue::object([("x", ExchangeValue::from(1))]);
        assert_ne!(a, c);
    }

    #[test]
    fn test_map_keeps_insertion_order() {
        let mut map = ExchangeMap::new();
        map.insert("b", 1);
        map.insert("a", 2);
        assert_eq!(map.insert("b", 3), Some(ExchangeValue::Int(1)));

        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(map.get("b"), Some(&ExchangeValue::Int(3)));
    }

    #[test]
    fn test_large_object_lookup() {
        let text = format!(
            "{{{}}}",
            (0..20_000)
                .map(|i| format!("\"k{i}\":{i}"))
                .collect::<Vec<_>>()
                .join(",")
        );
        let value = ExchangeValue::from_json_str(&text).unwrap();
        let map = value.as_object().unwrap();

        assert_eq!(map.len(), 20_000);
        assert_eq!(map.keys().next(), Some("k0"));
        assert_eq!(map.keys().last(), Some("k19999"));
        for i in (0..20_000).step_by(997) {
            assert_eq!(map.get(&format!("k{i}")), Some(&ExchangeValue::Int(i)));
        }
        assert!(!map.contains_key("k20000"));
    }

    #[test]
    fn test_insert_unique_rejects_duplicates() {
        let mut map = ExchangeMap::new();
        map.insert_unique("k", ExchangeValue::Null).unwrap();
        let err = map.insert_unique("k", ExchangeValue::Bool(true)).unwrap_err();
        assert_eq!(err, DecodeError::DuplicateKey("k".to_string()));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_field_decoding() {
        let state = sample_state();
        let grid: Vec<Vec<i8>> = state.field("grid").unwrap();
        assert_eq!(grid, vec![vec![-1, 0], vec![1, -1]]);
        assert_eq!(state.field::<u8>("player").unwrap(), 1);
        assert_eq!(state.optional_field::<u8>("missing").unwrap(), None);
    }

    #[test]
    fn test_missing_field() {
        let err = sample_state().field::<u8>("turn").unwrap_err();
        assert_eq!(err, DecodeError::MissingField("turn".to_string()));
    }

    #[test]
    fn test_type_mismatch_on_non_object() {
        let err = ExchangeValue::from("column")
            .field::<u8>("column")
            .unwrap_err();
        assert!(matches!(
            err,
            DecodeError::TypeMismatch { expected: "object", .. }
        ));
    }

    #[test]
    fn test_range_checks() {
        let err = ExchangeValue::Int(300).decode::<u8>().unwrap_err();
        assert!(matches!(err, DecodeError::OutOfRange { target: "u8", .. }));

        let err = ExchangeValue::Int(-1).decode::<u64>().unwrap_err();
        assert!(matches!(err, DecodeError::OutOfRange { target: "u64", .. }));

        let err = ExchangeValue::UInt(u64::MAX).decode::<i64>().unwrap_err();
        assert!(matches!(err, DecodeError::OutOfRange { .. }));

        assert_eq!(ExchangeValue::UInt(u64::MAX).decode::<u64>().unwrap(), u64::MAX);
        assert_eq!(ExchangeValue::Int(2).decode::<f64>().unwrap(), 2.0);

        let err = ExchangeValue::Float(1e300).decode::<f32>().unwrap_err();
        assert!(matches!(err, DecodeError::OutOfRange { target: "f32", .. }));
    }

    #[test]
    fn test_nested_error_path() {
        let value = ExchangeValue::object([(
            "grid",
            ExchangeValue::from(vec![
                ExchangeValue::from(vec![0i8, 1]),
                ExchangeValue::from(vec![ExchangeValue::from(0i8), ExchangeValue::from("x")]),
            ]),
        )]);

        let err = value.field::<Vec<Vec<i8>>>("grid").unwrap_err();
        assert_eq!(err.path(), Some("grid[1][1]"));
        assert!(matches!(
            err.root_cause(),
            DecodeError::TypeMismatch { expected: "int", .. }
        ));
        assert_eq!(
            err.to_string(),
            "grid[1][1]: Type mismatch: expected int but got string"
        );
    }

    #[test]
    fn test_json_text_round_trip() {
        let state = sample_state();
        let text = state.to_json_string().unwrap();
        assert_eq!(text, r#"{"grid":[[-1,0],[1,-1]],"player":1,"winner":-1}"#);
        assert_eq!(ExchangeValue::from_json_str(&text).unwrap(), state);
    }

    #[test]
    fn test_json_text_large_unsigned() {
        let parsed = ExchangeValue::from_json_str("[18446744073709551615, 5, 2.5, null]").unwrap();
        assert_eq!(
            parsed,
            ExchangeValue::Array(vec![
                ExchangeValue::UInt(u64::MAX),
                ExchangeValue::Int(5),
                ExchangeValue::Float(2.5),
                ExchangeValue::Null,
            ])
        );
    }

    #[test]
    fn test_json_text_rejects_duplicate_keys() {
        assert!(ExchangeValue::from_json_str(r#"{"a": 1, "a": 2}"#).is_err());
    }

    #[test]
    fn test_from_serialize() {
        #[derive(Serialize)]
        struct Info {
            name: &'static str,
            players: Vec<u8>,
        }

        let value = ExchangeValue::from_serialize(&Info {
            name: "demo",
            players: vec![0, 1],
        })
        .unwrap();
        assert_eq!(value.field::<String>("name").unwrap(), "demo");
        assert_eq!(value.field::<Vec<u8>>("players").unwrap(), vec![0, 1]);
    }
}
