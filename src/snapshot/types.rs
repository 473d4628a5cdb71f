use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// Decoded JSON with room for non-finite numbers and ordered objects.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<RawValue>),
    Object(Vec<(String, RawValue)>),
}

impl RawValue {
    pub fn as_array(&self) -> Option<&[RawValue]> {
        match self {
            RawValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Numeric coercion of a single fix component. Non-finite values are
    /// rejected.
    pub fn as_coordinate(&self) -> Option<f64> {
        let value = match self {
            RawValue::Number(n) => Some(*n),
            RawValue::String(s) => s.trim().parse().ok(),
            RawValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        };
        value.filter(|v| v.is_finite())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RawValue::Null => "null",
            RawValue::Bool(_) => "bool",
            RawValue::Number(_) => "number",
            RawValue::String(_) => "string",
            RawValue::Array(_) => "array",
            RawValue::Object(_) => "object",
        }
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
        f.write_str("any JSON value")
    }

    fn visit_unit<E>(self) -> Result<RawValue, E>
    where
        E: de::Error,
    {
        Ok(RawValue::Null)
    }

    fn visit_none<E>(self) -> Result<RawValue, E>
    where
        E: de::Error,
    {
        Ok(RawValue::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<RawValue, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawValue::deserialize(deserializer)
    }

    fn visit_bool<E>(self, v: bool) -> Result<RawValue, E>
    where
        E: de::Error,
    {
        Ok(RawValue::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<RawValue, E>
    where
        E: de::Error,
    {
        Ok(RawValue::Number(v as f64))
    }

    fn visit_u64<E>(self, v: u64) -> Result<RawValue, E>
    where
        E: de::Error,
    {
        Ok(RawValue::Number(v as f64))
    }

    fn visit_f64<E>(self, v: f64) -> Result<RawValue, E>
    where
        E: de::Error,
    {
        Ok(RawValue::Number(v))
    }

    fn visit_str<E>(self, v: &str) -> Result<RawValue, E>
    where
        E: de::Error,
    {
        Ok(RawValue::String(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<RawValue, E>
    where
        E: de::Error,
    {
        Ok(RawValue::String(v))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<RawValue, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(RawValue::Array(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<RawValue, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Vec::new();
        while let Some((key, value)) = map.next_entry::<String, RawValue>()? {
            entries.push((key, value));
        }
        Ok(RawValue::Object(entries))
    }
}

impl Serialize for RawValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            RawValue::Null => serializer.serialize_unit(),
            RawValue::Bool(b) => serializer.serialize_bool(*b),
            RawValue::Number(n) => serializer.serialize_f64(*n),
            RawValue::String(s) => serializer.serialize_str(s),
            RawValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            RawValue::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

/// Snapshot file name such as `"07.json"`; the stem is the hour offset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SnapshotLabel(String);

impl SnapshotLabel {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn for_hour(hour: u32) -> Self {
        Self(format!("{:02}.json", hour))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hours before the reference time; negative stems are accepted.
    pub fn hour_offset(&self) -> Option<i64> {
        let stem = self.0.strip_suffix(".json").unwrap_or(&self.0);
        stem.trim().parse().ok()
    }
}

impl fmt::Display for SnapshotLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One hourly batch of position fixes as fetched.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub label: SnapshotLabel,
    pub body: RawValue,
}

impl Snapshot {
    pub fn new(label: SnapshotLabel, body: RawValue) -> Self {
        Self { label, body }
    }
}
