use std::fmt;

use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::CqrsError;

/// Ordered field values of a message instance.
///
/// Keeps the declaration order of the definition's field names, which is
/// also the positional order handlers receive values in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Fields {
    entries: Vec<(String, Value)>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pair field names with positional values, in order.
    ///
    /// Callers check the counts match; extra names or values are dropped.
    pub fn zip<N, V>(names: N, values: V) -> Self
    where
        N: IntoIterator,
        N::Item: Into<String>,
        V: IntoIterator<Item = Value>,
    {
        Fields {
            entries: names
                .into_iter()
                .map(Into::into)
                .zip(values)
                .collect(),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a field, replacing an existing value in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn values(&self) -> Vec<Value> {
        self.entries.iter().map(|(_, v)| v.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The fields as a JSON object.
    pub fn to_object(&self) -> Value {
        let map: Map<String, Value> = self.entries.iter().cloned().collect();
        Value::Object(map)
    }

    /// Deserialize the fields into a typed struct.
    ///
    /// No fields also decode as a unit struct.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, CqrsError> {
        match serde_json::from_value(self.to_object()) {
            Ok(value) => Ok(value),
            Err(_) if self.is_empty() => Ok(serde_json::from_value(Value::Null)?),
            Err(err) => Err(err.into()),
        }
    }

    /// Serialize a typed value and pick `names` out of it, in that order.
    ///
    /// A name the value does not serialize is recorded as `null`.
    pub fn encode<T: Serialize>(value: &T, names: &[&str]) -> Result<Self, CqrsError> {
        let object = match serde_json::to_value(value)? {
            Value::Object(map) => map,
            Value::Null if names.is_empty() => Map::new(),
            other => {
                return Err(CqrsError::Decode(format!(
                    "expected a struct with named fields, got {}",
                    other
                )))
            }
        };

        let mut fields = Fields::new();
        for name in names {
            fields.insert(*name, object.get(*name).cloned().unwrap_or(Value::Null));
        }
        Ok(fields)
    }
}

impl Serialize for Fields {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Fields {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = Fields;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to values")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Fields, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut fields = Fields::new();
                while let Some((name, value)) = access.next_entry::<String, Value>()? {
                    fields.insert(name, value);
                }
                Ok(fields)
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}
