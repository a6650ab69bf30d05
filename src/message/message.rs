use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::definition::MessageType;
use super::fields::Fields;
use super::kind::MessageKind;
use crate::error::CqrsError;

/// A concrete command or event.
///
/// The kind and name are fixed at construction and are what dispatchers
/// route on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    kind: MessageKind,
    name: String,
    fields: Fields,
}

impl Message {
    pub fn new(kind: MessageKind, name: impl Into<String>, fields: Fields) -> Self {
        Self {
            kind,
            name: name.into(),
            fields,
        }
    }

    pub fn command(name: impl Into<String>, fields: Fields) -> Self {
        Self::new(MessageKind::Command, name, fields)
    }

    pub fn event(name: impl Into<String>, fields: Fields) -> Self {
        Self::new(MessageKind::Event, name, fields)
    }

    /// Build an instance from a typed message value.
    pub fn from_typed<T: MessageType>(kind: MessageKind, value: &T) -> Result<Self, CqrsError> {
        let fields = Fields::encode(value, T::FIELDS)?;
        Ok(Self::new(kind, T::NAME, fields))
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_command(&self) -> bool {
        self.kind == MessageKind::Command
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Deserialize a single field.
    pub fn field<T: DeserializeOwned>(&self, field: &str) -> Result<T, CqrsError> {
        let value = self.fields.get(field).ok_or_else(|| {
            CqrsError::Decode(format!("{} {} has no field {}", self.kind, self.name, field))
        })?;
        Ok(serde_json::from_value(value.clone())?)
    }

    /// Deserialize all fields into a typed struct.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, CqrsError> {
        self.fields.decode()
    }

    /// Field values in declaration order.
    pub fn values(&self) -> Vec<Value> {
        self.fields.values()
    }
}
