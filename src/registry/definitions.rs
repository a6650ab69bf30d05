use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;
use tracing::debug;

use crate::error::CqrsError;
use crate::message::{Definition, Message, MessageDefinition, MessageKind};

/// Two name-to-definition maps, one per message kind.
///
/// Names are unique within a kind and never removed.
#[derive(Clone, Default)]
pub struct DefinitionRegistry {
    commands: Arc<RwLock<HashMap<String, MessageDefinition>>>,
    events: Arc<RwLock<HashMap<String, MessageDefinition>>>,
}

impl DefinitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn namespace(&self, kind: MessageKind) -> &RwLock<HashMap<String, MessageDefinition>> {
        match kind {
            MessageKind::Command => &self.commands,
            MessageKind::Event => &self.events,
        }
    }

    /// Register a definition under `kind`.
    pub fn define(&self, kind: MessageKind, definition: Definition) -> Result<(), CqrsError> {
        let mut namespace = self
            .namespace(kind)
            .write()
            .map_err(|_| CqrsError::LockPoisoned("define"))?;

        if namespace.contains_key(definition.name()) {
            return Err(CqrsError::DuplicateDefinition {
                kind,
                name: definition.name().to_string(),
            });
        }

        let definition = definition.into_kind(kind);
        debug!(
            kind = %kind,
            name = definition.name(),
            arity = definition.arity(),
            "message defined"
        );
        namespace.insert(definition.name().to_string(), definition);
        Ok(())
    }

    pub fn get(
        &self,
        kind: MessageKind,
        name: &str,
    ) -> Result<Option<MessageDefinition>, CqrsError> {
        let namespace = self
            .namespace(kind)
            .read()
            .map_err(|_| CqrsError::LockPoisoned("read"))?;
        Ok(namespace.get(name).cloned())
    }

    /// Like [`get`](Self::get), but a missing name is an `UnknownMessage` error.
    pub fn require(&self, kind: MessageKind, name: &str) -> Result<MessageDefinition, CqrsError> {
        self.get(kind, name)?
            .ok_or_else(|| CqrsError::UnknownMessage {
                kind,
                name: name.to_string(),
            })
    }

    pub fn contains(&self, kind: MessageKind, name: &str) -> Result<bool, CqrsError> {
        Ok(self.get(kind, name)?.is_some())
    }

    /// Snapshot of every definition of `kind`.
    pub fn all(&self, kind: MessageKind) -> Result<HashMap<String, MessageDefinition>, CqrsError> {
        let namespace = self
            .namespace(kind)
            .read()
            .map_err(|_| CqrsError::LockPoisoned("read"))?;
        Ok(namespace.clone())
    }

    /// Registered names of `kind`, sorted.
    pub fn names(&self, kind: MessageKind) -> Result<Vec<String>, CqrsError> {
        let mut names: Vec<String> = self.all(kind)?.into_keys().collect();
        names.sort();
        Ok(names)
    }

    /// Invoke the registered constructor for `name`.
    pub fn construct(
        &self,
        kind: MessageKind,
        name: &str,
        args: Vec<Value>,
    ) -> Result<Message, CqrsError> {
        self.require(kind, name)?.construct(args)
    }
}
