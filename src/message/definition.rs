use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::fields::Fields;
use super::kind::MessageKind;
use super::message::Message;
use crate::error::CqrsError;

/// A custom factory: positional arguments in, field values out.
pub type FactoryFn = dyn Fn(&[Value]) -> Result<Fields, CqrsError> + Send + Sync;

/// A Rust type that can stand in for a message constructor.
///
/// Usually derived:
///
/// ```ignore
/// #[derive(Serialize, Deserialize, MessageType)]
/// #[message(name = "OpenAccount")]
/// struct OpenAccount {
///     id: String,
///     owner: String,
/// }
/// ```
pub trait MessageType: Serialize + DeserializeOwned {
    /// Registered name of the message.
    const NAME: &'static str;
    /// Field names in positional order.
    const FIELDS: &'static [&'static str];
}

#[derive(Clone)]
enum Constructor {
    /// Synthesized from the field list.
    Fields,
    Factory(Arc<FactoryFn>),
}

/// How to construct a message, before it is registered under a kind.
///
/// One constructor per accepted input shape: a typed message, a name with a
/// custom factory, or a name with an ordered field list.
#[derive(Clone)]
pub struct Definition {
    name: String,
    field_names: Vec<String>,
    arity: usize,
    constructor: Constructor,
}

impl Definition {
    /// Register a typed message under its own name.
    ///
    /// Arguments are validated by deserializing them into `T`.
    pub fn typed<T: MessageType + 'static>() -> Self {
        let factory = |args: &[Value]| -> Result<Fields, CqrsError> {
            let fields = Fields::zip(T::FIELDS.iter().copied(), args.iter().cloned());
            let value: T = fields.decode()?;
            Fields::encode(&value, T::FIELDS)
        };

        Definition {
            name: T::NAME.to_string(),
            field_names: T::FIELDS.iter().map(|f| f.to_string()).collect(),
            arity: T::FIELDS.len(),
            constructor: Constructor::Factory(Arc::new(factory)),
        }
    }

    /// Register a custom factory under `name`.
    ///
    /// Closures carry no parameter count, so `arity` declares how many
    /// positional arguments the factory takes.
    pub fn factory<F>(name: impl Into<String>, arity: usize, factory: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Fields, CqrsError> + Send + Sync + 'static,
    {
        Definition {
            name: name.into(),
            field_names: Vec::new(),
            arity,
            constructor: Constructor::Factory(Arc::new(factory)),
        }
    }

    /// Register a plain data message with the given fields, in order.
    pub fn fields<I>(name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let field_names: Vec<String> = fields.into_iter().map(Into::into).collect();
        Definition {
            name: name.into(),
            arity: field_names.len(),
            field_names,
            constructor: Constructor::Fields,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn into_kind(self, kind: MessageKind) -> MessageDefinition {
        MessageDefinition {
            kind,
            name: self.name,
            field_names: self.field_names,
            arity: self.arity,
            constructor: self.constructor,
        }
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition")
            .field("name", &self.name)
            .field("field_names", &self.field_names)
            .field("arity", &self.arity)
            .finish()
    }
}

/// A registered command or event type.
///
/// Immutable once registered; invoking [`construct`](Self::construct)
/// produces a [`Message`] tagged with this definition's kind and name.
#[derive(Clone)]
pub struct MessageDefinition {
    kind: MessageKind,
    name: String,
    field_names: Vec<String>,
    arity: usize,
    constructor: Constructor,
}

impl MessageDefinition {
    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared field names. Empty for custom factories.
    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    /// Number of positional arguments the constructor takes.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Build a message instance from positional arguments.
    pub fn construct(&self, args: Vec<Value>) -> Result<Message, CqrsError> {
        if args.len() != self.arity {
            return Err(CqrsError::ArityMismatch {
                name: self.name.clone(),
                expected: self.arity,
                actual: args.len(),
            });
        }

        let fields = match &self.constructor {
            Constructor::Fields => Fields::zip(self.field_names.iter().cloned(), args),
            Constructor::Factory(factory) => factory(&args)?,
        };

        Ok(Message::new(self.kind, self.name.clone(), fields))
    }
}

impl fmt::Debug for MessageDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageDefinition")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("field_names", &self.field_names)
            .field("arity", &self.arity)
            .finish()
    }
}
