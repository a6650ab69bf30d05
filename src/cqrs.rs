//! The registry object tying definitions, binding rules and dispatchers together.

use std::collections::HashMap;

use serde_json::Value;

use crate::config::CqrsConfig;
use crate::dispatcher::{Dispatchers, MessageDispatcher};
use crate::error::CqrsError;
use crate::handler::{BindingRules, Handler, HandlerHost};
use crate::message::{Definition, Message, MessageDefinition, MessageKind};
use crate::registry::DefinitionRegistry;

/// Owns the command/event definitions and the named dispatchers.
///
/// Separately constructed instances never share state. Clones are handles
/// to the same registry. A process-wide instance is available from
/// [`global`](crate::global).
///
/// ```ignore
/// let cqrs = Cqrs::new();
/// cqrs.define_command(Definition::fields("Create", ["id"]))?;
/// cqrs.define_event(Definition::fields("Created", ["id"]))?;
///
/// let mut todos = Todos::default();
/// cqrs.i_handle_commands(&["Create"], &mut todos)?;
///
/// let dispatcher = cqrs.create_message_dispatcher("todos")?;
/// dispatcher.scan(&todos)?;
/// dispatcher.send_command(&cqrs.new_command("Create", vec![json!(7)])?)?;
/// ```
#[derive(Clone, Default)]
pub struct Cqrs {
    config: CqrsConfig,
    definitions: DefinitionRegistry,
    dispatchers: Dispatchers,
}

impl Cqrs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CqrsConfig) -> Self {
        Cqrs {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &CqrsConfig {
        &self.config
    }

    pub fn definitions(&self) -> &DefinitionRegistry {
        &self.definitions
    }

    fn rules(&self) -> BindingRules<'_> {
        BindingRules::new(&self.definitions).atomic(self.config.atomic_bindings)
    }

    // ---- definitions ----

    pub fn define_command(&self, definition: Definition) -> Result<(), CqrsError> {
        self.definitions.define(MessageKind::Command, definition)
    }

    pub fn define_event(&self, definition: Definition) -> Result<(), CqrsError> {
        self.definitions.define(MessageKind::Event, definition)
    }

    pub fn command(&self, name: &str) -> Result<Option<MessageDefinition>, CqrsError> {
        self.definitions.get(MessageKind::Command, name)
    }

    pub fn event(&self, name: &str) -> Result<Option<MessageDefinition>, CqrsError> {
        self.definitions.get(MessageKind::Event, name)
    }

    /// Snapshot of the command definitions.
    pub fn commands(&self) -> Result<HashMap<String, MessageDefinition>, CqrsError> {
        self.definitions.all(MessageKind::Command)
    }

    /// Snapshot of the event definitions.
    pub fn events(&self) -> Result<HashMap<String, MessageDefinition>, CqrsError> {
        self.definitions.all(MessageKind::Event)
    }

    /// Construct a command through its registered constructor.
    pub fn new_command(&self, name: &str, args: Vec<Value>) -> Result<Message, CqrsError> {
        self.definitions.construct(MessageKind::Command, name, args)
    }

    /// Construct an event through its registered constructor.
    pub fn new_event(&self, name: &str, args: Vec<Value>) -> Result<Message, CqrsError> {
        self.definitions.construct(MessageKind::Event, name, args)
    }

    // ---- handler bindings ----

    pub fn i_handle_command<H: HandlerHost + ?Sized>(
        &self,
        command: &str,
        handler: &Handler,
        host: &mut H,
    ) -> Result<(), CqrsError> {
        self.rules().handle_command(command, handler, host)
    }

    pub fn i_handle_commands<H: HandlerHost + ?Sized>(
        &self,
        commands: &[&str],
        host: &mut H,
    ) -> Result<(), CqrsError> {
        self.rules().handle_commands(commands, host)
    }

    pub fn i_apply_event<H: HandlerHost + ?Sized>(
        &self,
        event: &str,
        handler: &Handler,
        host: &mut H,
    ) -> Result<(), CqrsError> {
        self.rules().apply_event(event, handler, host)
    }

    pub fn i_apply_events<H: HandlerHost + ?Sized>(
        &self,
        events: &[&str],
        host: &mut H,
    ) -> Result<(), CqrsError> {
        self.rules().apply_events(events, host)
    }

    /// Replace the host's subscriptions. Pass a one-element slice for a single event.
    pub fn i_subscribe_to<H: HandlerHost + ?Sized>(
        &self,
        events: &[&str],
        host: &mut H,
    ) -> Result<(), CqrsError> {
        self.rules().subscribe_to(events, host)
    }

    // ---- dispatchers ----

    pub fn create_message_dispatcher(&self, name: &str) -> Result<MessageDispatcher, CqrsError> {
        let dispatcher = MessageDispatcher::new(name)
            .atomic(self.config.atomic_bindings)
            .strict(self.config.strict_delivery);
        self.dispatchers.create(dispatcher)
    }

    pub fn get_message_dispatcher(&self, name: &str) -> Result<MessageDispatcher, CqrsError> {
        self.dispatchers.get(name)
    }

    /// Dispatcher names in creation order.
    pub fn message_dispatchers(&self) -> Result<Vec<String>, CqrsError> {
        self.dispatchers.names()
    }
}
