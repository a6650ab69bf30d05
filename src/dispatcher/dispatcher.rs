use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use tracing::{debug, trace, warn};

use crate::error::CqrsError;
use crate::handler::{Delivery, HandlerHost, Handler};
use crate::message::Message;

/// A named router from command names to handlers.
///
/// Cloning yields another handle to the same routing table.
#[derive(Clone)]
pub struct MessageDispatcher {
    name: Arc<str>,
    handlers: Arc<RwLock<HashMap<String, Handler>>>,
    atomic: bool,
    strict: bool,
}

impl MessageDispatcher {
    pub fn new(name: impl Into<String>) -> Self {
        let name: String = name.into();
        Self {
            name: name.into(),
            handlers: Arc::new(RwLock::new(HashMap::new())),
            atomic: false,
            strict: false,
        }
    }

    /// Check every command of a scanned host before binding any.
    pub fn atomic(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    /// Fail `send_command` with `Unrouted` instead of ignoring the command.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bind the host's handlers for every command it declares.
    ///
    /// A host with no declared commands is a no-op. Names the host does
    /// not expose a handler for are skipped. An exposed handler that is not
    /// resumable is `InvalidHandlerShape`.
    pub fn scan<H: HandlerHost + ?Sized>(&self, host: &H) -> Result<&Self, CqrsError> {
        let commands = host.bindings().handled_commands();
        if commands.is_empty() {
            return Ok(self);
        }

        let mut handlers = self
            .handlers
            .write()
            .map_err(|_| CqrsError::LockPoisoned("scan"))?;

        if self.atomic {
            for command in commands {
                if handlers.contains_key(command) {
                    return Err(CqrsError::DuplicateHandler(command.clone()));
                }
                if let Some(handler) = host.handler(command) {
                    ensure_resumable(command, &handler)?;
                }
            }
        }

        for command in commands {
            if handlers.contains_key(command) {
                return Err(CqrsError::DuplicateHandler(command.clone()));
            }

            match host.handler(command) {
                Some(handler) => {
                    ensure_resumable(command, &handler)?;
                    debug!(dispatcher = %self.name, command = %command, "command handler registered");
                    handlers.insert(command.clone(), handler);
                }
                None => {
                    warn!(dispatcher = %self.name, command = %command, "host exposes no handler, skipped");
                }
            }
        }

        Ok(self)
    }

    /// Route a command to its bound handler.
    ///
    /// A command with no bound handler, or a message that is not a command,
    /// is `Delivery::Unrouted` unless the dispatcher is strict.
    pub fn send_command(&self, command: &Message) -> Result<Delivery, CqrsError> {
        let handler = if command.is_command() {
            let handlers = self
                .handlers
                .read()
                .map_err(|_| CqrsError::LockPoisoned("send"))?;
            handlers.get(command.name()).cloned()
        } else {
            None
        };

        match handler {
            Some(handler) => {
                trace!(dispatcher = %self.name, command = command.name(), "delivering command");
                Ok(handler.invoke(command))
            }
            None if self.strict => Err(CqrsError::Unrouted(command.name().to_string())),
            None => {
                trace!(dispatcher = %self.name, command = command.name(), "no handler, command dropped");
                Ok(Delivery::Unrouted)
            }
        }
    }

    pub fn handles(&self, command: &str) -> Result<bool, CqrsError> {
        let handlers = self
            .handlers
            .read()
            .map_err(|_| CqrsError::LockPoisoned("read"))?;
        Ok(handlers.contains_key(command))
    }

    /// Bound command names, sorted.
    pub fn commands(&self) -> Result<Vec<String>, CqrsError> {
        let handlers = self
            .handlers
            .read()
            .map_err(|_| CqrsError::LockPoisoned("read"))?;
        let mut commands: Vec<String> = handlers.keys().cloned().collect();
        commands.sort();
        Ok(commands)
    }
}

fn ensure_resumable(command: &str, handler: &Handler) -> Result<(), CqrsError> {
    if handler.is_resumable() {
        Ok(())
    } else {
        Err(CqrsError::InvalidHandlerShape {
            name: command.to_string(),
            reason: "the command handler has to be resumable".into(),
        })
    }
}

impl fmt::Debug for MessageDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageDispatcher")
            .field("name", &self.name)
            .field("atomic", &self.atomic)
            .field("strict", &self.strict)
            .finish_non_exhaustive()
    }
}
