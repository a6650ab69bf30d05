use tracing::debug;

use super::bindings::HandlerHost;
use super::handler::Handler;
use crate::error::CqrsError;
use crate::message::MessageKind;
use crate::registry::DefinitionRegistry;

/// Validates handler declarations against the registered definitions and
/// records them on the host object.
///
/// Multi-name calls stop at the first failing name. Unless `atomic` is set,
/// names before it stay recorded.
pub struct BindingRules<'a> {
    definitions: &'a DefinitionRegistry,
    atomic: bool,
}

impl<'a> BindingRules<'a> {
    pub fn new(definitions: &'a DefinitionRegistry) -> Self {
        Self {
            definitions,
            atomic: false,
        }
    }

    /// Validate every name of a multi-name call before recording any.
    pub fn atomic(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    fn check_command(&self, name: &str, handler: Option<&Handler>) -> Result<(), CqrsError> {
        self.definitions.require(MessageKind::Command, name)?;

        let handler = handler.ok_or_else(|| CqrsError::InvalidHandlerShape {
            name: name.to_string(),
            reason: "no command handler is defined".into(),
        })?;

        if !handler.is_resumable() {
            return Err(CqrsError::InvalidHandlerShape {
                name: name.to_string(),
                reason: "the command handler has to be resumable".into(),
            });
        }

        Ok(())
    }

    fn check_applied<H: HandlerHost + ?Sized>(
        &self,
        name: &str,
        handler: Option<&Handler>,
        host: &H,
    ) -> Result<(), CqrsError> {
        self.definitions.require(MessageKind::Event, name)?;

        if host.bindings().subscribes_to(name) {
            return Err(CqrsError::ExclusivityViolation {
                name: name.to_string(),
            });
        }

        if handler.is_none() {
            return Err(CqrsError::InvalidHandlerShape {
                name: name.to_string(),
                reason: "no event handler is defined".into(),
            });
        }

        Ok(())
    }

    /// Declare that `host` handles `command` with `handler`.
    pub fn handle_command<H: HandlerHost + ?Sized>(
        &self,
        command: &str,
        handler: &Handler,
        host: &mut H,
    ) -> Result<(), CqrsError> {
        self.check_command(command, Some(handler))?;
        if host.bindings_mut().add_command(command) {
            debug!(command, "command handler bound");
        }
        Ok(())
    }

    /// Declare several commands, using the host's handler of the same name.
    pub fn handle_commands<H: HandlerHost + ?Sized>(
        &self,
        commands: &[&str],
        host: &mut H,
    ) -> Result<(), CqrsError> {
        if self.atomic {
            for command in commands {
                self.check_command(command, host.handler(command).as_ref())?;
            }
        }

        for command in commands {
            let handler = host.handler(command);
            self.check_command(command, handler.as_ref())?;
            if host.bindings_mut().add_command(command) {
                debug!(command, "command handler bound");
            }
        }
        Ok(())
    }

    /// Declare that `host` applies `event` with `handler`.
    pub fn apply_event<H: HandlerHost + ?Sized>(
        &self,
        event: &str,
        handler: &Handler,
        host: &mut H,
    ) -> Result<(), CqrsError> {
        self.check_applied(event, Some(handler), host)?;
        if host.bindings_mut().add_applied(event) {
            debug!(event, "event applier bound");
        }
        Ok(())
    }

    pub fn apply_events<H: HandlerHost + ?Sized>(
        &self,
        events: &[&str],
        host: &mut H,
    ) -> Result<(), CqrsError> {
        if self.atomic {
            for event in events {
                self.check_applied(event, host.handler(event).as_ref(), host)?;
            }
        }

        for event in events {
            let handler = host.handler(event);
            self.check_applied(event, handler.as_ref(), host)?;
            if host.bindings_mut().add_applied(event) {
                debug!(event, "event applier bound");
            }
        }
        Ok(())
    }

    /// Replace the host's subscriptions with `events`.
    ///
    /// Repeated names are collapsed. On failure the previous subscriptions
    /// are left as they were.
    pub fn subscribe_to<H: HandlerHost + ?Sized>(
        &self,
        events: &[&str],
        host: &mut H,
    ) -> Result<(), CqrsError> {
        let mut distinct: Vec<String> = Vec::with_capacity(events.len());

        for event in events {
            if distinct.iter().any(|e| e == event) {
                continue;
            }

            let definition = self.definitions.require(MessageKind::Event, event)?;

            if host.bindings().applies(event) {
                return Err(CqrsError::ExclusivityViolation {
                    name: event.to_string(),
                });
            }

            let handler = host
                .handler(event)
                .ok_or_else(|| CqrsError::InvalidHandlerShape {
                    name: event.to_string(),
                    reason: "no event handler for event is defined".into(),
                })?;

            if handler.arity() != definition.arity() {
                return Err(CqrsError::ArityMismatch {
                    name: event.to_string(),
                    expected: definition.arity(),
                    actual: handler.arity(),
                });
            }

            distinct.push(event.to_string());
        }

        debug!(events = ?distinct, "subscriptions replaced");
        host.bindings_mut().set_subscribed(distinct);
        Ok(())
    }
}
