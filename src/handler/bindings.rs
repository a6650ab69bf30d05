use serde::{Deserialize, Serialize};

use super::handler::Handler;

/// The message names an object has been bound to.
///
/// Commands and applied events only ever grow. Subscriptions are replaced
/// wholesale by each subscribe call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerBindings {
    handled_commands: Vec<String>,
    applied_events: Vec<String>,
    subscribed_events: Vec<String>,
}

impl HandlerBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handled_commands(&self) -> &[String] {
        &self.handled_commands
    }

    pub fn applied_events(&self) -> &[String] {
        &self.applied_events
    }

    pub fn subscribed_events(&self) -> &[String] {
        &self.subscribed_events
    }

    pub fn handles(&self, command: &str) -> bool {
        self.handled_commands.iter().any(|c| c == command)
    }

    pub fn applies(&self, event: &str) -> bool {
        self.applied_events.iter().any(|e| e == event)
    }

    pub fn subscribes_to(&self, event: &str) -> bool {
        self.subscribed_events.iter().any(|e| e == event)
    }

    /// Returns `false` if the command was already recorded.
    pub(crate) fn add_command(&mut self, command: &str) -> bool {
        if self.handles(command) {
            return false;
        }
        self.handled_commands.push(command.to_string());
        true
    }

    pub(crate) fn add_applied(&mut self, event: &str) -> bool {
        if self.applies(event) {
            return false;
        }
        self.applied_events.push(event.to_string());
        true
    }

    pub(crate) fn set_subscribed(&mut self, events: Vec<String>) {
        self.subscribed_events = events;
    }
}

/// An object that carries handler methods and its own bindings.
///
/// `handler` looks up the method exposed under a message name. Implement it
/// by hand or with the `handlers!` macro:
///
/// ```ignore
/// sourced_cqrs::handlers!(Account, bindings {
///     "OpenAccount" => open,
///     "AccountOpened" => on_opened,
/// });
/// ```
pub trait HandlerHost {
    fn bindings(&self) -> &HandlerBindings;
    fn bindings_mut(&mut self) -> &mut HandlerBindings;
    fn handler(&self, name: &str) -> Option<Handler>;
}
