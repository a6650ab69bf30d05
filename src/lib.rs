//! In-process CQRS message registry.
//!
//! Declare named commands and events, bind the objects that handle, apply
//! or subscribe to them under exclusivity and shape rules, and route command
//! instances to exactly one handler through named dispatchers.

mod config;
mod cqrs;
mod dispatcher;
mod error;
mod handler;
mod message;
mod registry;

pub use config::{CqrsConfig, ATOMIC_BINDINGS_VAR, STRICT_DELIVERY_VAR};
pub use cqrs::Cqrs;
pub use dispatcher::{Dispatchers, MessageDispatcher};
pub use error::CqrsError;
pub use handler::{BindingRules, Delivery, Handler, HandlerBindings, HandlerHost, Resumption};
pub use message::{
    Definition, FactoryFn, Fields, Message, MessageDefinition, MessageKind, MessageType,
};
pub use registry::DefinitionRegistry;

// Re-export the proc macros
pub use sourced_cqrs_macros::{handlers, MessageType};

use once_cell::sync::Lazy;

pub const VERSION: &str = "0.1.0";

static GLOBAL: Lazy<Cqrs> = Lazy::new(|| Cqrs::with_config(CqrsConfig::from_env()));

/// The process-wide registry, configured from the environment on first use.
pub fn global() -> &'static Cqrs {
    &GLOBAL
}
