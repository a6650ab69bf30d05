//! Message definitions and message instances.
//!
//! A definition names a Command or Event type and knows how to construct
//! instances of it. Every instance carries its kind and name from the moment
//! it is built, so routing never depends on the Rust type that produced it.

mod definition;
mod fields;
mod kind;
mod message;

pub use definition::{Definition, FactoryFn, MessageDefinition, MessageType};
pub use fields::Fields;
pub use kind::MessageKind;
pub use message::Message;
