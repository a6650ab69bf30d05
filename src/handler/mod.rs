//! Handler binding rules.
//!
//! An object that handles messages embeds a [`HandlerBindings`] and exposes
//! its handler methods by name through [`HandlerHost`]. The binding rules
//! check each declaration against the definition registry before recording
//! it on the object:
//!
//! - command handlers must exist and be [resumable](Handler::resumable)
//! - an event is either applied or subscribed by an object, never both
//! - a subscriber's parameter count must match the event's field count
//!
//! ```ignore
//! let mut account = Account::default();
//! cqrs.i_handle_commands(&["OpenAccount", "Deposit"], &mut account)?;
//! cqrs.i_apply_events(&["AccountOpened"], &mut account)?;
//!
//! let mut ledger = Ledger::default();
//! cqrs.i_subscribe_to(&["AccountOpened"], &mut ledger)?;
//! ```

mod bindings;
mod handler;
mod rules;

pub use bindings::{HandlerBindings, HandlerHost};
pub use handler::{Delivery, Handler, Resumption};
pub use rules::BindingRules;
