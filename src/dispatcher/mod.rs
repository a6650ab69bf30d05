//! Named command dispatchers.
//!
//! A dispatcher maps command names to handlers. Handlers are bound by
//! scanning objects whose bindings list the commands they handle; each
//! command can be bound once per dispatcher.
//!
//! ```ignore
//! let dispatcher = cqrs.create_message_dispatcher("accounts")?;
//! dispatcher.scan(&account)?;
//!
//! let open = cqrs.new_command("OpenAccount", vec![json!("acc-1")])?;
//! let events = dispatcher.send_command(&open)?.run_to_end();
//! ```

mod dispatcher;
mod dispatchers;

pub use dispatcher::MessageDispatcher;
pub use dispatchers::Dispatchers;
