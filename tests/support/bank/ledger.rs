use std::sync::{Arc, Mutex};

use sourced_cqrs::{Handler, HandlerBindings};

/// Downstream observer of account events.
#[derive(Default)]
pub struct Ledger {
    pub bindings: HandlerBindings,
    entries: Arc<Mutex<Vec<String>>>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    fn on_opened(&self) -> Handler {
        let entries = Arc::clone(&self.entries);
        Handler::positional(2, move |args| {
            entries
                .lock()
                .unwrap()
                .push(format!("opened {} for {}", args[0], args[1]));
        })
    }

    fn on_deposited(&self) -> Handler {
        let entries = Arc::clone(&self.entries);
        Handler::positional(2, move |args| {
            entries
                .lock()
                .unwrap()
                .push(format!("deposited {} into {}", args[1], args[0]));
        })
    }

    // Takes one argument; "AccountClosed" has two fields.
    fn on_closed(&self) -> Handler {
        Handler::positional(1, |_| {})
    }
}

sourced_cqrs::handlers!(Ledger, bindings {
    "AccountOpened" => on_opened,
    "Deposited" => on_deposited,
    "AccountClosed" => on_closed,
});
