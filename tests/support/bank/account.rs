use std::sync::{Arc, Mutex};

use sourced_cqrs::{Handler, HandlerBindings, HandlerHost, Message, MessageKind, Resumption};

use super::messages::{AccountOpened, Deposit, Deposited, OpenAccount};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountState {
    pub id: String,
    pub owner: String,
    pub balance: u64,
    pub opened: bool,
}

/// Handles account commands by yielding events, and applies those events
/// to its own state.
#[derive(Default)]
pub struct Account {
    pub bindings: HandlerBindings,
    state: Arc<Mutex<AccountState>>,
}

impl Account {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AccountState {
        self.state.lock().unwrap().clone()
    }

    /// Apply an event through the account's own handler.
    pub fn apply(&self, event: &Message) {
        if let Some(handler) = self.handler(event.name()) {
            handler.invoke(event);
        }
    }

    fn open(&self) -> Handler {
        Handler::resumable(|command| {
            let open: OpenAccount = command.decode().unwrap();
            let opened = AccountOpened {
                id: open.id,
                owner: open.owner,
            };
            Resumption::new(vec![
                Message::from_typed(MessageKind::Event, &opened).unwrap()
            ])
        })
    }

    fn deposit(&self) -> Handler {
        let state = Arc::clone(&self.state);
        Handler::resumable(move |command| {
            let deposit: Deposit = command.decode().unwrap();
            let opened = state.lock().unwrap().opened;
            let mut pending = opened.then(|| Deposited {
                id: deposit.id,
                amount: deposit.amount,
            });
            Resumption::from_fn(move || {
                pending
                    .take()
                    .map(|event| Message::from_typed(MessageKind::Event, &event).unwrap())
            })
        })
    }

    fn on_opened(&self) -> Handler {
        let state = Arc::clone(&self.state);
        Handler::plain(move |event| {
            let opened: AccountOpened = event.decode().unwrap();
            let mut state = state.lock().unwrap();
            state.id = opened.id;
            state.owner = opened.owner;
            state.opened = true;
        })
    }

    fn on_deposited(&self) -> Handler {
        let state = Arc::clone(&self.state);
        Handler::plain(move |event| {
            let deposited: Deposited = event.decode().unwrap();
            state.lock().unwrap().balance += deposited.amount;
        })
    }
}

sourced_cqrs::handlers!(Account, bindings {
    "OpenAccount" => open,
    "Deposit" => deposit,
    "AccountOpened" => on_opened,
    "Deposited" => on_deposited,
});
