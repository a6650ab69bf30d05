//! Bank account example: an account that handles commands and applies its
//! own events, and a ledger that subscribes to them.

mod account;
mod ledger;
mod messages;

pub use account::{Account, AccountState};
pub use ledger::Ledger;
pub use messages::{define_bank, AccountOpened, Deposit, Deposited, OpenAccount};
