use serde::{Deserialize, Serialize};
use sourced_cqrs::{Cqrs, CqrsError, Definition, MessageType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, MessageType)]
pub struct OpenAccount {
    pub id: String,
    pub owner: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, MessageType)]
pub struct Deposit {
    pub id: String,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, MessageType)]
#[message(name = "AccountOpened")]
pub struct AccountOpened {
    pub id: String,
    pub owner: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, MessageType)]
pub struct Deposited {
    pub id: String,
    pub amount: u64,
}

/// Register every bank message on `cqrs`.
pub fn define_bank(cqrs: &Cqrs) -> Result<(), CqrsError> {
    cqrs.define_command(Definition::typed::<OpenAccount>())?;
    cqrs.define_command(Definition::typed::<Deposit>())?;
    cqrs.define_event(Definition::typed::<AccountOpened>())?;
    cqrs.define_event(Definition::typed::<Deposited>())?;
    cqrs.define_event(Definition::fields("AccountClosed", ["id", "reason"]))?;
    Ok(())
}
