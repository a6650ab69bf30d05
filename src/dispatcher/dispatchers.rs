use std::sync::{Arc, RwLock};

use tracing::debug;

use super::dispatcher::MessageDispatcher;
use crate::error::CqrsError;

/// The dispatchers owned by one registry, unique by name.
#[derive(Clone, Default)]
pub struct Dispatchers {
    dispatchers: Arc<RwLock<Vec<MessageDispatcher>>>,
}

impl Dispatchers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new, empty dispatcher.
    pub fn create(&self, dispatcher: MessageDispatcher) -> Result<MessageDispatcher, CqrsError> {
        let mut dispatchers = self
            .dispatchers
            .write()
            .map_err(|_| CqrsError::LockPoisoned("create dispatcher"))?;

        if dispatchers.iter().any(|d| d.name() == dispatcher.name()) {
            return Err(CqrsError::DuplicateDispatcher(dispatcher.name().to_string()));
        }

        debug!(dispatcher = dispatcher.name(), "message dispatcher created");
        dispatchers.push(dispatcher.clone());
        Ok(dispatcher)
    }

    pub fn get(&self, name: &str) -> Result<MessageDispatcher, CqrsError> {
        let dispatchers = self
            .dispatchers
            .read()
            .map_err(|_| CqrsError::LockPoisoned("read"))?;

        dispatchers
            .iter()
            .find(|d| d.name() == name)
            .cloned()
            .ok_or_else(|| CqrsError::NotFound(name.to_string()))
    }

    /// Dispatcher names in creation order.
    pub fn names(&self) -> Result<Vec<String>, CqrsError> {
        let dispatchers = self
            .dispatchers
            .read()
            .map_err(|_| CqrsError::LockPoisoned("read"))?;
        Ok(dispatchers.iter().map(|d| d.name().to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique() {
        let dispatchers = Dispatchers::new();
        dispatchers.create(MessageDispatcher::new("a")).unwrap();
        dispatchers.create(MessageDispatcher::new("b")).unwrap();

        let result = dispatchers.create(MessageDispatcher::new("a"));
        assert!(matches!(result, Err(CqrsError::DuplicateDispatcher(ref n)) if n == "a"));
        assert_eq!(dispatchers.names().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn get_returns_the_registered_dispatcher() {
        let dispatchers = Dispatchers::new();
        let created = dispatchers.create(MessageDispatcher::new("a").strict(true)).unwrap();
        let found = dispatchers.get("a").unwrap();
        assert_eq!(found.name(), created.name());

        assert!(matches!(dispatchers.get("missing"), Err(CqrsError::NotFound(ref n)) if n == "missing"));
    }
}
