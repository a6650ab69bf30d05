use std::fmt;

use crate::message::MessageKind;

/// Error type for every registration, binding and dispatch operation.
///
/// All variants are raised synchronously by the call that detected the
/// problem. Nothing is retried or recovered internally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CqrsError {
    /// A message with this name is already defined for the kind.
    DuplicateDefinition { kind: MessageKind, name: String },
    /// No message with this name is defined for the kind.
    UnknownMessage { kind: MessageKind, name: String },
    /// The handler is missing or has the wrong shape for the binding.
    InvalidHandlerShape { name: String, reason: String },
    /// The event is already applied (or subscribed) by the same object.
    ExclusivityViolation { name: String },
    /// Argument or parameter count does not match the message definition.
    ArityMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
    /// A dispatcher with this name already exists.
    DuplicateDispatcher(String),
    /// No dispatcher with this name exists.
    NotFound(String),
    /// The command is already bound to a handler in this dispatcher.
    DuplicateHandler(String),
    /// No handler is bound for the command (strict delivery only).
    Unrouted(String),
    /// Field values could not be converted to or from a typed message.
    Decode(String),
    LockPoisoned(&'static str),
}

impl fmt::Display for CqrsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CqrsError::DuplicateDefinition { kind, name } => {
                write!(f, "{} is already defined {{{}}}", kind, name)
            }
            CqrsError::UnknownMessage { kind, name } => {
                write!(f, "no {} with this name is defined {{{}}}", kind, name)
            }
            CqrsError::InvalidHandlerShape { name, reason } => {
                write!(f, "invalid handler for {{{}}}: {}", name, reason)
            }
            CqrsError::ExclusivityViolation { name } => write!(
                f,
                "an event can only be applied or subscribed by one object but not both {{{}}}",
                name
            ),
            CqrsError::ArityMismatch {
                name,
                expected,
                actual,
            } => write!(
                f,
                "wrong count of arguments for {{{}}}: {} expected, but {} given",
                name, expected, actual
            ),
            CqrsError::DuplicateDispatcher(name) => {
                write!(f, "message dispatcher with same name exists {{{}}}", name)
            }
            CqrsError::NotFound(name) => {
                write!(f, "message dispatcher with this name does not exist {{{}}}", name)
            }
            CqrsError::DuplicateHandler(name) => {
                write!(f, "command handler already registered for {{{}}}", name)
            }
            CqrsError::Unrouted(name) => write!(f, "no command handler bound for {{{}}}", name),
            CqrsError::Decode(message) => write!(f, "decode failed: {}", message),
            CqrsError::LockPoisoned(operation) => {
                write!(f, "registry lock poisoned during {}", operation)
            }
        }
    }
}

impl std::error::Error for CqrsError {}

impl From<serde_json::Error> for CqrsError {
    fn from(err: serde_json::Error) -> Self {
        CqrsError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_message() {
        let err = CqrsError::DuplicateDefinition {
            kind: MessageKind::Command,
            name: "Create".into(),
        };
        assert_eq!(err.to_string(), "command is already defined {Create}");

        let err = CqrsError::ArityMismatch {
            name: "Created".into(),
            expected: 1,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "wrong count of arguments for {Created}: 1 expected, but 2 given"
        );
    }

    #[test]
    fn serde_errors_become_decode_errors() {
        let err: CqrsError = serde_json::from_str::<u32>("\"nope\"").unwrap_err().into();
        assert!(matches!(err, CqrsError::Decode(_)));
    }
}
