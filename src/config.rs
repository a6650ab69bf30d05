//! Registry configuration.
//!
//! Both switches default to off, which keeps multi-name bindings fail-fast
//! and lets commands without a handler pass silently.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::CqrsError;

pub const ATOMIC_BINDINGS_VAR: &str = "SOURCED_CQRS_ATOMIC_BINDINGS";
pub const STRICT_DELIVERY_VAR: &str = "SOURCED_CQRS_STRICT_DELIVERY";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CqrsConfig {
    /// Validate every name of a multi-name binding or scan before recording any.
    pub atomic_bindings: bool,
    /// Fail `send_command` when no handler is bound.
    pub strict_delivery: bool,
}

impl CqrsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn atomic_bindings(mut self, atomic: bool) -> Self {
        self.atomic_bindings = atomic;
        self
    }

    pub fn strict_delivery(mut self, strict: bool) -> Self {
        self.strict_delivery = strict;
        self
    }

    pub fn from_json(json: &str) -> Result<Self, CqrsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read the configuration from process environment variables.
    ///
    /// Only the two flag variables are read. A value that is not valid
    /// UTF-8 is ignored.
    pub fn from_env() -> Self {
        let vars = [ATOMIC_BINDINGS_VAR, STRICT_DELIVERY_VAR]
            .into_iter()
            .filter_map(|var| {
                let value = std::env::var_os(var)?;
                match value.into_string() {
                    Ok(value) => Some((var, value)),
                    Err(_) => {
                        warn!(var, "ignoring non UTF-8 flag");
                        None
                    }
                }
            });
        Self::from_vars(vars)
    }

    /// Read the configuration from `(name, value)` pairs.
    ///
    /// Unrecognised values are ignored and leave the default in place.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        for (key, value) in vars {
            let target = match key.as_ref() {
                ATOMIC_BINDINGS_VAR => &mut config.atomic_bindings,
                STRICT_DELIVERY_VAR => &mut config.strict_delivery,
                _ => continue,
            };
            match parse_flag(value.as_ref()) {
                Some(flag) => *target = flag,
                None => warn!(var = key.as_ref(), value = value.as_ref(), "ignoring invalid flag"),
            }
        }
        config
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
