//! Definition registry: the command and event namespaces.

mod definitions;

pub use definitions::DefinitionRegistry;
