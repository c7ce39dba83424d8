//! Domain types: modules, configuration, action ids and introspection.
//!
//! Nothing here performs I/O.

pub mod action;
pub mod config;
pub mod error;
pub mod introspection;
pub mod module;

pub use action::{action_id_for, make_valid_action_id, MAX_ACTION_ID_LEN};
pub use config::{ConfigError, NamespaceConfig};
pub use error::NamespaceError;
pub use module::{MethodHandler, Module, ModuleMethod, ModuleState};
