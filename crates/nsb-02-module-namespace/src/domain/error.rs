//! Service-level errors. Faults returned to bus callers are `shared_types::Fault`.

use super::config::ConfigError;
use shared_bus::BusError;
use thiserror::Error;

/// Namespace service errors
#[derive(Debug, Error)]
pub enum NamespaceError {
    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The bus refused the service name
    #[error("bus error: {0}")]
    Bus(#[from] BusError),

    /// No module of that name is available
    #[error("module not found: {0}")]
    ModuleNotFound(String),

    /// The module exists but could not be loaded
    #[error("failed to load module {name}: {reason}")]
    LoadFailed { name: String, reason: String },
}

impl NamespaceError {
    pub fn load_failed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LoadFailed {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
