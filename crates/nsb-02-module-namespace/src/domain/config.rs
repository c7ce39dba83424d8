//! Namespace service configuration with validation.

use serde::{Deserialize, Serialize};
use shared_bus::config::is_valid_service_name;
use shared_types::grammar::is_valid_object_path;
use thiserror::Error;

/// Namespace used when nothing else is configured.
pub const DEFAULT_NAMESPACE: &str = "org.nsbus";

/// Default bound on calls served at once.
pub const DEFAULT_MAX_CONCURRENT_CALLS: usize = 64;

/// Configuration of one namespace service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NamespaceConfig {
    /// Well-known bus name the service owns.
    pub service_name: String,
    /// Object path all modules live under.
    pub root_path: String,
    /// Interface carrying native-convention calls.
    pub native_interface: String,
    /// Interface carrying boxed-convention calls.
    pub boxed_interface: String,
    /// Management interface served on the root path.
    pub manager_interface: String,
    /// Action id prefix for module method calls.
    pub action_prefix: String,
    /// Action id prefix for management calls.
    pub manager_action_prefix: String,
    /// Modules registered (not loaded) at startup.
    pub preload: Vec<String>,
    /// Upper bound on calls served at once.
    pub max_concurrent_calls: usize,
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self::for_namespace(DEFAULT_NAMESPACE)
    }
}

impl NamespaceConfig {
    /// Derive every name from a dotted namespace such as `org.example`.
    ///
    /// `org.example` serves `org.example.modules` at `/org/example/modules`
    /// with interfaces `org.example.Values`, `org.example.BoxedValues` and
    /// `org.example.ModuleManager`.
    pub fn for_namespace(namespace: &str) -> Self {
        let root_path = format!("/{}/modules", namespace.replace('.', "/"));
        Self {
            service_name: format!("{}.modules", namespace),
            root_path,
            native_interface: format!("{}.Values", namespace),
            boxed_interface: format!("{}.BoxedValues", namespace),
            manager_interface: format!("{}.ModuleManager", namespace),
            action_prefix: format!("{}.modules", namespace),
            manager_action_prefix: format!("{}.modulemanager", namespace),
            preload: Vec::new(),
            max_concurrent_calls: DEFAULT_MAX_CONCURRENT_CALLS,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_service_name(&self.service_name) {
            return Err(ConfigError::InvalidName(format!(
                "service_name '{}'",
                self.service_name
            )));
        }
        if !is_valid_object_path(&self.root_path) {
            return Err(ConfigError::InvalidRootPath(self.root_path.clone()));
        }

        let interfaces = [
            &self.native_interface,
            &self.boxed_interface,
            &self.manager_interface,
        ];
        for interface in interfaces {
            if !is_valid_service_name(interface) {
                return Err(ConfigError::InvalidName(format!("interface '{}'", interface)));
            }
        }
        if self.native_interface == self.boxed_interface
            || self.native_interface == self.manager_interface
            || self.boxed_interface == self.manager_interface
        {
            return Err(ConfigError::DuplicateInterfaces);
        }

        if self.action_prefix.is_empty() || self.manager_action_prefix.is_empty() {
            return Err(ConfigError::InvalidName("action prefix cannot be empty".into()));
        }
        if self.preload.iter().any(|name| name.trim().is_empty()) {
            return Err(ConfigError::InvalidPreload);
        }
        if self.max_concurrent_calls == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_concurrent_calls cannot be 0".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A bus or interface name does not follow the name grammar
    #[error("invalid name: {0}")]
    InvalidName(String),
    /// Root path is not an object path
    #[error("invalid root path: {0}")]
    InvalidRootPath(String),
    /// Two conventions or the manager share an interface
    #[error("interfaces must be distinct")]
    DuplicateInterfaces,
    /// Preload list holds an empty module name
    #[error("preload list contains an empty module name")]
    InvalidPreload,
    /// Invalid size or count limit
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
}
