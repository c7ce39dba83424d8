//! Daemon configuration: an optional JSON file, then environment overrides.
//!
//! | Variable                   | Effect                                          |
//! |----------------------------|-------------------------------------------------|
//! | `NSB_CONFIG`               | JSON file with a full or partial `DaemonConfig` |
//! | `NSB_NAMESPACE`            | rederive every name from this namespace         |
//! | `NSB_SERVICE_NAME`         | override the bus name                           |
//! | `NSB_PRELOAD`              | comma-separated modules to register at startup  |
//! | `NSB_MAX_CONCURRENT_CALLS` | bound on calls served at once                   |
//! | `NSB_CALL_TIMEOUT_SECS`    | bus call timeout                                |
//! | `NSB_AUTH_POLICY`          | `allow-all` or `grant-table`                    |

use nsb_02_module_namespace::NamespaceConfig;
use serde::{Deserialize, Serialize};
use shared_bus::BusConfig;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

/// How calls are authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthPolicy {
    #[default]
    AllowAll,
    GrantTable,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    pub namespace: NamespaceConfig,
    pub bus: BusConfig,
    pub auth_policy: AuthPolicy,
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{var}={value} is not valid")]
    InvalidValue { var: &'static str, value: String },
}

/// Load configuration from the process environment.
pub fn load_config() -> Result<DaemonConfig, ConfigLoadError> {
    load_config_from(|var| std::env::var(var).ok())
}

/// Load configuration, reading variables through `env`.
pub fn load_config_from(
    env: impl Fn(&str) -> Option<String>,
) -> Result<DaemonConfig, ConfigLoadError> {
    let mut config = match env("NSB_CONFIG") {
        Some(path) => read_file(PathBuf::from(path))?,
        None => DaemonConfig::default(),
    };

    if let Some(namespace) = env("NSB_NAMESPACE") {
        let preload = std::mem::take(&mut config.namespace.preload);
        let max_concurrent_calls = config.namespace.max_concurrent_calls;
        config.namespace = NamespaceConfig::for_namespace(&namespace);
        config.namespace.preload = preload;
        config.namespace.max_concurrent_calls = max_concurrent_calls;
        info!("Namespace set from environment: {}", namespace);
    }

    if let Some(name) = env("NSB_SERVICE_NAME") {
        config.namespace.service_name = name;
    }

    if let Some(list) = env("NSB_PRELOAD") {
        config.namespace.preload = list
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect();
    }

    if let Some(value) = env("NSB_MAX_CONCURRENT_CALLS") {
        config.namespace.max_concurrent_calls = parse("NSB_MAX_CONCURRENT_CALLS", value)?;
    }

    if let Some(value) = env("NSB_CALL_TIMEOUT_SECS") {
        config.bus.call_timeout_secs = parse("NSB_CALL_TIMEOUT_SECS", value)?;
    }

    if let Some(value) = env("NSB_AUTH_POLICY") {
        config.auth_policy = match value.as_str() {
            "allow-all" => AuthPolicy::AllowAll,
            "grant-table" => AuthPolicy::GrantTable,
            _ => {
                return Err(ConfigLoadError::InvalidValue {
                    var: "NSB_AUTH_POLICY",
                    value,
                })
            }
        };
    }

    Ok(config)
}

fn read_file(path: PathBuf) -> Result<DaemonConfig, ConfigLoadError> {
    let text = std::fs::read_to_string(&path).map_err(|source| ConfigLoadError::Read {
        path: path.clone(),
        source,
    })?;
    let config = serde_json::from_str(&text)
        .map_err(|source| ConfigLoadError::Parse { path: path.clone(), source })?;
    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

fn parse<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigLoadError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigLoadError::InvalidValue { var, value })
}
