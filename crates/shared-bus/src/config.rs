//! Bus configuration and bus-level errors.

use crate::{DEFAULT_CALL_TIMEOUT_SECS, DEFAULT_CHANNEL_CAPACITY};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Bus-level errors (not remote faults).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BusError {
    /// Another connection already owns the service name.
    #[error("service name already owned: {0}")]
    NameTaken(String),

    /// Service name is not a valid bus name.
    #[error("invalid service name: {0}")]
    InvalidName(String),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

/// In-process bus configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// Seconds a caller waits for a reply.
    pub call_timeout_secs: u64,
    /// Calls buffered per service.
    pub channel_capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            call_timeout_secs: DEFAULT_CALL_TIMEOUT_SECS,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl BusConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), BusError> {
        if self.call_timeout_secs == 0 {
            return Err(BusError::Config("call_timeout_secs must be > 0".into()));
        }
        if self.channel_capacity == 0 {
            return Err(BusError::Config("channel_capacity must be > 0".into()));
        }
        Ok(())
    }
}

/// Well-known names: two or more dot-separated elements of
/// `[A-Za-z0-9_-]`, not starting with a digit.
pub fn is_valid_service_name(name: &str) -> bool {
    if name.is_empty() || name.len() > 255 {
        return false;
    }
    let elements: Vec<&str> = name.split('.').collect();
    elements.len() >= 2
        && elements.iter().all(|element| {
            !element.is_empty()
                && !element.starts_with(|c: char| c.is_ascii_digit())
                && element
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        })
}
