//! Remote faults with bus error names.
//!
//! Every failure a caller can observe on the bus is a [`Fault`]: a kind that
//! maps to a well-known error name, plus a human readable message.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire error names
pub mod names {
    // Bus standard errors
    pub const UNKNOWN_METHOD: &str = "org.freedesktop.DBus.Error.UnknownMethod";
    pub const UNKNOWN_OBJECT: &str = "org.freedesktop.DBus.Error.UnknownObject";
    pub const INVALID_ARGS: &str = "org.freedesktop.DBus.Error.InvalidArgs";
    pub const INVALID_SIGNATURE: &str = "org.freedesktop.DBus.Error.InvalidSignature";
    pub const FAILED: &str = "org.freedesktop.DBus.Error.Failed";
    pub const SERVICE_UNKNOWN: &str = "org.freedesktop.DBus.Error.ServiceUnknown";
    pub const NO_REPLY: &str = "org.freedesktop.DBus.Error.NoReply";

    // Value codec
    pub const RANGE_OVERFLOW: &str = "org.nsbus.Error.RangeOverflow";

    // Privilege broker
    pub const NOT_AUTHORIZED: &str = "org.freedesktop.PolicyKit.Error.NotAuthorized";
}

/// Prefix every authorization result label carries.
pub const AUTH_RESULT_PREFIX: &str = "auth_";

/// Category of a fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaultKind {
    /// No such method, interface, or module (including failed auto-import).
    UnknownMethod,
    /// Reserved; dispatch reports unknown modules as `UnknownMethod`.
    UnknownObject,
    /// Argument shape or content is wrong.
    InvalidArgs,
    /// Type name or signature is not acceptable.
    InvalidSignature,
    /// Integer value outside the representable range.
    RangeOverflow,
    /// Caller must obtain authorization for `action_id` first.
    AuthorizationRequired { action_id: String, result: String },
    /// A method body reported an error.
    Failed,
    /// No service owns the destination name.
    ServiceUnknown,
    /// The call timed out or the service vanished.
    NoReply,
    /// Any other named fault, kept verbatim.
    Other(String),
}

/// A fault as observed by a remote caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    pub kind: FaultKind,
    pub message: String,
}

impl Fault {
    pub fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unknown_method(details: impl Into<String>) -> Self {
        Self::new(FaultKind::UnknownMethod, details)
    }

    pub fn unknown_object(details: impl Into<String>) -> Self {
        Self::new(FaultKind::UnknownObject, details)
    }

    pub fn invalid_args(details: impl Into<String>) -> Self {
        Self::new(FaultKind::InvalidArgs, details)
    }

    pub fn invalid_signature(details: impl Into<String>) -> Self {
        Self::new(FaultKind::InvalidSignature, details)
    }

    pub fn range_overflow(details: impl Into<String>) -> Self {
        Self::new(FaultKind::RangeOverflow, details)
    }

    /// The message body is `"<action_id> <result>"`.
    pub fn authorization_required(action_id: impl Into<String>, result: impl Into<String>) -> Self {
        let action_id = action_id.into();
        let result = result.into();
        let message = format!("{} {}", action_id, result);
        Self {
            kind: FaultKind::AuthorizationRequired { action_id, result },
            message,
        }
    }

    pub fn failed(details: impl Into<String>) -> Self {
        Self::new(FaultKind::Failed, details)
    }

    pub fn service_unknown(service: &str) -> Self {
        Self::new(
            FaultKind::ServiceUnknown,
            format!("The name {} was not provided by any service", service),
        )
    }

    pub fn no_reply(details: impl Into<String>) -> Self {
        Self::new(FaultKind::NoReply, details)
    }

    /// Full wire error name.
    pub fn name(&self) -> &str {
        match &self.kind {
            FaultKind::UnknownMethod => names::UNKNOWN_METHOD,
            FaultKind::UnknownObject => names::UNKNOWN_OBJECT,
            FaultKind::InvalidArgs => names::INVALID_ARGS,
            FaultKind::InvalidSignature => names::INVALID_SIGNATURE,
            FaultKind::RangeOverflow => names::RANGE_OVERFLOW,
            FaultKind::AuthorizationRequired { .. } => names::NOT_AUTHORIZED,
            FaultKind::Failed => names::FAILED,
            FaultKind::ServiceUnknown => names::SERVICE_UNKNOWN,
            FaultKind::NoReply => names::NO_REPLY,
            FaultKind::Other(name) => name,
        }
    }

    /// Last dotted component of the error name, e.g. `InvalidArgs`.
    pub fn short_name(&self) -> &str {
        let name = self.name();
        name.rsplit('.').next().unwrap_or(name)
    }

    /// Rebuild a fault from its wire name and message body.
    ///
    /// The privilege-broker fault is only recognized when the body is exactly
    /// two space separated tokens, the second an `auth_*` label. Anything else
    /// with that name stays an opaque [`FaultKind::Other`].
    pub fn from_wire(name: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let kind = match name {
            names::UNKNOWN_METHOD => FaultKind::UnknownMethod,
            names::UNKNOWN_OBJECT => FaultKind::UnknownObject,
            names::INVALID_ARGS => FaultKind::InvalidArgs,
            names::INVALID_SIGNATURE => FaultKind::InvalidSignature,
            names::RANGE_OVERFLOW => FaultKind::RangeOverflow,
            names::FAILED => FaultKind::Failed,
            names::SERVICE_UNKNOWN => FaultKind::ServiceUnknown,
            names::NO_REPLY => FaultKind::NoReply,
            names::NOT_AUTHORIZED => match parse_authorization_body(&message) {
                Some((action_id, result)) => FaultKind::AuthorizationRequired { action_id, result },
                None => FaultKind::Other(name.to_string()),
            },
            other => FaultKind::Other(other.to_string()),
        };
        Self { kind, message }
    }

    /// Whether a caller may resolve this fault by obtaining authorization.
    pub fn is_authorization_required(&self) -> bool {
        matches!(self.kind, FaultKind::AuthorizationRequired { .. })
    }
}

fn parse_authorization_body(message: &str) -> Option<(String, String)> {
    let mut tokens = message.split(' ');
    let action_id = tokens.next().filter(|t| !t.is_empty())?;
    let result = tokens.next().filter(|t| t.starts_with(AUTH_RESULT_PREFIX))?;
    if tokens.next().is_some() {
        return None;
    }
    Some((action_id.to_string(), result.to_string()))
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.name(), self.message)
    }
}

impl std::error::Error for Fault {}

impl Serialize for Fault {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("Fault", 2)?;
        state.serialize_field("name", self.name())?;
        state.serialize_field("message", &self.message)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for Fault {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct FaultHelper {
            name: String,
            message: String,
        }

        let helper = FaultHelper::deserialize(deserializer)?;
        Ok(Fault::from_wire(&helper.name, helper.message))
    }
}

/// Result type for remote operations
pub type FaultResult<T> = Result<T, Fault>;
