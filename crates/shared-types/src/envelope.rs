//! # Method-Call Envelope
//!
//! A method call as delivered by the bus: destination service, object path,
//! interface, member, arguments, and who sent it.

use crate::errors::Fault;
use crate::wire::WireValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Standard introspection interface every object answers.
pub const INTROSPECTABLE_INTERFACE: &str = "org.freedesktop.DBus.Introspectable";

/// Serial number correlating a call with its reply.
///
/// UUID v7 so serials sort by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallSerial(pub Uuid);

impl CallSerial {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CallSerial {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CallSerial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of the connection that sent a call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallerIdentity {
    /// Unique bus name, e.g. `:1.42`.
    pub unique_name: String,
    /// Process id of the peer.
    pub pid: u32,
}

impl CallerIdentity {
    pub fn new(unique_name: impl Into<String>, pid: u32) -> Self {
        Self {
            unique_name: unique_name.into(),
            pid,
        }
    }
}

/// A method call addressed to an object on a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub serial: CallSerial,
    pub sender: CallerIdentity,
    pub destination: String,
    pub path: String,
    pub interface: String,
    pub member: String,
    pub args: Vec<WireValue>,
}

impl MethodCall {
    pub fn new(
        sender: CallerIdentity,
        destination: impl Into<String>,
        path: impl Into<String>,
        interface: impl Into<String>,
        member: impl Into<String>,
        args: Vec<WireValue>,
    ) -> Self {
        Self {
            serial: CallSerial::new(),
            sender,
            destination: destination.into(),
            path: path.into(),
            interface: interface.into(),
            member: member.into(),
            args,
        }
    }

    /// Argument signature, concatenated.
    pub fn signature(&self) -> String {
        self.args.iter().map(WireValue::signature).collect()
    }
}

/// Reply body or fault.
pub type MethodReply = Result<Vec<WireValue>, Fault>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serials_are_unique() {
        assert_ne!(CallSerial::new(), CallSerial::new());
    }

    #[test]
    fn test_call_signature() {
        let call = MethodCall::new(
            CallerIdentity::new(":1.1", 100),
            "org.nsbus.modules",
            "/org/nsbus/modules/Echo",
            "org.nsbus.Values",
            "ParamInteger",
            vec![WireValue::Int32(7), WireValue::string("x")],
        );
        assert_eq!(call.signature(), "is");
    }
}
