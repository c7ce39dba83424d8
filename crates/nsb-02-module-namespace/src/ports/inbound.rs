//! Inbound Ports (Driving Ports)

use async_trait::async_trait;
use shared_types::{MethodCall, MethodReply};

/// The namespace as seen by whatever delivers calls to it.
#[async_trait]
pub trait NamespaceApi: Send + Sync {
    /// Serve one method call addressed to the namespace.
    async fn invoke(&self, call: &MethodCall) -> MethodReply;

    /// Load a module by name. Idempotent; failure is `false`.
    async fn import(&self, name: &str) -> bool;
}
