//! Outbound Ports (Driven Ports)
//!
//! Module definitions come from a `ModuleLoader`; every dispatched call is
//! checked with an `Authorizer` first.

use crate::domain::{Module, NamespaceError};
use async_trait::async_trait;
use shared_types::CallerIdentity;

/// Source of module definitions.
#[async_trait]
pub trait ModuleLoader: Send + Sync {
    /// Produce the module called `name` (`::`-separated).
    async fn load(&self, name: &str) -> Result<Module, NamespaceError>;

    /// Whether `name` could be loaded, without loading it.
    fn knows(&self, name: &str) -> bool;
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthDecision {
    Granted,
    /// Denied with an `auth_*` result label the caller can act on.
    Denied { result: String },
}

/// Decides whether a caller may perform an action.
#[async_trait]
pub trait Authorizer: Send + Sync {
    async fn check(&self, caller: &CallerIdentity, action_id: &str) -> AuthDecision;
}

/// Authorizer that grants everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

#[async_trait]
impl Authorizer for AllowAll {
    async fn check(&self, _caller: &CallerIdentity, _action_id: &str) -> AuthDecision {
        AuthDecision::Granted
    }
}
