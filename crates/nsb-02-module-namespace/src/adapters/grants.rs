//! In-memory grant table authorizer.
//!
//! Grants are `(pid, action_id)` pairs. A caller without a matching grant is
//! denied with `auth_admin`, which a privilege broker can satisfy by adding
//! the grant.

use crate::ports::{AuthDecision, Authorizer};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::CallerIdentity;
use std::collections::HashSet;
use tracing::debug;

/// Result label reported for missing grants.
pub const DEFAULT_DENIAL: &str = "auth_admin";

#[derive(Debug, Default)]
pub struct GrantTableAuthorizer {
    grants: RwLock<HashSet<(u32, String)>>,
    /// Actions anyone may perform.
    public: RwLock<HashSet<String>>,
}

impl GrantTableAuthorizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&self, pid: u32, action_id: &str) {
        debug!(pid, action_id = %action_id, "Grant added");
        self.grants.write().insert((pid, action_id.to_string()));
    }

    pub fn revoke(&self, pid: u32, action_id: &str) -> bool {
        self.grants.write().remove(&(pid, action_id.to_string()))
    }

    /// Allow an action for every caller.
    pub fn allow_everyone(&self, action_id: &str) {
        self.public.write().insert(action_id.to_string());
    }

    pub fn is_granted(&self, pid: u32, action_id: &str) -> bool {
        self.public.read().contains(action_id)
            || self.grants.read().contains(&(pid, action_id.to_string()))
    }
}

#[async_trait]
impl Authorizer for GrantTableAuthorizer {
    async fn check(&self, caller: &CallerIdentity, action_id: &str) -> AuthDecision {
        if self.is_granted(caller.pid, action_id) {
            AuthDecision::Granted
        } else {
            AuthDecision::Denied {
                result: DEFAULT_DENIAL.to_string(),
            }
        }
    }
}
