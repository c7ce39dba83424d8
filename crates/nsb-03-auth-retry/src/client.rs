//! # Authorization Retry Client
//!
//! Wraps one remote call. If it fails with `AuthorizationRequired`, the
//! client asks the privilege broker for the action and, when granted, issues
//! the call a second time. The second outcome is returned as is, whatever it
//! is. Every other fault, a refused grant included, returns the first fault
//! unchanged.

use crate::broker::PrivilegeBroker;
use shared_bus::MethodCaller;
use shared_types::{FaultKind, FaultResult, MethodCall, MethodReply};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info};

pub struct AuthorizationRetryClient {
    broker: Arc<dyn PrivilegeBroker>,
    pid: u32,
}

impl AuthorizationRetryClient {
    /// Client obtaining grants for process `pid`.
    pub fn new(broker: Arc<dyn PrivilegeBroker>, pid: u32) -> Self {
        Self { broker, pid }
    }

    /// Client obtaining grants for the current process.
    pub fn for_current_process(broker: Arc<dyn PrivilegeBroker>) -> Self {
        Self::new(broker, std::process::id())
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Run `call`, retrying once after obtaining authorization.
    pub async fn call<F, Fut, T>(&self, call: F) -> FaultResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = FaultResult<T>>,
    {
        self.call_as(self.pid, call).await
    }

    /// Send `call` through `caller`, obtaining grants for the caller's own
    /// process.
    pub async fn call_via(&self, caller: &dyn MethodCaller, call: MethodCall) -> MethodReply {
        let pid = caller.identity().pid;
        self.call_as(pid, move || caller.call_method(call.clone()))
            .await
    }

    async fn call_as<F, Fut, T>(&self, pid: u32, call: F) -> FaultResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = FaultResult<T>>,
    {
        let fault = match call().await {
            Ok(value) => return Ok(value),
            Err(fault) => fault,
        };

        let FaultKind::AuthorizationRequired { action_id, .. } = &fault.kind else {
            return Err(fault);
        };

        debug!(action_id = %action_id, pid, "Call needs authorization, asking broker");
        if !self.broker.obtain(action_id, pid).await {
            info!(action_id = %action_id, pid, "Authorization refused");
            return Err(fault);
        }

        debug!(action_id = %action_id, "Authorization obtained, retrying");
        call().await
    }
}
