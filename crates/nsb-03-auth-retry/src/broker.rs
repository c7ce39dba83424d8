//! The privilege broker port.

use async_trait::async_trait;

/// Grants (or refuses) an action to a process. Opaque to the client: a
/// refusal is final and is never retried.
#[async_trait]
pub trait PrivilegeBroker: Send + Sync {
    async fn obtain(&self, action_id: &str, pid: u32) -> bool;
}

#[async_trait]
impl<F> PrivilegeBroker for F
where
    F: Fn(&str, u32) -> bool + Send + Sync,
{
    async fn obtain(&self, action_id: &str, pid: u32) -> bool {
        self(action_id, pid)
    }
}
