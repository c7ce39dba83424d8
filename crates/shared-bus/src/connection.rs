//! # Bus Connection
//!
//! The calling side of the bus.

use crate::bus::BusInner;
use async_trait::async_trait;
use shared_types::{CallerIdentity, Fault, MethodCall, MethodReply, WireValue};
use std::sync::Arc;
use tracing::{debug, warn};

/// Anything that can carry a method call to a service and bring back the
/// reply.
#[async_trait]
pub trait MethodCaller: Send + Sync {
    /// Identity calls are sent under.
    fn identity(&self) -> &CallerIdentity;

    /// Send a call and wait for its reply.
    async fn call_method(&self, call: MethodCall) -> MethodReply;
}

/// A client connection to the bus.
#[derive(Clone)]
pub struct BusConnection {
    bus: Arc<BusInner>,
    identity: CallerIdentity,
}

impl BusConnection {
    pub(crate) fn new(bus: Arc<BusInner>, identity: CallerIdentity) -> Self {
        Self { bus, identity }
    }

    /// Build and send a call from this connection.
    pub async fn call(
        &self,
        destination: &str,
        path: &str,
        interface: &str,
        member: &str,
        args: Vec<WireValue>,
    ) -> MethodReply {
        let call = MethodCall::new(
            self.identity.clone(),
            destination,
            path,
            interface,
            member,
            args,
        );
        self.call_method(call).await
    }
}

#[async_trait]
impl MethodCaller for BusConnection {
    fn identity(&self) -> &CallerIdentity {
        &self.identity
    }

    async fn call_method(&self, call: MethodCall) -> MethodReply {
        let serial = call.serial;
        let member = call.member.clone();
        let timeout = self.bus.config.call_timeout();

        debug!(
            serial = %serial,
            destination = %call.destination,
            path = %call.path,
            member = %member,
            "Sending method call"
        );

        let reply_rx = self.bus.route(call).await?;
        match tokio::time::timeout(timeout, reply_rx).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(_)) => Err(Fault::no_reply(format!(
                "service dropped call {} without replying",
                member
            ))),
            Err(_) => {
                warn!(serial = %serial, member = %member, "Call timed out");
                Err(Fault::no_reply(format!(
                    "did not receive a reply to {} within {}s",
                    member,
                    timeout.as_secs()
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BusConfig, InMemorySystemBus};
    use shared_types::FaultKind;

    #[tokio::test]
    async fn test_unknown_service() {
        let bus = InMemorySystemBus::new();
        let conn = bus.connect(1);
        let err = conn
            .call("org.nobody.home", "/", "org.x.Y", "Z", vec![])
            .await
            .unwrap_err();
        assert_eq!(err.kind, FaultKind::ServiceUnknown);
        assert!(err.message.contains("org.nobody.home"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_timeout() {
        let bus = InMemorySystemBus::with_config(BusConfig {
            call_timeout_secs: 1,
            ..Default::default()
        });
        // Owned but never served.
        let _endpoint = bus.request_name("org.slow.svc").unwrap();
        let conn = bus.connect(1);

        let err = conn
            .call("org.slow.svc", "/", "org.x.Y", "Z", vec![])
            .await
            .unwrap_err();
        assert_eq!(err.kind, FaultKind::NoReply);
        assert_eq!(bus.calls_routed(), 1);
    }

    #[tokio::test]
    async fn test_sender_identity_delivered() {
        let bus = InMemorySystemBus::new();
        let mut endpoint = bus.request_name("org.test.svc").unwrap();
        let conn = bus.connect(4242);
        let expected = conn.identity().clone();

        let server = tokio::spawn(async move {
            let incoming = endpoint.next_call().await.unwrap();
            let sender = incoming.call.sender.clone();
            incoming.reply(Ok(vec![]));
            sender
        });

        conn.call("org.test.svc", "/", "org.x.Y", "Z", vec![])
            .await
            .unwrap();
        assert_eq!(server.await.unwrap(), expected);
    }
}
