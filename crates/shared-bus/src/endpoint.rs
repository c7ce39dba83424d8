//! # Service Endpoint
//!
//! The serving side of a well-known name: a mailbox of incoming calls, each
//! carrying the channel its reply goes back on.

use crate::bus::BusInner;
use shared_types::{MethodCall, MethodReply};
use std::fmt;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// A call waiting for a reply.
#[derive(Debug)]
pub struct IncomingCall {
    pub call: MethodCall,
    reply_tx: oneshot::Sender<MethodReply>,
}

impl IncomingCall {
    pub(crate) fn new(call: MethodCall, reply_tx: oneshot::Sender<MethodReply>) -> Self {
        Self { call, reply_tx }
    }

    /// Send the reply. Returns false if the caller already gave up.
    pub fn reply(self, reply: MethodReply) -> bool {
        let serial = self.call.serial;
        match self.reply_tx.send(reply) {
            Ok(()) => true,
            Err(_) => {
                debug!(serial = %serial, member = %self.call.member, "Caller gone before reply");
                false
            }
        }
    }
}

/// Owned service name and its incoming call queue.
///
/// Dropping the endpoint releases the name.
pub struct ServiceEndpoint {
    name: String,
    receiver: mpsc::Receiver<IncomingCall>,
    sender: mpsc::Sender<IncomingCall>,
    bus: Arc<BusInner>,
}

impl ServiceEndpoint {
    pub(crate) fn new(
        name: String,
        receiver: mpsc::Receiver<IncomingCall>,
        sender: mpsc::Sender<IncomingCall>,
        bus: Arc<BusInner>,
    ) -> Self {
        Self {
            name,
            receiver,
            sender,
            bus,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Next call addressed to this service.
    ///
    /// Never returns `None` while the endpoint is alive, since it holds a
    /// sender of its own mailbox.
    pub async fn next_call(&mut self) -> Option<IncomingCall> {
        self.receiver.recv().await
    }
}

impl fmt::Debug for ServiceEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceEndpoint")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Drop for ServiceEndpoint {
    fn drop(&mut self) {
        self.receiver.close();
        self.bus.release(&self.name, &self.sender);
    }
}

#[cfg(test)]
mod tests {
    use crate::InMemorySystemBus;
    use shared_types::{FaultKind, WireValue};

    #[tokio::test]
    async fn test_reply_reaches_caller() {
        let bus = InMemorySystemBus::new();
        let mut endpoint = bus.request_name("org.test.svc").unwrap();
        let conn = bus.connect(1);

        let server = tokio::spawn(async move {
            let incoming = endpoint.next_call().await.unwrap();
            assert_eq!(incoming.call.member, "Ping");
            incoming.reply(Ok(vec![WireValue::Boolean(true)]))
        });

        let reply = conn
            .call("org.test.svc", "/", "org.test.Iface", "Ping", vec![])
            .await;
        assert_eq!(reply, Ok(vec![WireValue::Boolean(true)]));
        assert!(server.await.unwrap());
    }

    #[test]
    fn test_debug_shows_name() {
        let bus = InMemorySystemBus::new();
        let endpoint = bus.request_name("org.test.svc").unwrap();
        assert!(format!("{:?}", endpoint).contains("org.test.svc"));
    }

    #[tokio::test]
    async fn test_dropped_call_is_no_reply() {
        let bus = InMemorySystemBus::new();
        let mut endpoint = bus.request_name("org.test.svc").unwrap();
        let conn = bus.connect(1);

        tokio::spawn(async move {
            let incoming = endpoint.next_call().await.unwrap();
            drop(incoming);
            // keep the name owned until the caller has seen the drop
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        });

        let reply = conn
            .call("org.test.svc", "/", "org.test.Iface", "Ping", vec![])
            .await;
        assert_eq!(reply.unwrap_err().kind, FaultKind::NoReply);
    }
}
