//! # In-Memory System Bus
//!
//! Owns the service-name table. Each owned name maps to the mailbox of one
//! `ServiceEndpoint`; connections route calls through it.

use crate::config::{is_valid_service_name, BusConfig, BusError};
use crate::connection::BusConnection;
use crate::endpoint::{IncomingCall, ServiceEndpoint};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use shared_types::{CallerIdentity, Fault, MethodCall, MethodReply};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

pub(crate) struct BusInner {
    pub(crate) config: BusConfig,
    services: DashMap<String, mpsc::Sender<IncomingCall>>,
    next_connection: AtomicU64,
    calls_routed: AtomicU64,
}

impl BusInner {
    /// Deliver a call to the owner of its destination.
    pub(crate) async fn route(
        &self,
        call: MethodCall,
    ) -> Result<oneshot::Receiver<MethodReply>, Fault> {
        // Clone the sender so no map guard is held across the await.
        let sender = self
            .services
            .get(&call.destination)
            .map(|entry| entry.value().clone());
        let Some(sender) = sender else {
            debug!(destination = %call.destination, "No owner for destination");
            return Err(Fault::service_unknown(&call.destination));
        };

        let destination = call.destination.clone();
        let (reply_tx, reply_rx) = oneshot::channel();
        if sender.send(IncomingCall::new(call, reply_tx)).await.is_err() {
            warn!(destination = %destination, "Service endpoint closed");
            return Err(Fault::service_unknown(&destination));
        }

        self.calls_routed.fetch_add(1, Ordering::Relaxed);
        Ok(reply_rx)
    }

    /// Drop the name if it still belongs to `sender`'s channel.
    pub(crate) fn release(&self, name: &str, sender: &mpsc::Sender<IncomingCall>) {
        if self
            .services
            .remove_if(name, |_, owner| owner.same_channel(sender))
            .is_some()
        {
            info!("[Bus] Released service name {}", name);
        }
    }
}

/// In-process system bus.
///
/// Cheap to clone; all clones share the same name table.
#[derive(Clone)]
pub struct InMemorySystemBus {
    inner: Arc<BusInner>,
}

impl InMemorySystemBus {
    /// Create a bus with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(BusConfig::default())
    }

    #[must_use]
    pub fn with_config(config: BusConfig) -> Self {
        Self {
            inner: Arc::new(BusInner {
                config,
                services: DashMap::new(),
                next_connection: AtomicU64::new(1),
                calls_routed: AtomicU64::new(0),
            }),
        }
    }

    /// Open a connection on behalf of process `pid`.
    pub fn connect(&self, pid: u32) -> BusConnection {
        let n = self.inner.next_connection.fetch_add(1, Ordering::Relaxed);
        let identity = CallerIdentity::new(format!(":1.{}", n), pid);
        debug!(unique_name = %identity.unique_name, pid, "Connection opened");
        BusConnection::new(self.inner.clone(), identity)
    }

    /// Take ownership of a well-known service name.
    ///
    /// A name whose previous endpoint was dropped can be claimed again.
    pub fn request_name(&self, name: &str) -> Result<ServiceEndpoint, BusError> {
        if !is_valid_service_name(name) {
            return Err(BusError::InvalidName(name.to_string()));
        }

        let (tx, rx) = mpsc::channel(self.inner.config.channel_capacity);
        match self.inner.services.entry(name.to_string()) {
            Entry::Occupied(mut occupied) => {
                if !occupied.get().is_closed() {
                    return Err(BusError::NameTaken(name.to_string()));
                }
                occupied.insert(tx.clone());
            }
            Entry::Vacant(vacant) => {
                vacant.insert(tx.clone());
            }
        }

        info!("[Bus] Service name {} acquired", name);
        Ok(ServiceEndpoint::new(
            name.to_string(),
            rx,
            tx,
            self.inner.clone(),
        ))
    }

    /// Whether some live endpoint owns `name`.
    pub fn has_owner(&self, name: &str) -> bool {
        self.inner
            .services
            .get(name)
            .map(|sender| !sender.is_closed())
            .unwrap_or(false)
    }

    /// Total calls delivered to services.
    pub fn calls_routed(&self) -> u64 {
        self.inner.calls_routed.load(Ordering::Relaxed)
    }

    pub fn config(&self) -> &BusConfig {
        &self.inner.config
    }
}

impl Default for InMemorySystemBus {
    fn default() -> Self {
        Self::new()
    }
}
