//! Bus adapter for the namespace service.
//!
//! Owns the service's well-known name, takes calls off its mailbox and serves
//! each on its own task. At most `max_concurrent_calls` run at once; further
//! calls wait in the mailbox.

use crate::domain::{NamespaceConfig, NamespaceError};
use crate::ports::NamespaceApi;
use shared_bus::{IncomingCall, InMemorySystemBus, ServiceEndpoint};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Notify, Semaphore};
use tracing::{debug, error, info};

pub struct NamespaceBusAdapter<S>
where
    S: NamespaceApi + 'static,
{
    service: Arc<S>,
    limit: Arc<Semaphore>,
    shutdown: Notify,
    served: AtomicU64,
}

impl<S> NamespaceBusAdapter<S>
where
    S: NamespaceApi + 'static,
{
    pub fn new(service: Arc<S>, max_concurrent_calls: usize) -> Self {
        Self {
            service,
            limit: Arc::new(Semaphore::new(max_concurrent_calls)),
            shutdown: Notify::new(),
            served: AtomicU64::new(0),
        }
    }

    /// Claim the configured service name and start serving it on a
    /// background task.
    pub fn spawn(
        bus: &InMemorySystemBus,
        config: &NamespaceConfig,
        service: Arc<S>,
    ) -> Result<(Arc<Self>, tokio::task::JoinHandle<()>), NamespaceError> {
        let endpoint = bus.request_name(&config.service_name)?;
        let adapter = Arc::new(Self::new(service, config.max_concurrent_calls));
        let handle = tokio::spawn(adapter.clone().run(endpoint));
        Ok((adapter, handle))
    }

    /// Serve calls until `shutdown` is called. Dropping the endpoint on exit
    /// releases the service name.
    pub async fn run(self: Arc<Self>, mut endpoint: ServiceEndpoint) {
        info!("[NamespaceBusAdapter] Serving {}", endpoint.name());

        loop {
            let incoming = tokio::select! {
                _ = self.shutdown.notified() => break,
                incoming = endpoint.next_call() => incoming,
            };
            let Some(incoming) = incoming else {
                break;
            };

            let permit = tokio::select! {
                _ = self.shutdown.notified() => break,
                permit = self.limit.clone().acquire_owned() => permit,
            };
            let permit = match permit {
                Ok(permit) => permit,
                Err(e) => {
                    error!("[NamespaceBusAdapter] Call limiter closed: {}", e);
                    break;
                }
            };

            let adapter = self.clone();
            tokio::spawn(async move {
                adapter.serve(incoming).await;
                drop(permit);
            });
        }

        info!(
            served = self.served(),
            "[NamespaceBusAdapter] Stopped serving {}",
            endpoint.name()
        );
    }

    async fn serve(&self, incoming: IncomingCall) {
        let reply = self.service.invoke(&incoming.call).await;
        self.served.fetch_add(1, Ordering::Relaxed);
        if !incoming.reply(reply) {
            debug!("[NamespaceBusAdapter] Reply dropped, caller gone");
        }
    }

    /// Stop the serving loop. Calls already running finish.
    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }

    /// Calls answered so far.
    pub fn served(&self) -> u64 {
        self.served.load(Ordering::Relaxed)
    }
}
