//! # Namespace Module Bus Daemon
//!
//! Hosts one namespace service on an in-process system bus.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (file, then environment)
//! 2. Validate it
//! 3. Build the module catalog and the authorizer for the configured policy
//! 4. Build the dispatcher and register the preload list
//! 5. Claim the service name and start serving

pub mod config;

pub use config::{load_config, load_config_from, AuthPolicy, ConfigLoadError, DaemonConfig};

use anyhow::{Context, Result};
use nsb_02_module_namespace::{
    AllowAll, Authorizer, Dispatcher, GrantTableAuthorizer, ModuleCatalog, NamespaceBusAdapter,
};
use shared_bus::{BusConnection, InMemorySystemBus};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// A running namespace service and the bus it serves on.
pub struct NamespaceDaemon {
    config: DaemonConfig,
    bus: InMemorySystemBus,
    dispatcher: Arc<Dispatcher>,
    adapter: Arc<NamespaceBusAdapter<Dispatcher>>,
    serving: Option<JoinHandle<()>>,
    grants: Option<Arc<GrantTableAuthorizer>>,
}

impl NamespaceDaemon {
    /// Wire everything and start serving.
    pub fn start(config: DaemonConfig) -> Result<Self> {
        config.bus.validate().context("Invalid bus configuration")?;

        info!("===========================================");
        info!("  Namespace Module Bus v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");

        let bus = InMemorySystemBus::with_config(config.bus.clone());
        let catalog = ModuleCatalog::with_builtins();
        info!("Module catalog: {:?}", catalog);

        let grants = match config.auth_policy {
            AuthPolicy::AllowAll => None,
            AuthPolicy::GrantTable => Some(Arc::new(GrantTableAuthorizer::new())),
        };
        let authorizer: Arc<dyn Authorizer> = match &grants {
            Some(grants) => grants.clone(),
            None => Arc::new(AllowAll),
        };

        let dispatcher = Arc::new(
            Dispatcher::from_config(config.namespace.clone(), Arc::new(catalog), authorizer)
                .context("Failed to build dispatcher")?,
        );

        let (adapter, serving) =
            NamespaceBusAdapter::spawn(&bus, &config.namespace, dispatcher.clone())
                .context("Failed to claim service name")?;

        info!("Service name: {}", config.namespace.service_name);
        info!("Root path: {}", config.namespace.root_path);
        info!("Auth policy: {:?}", config.auth_policy);
        if !config.namespace.preload.is_empty() {
            info!("Registered modules: {}", config.namespace.preload.join(", "));
        }

        Ok(Self {
            config,
            bus,
            dispatcher,
            adapter,
            serving: Some(serving),
            grants,
        })
    }

    pub fn config(&self) -> &DaemonConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Grant table, when the policy uses one.
    pub fn grants(&self) -> Option<&Arc<GrantTableAuthorizer>> {
        self.grants.as_ref()
    }

    /// A client connection for process `pid`.
    pub fn connect(&self, pid: u32) -> BusConnection {
        self.bus.connect(pid)
    }

    /// Stop serving and release the service name.
    pub async fn shutdown(&mut self) {
        info!("Initiating graceful shutdown...");
        self.adapter.shutdown();
        if let Some(serving) = self.serving.take() {
            if let Err(e) = serving.await {
                error!("Serving task failed: {}", e);
            }
        }
        info!(
            "Shutdown complete ({} calls served)",
            self.adapter.served()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::WireValue;

    #[tokio::test]
    async fn test_start_serve_shutdown() {
        let mut daemon = NamespaceDaemon::start(DaemonConfig::default()).unwrap();
        let conn = daemon.connect(31);
        let ns = &daemon.config().namespace;

        let reply = conn
            .call(
                &ns.service_name,
                &ns.root_path,
                &ns.manager_interface,
                "Import",
                vec![WireValue::string("Echo")],
            )
            .await
            .unwrap();
        assert_eq!(reply, vec![WireValue::Boolean(true)]);

        daemon.shutdown().await;
        let err = conn
            .call(
                &daemon.config().namespace.service_name,
                "/",
                "org.x.Y",
                "Z",
                vec![],
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, shared_types::FaultKind::ServiceUnknown);
    }

    #[tokio::test]
    async fn test_grant_table_policy() {
        let daemon = NamespaceDaemon::start(DaemonConfig {
            auth_policy: AuthPolicy::GrantTable,
            ..Default::default()
        })
        .unwrap();
        assert!(daemon.grants().is_some());
    }

    #[tokio::test]
    async fn test_invalid_config_refused() {
        let mut config = DaemonConfig::default();
        config.namespace.max_concurrent_calls = 0;
        assert!(NamespaceDaemon::start(config).is_err());
    }
}
