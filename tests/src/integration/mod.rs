//! Cross-crate flows over the in-process bus.

pub mod authorization;
pub mod flows;
pub mod introspection;

use nsb_daemon::{AuthPolicy, DaemonConfig, NamespaceDaemon};
use shared_bus::BusConnection;
use shared_types::{FaultResult, WireValue};

/// A started daemon with one client connection.
pub struct Harness {
    pub daemon: NamespaceDaemon,
    pub client: BusConnection,
}

impl Harness {
    pub const PID: u32 = 4100;

    pub fn start(auth_policy: AuthPolicy) -> Self {
        let config = DaemonConfig {
            auth_policy,
            ..Default::default()
        };
        let daemon = match NamespaceDaemon::start(config) {
            Ok(daemon) => daemon,
            Err(e) => panic!("daemon failed to start: {e:#}"),
        };
        let client = daemon.connect(Self::PID);
        Self { daemon, client }
    }

    pub fn module_path(&self, module: &str) -> String {
        format!("{}/{}", self.daemon.config().namespace.root_path, module)
    }

    pub async fn native(
        &self,
        module: &str,
        member: &str,
        args: Vec<WireValue>,
    ) -> FaultResult<Vec<WireValue>> {
        let ns = &self.daemon.config().namespace;
        self.client
            .call(
                &ns.service_name,
                &self.module_path(module),
                &ns.native_interface,
                member,
                args,
            )
            .await
    }

    pub async fn boxed(
        &self,
        module: &str,
        member: &str,
        args: Vec<WireValue>,
    ) -> FaultResult<Vec<WireValue>> {
        let ns = &self.daemon.config().namespace;
        self.client
            .call(
                &ns.service_name,
                &self.module_path(module),
                &ns.boxed_interface,
                member,
                args,
            )
            .await
    }

    pub async fn import(&self, module: &str) -> FaultResult<Vec<WireValue>> {
        let ns = &self.daemon.config().namespace;
        self.client
            .call(
                &ns.service_name,
                &ns.root_path,
                &ns.manager_interface,
                "Import",
                vec![WireValue::string(module)],
            )
            .await
    }
}
