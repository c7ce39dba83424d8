//! # Authorization Flow
//!
//! ```text
//! client ─▶ daemon: denied (NotAuthorized "<action> auth_admin")
//! client ─▶ broker: obtain(action, pid)
//! client ─▶ daemon: retried once
//! ```

#[cfg(test)]
mod tests {
    use crate::integration::Harness;
    use nsb_02_module_namespace::GrantTableAuthorizer;
    use nsb_03_auth_retry::AuthorizationRetryClient;
    use nsb_daemon::AuthPolicy;
    use shared_bus::MethodCaller;
    use shared_types::{FaultKind, MethodCall, WireValue};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn echo_call(h: &Harness, value: &str) -> MethodCall {
        let ns = &h.daemon.config().namespace;
        MethodCall::new(
            h.client.identity().clone(),
            &ns.service_name,
            &h.module_path("Echo"),
            &ns.native_interface,
            "ParamString",
            vec![WireValue::string(value)],
        )
    }

    fn grants(h: &Harness) -> Arc<GrantTableAuthorizer> {
        match h.daemon.grants() {
            Some(grants) => grants.clone(),
            None => panic!("daemon was started without a grant table"),
        }
    }

    #[tokio::test]
    async fn test_denied_call_carries_action_id() {
        let h = Harness::start(AuthPolicy::GrantTable);
        let err = h
            .native("Echo", "ParamString", vec![WireValue::string("x")])
            .await
            .unwrap_err();
        assert_eq!(
            err.kind,
            FaultKind::AuthorizationRequired {
                action_id: "org.nsbus.modules.echo.paramstring".into(),
                result: "auth_admin".into(),
            }
        );
        assert_eq!(
            err.message,
            "org.nsbus.modules.echo.paramstring auth_admin"
        );
    }

    #[tokio::test]
    async fn test_broker_grant_then_retry_succeeds() {
        let h = Harness::start(AuthPolicy::GrantTable);
        let table = grants(&h);
        let requests = Arc::new(AtomicUsize::new(0));

        let broker = {
            let requests = requests.clone();
            move |action_id: &str, pid: u32| {
                requests.fetch_add(1, Ordering::SeqCst);
                table.grant(pid, action_id);
                true
            }
        };
        let client = AuthorizationRetryClient::new(Arc::new(broker), 1);

        let reply = client
            .call_via(&h.client, echo_call(&h, "granted"))
            .await
            .unwrap();
        assert_eq!(reply, vec![WireValue::string("granted")]);
        assert_eq!(requests.load(Ordering::SeqCst), 1);

        // The grant sticks: no second trip to the broker.
        let reply = client
            .call_via(&h.client, echo_call(&h, "again"))
            .await
            .unwrap();
        assert_eq!(reply, vec![WireValue::string("again")]);
        assert_eq!(requests.load(Ordering::SeqCst), 1);
        assert!(grants(&h).is_granted(Harness::PID, "org.nsbus.modules.echo.paramstring"));
    }

    #[tokio::test]
    async fn test_refused_grant_returns_first_fault() {
        let h = Harness::start(AuthPolicy::GrantTable);
        let client = AuthorizationRetryClient::new(Arc::new(|_: &str, _: u32| false), 1);

        let err = client
            .call_via(&h.client, echo_call(&h, "nope"))
            .await
            .unwrap_err();
        assert!(err.is_authorization_required());
        assert!(h.daemon.dispatcher().registry().resolve("Echo").is_none());
    }

    #[tokio::test]
    async fn test_useless_grant_is_not_retried_twice() {
        let h = Harness::start(AuthPolicy::GrantTable);
        let requests = Arc::new(AtomicUsize::new(0));
        let broker = {
            let requests = requests.clone();
            move |_: &str, _: u32| {
                requests.fetch_add(1, Ordering::SeqCst);
                true
            }
        };
        let client = AuthorizationRetryClient::new(Arc::new(broker), 1);

        let err = client
            .call_via(&h.client, echo_call(&h, "still denied"))
            .await
            .unwrap_err();
        assert!(err.is_authorization_required());
        assert_eq!(requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_public_action_needs_no_broker() {
        let h = Harness::start(AuthPolicy::GrantTable);
        grants(&h).allow_everyone("org.nsbus.modulemanager.import");

        let client = AuthorizationRetryClient::new(Arc::new(|_: &str, _: u32| false), 1);
        let ns = &h.daemon.config().namespace;
        let call = MethodCall::new(
            h.client.identity().clone(),
            &ns.service_name,
            &ns.root_path,
            &ns.manager_interface,
            "Import",
            vec![WireValue::string("Echo")],
        );
        let reply = client.call_via(&h.client, call).await.unwrap();
        assert_eq!(reply, vec![WireValue::Boolean(true)]);
    }
}
