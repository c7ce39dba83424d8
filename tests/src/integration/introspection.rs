//! # Introspection
//!
//! What a client walking the object tree from `/` sees.

#[cfg(test)]
mod tests {
    use crate::integration::Harness;
    use nsb_daemon::AuthPolicy;
    use shared_types::{WireValue, INTROSPECTABLE_INTERFACE};

    async fn introspect(h: &Harness, path: &str) -> String {
        let reply = h
            .client
            .call(
                &h.daemon.config().namespace.service_name,
                path,
                INTROSPECTABLE_INTERFACE,
                "Introspect",
                vec![],
            )
            .await
            .unwrap();
        match reply.as_slice() {
            [WireValue::String(xml)] => xml.clone(),
            other => panic!("introspection must return one string, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_walk_from_bus_root() {
        let h = Harness::start(AuthPolicy::AllowAll);

        let xml = introspect(&h, "/").await;
        assert!(xml.starts_with("<!DOCTYPE node"));
        assert!(xml.contains("<node name='org'/>"));

        let xml = introspect(&h, "/org/nsbus").await;
        assert!(xml.contains("<node name='modules'/>"));
        assert!(!xml.contains("ModuleManager"));
    }

    #[tokio::test]
    async fn test_root_shows_manager_and_loaded_modules() {
        let h = Harness::start(AuthPolicy::AllowAll);
        let root = h.daemon.config().namespace.root_path.clone();

        let xml = introspect(&h, &root).await;
        assert!(xml.contains("<interface name='org.nsbus.ModuleManager'>"));
        assert!(xml.contains("<method name='Import'>"));
        assert!(!xml.contains("<node name='Echo'/>"));

        h.import("Echo").await.unwrap();
        let xml = introspect(&h, &root).await;
        assert!(xml.contains("<node name='Echo'/>"));
    }

    #[tokio::test]
    async fn test_module_object_lists_both_conventions() {
        let h = Harness::start(AuthPolicy::AllowAll);
        h.import("Echo").await.unwrap();

        let xml = introspect(&h, &h.module_path("Echo")).await;
        assert!(xml.contains("<interface name='org.nsbus.Values'>"));
        assert!(xml.contains("<interface name='org.nsbus.BoxedValues'>"));
        assert!(xml.contains("<arg name='arg0' type='s' direction='in'/>"));
        assert!(xml.contains("<arg name='arg0' type='(bsv)' direction='in'/>"));
    }

    #[tokio::test]
    async fn test_introspection_needs_no_grant() {
        let h = Harness::start(AuthPolicy::GrantTable);
        let root = h.daemon.config().namespace.root_path.clone();
        let xml = introspect(&h, &root).await;
        assert!(xml.contains("<method name='Import'>"));
    }
}
