//! # Call Flows
//!
//! Client ─▶ bus ─▶ daemon ─▶ dispatcher ─▶ Echo module, in both calling
//! conventions, with the faults a client sees on the way back.

#[cfg(test)]
mod tests {
    use crate::integration::Harness;
    use nsb_01_value_codec::{encode_bsv, BsvTriple};
    use nsb_daemon::AuthPolicy;
    use shared_types::{DynValue, FaultKind, WireType, WireValue};

    fn triple(nil: bool, type_name: &str, payload: WireValue) -> WireValue {
        BsvTriple::new(nil, type_name, payload).into_wire()
    }

    fn loaded(h: &Harness) -> Vec<String> {
        h.daemon
            .dispatcher()
            .registry()
            .loaded_modules()
            .iter()
            .map(|module| module.name().to_string())
            .collect()
    }

    // =========================================================================
    // NATIVE CONVENTION
    // =========================================================================

    #[tokio::test]
    async fn test_native_scalars_echo() {
        let h = Harness::start(AuthPolicy::AllowAll);

        let reply = h
            .native("Echo", "ParamString", vec![WireValue::string("fortytwo")])
            .await
            .unwrap();
        assert_eq!(reply, vec![WireValue::string("fortytwo")]);

        let reply = h
            .native("Echo", "ParamBoolean", vec![WireValue::Boolean(true)])
            .await
            .unwrap();
        assert_eq!(reply, vec![WireValue::Boolean(true)]);

        let reply = h
            .native("Echo", "ParamFloat", vec![WireValue::Double(4.25)])
            .await
            .unwrap();
        assert_eq!(reply, vec![WireValue::Double(4.25)]);
    }

    #[tokio::test]
    async fn test_native_unsigned_integer_widens() {
        let h = Harness::start(AuthPolicy::AllowAll);
        let reply = h
            .native("Echo", "ParamInteger", vec![WireValue::UInt32(4_200_000_000)])
            .await
            .unwrap();
        assert_eq!(reply, vec![WireValue::Int64(4_200_000_000)]);
    }

    #[tokio::test]
    async fn test_native_string_cast_to_path() {
        let h = Harness::start(AuthPolicy::AllowAll);
        let reply = h
            .native("Echo", "ParamPath", vec![WireValue::string("/etc/hosts")])
            .await
            .unwrap();
        assert_eq!(reply, vec![WireValue::ObjectPath("/etc/hosts".into())]);

        let err = h
            .native("Echo", "ParamPath", vec![WireValue::string("relative")])
            .await
            .unwrap_err();
        assert_eq!(err.kind, FaultKind::InvalidArgs);
    }

    #[tokio::test]
    async fn test_native_map_echo() {
        let h = Harness::start(AuthPolicy::AllowAll);
        let map = WireValue::dict(
            WireType::String,
            WireType::Variant,
            vec![(
                WireValue::string("name"),
                WireValue::variant(WireValue::string("eth0")),
            )],
        );
        let reply = h.native("Echo", "ParamMap", vec![map.clone()]).await.unwrap();
        assert_eq!(reply, vec![map]);
    }

    #[tokio::test]
    async fn test_native_empty_containers_echo() {
        let h = Harness::start(AuthPolicy::AllowAll);

        let map = WireValue::dict(WireType::String, WireType::Variant, vec![]);
        let reply = h.native("Echo", "ParamMap", vec![map.clone()]).await.unwrap();
        assert_eq!(reply, vec![map]);

        let list = WireValue::array(WireType::String, vec![]);
        let reply = h.native("Echo", "ParamList", vec![list]).await.unwrap();
        assert_eq!(reply, vec![WireValue::array(WireType::Variant, vec![])]);
    }

    #[tokio::test]
    async fn test_native_wrong_kind() {
        let h = Harness::start(AuthPolicy::AllowAll);
        let err = h
            .native("Echo", "ParamBoolean", vec![WireValue::string("yes")])
            .await
            .unwrap_err();
        assert_eq!(err.kind, FaultKind::InvalidArgs);
    }

    // =========================================================================
    // BOXED CONVENTION
    // =========================================================================

    #[tokio::test]
    async fn test_boxed_string_and_list_echo() {
        let h = Harness::start(AuthPolicy::AllowAll);

        let arg = encode_bsv(&DynValue::string("fortytwo")).unwrap().into_wire();
        let reply = h.boxed("Echo", "ParamString", vec![arg.clone()]).await.unwrap();
        assert_eq!(reply, vec![arg]);

        let list = DynValue::List(vec![DynValue::string("a"), DynValue::Bool(false)]);
        let arg = encode_bsv(&list).unwrap().into_wire();
        let reply = h.boxed("Echo", "ParamList", vec![arg.clone()]).await.unwrap();
        assert_eq!(reply, vec![arg]);
    }

    #[tokio::test]
    async fn test_boxed_empty_map_with_variant_values() {
        let h = Harness::start(AuthPolicy::AllowAll);
        let arg = triple(
            false,
            "map",
            WireValue::dict(WireType::String, WireType::Variant, vec![]),
        );

        let reply = h.boxed("Echo", "ParamMap", vec![arg]).await.unwrap();
        let [WireValue::Struct(fields)] = reply.as_slice() else {
            panic!("expected one (bsv) reply, got {reply:?}");
        };
        assert_eq!(fields[0], WireValue::Boolean(false));
        assert_eq!(fields[1], WireValue::string("map"));
        let WireValue::Variant(payload) = &fields[2] else {
            panic!("payload must be a variant");
        };
        assert!(matches!(&**payload, WireValue::Dict { entries, .. } if entries.is_empty()));
    }

    #[tokio::test]
    async fn test_boxed_nil_reaches_module() {
        let h = Harness::start(AuthPolicy::AllowAll);
        let nil = BsvTriple::nil().into_wire();
        let reply = h.boxed("Echo", "ParamInteger", vec![nil.clone()]).await.unwrap();
        assert_eq!(reply, vec![nil]);
    }

    #[tokio::test]
    async fn test_boxed_rejections() {
        let h = Harness::start(AuthPolicy::AllowAll);
        let cases = [
            (
                triple(false, "bogus", WireValue::string("x")),
                FaultKind::InvalidSignature,
            ),
            (
                triple(false, "symbol", WireValue::string("x")),
                FaultKind::InvalidSignature,
            ),
            (
                triple(false, "integer", WireValue::string("x")),
                FaultKind::InvalidArgs,
            ),
            (
                WireValue::Struct(vec![
                    WireValue::string("no"),
                    WireValue::string("string"),
                    WireValue::variant(WireValue::string("x")),
                ]),
                FaultKind::InvalidArgs,
            ),
            (WireValue::string("bare"), FaultKind::InvalidArgs),
        ];

        for (arg, expected) in cases {
            let err = h.boxed("Echo", "ParamAny", vec![arg.clone()]).await.unwrap_err();
            assert_eq!(err.kind, expected, "argument {arg:?}");
        }
    }

    // =========================================================================
    // MODULE MANAGEMENT AND FAULTS
    // =========================================================================

    #[tokio::test]
    async fn test_import() {
        let h = Harness::start(AuthPolicy::AllowAll);
        assert_eq!(h.import("Echo").await.unwrap(), vec![WireValue::Boolean(true)]);
        assert_eq!(h.import("Echo").await.unwrap(), vec![WireValue::Boolean(true)]);
        assert_eq!(
            h.import("NoSuchModule").await.unwrap(),
            vec![WireValue::Boolean(false)]
        );
        assert_eq!(loaded(&h), vec!["Echo".to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_members_and_modules() {
        let h = Harness::start(AuthPolicy::AllowAll);

        let err = h.native("Echo", "Nope", vec![]).await.unwrap_err();
        assert_eq!(err.kind, FaultKind::UnknownMethod);
        let err = h.boxed("Echo", "Nope", vec![]).await.unwrap_err();
        assert_eq!(err.kind, FaultKind::UnknownMethod);

        // Unregistered paths are kept permissive: nothing rejects them until a
        // method is called, and then the failed import is an unknown method.
        let err = h
            .native("NoSuchModule", "ParamString", vec![WireValue::string("x")])
            .await
            .unwrap_err();
        assert_eq!(err.kind, FaultKind::UnknownMethod);
        assert!(err.message.contains("automatic import failed"));
    }

    #[tokio::test]
    async fn test_module_failure_reaches_client() {
        let h = Harness::start(AuthPolicy::AllowAll);
        let err = h
            .native("Echo", "Fail", vec![WireValue::string("disk on fire")])
            .await
            .unwrap_err();
        assert_eq!(err.kind, FaultKind::Failed);
        assert!(err.message.contains("disk on fire"));
    }

    #[tokio::test]
    async fn test_concurrent_first_calls_load_once() {
        let h = Harness::start(AuthPolicy::AllowAll);
        let calls = (0..16).map(|i| {
            h.native(
                "Echo",
                "ParamString",
                vec![WireValue::string(format!("call-{i}"))],
            )
        });

        let replies = futures::future::join_all(calls).await;
        for (i, reply) in replies.into_iter().enumerate() {
            assert_eq!(reply.unwrap(), vec![WireValue::string(format!("call-{i}"))]);
        }
        assert_eq!(loaded(&h), vec!["Echo".to_string()]);
    }
}
