//! Action ids checked by the authorization gate.
//!
//! Module calls map to `<action_prefix>.<module.path>.<method>`, management
//! calls to `<manager_action_prefix>.<method>`. The result is lowercased,
//! every run of characters outside `[a-z0-9.-]` collapses to one `-`, and it
//! is cut to 255 characters.

use super::config::NamespaceConfig;
use shared_types::grammar::strip_root;
use shared_types::MethodCall;

/// Longest action id accepted by the privilege broker.
pub const MAX_ACTION_ID_LEN: usize = 255;

/// Normalize an arbitrary string into a valid action id.
pub fn make_valid_action_id(raw: &str) -> String {
    let mut id = String::with_capacity(raw.len().min(MAX_ACTION_ID_LEN));
    let mut in_invalid_run = false;

    for c in raw.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-' {
            id.push(c);
            in_invalid_run = false;
        } else if !in_invalid_run {
            id.push('-');
            in_invalid_run = true;
        }
        if id.len() >= MAX_ACTION_ID_LEN {
            break;
        }
    }
    id.truncate(MAX_ACTION_ID_LEN);
    id
}

/// Action id a call has to be authorized for.
pub fn action_id_for(config: &NamespaceConfig, call: &MethodCall) -> String {
    if call.interface == config.manager_interface {
        return make_valid_action_id(&format!(
            "{}.{}",
            config.manager_action_prefix, call.member
        ));
    }

    let suffix = strip_root(&config.root_path, &call.path).unwrap_or_default();
    let raw = if suffix.is_empty() {
        format!("{}.{}", config.action_prefix, call.member)
    } else {
        format!(
            "{}.{}.{}",
            config.action_prefix,
            suffix.replace('/', "."),
            call.member
        )
    };
    make_valid_action_id(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::CallerIdentity;

    fn call(path: &str, interface: &str, member: &str) -> MethodCall {
        MethodCall::new(
            CallerIdentity::new(":1.9", 9),
            "org.nsbus.modules",
            path,
            interface,
            member,
            vec![],
        )
    }

    #[test]
    fn test_module_action_id() {
        let config = NamespaceConfig::default();
        let id = action_id_for(
            &config,
            &call("/org/nsbus/modules/Network/Routing", "org.nsbus.Values", "AddRoute"),
        );
        assert_eq!(id, "org.nsbus.modules.network.routing.addroute");
    }

    #[test]
    fn test_manager_action_id() {
        let config = NamespaceConfig::default();
        let id = action_id_for(
            &config,
            &call("/org/nsbus/modules", "org.nsbus.ModuleManager", "Import"),
        );
        assert_eq!(id, "org.nsbus.modulemanager.import");
    }

    #[test]
    fn test_invalid_runs_collapse() {
        assert_eq!(make_valid_action_id("Foo__Bar::Baz"), "foo-bar-baz");
        assert_eq!(make_valid_action_id("a b\tc"), "a-b-c");
        assert_eq!(make_valid_action_id("keep.dots-and-dashes"), "keep.dots-and-dashes");
    }

    #[test]
    fn test_length_capped() {
        let long = "x".repeat(400);
        assert_eq!(make_valid_action_id(&long).len(), MAX_ACTION_ID_LEN);
    }

    #[test]
    fn test_ids_only_use_valid_characters() {
        let id = make_valid_action_id("Ünïcode/Path_With Spaces.Method");
        assert!(id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-'));
    }
}
