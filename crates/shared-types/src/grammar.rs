//! Object-path and signature grammar, and the module name ↔ path mapping.

use crate::errors::{Fault, FaultResult};
use crate::wire::WireType;

/// Separator between module name components.
pub const MODULE_SEPARATOR: &str = "::";

fn is_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// `/` alone, or `/`-separated non-empty `[A-Za-z0-9_]+` elements with no
/// trailing slash.
pub fn is_valid_object_path(path: &str) -> bool {
    if path == "/" {
        return true;
    }
    let Some(rest) = path.strip_prefix('/') else {
        return false;
    };
    rest.split('/')
        .all(|element| !element.is_empty() && element.chars().all(is_path_char))
}

/// Validate an object path, failing with `InvalidArgs`.
pub fn validate_object_path(path: &str) -> FaultResult<()> {
    if is_valid_object_path(path) {
        Ok(())
    } else {
        Err(Fault::invalid_args(format!("invalid object path '{}'", path)))
    }
}

/// Parse a signature string (any number of complete types), failing with
/// `InvalidArgs`.
pub fn validate_signature(signature: &str) -> FaultResult<Vec<WireType>> {
    WireType::parse_all(signature)
        .map_err(|e| Fault::invalid_args(format!("invalid signature '{}': {}", signature, e)))
}

/// Object path suffix for a module name.
///
/// `::` becomes `/`; any other character outside `[A-Za-z0-9_]` becomes `_`.
pub fn object_name_for_module(name: &str) -> String {
    name.split(MODULE_SEPARATOR)
        .map(|component| {
            component
                .chars()
                .map(|c| if is_path_char(c) { c } else { '_' })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Module name addressed by an object path suffix (`/` becomes `::`).
pub fn module_name_for_path(suffix: &str) -> String {
    suffix.trim_matches('/').replace('/', MODULE_SEPARATOR)
}

/// Join a namespace root and a suffix into a full object path.
pub fn join_path(root: &str, suffix: &str) -> String {
    if suffix.is_empty() {
        root.to_string()
    } else if root == "/" {
        format!("/{}", suffix)
    } else {
        format!("{}/{}", root, suffix)
    }
}

/// Suffix of `path` below `root`; `Some("")` for the root itself.
pub fn strip_root<'a>(root: &str, path: &'a str) -> Option<&'a str> {
    if path == root {
        return Some("");
    }
    if root == "/" {
        return path.strip_prefix('/');
    }
    path.strip_prefix(root)?.strip_prefix('/')
}
