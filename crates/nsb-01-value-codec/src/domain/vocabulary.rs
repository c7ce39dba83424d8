//! Type-name vocabulary of boxed values.

use serde::{Deserialize, Serialize};
use shared_types::{DynValue, IntWidth, WireType};
use std::fmt;

/// A recognized boxed type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BsvType {
    Boolean,
    Byte,
    Integer,
    UnsignedInteger,
    Float,
    String,
    Path,
    Signature,
    List,
    Map,
    Term,
    Byteblock,
    Symbol,
    Locale,
    Code,
}

/// Outcome of looking up a type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeNameStatus {
    Implemented(BsvType),
    Unimplemented(BsvType),
    Unknown,
}

impl BsvType {
    pub const ALL: [BsvType; 15] = [
        BsvType::Boolean,
        BsvType::Byte,
        BsvType::Integer,
        BsvType::UnsignedInteger,
        BsvType::Float,
        BsvType::String,
        BsvType::Path,
        BsvType::Signature,
        BsvType::List,
        BsvType::Map,
        BsvType::Term,
        BsvType::Byteblock,
        BsvType::Symbol,
        BsvType::Locale,
        BsvType::Code,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BsvType::Boolean => "boolean",
            BsvType::Byte => "byte",
            BsvType::Integer => "integer",
            BsvType::UnsignedInteger => "unsigned-integer",
            BsvType::Float => "float",
            BsvType::String => "string",
            BsvType::Path => "path",
            BsvType::Signature => "signature",
            BsvType::List => "list",
            BsvType::Map => "map",
            BsvType::Term => "term",
            BsvType::Byteblock => "byteblock",
            BsvType::Symbol => "symbol",
            BsvType::Locale => "locale",
            BsvType::Code => "code",
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    pub fn is_implemented(self) -> bool {
        !matches!(
            self,
            BsvType::Byteblock | BsvType::Symbol | BsvType::Locale | BsvType::Code
        )
    }

    /// Whether a basic payload type is acceptable for this scalar type name.
    pub fn accepts_scalar(self, payload: &WireType) -> bool {
        match self {
            BsvType::Boolean => matches!(payload, WireType::Boolean),
            BsvType::Byte => matches!(payload, WireType::Byte),
            BsvType::Integer => {
                matches!(payload, WireType::Int16 | WireType::Int32 | WireType::Int64)
            }
            BsvType::UnsignedInteger => {
                matches!(payload, WireType::UInt16 | WireType::UInt32 | WireType::UInt64)
            }
            BsvType::Float => matches!(payload, WireType::Double),
            BsvType::String => matches!(payload, WireType::String),
            BsvType::Path => matches!(payload, WireType::ObjectPath),
            BsvType::Signature => matches!(payload, WireType::Signature),
            _ => false,
        }
    }

    /// Type name used when boxing a value. Nil boxes as `boolean`.
    pub fn for_value(value: &DynValue) -> Self {
        match value {
            DynValue::Nil | DynValue::Bool(_) => BsvType::Boolean,
            DynValue::Int {
                width: IntWidth::W8,
                ..
            } => BsvType::Byte,
            DynValue::Int { signed: true, .. } => BsvType::Integer,
            DynValue::Int { signed: false, .. } => BsvType::UnsignedInteger,
            DynValue::Float(_) => BsvType::Float,
            DynValue::String(_) => BsvType::String,
            DynValue::ObjectPath(_) => BsvType::Path,
            DynValue::Signature(_) => BsvType::Signature,
            DynValue::List(_) => BsvType::List,
            DynValue::Map(_) => BsvType::Map,
            DynValue::Term { .. } => BsvType::Term,
        }
    }
}

impl fmt::Display for BsvType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify a type name. Unrecognized names, including `""`, are unknown.
pub fn lookup(type_name: &str) -> TypeNameStatus {
    match BsvType::from_name(type_name) {
        Some(t) if t.is_implemented() => TypeNameStatus::Implemented(t),
        Some(t) => TypeNameStatus::Unimplemented(t),
        None => TypeNameStatus::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("integer"), TypeNameStatus::Implemented(BsvType::Integer));
        assert_eq!(
            lookup("unsigned-integer"),
            TypeNameStatus::Implemented(BsvType::UnsignedInteger)
        );
        assert_eq!(lookup("byteblock"), TypeNameStatus::Unimplemented(BsvType::Byteblock));
        assert_eq!(lookup("ufo"), TypeNameStatus::Unknown);
        assert_eq!(lookup(""), TypeNameStatus::Unknown);
        assert_eq!(lookup("Integer"), TypeNameStatus::Unknown);
    }

    #[test]
    fn test_names_unique() {
        for t in BsvType::ALL {
            assert_eq!(BsvType::from_name(t.name()), Some(t));
        }
    }

    #[test]
    fn test_scalar_payloads() {
        assert!(BsvType::Integer.accepts_scalar(&WireType::Int32));
        assert!(!BsvType::Integer.accepts_scalar(&WireType::UInt32));
        assert!(BsvType::UnsignedInteger.accepts_scalar(&WireType::UInt64));
        assert!(!BsvType::String.accepts_scalar(&WireType::Int64));
        assert!(!BsvType::List.accepts_scalar(&WireType::String));
    }

    #[test]
    fn test_for_value() {
        assert_eq!(BsvType::for_value(&DynValue::Nil), BsvType::Boolean);
        assert_eq!(BsvType::for_value(&DynValue::uint(3).unwrap()), BsvType::UnsignedInteger);
        assert_eq!(BsvType::for_value(&DynValue::int(-3)), BsvType::Integer);
    }

    #[test]
    fn test_serde_kebab_case() {
        let json = serde_json::to_string(&BsvType::UnsignedInteger).unwrap();
        assert_eq!(json, "\"unsigned-integer\"");
    }
}
