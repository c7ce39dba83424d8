//! # Value Model
//!
//! `DynValue` is the dynamically-typed value that module methods consume and
//! produce. It is independent of the wire: the codec maps it to native wire
//! values or to boxed (BSV) triples.
//!
//! ## Kinds
//!
//! - **Scalars**: `Nil`, `Bool`, `Int`, `Float`
//! - **Text**: `String`, `ObjectPath`, `Signature`
//! - **Containers**: `List`, `Map`, `Term`

use crate::errors::{Fault, FaultResult};
use crate::wire::WireType;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// INTEGERS
// =============================================================================

/// Wire width of an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
}

impl IntWidth {
    pub fn bits(self) -> u32 {
        match self {
            IntWidth::W8 => 8,
            IntWidth::W16 => 16,
            IntWidth::W32 => 32,
            IntWidth::W64 => 64,
        }
    }

    /// Whether a wire type exists for this width and signedness. 8-bit
    /// integers exist on the wire only as unsigned bytes.
    pub fn supports(self, signed: bool) -> bool {
        !(self == IntWidth::W8 && signed)
    }

    /// Whether `value` is representable at this width.
    pub fn fits(self, value: i64, signed: bool) -> bool {
        match (self, signed) {
            (IntWidth::W8, true) => false,
            (IntWidth::W8, false) => (0..=i64::from(u8::MAX)).contains(&value),
            (IntWidth::W16, true) => i16::try_from(value).is_ok(),
            (IntWidth::W16, false) => u16::try_from(value).is_ok(),
            (IntWidth::W32, true) => i32::try_from(value).is_ok(),
            (IntWidth::W32, false) => u32::try_from(value).is_ok(),
            (IntWidth::W64, true) => true,
            (IntWidth::W64, false) => value >= 0,
        }
    }

    /// Native wire type for this width and signedness. A signed W8 maps to
    /// `y` too; encoders refuse it through [`IntWidth::supports`].
    pub fn wire_type(self, signed: bool) -> WireType {
        match (self, signed) {
            (IntWidth::W8, _) => WireType::Byte,
            (IntWidth::W16, true) => WireType::Int16,
            (IntWidth::W16, false) => WireType::UInt16,
            (IntWidth::W32, true) => WireType::Int32,
            (IntWidth::W32, false) => WireType::UInt32,
            (IntWidth::W64, true) => WireType::Int64,
            (IntWidth::W64, false) => WireType::UInt64,
        }
    }
}

// =============================================================================
// DYNAMIC VALUE
// =============================================================================

/// A dynamically-typed value.
///
/// Integers keep their magnitude in an `i64` and remember the wire width and
/// signedness they came from, so a round trip reproduces the same wire type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DynValue {
    Nil,
    Bool(bool),
    Int {
        value: i64,
        width: IntWidth,
        signed: bool,
    },
    Float(f64),
    String(String),
    ObjectPath(String),
    Signature(String),
    List(Vec<DynValue>),
    /// Ordered key/value pairs with unique keys.
    Map(Vec<(DynValue, DynValue)>),
    Term {
        name: String,
        args: Vec<DynValue>,
    },
}

impl DynValue {
    /// A signed 64-bit integer.
    pub fn int(value: i64) -> Self {
        DynValue::Int {
            value,
            width: IntWidth::W64,
            signed: true,
        }
    }

    /// An unsigned 64-bit integer.
    ///
    /// Values above `i64::MAX` cannot be held by the value model.
    pub fn uint(value: u64) -> FaultResult<Self> {
        let value = i64::try_from(value).map_err(|_| {
            Fault::range_overflow(format!("unsigned value {} exceeds {}", value, i64::MAX))
        })?;
        Ok(DynValue::Int {
            value,
            width: IntWidth::W64,
            signed: false,
        })
    }

    /// An integer with an explicit width and signedness.
    ///
    /// A signed 8-bit integer has no wire type and is refused with
    /// `InvalidArgs`.
    pub fn int_with(value: i64, width: IntWidth, signed: bool) -> FaultResult<Self> {
        if !width.supports(signed) {
            return Err(Fault::invalid_args(
                "signed 8-bit integers have no wire type",
            ));
        }
        if !width.fits(value, signed) {
            return Err(Fault::range_overflow(format!(
                "{} does not fit a {} {}-bit integer",
                value,
                if signed { "signed" } else { "unsigned" },
                width.bits()
            )));
        }
        Ok(DynValue::Int {
            value,
            width,
            signed,
        })
    }

    pub fn string(s: impl Into<String>) -> Self {
        DynValue::String(s.into())
    }

    pub fn term(name: impl Into<String>, args: Vec<DynValue>) -> Self {
        DynValue::Term {
            name: name.into(),
            args,
        }
    }

    /// Build a map; a later duplicate key replaces the earlier value in place.
    pub fn map(entries: impl IntoIterator<Item = (DynValue, DynValue)>) -> Self {
        let mut out: Vec<(DynValue, DynValue)> = Vec::new();
        for (key, value) in entries {
            match out.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => out.push((key, value)),
            }
        }
        DynValue::Map(out)
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, DynValue::Nil)
    }

    /// Kind of this value; `None` for `Nil`.
    pub fn kind(&self) -> Option<ValueKind> {
        Some(match self {
            DynValue::Nil => return None,
            DynValue::Bool(_) => ValueKind::Boolean,
            DynValue::Int { .. } => ValueKind::Integer,
            DynValue::Float(_) => ValueKind::Float,
            DynValue::String(_) => ValueKind::String,
            DynValue::ObjectPath(_) => ValueKind::ObjectPath,
            DynValue::Signature(_) => ValueKind::Signature,
            DynValue::List(_) => ValueKind::List,
            DynValue::Map(_) => ValueKind::Map,
            DynValue::Term { .. } => ValueKind::Term,
        })
    }

    /// Short label used in fault messages.
    pub fn type_label(&self) -> &'static str {
        match self.kind() {
            Some(kind) => kind.label(),
            None => "nil",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DynValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DynValue::Int { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DynValue::String(s) | DynValue::ObjectPath(s) | DynValue::Signature(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for DynValue {
    fn from(b: bool) -> Self {
        DynValue::Bool(b)
    }
}

impl From<i64> for DynValue {
    fn from(v: i64) -> Self {
        DynValue::int(v)
    }
}

impl From<i32> for DynValue {
    fn from(v: i32) -> Self {
        DynValue::Int {
            value: i64::from(v),
            width: IntWidth::W32,
            signed: true,
        }
    }
}

impl From<f64> for DynValue {
    fn from(v: f64) -> Self {
        DynValue::Float(v)
    }
}

impl From<&str> for DynValue {
    fn from(s: &str) -> Self {
        DynValue::String(s.to_string())
    }
}

impl From<String> for DynValue {
    fn from(s: String) -> Self {
        DynValue::String(s)
    }
}

impl<T: Into<DynValue>> From<Vec<T>> for DynValue {
    fn from(items: Vec<T>) -> Self {
        DynValue::List(items.into_iter().map(Into::into).collect())
    }
}

// =============================================================================
// DECLARED KINDS
// =============================================================================

/// Declared kind of a method parameter or return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Any,
    Boolean,
    Integer,
    Float,
    String,
    #[serde(rename = "path")]
    ObjectPath,
    Signature,
    List,
    Map,
    Term,
}

impl ValueKind {
    pub fn label(self) -> &'static str {
        match self {
            ValueKind::Any => "any",
            ValueKind::Boolean => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::ObjectPath => "path",
            ValueKind::Signature => "signature",
            ValueKind::List => "list",
            ValueKind::Map => "map",
            ValueKind::Term => "term",
        }
    }

    /// Wire type used for this kind in the native convention.
    pub fn native_wire_type(self) -> WireType {
        match self {
            ValueKind::Any => WireType::Variant,
            ValueKind::Boolean => WireType::Boolean,
            ValueKind::Integer => WireType::Int64,
            ValueKind::Float => WireType::Double,
            ValueKind::String => WireType::String,
            ValueKind::ObjectPath => WireType::ObjectPath,
            ValueKind::Signature => WireType::Signature,
            ValueKind::List | ValueKind::Term => WireType::array(WireType::Variant),
            ValueKind::Map => WireType::dict(WireType::String, WireType::Variant),
        }
    }

    /// Whether a value satisfies this declared kind. `Nil` satisfies every kind.
    pub fn accepts(self, value: &DynValue) -> bool {
        match (self, value.kind()) {
            (_, None) | (ValueKind::Any, _) => true,
            (expected, Some(actual)) => expected == actual,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FaultKind;

    #[test]
    fn test_width_fits() {
        assert!(IntWidth::W8.fits(255, false));
        assert!(!IntWidth::W8.fits(-1, true));
        assert!(IntWidth::W16.fits(-32768, true));
        assert!(!IntWidth::W16.fits(65536, false));
        assert!(IntWidth::W32.fits(4_200_000_000, false));
        assert!(!IntWidth::W32.fits(4_200_000_000, true));
        assert!(!IntWidth::W64.fits(-1, false));
    }

    #[test]
    fn test_uint_overflow() {
        assert!(DynValue::uint(42).is_ok());
        let err = DynValue::uint(u64::MAX).unwrap_err();
        assert_eq!(err.kind, FaultKind::RangeOverflow);
    }

    #[test]
    fn test_signed_byte_refused() {
        assert!(!IntWidth::W8.supports(true));
        assert!(IntWidth::W8.supports(false));
        assert!(IntWidth::W16.supports(true));
        let err = DynValue::int_with(5, IntWidth::W8, true).unwrap_err();
        assert_eq!(err.kind, FaultKind::InvalidArgs);
    }

    #[test]
    fn test_int_with_checks_width() {
        assert!(DynValue::int_with(300, IntWidth::W8, false).is_err());
        assert_eq!(
            DynValue::int_with(-7, IntWidth::W16, true).unwrap().as_i64(),
            Some(-7)
        );
    }

    #[test]
    fn test_map_dedups_keys() {
        let map = DynValue::map(vec![
            ("a".into(), 1i64.into()),
            ("b".into(), 2i64.into()),
            ("a".into(), 3i64.into()),
        ]);
        assert_eq!(
            map,
            DynValue::Map(vec![("a".into(), 3i64.into()), ("b".into(), 2i64.into())])
        );
    }

    #[test]
    fn test_kind_accepts() {
        assert!(ValueKind::Integer.accepts(&DynValue::int(1)));
        assert!(ValueKind::Integer.accepts(&DynValue::Nil));
        assert!(!ValueKind::Integer.accepts(&DynValue::Bool(true)));
        assert!(ValueKind::Any.accepts(&DynValue::string("x")));
    }

    #[test]
    fn test_native_wire_types() {
        assert_eq!(ValueKind::Map.native_wire_type().signature(), "a{sv}");
        assert_eq!(ValueKind::Term.native_wire_type().signature(), "av");
        assert_eq!(ValueKind::Integer.native_wire_type().signature(), "x");
    }
}
