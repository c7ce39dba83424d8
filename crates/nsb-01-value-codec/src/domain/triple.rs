//! The boxed value triple `(bsv)`.

use super::vocabulary::BsvType;
use serde::{Deserialize, Serialize};
use shared_types::WireValue;

/// `{nil flag, type name, payload}` as carried in a `(bsv)` struct.
///
/// `payload` is the value inside the variant field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BsvTriple {
    pub nil: bool,
    pub type_name: String,
    pub payload: WireValue,
}

impl BsvTriple {
    pub fn new(nil: bool, type_name: impl Into<String>, payload: WireValue) -> Self {
        Self {
            nil,
            type_name: type_name.into(),
            payload,
        }
    }

    /// The nil triple: `(true, "boolean", false)`.
    pub fn nil() -> Self {
        Self::new(true, BsvType::Boolean.name(), WireValue::Boolean(false))
    }

    /// A non-nil triple of a known type.
    pub fn of(bsv_type: BsvType, payload: WireValue) -> Self {
        Self::new(false, bsv_type.name(), payload)
    }

    /// The `(bsv)` wire struct.
    pub fn into_wire(self) -> WireValue {
        WireValue::Struct(vec![
            WireValue::Boolean(self.nil),
            WireValue::String(self.type_name),
            WireValue::variant(self.payload),
        ])
    }
}

impl From<BsvTriple> for WireValue {
    fn from(triple: BsvTriple) -> Self {
        triple.into_wire()
    }
}
