//! # Boxed Value Validator
//!
//! Checks a `(bsv)` wire value before anything is decoded.
//!
//! ## Order
//!
//! 1. Structure: a 3-field struct of boolean, string, variant.
//! 2. Type name: unknown names, then recognized-but-unimplemented names.
//! 3. Payload: the variant content must have the shape the type name needs.
//!    List, term and boxed map values are validated recursively.
//!
//! Structural and payload problems are `InvalidArgs`; type-name problems are
//! `InvalidSignature`.

use crate::domain::vocabulary::{lookup, BsvType, TypeNameStatus};
use shared_types::{Fault, FaultKind, FaultResult, WireType, WireValue};
use std::fmt;
use tracing::trace;

/// Why a triple was rejected. Fault messages start with the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BsvRejection {
    Malformed,
    UnknownType,
    UnimplementedType,
    BadPayload,
}

impl BsvRejection {
    const ALL: [BsvRejection; 4] = [
        BsvRejection::Malformed,
        BsvRejection::UnknownType,
        BsvRejection::UnimplementedType,
        BsvRejection::BadPayload,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BsvRejection::Malformed => "malformed triple",
            BsvRejection::UnknownType => "unknown type name",
            BsvRejection::UnimplementedType => "unimplemented type",
            BsvRejection::BadPayload => "bad payload",
        }
    }

    pub fn fault_kind(self) -> FaultKind {
        match self {
            BsvRejection::UnknownType | BsvRejection::UnimplementedType => {
                FaultKind::InvalidSignature
            }
            BsvRejection::Malformed | BsvRejection::BadPayload => FaultKind::InvalidArgs,
        }
    }

    pub fn fault(self, detail: impl fmt::Display) -> Fault {
        Fault::new(self.fault_kind(), format!("{}: {}", self.label(), detail))
    }

    /// Recover the category from a fault produced by [`validate`].
    pub fn of(fault: &Fault) -> Option<Self> {
        Self::ALL.into_iter().find(|r| {
            r.fault_kind() == fault.kind && fault.message.starts_with(r.label())
        })
    }
}

/// A triple that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedTriple {
    pub nil: bool,
    pub bsv_type: BsvType,
    pub payload: Payload,
}

/// Validated payload, by container shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A basic value matching a scalar type name.
    Scalar(WireValue),
    /// Nested triples of a list or term.
    Elements(Vec<ValidatedTriple>),
    /// Map entries: basic key, boxed or raw value.
    Entries(Vec<(WireValue, MapValue)>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapValue {
    Boxed(ValidatedTriple),
    /// Plain variant content, decoded natively.
    Raw(WireValue),
}

/// Validate a `(bsv)` wire value.
pub fn validate(value: &WireValue) -> FaultResult<ValidatedTriple> {
    let WireValue::Struct(fields) = value else {
        return Err(BsvRejection::Malformed.fault(format!(
            "expected a (bsv) struct, got '{}'",
            value.signature()
        )));
    };
    let [nil_field, type_field, payload_field] = fields.as_slice() else {
        return Err(BsvRejection::Malformed.fault(format!(
            "expected 3 fields, got {}",
            fields.len()
        )));
    };
    let WireValue::Boolean(nil) = nil_field else {
        return Err(BsvRejection::Malformed.fault("bad nil flag"));
    };
    let WireValue::String(type_name) = type_field else {
        return Err(BsvRejection::Malformed.fault("bad type field"));
    };
    let WireValue::Variant(payload) = payload_field else {
        return Err(BsvRejection::Malformed.fault("payload is not a variant"));
    };

    let bsv_type = match lookup(type_name) {
        TypeNameStatus::Implemented(t) => t,
        TypeNameStatus::Unimplemented(t) => {
            return Err(BsvRejection::UnimplementedType.fault(format!("'{}'", t)))
        }
        TypeNameStatus::Unknown => {
            return Err(BsvRejection::UnknownType.fault(format!("'{}'", type_name)))
        }
    };

    let payload = validate_payload(bsv_type, payload)?;
    trace!(bsv_type = %bsv_type, nil = *nil, "Validated boxed value");

    Ok(ValidatedTriple {
        nil: *nil,
        bsv_type,
        payload,
    })
}

fn validate_payload(bsv_type: BsvType, payload: &WireValue) -> FaultResult<Payload> {
    let mismatch = |expected: &str| {
        BsvRejection::BadPayload.fault(format!(
            "type '{}' needs {}, got '{}'",
            bsv_type,
            expected,
            payload.signature()
        ))
    };

    match bsv_type {
        BsvType::List | BsvType::Term => {
            let WireValue::Array { element, items } = payload else {
                return Err(mismatch("'a(bsv)'"));
            };
            // Items first, so a broken nested triple reports its own defect.
            let elements = items
                .iter()
                .map(validate)
                .collect::<FaultResult<Vec<_>>>()?;
            if *element != WireType::bsv() {
                return Err(mismatch("'a(bsv)'"));
            }
            if bsv_type == BsvType::Term {
                match elements.first() {
                    Some(first) if first.bsv_type == BsvType::String && !first.nil => {}
                    _ => {
                        return Err(BsvRejection::BadPayload
                            .fault("a term's first element must be a string"))
                    }
                }
            }
            Ok(Payload::Elements(elements))
        }
        BsvType::Map => {
            let WireValue::Dict {
                key,
                value,
                entries,
            } = payload
            else {
                return Err(mismatch("a dict"));
            };
            if !key.is_basic() {
                return Err(mismatch("a basic key type"));
            }
            let boxed = *value == WireType::bsv();
            if !boxed && *value != WireType::Variant {
                return Err(mismatch("'(bsv)' or 'v' values"));
            }

            let entries = entries
                .iter()
                .map(|(k, v)| {
                    let map_value = if boxed {
                        MapValue::Boxed(validate(v)?)
                    } else {
                        match v {
                            WireValue::Variant(inner) => MapValue::Raw((**inner).clone()),
                            _ => return Err(mismatch("'v' values")),
                        }
                    };
                    Ok((k.clone(), map_value))
                })
                .collect::<FaultResult<Vec<_>>>()?;
            Ok(Payload::Entries(entries))
        }
        scalar => {
            if !scalar.accepts_scalar(&payload.wire_type()) {
                return Err(mismatch("a matching basic value"));
            }
            Ok(Payload::Scalar(payload.clone()))
        }
    }
}
