//! Boxed convention: every value travels as a `(bsv)` triple.
//!
//! Containers nest triples: a list or term payload is `a(bsv)`, a map payload
//! is `a{K(bsv)}` with a basic native key.

use super::native::{decode_native, encode_map_keys, encode_native, term_from_values};
use crate::domain::{BsvTriple, BsvType};
use crate::validator::{validate, MapValue, Payload, ValidatedTriple};
use shared_types::{DynValue, Fault, FaultResult, WireType, WireValue};

/// Box a value. Nil boxes as `(true, "boolean", false)`.
///
/// An empty list boxes as `a(bsv)`, an empty map as `a{s(bsv)}`.
pub fn encode_bsv(value: &DynValue) -> FaultResult<BsvTriple> {
    let payload = match value {
        DynValue::Nil => return Ok(BsvTriple::nil()),
        DynValue::List(items) => boxed_array(items.iter())?,
        DynValue::Map(entries) => boxed_map(entries)?,
        DynValue::Term { name, args } => boxed_term(name, args)?,
        scalar => encode_native(scalar)?,
    };
    Ok(BsvTriple::of(BsvType::for_value(value), payload))
}

/// Unbox a `(bsv)` wire value. Validates first.
pub fn decode_bsv(value: &WireValue) -> FaultResult<DynValue> {
    to_dyn(validate(value)?)
}

impl BsvTriple {
    /// Build a triple under an arbitrary type name, inferring the payload
    /// signature from the value's content.
    ///
    /// Nothing checks that `type_name` fits the payload; that is the
    /// validator's job on the receiving side. Empty containers carry no
    /// content to infer from: an empty list fails with `InvalidArgs`, an
    /// empty map with `InvalidSignature`.
    pub fn infer(type_name: &str, value: &DynValue) -> FaultResult<Self> {
        let payload = match value {
            DynValue::Nil => WireValue::Boolean(false),
            DynValue::List(items) if items.is_empty() => {
                return Err(Fault::invalid_args(
                    "cannot infer the element signature of an empty list",
                ))
            }
            DynValue::Map(entries) if entries.is_empty() => {
                return Err(Fault::invalid_signature(
                    "cannot infer the signature of an empty map",
                ))
            }
            DynValue::List(items) => boxed_array(items.iter())?,
            DynValue::Map(entries) => boxed_map(entries)?,
            DynValue::Term { name, args } => boxed_term(name, args)?,
            scalar => encode_native(scalar)?,
        };
        Ok(BsvTriple::new(value.is_nil(), type_name, payload))
    }
}

fn boxed_array<'a>(items: impl Iterator<Item = &'a DynValue>) -> FaultResult<WireValue> {
    let items = items
        .map(|item| encode_bsv(item).map(BsvTriple::into_wire))
        .collect::<FaultResult<Vec<_>>>()?;
    Ok(WireValue::array(WireType::bsv(), items))
}

fn boxed_term(name: &str, args: &[DynValue]) -> FaultResult<WireValue> {
    let name = DynValue::String(name.to_string());
    boxed_array(std::iter::once(&name).chain(args))
}

fn boxed_map(entries: &[(DynValue, DynValue)]) -> FaultResult<WireValue> {
    let (key_type, keys) = encode_map_keys(entries).map_err(Fault::invalid_signature)?;
    let entries = keys
        .into_iter()
        .zip(entries)
        .map(|(key, (_, value))| Ok((key, encode_bsv(value)?.into_wire())))
        .collect::<FaultResult<Vec<_>>>()?;
    Ok(WireValue::dict(key_type, WireType::bsv(), entries))
}

fn to_dyn(triple: ValidatedTriple) -> FaultResult<DynValue> {
    if triple.nil {
        return Ok(DynValue::Nil);
    }

    match triple.payload {
        Payload::Scalar(wire) => decode_native(&wire, None),
        Payload::Elements(elements) => {
            let values = elements
                .into_iter()
                .map(to_dyn)
                .collect::<FaultResult<Vec<_>>>()?;
            if triple.bsv_type == BsvType::Term {
                term_from_values(values)
            } else {
                Ok(DynValue::List(values))
            }
        }
        Payload::Entries(entries) => {
            let entries = entries
                .into_iter()
                .map(|(key, value)| {
                    let value = match value {
                        MapValue::Boxed(boxed) => to_dyn(boxed)?,
                        MapValue::Raw(raw) => decode_native(&raw, None)?,
                    };
                    Ok((decode_native(&key, None)?, value))
                })
                .collect::<FaultResult<Vec<_>>>()?;
            Ok(DynValue::map(entries))
        }
    }
}
