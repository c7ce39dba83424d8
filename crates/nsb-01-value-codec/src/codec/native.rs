//! Native convention: dynamic values as the bus's own typed values.
//!
//! | value              | wire                                  |
//! |--------------------|---------------------------------------|
//! | `Bool`             | `b`                                   |
//! | `Int`              | `y n q i u x t` by width / signedness |
//! | `Float`            | `d`                                   |
//! | `String`           | `s`                                   |
//! | `ObjectPath`       | `o`                                   |
//! | `Signature`        | `g`                                   |
//! | `List`             | `aT`, one element type                |
//! | `Map`              | `a{Kv}`, one basic key type           |
//! | `Term`             | `av`, name first                      |
//!
//! `Nil` has no native form of its own; against a declared type it encodes
//! as that type's zero value.

use shared_types::grammar::{validate_object_path, validate_signature};
use shared_types::{DynValue, Fault, FaultResult, IntWidth, ValueKind, WireType, WireValue};

// =============================================================================
// ENCODE
// =============================================================================

/// Encode a value, inferring its wire type from its content.
pub fn encode_native(value: &DynValue) -> FaultResult<WireValue> {
    match value {
        DynValue::Nil => Err(Fault::invalid_args(
            "nil has no native wire representation",
        )),
        DynValue::Bool(b) => Ok(WireValue::Boolean(*b)),
        DynValue::Int {
            value,
            width,
            signed,
        } => {
            if !width.supports(*signed) {
                return Err(Fault::invalid_args(
                    "signed 8-bit integers have no wire type",
                ));
            }
            int_to_wire(*value, &width.wire_type(*signed))
        }
        DynValue::Float(f) => Ok(WireValue::Double(*f)),
        DynValue::String(s) => Ok(WireValue::String(s.clone())),
        DynValue::ObjectPath(p) => {
            validate_object_path(p)?;
            Ok(WireValue::ObjectPath(p.clone()))
        }
        DynValue::Signature(s) => {
            validate_signature(s)?;
            Ok(WireValue::Signature(s.clone()))
        }
        DynValue::List(items) => encode_list(items),
        DynValue::Map(entries) => encode_map(entries),
        DynValue::Term { name, args } => encode_term(name, args),
    }
}

fn encode_list(items: &[DynValue]) -> FaultResult<WireValue> {
    let encoded = items
        .iter()
        .map(encode_native)
        .collect::<FaultResult<Vec<_>>>()?;

    let Some(first) = encoded.first() else {
        return Err(Fault::invalid_args(
            "cannot infer the element type of an empty list",
        ));
    };
    let element = first.wire_type();
    if let Some(odd) = encoded.iter().find(|item| item.wire_type() != element) {
        return Err(Fault::invalid_args(format!(
            "list elements differ in type: '{}' and '{}'",
            element,
            odd.signature()
        )));
    }
    Ok(WireValue::array(element, encoded))
}

fn encode_map(entries: &[(DynValue, DynValue)]) -> FaultResult<WireValue> {
    let (key_type, keys) = encode_map_keys(entries).map_err(Fault::invalid_args)?;
    let entries = keys
        .into_iter()
        .zip(entries)
        .map(|(key, (_, value))| Ok((key, WireValue::variant(encode_native(value)?))))
        .collect::<FaultResult<Vec<_>>>()?;
    Ok(WireValue::dict(key_type, WireType::Variant, entries))
}

fn encode_term(name: &str, args: &[DynValue]) -> FaultResult<WireValue> {
    let mut items = Vec::with_capacity(args.len() + 1);
    items.push(WireValue::variant(WireValue::string(name)));
    for arg in args {
        items.push(WireValue::variant(encode_native(arg)?));
    }
    Ok(WireValue::array(WireType::Variant, items))
}

/// Encode map keys, which must share one basic wire type.
///
/// An empty map falls back to `string` keys. The error is a bare
/// description; callers choose the fault kind.
pub(crate) fn encode_map_keys(
    entries: &[(DynValue, DynValue)],
) -> Result<(WireType, Vec<WireValue>), String> {
    let mut key_type: Option<WireType> = None;
    let mut keys = Vec::with_capacity(entries.len());

    for (key, _) in entries {
        let encoded = encode_native(key).map_err(|e| format!("bad map key: {}", e.message))?;
        let encoded_type = encoded.wire_type();
        if !encoded_type.is_basic() {
            return Err(format!("map key type '{}' is not basic", encoded_type));
        }
        match &key_type {
            None => key_type = Some(encoded_type),
            Some(expected) if *expected != encoded_type => {
                return Err(format!(
                    "map keys differ in type: '{}' and '{}'",
                    expected, encoded_type
                ));
            }
            Some(_) => {}
        }
        keys.push(encoded);
    }

    Ok((key_type.unwrap_or(WireType::String), keys))
}

/// Encode a value against an explicit wire type.
///
/// Empty containers are fine here since the element type is given.
pub fn encode_native_as(value: &DynValue, target: &WireType) -> FaultResult<WireValue> {
    match (value, target) {
        (DynValue::Nil, _) => zero_value(target),
        (_, WireType::Variant) => Ok(WireValue::variant(encode_native(value)?)),
        (DynValue::Bool(b), WireType::Boolean) => Ok(WireValue::Boolean(*b)),
        (DynValue::Int { value, .. }, t) if is_integer_type(t) => int_to_wire(*value, t),
        (DynValue::Float(f), WireType::Double) => Ok(WireValue::Double(*f)),
        (DynValue::String(s) | DynValue::ObjectPath(s) | DynValue::Signature(s), WireType::String) => {
            Ok(WireValue::String(s.clone()))
        }
        (DynValue::String(s) | DynValue::ObjectPath(s), WireType::ObjectPath) => {
            validate_object_path(s)?;
            Ok(WireValue::ObjectPath(s.clone()))
        }
        (DynValue::String(s) | DynValue::Signature(s), WireType::Signature) => {
            validate_signature(s)?;
            Ok(WireValue::Signature(s.clone()))
        }
        (DynValue::List(items), WireType::Array(element)) => {
            let items = items
                .iter()
                .map(|item| encode_native_as(item, element))
                .collect::<FaultResult<Vec<_>>>()?;
            Ok(WireValue::array((**element).clone(), items))
        }
        (DynValue::Term { name, args }, WireType::Array(element)) => {
            let mut items = Vec::with_capacity(args.len() + 1);
            items.push(encode_native_as(&DynValue::String(name.clone()), element)?);
            for arg in args {
                items.push(encode_native_as(arg, element)?);
            }
            Ok(WireValue::array((**element).clone(), items))
        }
        (DynValue::Map(entries), WireType::Dict(key, val)) => {
            let entries = entries
                .iter()
                .map(|(k, v)| Ok((encode_native_as(k, key)?, encode_native_as(v, val)?)))
                .collect::<FaultResult<Vec<_>>>()?;
            Ok(WireValue::dict((**key).clone(), (**val).clone(), entries))
        }
        _ => Err(Fault::invalid_args(format!(
            "cannot encode {} as '{}'",
            value.type_label(),
            target
        ))),
    }
}

fn zero_value(target: &WireType) -> FaultResult<WireValue> {
    Ok(match target {
        WireType::Byte => WireValue::Byte(0),
        WireType::Boolean => WireValue::Boolean(false),
        WireType::Int16 => WireValue::Int16(0),
        WireType::UInt16 => WireValue::UInt16(0),
        WireType::Int32 => WireValue::Int32(0),
        WireType::UInt32 => WireValue::UInt32(0),
        WireType::Int64 => WireValue::Int64(0),
        WireType::UInt64 => WireValue::UInt64(0),
        WireType::Double => WireValue::Double(0.0),
        WireType::String => WireValue::String(String::new()),
        WireType::ObjectPath => WireValue::ObjectPath("/".to_string()),
        WireType::Signature => WireValue::Signature(String::new()),
        WireType::Variant => WireValue::variant(WireValue::Boolean(false)),
        WireType::Array(element) => WireValue::array((**element).clone(), Vec::new()),
        WireType::Dict(key, value) => {
            WireValue::dict((**key).clone(), (**value).clone(), Vec::new())
        }
        WireType::Struct(_) => {
            return Err(Fault::invalid_args(format!(
                "nil cannot be encoded as struct '{}'",
                target
            )))
        }
    })
}

fn is_integer_type(t: &WireType) -> bool {
    matches!(
        t,
        WireType::Byte
            | WireType::Int16
            | WireType::UInt16
            | WireType::Int32
            | WireType::UInt32
            | WireType::Int64
            | WireType::UInt64
    )
}

fn int_to_wire(value: i64, target: &WireType) -> FaultResult<WireValue> {
    let overflow = || Fault::range_overflow(format!("{} does not fit wire type '{}'", value, target));
    Ok(match target {
        WireType::Byte => WireValue::Byte(u8::try_from(value).map_err(|_| overflow())?),
        WireType::Int16 => WireValue::Int16(i16::try_from(value).map_err(|_| overflow())?),
        WireType::UInt16 => WireValue::UInt16(u16::try_from(value).map_err(|_| overflow())?),
        WireType::Int32 => WireValue::Int32(i32::try_from(value).map_err(|_| overflow())?),
        WireType::UInt32 => WireValue::UInt32(u32::try_from(value).map_err(|_| overflow())?),
        WireType::Int64 => WireValue::Int64(value),
        WireType::UInt64 => WireValue::UInt64(u64::try_from(value).map_err(|_| overflow())?),
        other => {
            return Err(Fault::invalid_args(format!(
                "'{}' is not an integer type",
                other
            )))
        }
    })
}

// =============================================================================
// DECODE
// =============================================================================

/// Decode a native wire value.
///
/// With a declared kind the result must satisfy it. Two casts apply: a string
/// starting with `/` becomes an object path for an `ObjectPath` parameter, and
/// an array becomes a term (name first) for a `Term` parameter.
pub fn decode_native(value: &WireValue, kind: Option<ValueKind>) -> FaultResult<DynValue> {
    let decoded = match (value, kind) {
        (WireValue::Variant(inner), _) => return decode_native(inner, kind),
        (WireValue::Array { items, .. }, Some(ValueKind::Term)) => {
            let values = items
                .iter()
                .map(|item| decode_native(item, None))
                .collect::<FaultResult<Vec<_>>>()?;
            return term_from_values(values);
        }
        (WireValue::String(s), Some(ValueKind::ObjectPath)) if s.starts_with('/') => {
            validate_object_path(s)?;
            return Ok(DynValue::ObjectPath(s.clone()));
        }
        _ => decode_plain(value)?,
    };

    match kind {
        Some(expected) if !expected.accepts(&decoded) => Err(Fault::invalid_args(format!(
            "expected {}, got {} ('{}')",
            expected,
            decoded.type_label(),
            value.signature()
        ))),
        _ => Ok(decoded),
    }
}

fn decode_plain(value: &WireValue) -> FaultResult<DynValue> {
    let int = |value: i64, width: IntWidth, signed: bool| DynValue::Int {
        value,
        width,
        signed,
    };

    Ok(match value {
        WireValue::Byte(v) => int(i64::from(*v), IntWidth::W8, false),
        WireValue::Boolean(b) => DynValue::Bool(*b),
        WireValue::Int16(v) => int(i64::from(*v), IntWidth::W16, true),
        WireValue::UInt16(v) => int(i64::from(*v), IntWidth::W16, false),
        WireValue::Int32(v) => int(i64::from(*v), IntWidth::W32, true),
        WireValue::UInt32(v) => int(i64::from(*v), IntWidth::W32, false),
        WireValue::Int64(v) => int(*v, IntWidth::W64, true),
        WireValue::UInt64(v) => DynValue::uint(*v)?,
        WireValue::Double(f) => DynValue::Float(*f),
        WireValue::String(s) => DynValue::String(s.clone()),
        WireValue::ObjectPath(p) => {
            validate_object_path(p)?;
            DynValue::ObjectPath(p.clone())
        }
        WireValue::Signature(s) => {
            validate_signature(s)?;
            DynValue::Signature(s.clone())
        }
        WireValue::Variant(inner) => decode_plain(inner)?,
        WireValue::Array { items, .. } => DynValue::List(
            items
                .iter()
                .map(decode_plain)
                .collect::<FaultResult<Vec<_>>>()?,
        ),
        WireValue::Dict { entries, .. } => {
            let entries = entries
                .iter()
                .map(|(k, v)| Ok((decode_plain(k)?, decode_plain(v)?)))
                .collect::<FaultResult<Vec<_>>>()?;
            DynValue::map(entries)
        }
        WireValue::Struct(_) => {
            return Err(Fault::invalid_args(format!(
                "unsupported wire type '{}': structs are only accepted as boxed values",
                value.signature()
            )))
        }
    })
}

/// Build a term from a list whose first element is its name.
pub fn term_from_values(mut values: Vec<DynValue>) -> FaultResult<DynValue> {
    if values.is_empty() {
        return Err(Fault::invalid_args("a term needs a name as its first element"));
    }
    match values.remove(0) {
        DynValue::String(name) => Ok(DynValue::Term { name, args: values }),
        other => Err(Fault::invalid_args(format!(
            "a term name must be a string, got {}",
            other.type_label()
        ))),
    }
}
