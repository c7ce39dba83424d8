//! # Wire Model
//!
//! Native typed values as they travel on the system bus, and the type
//! signatures describing them.
//!
//! Signatures use the bus's single-letter type codes:
//!
//! ```text
//! y byte      b boolean   n int16    q uint16   i int32    u uint32
//! x int64     t uint64    d double   s string   o path     g signature
//! v variant   aT array    a{KV} dict (K basic)  (T...) struct
//! ```

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum container nesting accepted when parsing a signature.
pub const MAX_SIGNATURE_DEPTH: usize = 64;

/// Maximum length of a signature string.
pub const MAX_SIGNATURE_LEN: usize = 255;

/// Errors from signature parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// Empty signature where one complete type was required.
    #[error("empty signature")]
    Empty,

    /// Unknown type code.
    #[error("unknown type code '{code}' at offset {offset}")]
    UnknownCode { code: char, offset: usize },

    /// Container was not closed.
    #[error("unterminated container in '{0}'")]
    Unterminated(String),

    /// Dict entry key was not a basic type.
    #[error("dict key must be a basic type, got '{0}'")]
    NonBasicKey(String),

    /// Dict entry appeared outside an array.
    #[error("dict entry outside an array at offset {0}")]
    StrayDictEntry(usize),

    /// A struct with no fields.
    #[error("empty struct at offset {0}")]
    EmptyStruct(usize),

    /// Too deeply nested or too long.
    #[error("signature exceeds limits: {0}")]
    TooComplex(String),

    /// Extra characters after a single complete type.
    #[error("trailing characters after complete type in '{0}'")]
    Trailing(String),
}

/// Type of a wire value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WireType {
    Byte,
    Boolean,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Double,
    String,
    ObjectPath,
    Signature,
    Variant,
    Array(Box<WireType>),
    Dict(Box<WireType>, Box<WireType>),
    Struct(Vec<WireType>),
}

impl WireType {
    /// `a<element>`
    pub fn array(element: WireType) -> Self {
        WireType::Array(Box::new(element))
    }

    /// `a{<key><value>}`
    pub fn dict(key: WireType, value: WireType) -> Self {
        WireType::Dict(Box::new(key), Box::new(value))
    }

    /// The boxed value signature `(bsv)`.
    pub fn bsv() -> Self {
        WireType::Struct(vec![WireType::Boolean, WireType::String, WireType::Variant])
    }

    /// Basic types may be used as dict keys.
    pub fn is_basic(&self) -> bool {
        !matches!(
            self,
            WireType::Variant | WireType::Array(_) | WireType::Dict(..) | WireType::Struct(_)
        )
    }

    /// Render the type as a signature string.
    pub fn signature(&self) -> String {
        let mut out = String::new();
        self.write_signature(&mut out);
        out
    }

    fn write_signature(&self, out: &mut String) {
        match self {
            WireType::Byte => out.push('y'),
            WireType::Boolean => out.push('b'),
            WireType::Int16 => out.push('n'),
            WireType::UInt16 => out.push('q'),
            WireType::Int32 => out.push('i'),
            WireType::UInt32 => out.push('u'),
            WireType::Int64 => out.push('x'),
            WireType::UInt64 => out.push('t'),
            WireType::Double => out.push('d'),
            WireType::String => out.push('s'),
            WireType::ObjectPath => out.push('o'),
            WireType::Signature => out.push('g'),
            WireType::Variant => out.push('v'),
            WireType::Array(element) => {
                out.push('a');
                element.write_signature(out);
            }
            WireType::Dict(key, value) => {
                out.push_str("a{");
                key.write_signature(out);
                value.write_signature(out);
                out.push('}');
            }
            WireType::Struct(fields) => {
                out.push('(');
                for field in fields {
                    field.write_signature(out);
                }
                out.push(')');
            }
        }
    }

    /// Parse exactly one complete type.
    pub fn parse(signature: &str) -> Result<Self, SignatureError> {
        let mut types = Self::parse_all(signature)?;
        match types.len() {
            0 => Err(SignatureError::Empty),
            1 => Ok(types.remove(0)),
            _ => Err(SignatureError::Trailing(signature.to_string())),
        }
    }

    /// Parse a sequence of complete types (a method argument list).
    pub fn parse_all(signature: &str) -> Result<Vec<Self>, SignatureError> {
        if signature.len() > MAX_SIGNATURE_LEN {
            return Err(SignatureError::TooComplex(format!(
                "length {} > {}",
                signature.len(),
                MAX_SIGNATURE_LEN
            )));
        }

        let bytes = signature.as_bytes();
        let mut pos = 0;
        let mut types = Vec::new();
        while pos < bytes.len() {
            types.push(parse_one(bytes, &mut pos, 0, signature)?);
        }
        Ok(types)
    }
}

fn parse_one(
    bytes: &[u8],
    pos: &mut usize,
    depth: usize,
    whole: &str,
) -> Result<WireType, SignatureError> {
    if depth > MAX_SIGNATURE_DEPTH {
        return Err(SignatureError::TooComplex(format!(
            "nesting deeper than {}",
            MAX_SIGNATURE_DEPTH
        )));
    }

    let Some(&code) = bytes.get(*pos) else {
        return Err(SignatureError::Unterminated(whole.to_string()));
    };
    let offset = *pos;
    *pos += 1;

    let parsed = match code {
        b'y' => WireType::Byte,
        b'b' => WireType::Boolean,
        b'n' => WireType::Int16,
        b'q' => WireType::UInt16,
        b'i' => WireType::Int32,
        b'u' => WireType::UInt32,
        b'x' => WireType::Int64,
        b't' => WireType::UInt64,
        b'd' => WireType::Double,
        b's' => WireType::String,
        b'o' => WireType::ObjectPath,
        b'g' => WireType::Signature,
        b'v' => WireType::Variant,
        b'a' => {
            if bytes.get(*pos) == Some(&b'{') {
                *pos += 1;
                let key = parse_one(bytes, pos, depth + 1, whole)?;
                if !key.is_basic() {
                    return Err(SignatureError::NonBasicKey(key.signature()));
                }
                let value = parse_one(bytes, pos, depth + 1, whole)?;
                if bytes.get(*pos) != Some(&b'}') {
                    return Err(SignatureError::Unterminated(whole.to_string()));
                }
                *pos += 1;
                WireType::dict(key, value)
            } else {
                WireType::array(parse_one(bytes, pos, depth + 1, whole)?)
            }
        }
        b'(' => {
            let mut fields = Vec::new();
            loop {
                match bytes.get(*pos) {
                    Some(b')') => {
                        *pos += 1;
                        break;
                    }
                    Some(_) => fields.push(parse_one(bytes, pos, depth + 1, whole)?),
                    None => return Err(SignatureError::Unterminated(whole.to_string())),
                }
            }
            if fields.is_empty() {
                return Err(SignatureError::EmptyStruct(offset));
            }
            WireType::Struct(fields)
        }
        b'{' => return Err(SignatureError::StrayDictEntry(offset)),
        other => {
            return Err(SignatureError::UnknownCode {
                code: other as char,
                offset,
            })
        }
    };

    Ok(parsed)
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.signature())
    }
}

impl FromStr for WireType {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WireType::parse(s)
    }
}

impl Serialize for WireType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.signature())
    }
}

impl<'de> Deserialize<'de> for WireType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        WireType::parse(&s).map_err(de::Error::custom)
    }
}

/// A native typed value on the bus.
///
/// Containers carry their element types, so an empty array or dict still has
/// a complete signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WireValue {
    Byte(u8),
    Boolean(bool),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Double(f64),
    String(String),
    ObjectPath(String),
    Signature(String),
    Variant(Box<WireValue>),
    Array {
        element: WireType,
        items: Vec<WireValue>,
    },
    Dict {
        key: WireType,
        value: WireType,
        entries: Vec<(WireValue, WireValue)>,
    },
    Struct(Vec<WireValue>),
}

impl WireValue {
    pub fn string(s: impl Into<String>) -> Self {
        WireValue::String(s.into())
    }

    pub fn variant(inner: WireValue) -> Self {
        WireValue::Variant(Box::new(inner))
    }

    pub fn array(element: WireType, items: Vec<WireValue>) -> Self {
        WireValue::Array { element, items }
    }

    pub fn dict(key: WireType, value: WireType, entries: Vec<(WireValue, WireValue)>) -> Self {
        WireValue::Dict {
            key,
            value,
            entries,
        }
    }

    /// Type of this value.
    pub fn wire_type(&self) -> WireType {
        match self {
            WireValue::Byte(_) => WireType::Byte,
            WireValue::Boolean(_) => WireType::Boolean,
            WireValue::Int16(_) => WireType::Int16,
            WireValue::UInt16(_) => WireType::UInt16,
            WireValue::Int32(_) => WireType::Int32,
            WireValue::UInt32(_) => WireType::UInt32,
            WireValue::Int64(_) => WireType::Int64,
            WireValue::UInt64(_) => WireType::UInt64,
            WireValue::Double(_) => WireType::Double,
            WireValue::String(_) => WireType::String,
            WireValue::ObjectPath(_) => WireType::ObjectPath,
            WireValue::Signature(_) => WireType::Signature,
            WireValue::Variant(_) => WireType::Variant,
            WireValue::Array { element, .. } => WireType::array(element.clone()),
            WireValue::Dict { key, value, .. } => WireType::dict(key.clone(), value.clone()),
            WireValue::Struct(fields) => {
                WireType::Struct(fields.iter().map(WireValue::wire_type).collect())
            }
        }
    }

    /// Signature string of this value.
    pub fn signature(&self) -> String {
        self.wire_type().signature()
    }
}
