//! # NSB-01 Value Codec
//!
//! Pure conversion between the dynamic value model (`DynValue`) and the bus
//! wire, in both calling conventions:
//!
//! - **native**: values map straight onto the bus's typed values
//!   (`encode_native`, `encode_native_as`, `decode_native`);
//! - **boxed**: values travel as `(bsv)` triples of
//!   `{nil flag, type name, variant payload}` (`encode_bsv`, `decode_bsv`).
//!
//! The validator (`validator::validate`) checks a triple before it is decoded
//! and classifies rejections as malformed, unknown type, unimplemented type or
//! bad payload.
//!
//! ## Usage Example
//!
//! ```ignore
//! use nsb_01_value_codec::{decode_bsv, encode_bsv};
//! use shared_types::DynValue;
//!
//! let wire = encode_bsv(&DynValue::int(42))?.into_wire();
//! assert_eq!(wire.signature(), "(bsv)");
//! assert_eq!(decode_bsv(&wire)?, DynValue::int(42));
//! ```
//!
//! Nothing here recovers from a fault; every failure propagates to the caller.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod codec;
pub mod domain;
pub mod validator;

pub use codec::{decode_bsv, decode_native, encode_bsv, encode_native, encode_native_as};
pub use domain::{lookup, BsvTriple, BsvType, TypeNameStatus};
pub use validator::{validate, BsvRejection, ValidatedTriple};
