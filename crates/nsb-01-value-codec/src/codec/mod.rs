//! Conversions between `DynValue` and the two wire conventions.

pub mod boxed;
pub mod native;

pub use boxed::{decode_bsv, encode_bsv};
pub use native::{decode_native, encode_native, encode_native_as, term_from_values};
