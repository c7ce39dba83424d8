//! # Shared Types Crate
//!
//! Types that cross the module bus, defined once for every crate.
//!
//! ## Contents
//!
//! - **Value model** (`entities`): `DynValue`, the dynamically-typed value
//!   that module methods consume and produce.
//! - **Wire model** (`wire`): `WireValue` / `WireType`, the bus's native typed
//!   values and their type signatures.
//! - **Grammar** (`grammar`): object-path and signature validation.
//! - **Faults** (`errors`): the named remote faults callers observe.
//! - **Envelope** (`envelope`): `MethodCall` and caller identity.

pub mod entities;
pub mod envelope;
pub mod errors;
pub mod grammar;
pub mod wire;

pub use entities::*;
pub use envelope::{CallSerial, CallerIdentity, MethodCall, MethodReply, INTROSPECTABLE_INTERFACE};
pub use errors::{names, Fault, FaultKind, FaultResult};
pub use wire::{SignatureError, WireType, WireValue};
