//! # NSB-03 Authorization Retry
//!
//! Client-side handling of the one fault that is not terminal: a call
//! rejected with `AuthorizationRequired` is retried exactly once after the
//! privilege broker grants the action it names.
//!
//! ```ignore
//! use nsb_03_auth_retry::AuthorizationRetryClient;
//!
//! let client = AuthorizationRetryClient::for_current_process(broker);
//! let reply = client
//!     .call(|| conn.call(service, path, interface, "ParamString", args.clone()))
//!     .await?;
//! ```
//!
//! The authorization fault is matched on `FaultKind`, never on message text;
//! turning a wire error body into that kind is `Fault::from_wire`'s job.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod broker;
pub mod client;

pub use broker::PrivilegeBroker;
pub use client::AuthorizationRetryClient;
