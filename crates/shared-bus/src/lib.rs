//! # Shared Bus - In-Process System Bus
//!
//! Point-to-point method calls between connections, routed by well-known
//! service name.
//!
//! ```text
//! ┌──────────────┐   call()    ┌──────────────────┐   next_call()   ┌──────────────┐
//! │ BusConnection│ ──────────▶ │ InMemorySystemBus│ ──────────────▶ │ServiceEndpoint│
//! │   (caller)   │ ◀────────── │  name → mailbox  │ ◀────────────── │  (service)   │
//! └──────────────┘   reply     └──────────────────┘  IncomingCall   └──────────────┘
//!                                                      .reply()
//! ```
//!
//! ## Semantics
//!
//! - A destination nobody owns fails with `ServiceUnknown`.
//! - A call not answered within `BusConfig::call_timeout_secs` fails with
//!   `NoReply`, as does a call whose service dropped it unanswered.
//! - Every connection gets a unique name (`:1.N`) and carries the caller's
//!   process id, which services see as `MethodCall::sender`.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod bus;
pub mod config;
pub mod connection;
pub mod endpoint;

pub use bus::InMemorySystemBus;
pub use config::{BusConfig, BusError};
pub use connection::{BusConnection, MethodCaller};
pub use endpoint::{IncomingCall, ServiceEndpoint};

/// Calls buffered per service before callers wait for room.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// Default call timeout, in seconds.
pub const DEFAULT_CALL_TIMEOUT_SECS: u64 = 25;
