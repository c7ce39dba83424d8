//! Ports Layer
//!
//! - Driving Ports (inbound): what the bus adapter calls
//! - Driven Ports (outbound): module definitions and authorization

pub mod inbound;
pub mod outbound;

pub use inbound::NamespaceApi;
pub use outbound::{AllowAll, AuthDecision, Authorizer, ModuleLoader};
