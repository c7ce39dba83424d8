//! Adapters: the bus-facing serving loop and in-process implementations of
//! the outbound ports.

pub mod bus_adapter;
pub mod catalog;
pub mod grants;

pub use bus_adapter::NamespaceBusAdapter;
pub use catalog::{ModuleCatalog, ModuleFactory};
pub use grants::{GrantTableAuthorizer, DEFAULT_DENIAL};
