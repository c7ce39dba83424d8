//! # NSB-02 Module Namespace
//!
//! Serves a namespace of loadable modules on the bus. Each module appears as
//! an object under the namespace root and can be called in two conventions,
//! selected by interface: native values or boxed `(bsv)` triples.
//!
//! ## Architecture
//!
//! - **Domain** (`domain/`): modules and method tables, configuration,
//!   action ids, introspection XML
//! - **Ports** (`ports/`): `NamespaceApi` (driving), `ModuleLoader` and
//!   `Authorizer` (driven)
//! - **Service** (`service/`): `ModuleRegistry` (one-shot import per module)
//!   and `Dispatcher` (implements `NamespaceApi`)
//! - **Adapters** (`adapters/`): `NamespaceBusAdapter` serving the bus,
//!   `ModuleCatalog` and `GrantTableAuthorizer`
//! - **Modules** (`modules/`): modules shipped with the service
//!
//! ## Dispatch
//!
//! ```text
//! MethodCall ─▶ Introspect? ─▶ under root? ─▶ authorized? ─▶ root: Import(s) -> b
//!                                                         └▶ module: resolve / auto-import
//!                                                              ─▶ method ─▶ convention
//!                                                              ─▶ decode ─▶ call ─▶ encode
//! ```
//!
//! ## Wiring
//!
//! ```ignore
//! use nsb_02_module_namespace::{
//!     AllowAll, Dispatcher, ModuleCatalog, NamespaceBusAdapter, NamespaceConfig,
//! };
//! use shared_bus::InMemorySystemBus;
//! use std::sync::Arc;
//!
//! let bus = InMemorySystemBus::new();
//! let config = NamespaceConfig::default();
//! let dispatcher = Arc::new(Dispatcher::from_config(
//!     config.clone(),
//!     Arc::new(ModuleCatalog::with_builtins()),
//!     Arc::new(AllowAll),
//! )?);
//! let (adapter, handle) = NamespaceBusAdapter::spawn(&bus, &config, dispatcher)?;
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod domain;
pub mod modules;
pub mod ports;
pub mod service;

pub use adapters::{GrantTableAuthorizer, ModuleCatalog, NamespaceBusAdapter};
pub use domain::{
    ConfigError, Module, ModuleMethod, ModuleState, NamespaceConfig, NamespaceError,
};
pub use ports::{AllowAll, AuthDecision, Authorizer, ModuleLoader, NamespaceApi};
pub use service::{Convention, Dispatcher, ModuleRegistry};
