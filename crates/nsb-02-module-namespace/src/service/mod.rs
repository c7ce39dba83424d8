//! Service layer: the module registry and the dispatcher built on it.

pub mod dispatcher;
pub mod registry;

pub use dispatcher::{Convention, Dispatcher};
pub use registry::ModuleRegistry;
