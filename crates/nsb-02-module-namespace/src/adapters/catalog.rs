//! Static module catalog: module names mapped to factories.

use crate::domain::{Module, NamespaceError};
use crate::modules;
use crate::ports::ModuleLoader;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

pub type ModuleFactory = Arc<dyn Fn() -> Result<Module, NamespaceError> + Send + Sync>;

#[derive(Clone, Default)]
pub struct ModuleCatalog {
    factories: BTreeMap<String, ModuleFactory>,
}

impl ModuleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with the modules shipped in this crate.
    pub fn with_builtins() -> Self {
        Self::new().with(modules::echo::NAME, || Ok(modules::echo::module()))
    }

    pub fn with<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Result<Module, NamespaceError> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

impl fmt::Debug for ModuleCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.factories.keys()).finish()
    }
}

#[async_trait]
impl ModuleLoader for ModuleCatalog {
    async fn load(&self, name: &str) -> Result<Module, NamespaceError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| NamespaceError::ModuleNotFound(name.to_string()))?;
        debug!(module = %name, "Building module from catalog");
        factory()
    }

    fn knows(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }
}
