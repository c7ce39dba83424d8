//! # Module Registry
//!
//! Process-wide table of modules keyed by object path suffix
//! (`Network::Routing` lives at `Network/Routing`).
//!
//! Each key owns a one-shot cell: concurrent imports of one module share a
//! single loader call, imports of different modules never wait for each
//! other. Modules are never unloaded.

use crate::domain::{Module, ModuleState};
use crate::ports::ModuleLoader;
use dashmap::DashMap;
use shared_types::grammar::{is_valid_object_path, module_name_for_path, object_name_for_module};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

struct ModuleSlot {
    name: String,
    registered: AtomicBool,
    cell: OnceCell<Arc<Module>>,
}

impl ModuleSlot {
    fn new(name: &str, registered: bool) -> Self {
        Self {
            name: name.to_string(),
            registered: AtomicBool::new(registered),
            cell: OnceCell::new(),
        }
    }
}

pub struct ModuleRegistry {
    loader: Arc<dyn ModuleLoader>,
    modules: DashMap<String, Arc<ModuleSlot>>,
}

fn key_for(name: &str) -> Option<String> {
    let key = object_name_for_module(name);
    (!key.is_empty() && is_valid_object_path(&format!("/{}", key))).then_some(key)
}

impl ModuleRegistry {
    pub fn new(loader: Arc<dyn ModuleLoader>) -> Self {
        Self {
            loader,
            modules: DashMap::new(),
        }
    }

    /// Make a module known without loading it. Returns false for names that
    /// map to no valid object path, or whose path another module already
    /// claims.
    pub fn register(&self, name: &str) -> bool {
        let name = name.trim();
        let Some(key) = key_for(name) else {
            warn!(module = %name, "Refusing to register module with invalid name");
            return false;
        };
        if !self.loader.knows(name) {
            warn!(module = %name, "Registering module the loader does not provide");
        }
        let slot = self
            .modules
            .entry(key)
            .or_insert_with(|| Arc::new(ModuleSlot::new(name, true)))
            .clone();
        if slot.name != name {
            warn!(module = %name, claimed_by = %slot.name, "Object path already taken");
            return false;
        }
        slot.registered.store(true, Ordering::Release);
        debug!(module = %name, "Module registered");
        true
    }

    /// Load a module. Idempotent: an already loaded module is `true` without
    /// calling the loader again. Any failure is `false`, including a name
    /// whose object path belongs to a differently named module.
    pub async fn import(&self, name: &str) -> bool {
        let name = name.trim();
        let Some(key) = key_for(name) else {
            debug!(module = %name, "Import of invalid module name");
            return false;
        };
        self.load_slot(key, name).await
    }

    /// Load whatever module the object path `suffix` addresses: the module
    /// registered there, or else the module named after the path.
    pub async fn import_path(&self, suffix: &str) -> bool {
        let registered = self.modules.get(suffix).map(|slot| slot.name.clone());
        match registered {
            Some(name) => self.load_slot(suffix.to_string(), &name).await,
            None => self.import(&module_name_for_path(suffix)).await,
        }
    }

    async fn load_slot(&self, key: String, name: &str) -> bool {
        let slot = self
            .modules
            .entry(key.clone())
            .or_insert_with(|| Arc::new(ModuleSlot::new(name, false)))
            .clone();
        if slot.name != name {
            warn!(module = %name, claimed_by = %slot.name, "Object path already taken");
            return false;
        }

        let loaded = slot
            .cell
            .get_or_try_init(|| async {
                let module = self.loader.load(&slot.name).await?;
                info!(
                    module = %slot.name,
                    methods = module.methods().count(),
                    "Module loaded"
                );
                Ok::<_, crate::domain::NamespaceError>(Arc::new(module))
            })
            .await;

        match loaded {
            Ok(_) => true,
            Err(e) => {
                warn!(module = %name, error = %e, "Module import failed");
                self.modules.remove_if(&key, |_, slot| {
                    !slot.registered.load(Ordering::Acquire) && !slot.cell.initialized()
                });
                false
            }
        }
    }

    /// Loaded module served at `suffix`, if any.
    pub fn resolve(&self, suffix: &str) -> Option<Arc<Module>> {
        self.modules
            .get(suffix)
            .and_then(|slot| slot.cell.get().cloned())
    }

    /// Whether anything is registered or loaded at `suffix`.
    pub fn is_known(&self, suffix: &str) -> bool {
        self.modules.get(suffix).is_some_and(|slot| {
            slot.registered.load(Ordering::Acquire) || slot.cell.initialized()
        })
    }

    /// Lifecycle state of the module called `name`.
    pub fn state(&self, name: &str) -> Option<ModuleState> {
        let name = name.trim();
        let slot = self.modules.get(&key_for(name)?)?;
        if slot.name != name {
            None
        } else if slot.cell.initialized() {
            Some(ModuleState::Loaded)
        } else if slot.registered.load(Ordering::Acquire) {
            Some(ModuleState::Registered)
        } else {
            None
        }
    }

    /// All loaded modules, ordered by object path.
    pub fn loaded_modules(&self) -> Vec<Arc<Module>> {
        let mut loaded: Vec<(String, Arc<Module>)> = self
            .modules
            .iter()
            .filter_map(|entry| {
                entry
                    .value()
                    .cell
                    .get()
                    .map(|module| (entry.key().clone(), module.clone()))
            })
            .collect();
        loaded.sort_by(|a, b| a.0.cmp(&b.0));
        loaded.into_iter().map(|(_, module)| module).collect()
    }
}
