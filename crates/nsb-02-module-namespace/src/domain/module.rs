//! Modules and their method tables.
//!
//! A module is a named set of methods. Each method declares its parameter
//! kinds and an optional return kind, and both calling conventions dispatch
//! through the same table.

use serde::{Deserialize, Serialize};
use shared_types::grammar::object_name_for_module;
use shared_types::{DynValue, FaultResult, ValueKind, WireType};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Callable body of a module method.
pub type MethodHandler = Arc<dyn Fn(&[DynValue]) -> FaultResult<DynValue> + Send + Sync>;

/// Lifecycle of a module in the registry. Modules are never unloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModuleState {
    /// Known by name, not loaded yet.
    Registered,
    /// Loaded and callable.
    Loaded,
}

/// One method of a module.
#[derive(Clone)]
pub struct ModuleMethod {
    pub name: String,
    pub params: Vec<ValueKind>,
    pub returns: Option<ValueKind>,
    handler: MethodHandler,
}

impl ModuleMethod {
    pub fn new<F>(
        name: impl Into<String>,
        params: Vec<ValueKind>,
        returns: Option<ValueKind>,
        handler: F,
    ) -> Self
    where
        F: Fn(&[DynValue]) -> FaultResult<DynValue> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            params,
            returns,
            handler: Arc::new(handler),
        }
    }

    /// Run the method body. Argument count is the caller's concern.
    pub fn call(&self, args: &[DynValue]) -> FaultResult<DynValue> {
        (self.handler)(args)
    }

    /// Native wire types of the parameters.
    pub fn native_params(&self) -> Vec<WireType> {
        self.params.iter().map(|k| k.native_wire_type()).collect()
    }

    pub fn native_return(&self) -> Option<WireType> {
        self.returns.map(ValueKind::native_wire_type)
    }
}

impl fmt::Debug for ModuleMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleMethod")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("returns", &self.returns)
            .finish_non_exhaustive()
    }
}

/// A loadable module.
#[derive(Debug, Clone)]
pub struct Module {
    name: String,
    methods: BTreeMap<String, ModuleMethod>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: BTreeMap::new(),
        }
    }

    /// Add a method; a later method with the same name replaces the earlier.
    pub fn with_method(mut self, method: ModuleMethod) -> Self {
        self.methods.insert(method.name.clone(), method);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Object path suffix this module is served under.
    pub fn object_name(&self) -> String {
        object_name_for_module(&self.name)
    }

    pub fn method(&self, name: &str) -> Option<&ModuleMethod> {
        self.methods.get(name)
    }

    /// Methods in name order.
    pub fn methods(&self) -> impl Iterator<Item = &ModuleMethod> {
        self.methods.values()
    }
}
