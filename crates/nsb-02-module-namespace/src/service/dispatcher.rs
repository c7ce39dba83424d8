//! # Dispatcher
//!
//! Turns one incoming method call into a reply:
//!
//! 1. `Introspect` on any path is answered from the loaded modules, ungated.
//! 2. Paths outside the namespace root are unknown methods.
//! 3. The caller must be authorized for the call's action id.
//! 4. The root serves the management interface (`Import(s) -> b`).
//! 5. Module paths resolve to a loaded module, importing it on first use.
//! 6. The interface picks the convention; arguments are decoded against the
//!    method's declared kinds, the method runs, and the result goes back in
//!    the same convention.

use super::registry::ModuleRegistry;
use crate::domain::introspection::{self, ObjectDescription};
use crate::domain::{action_id_for, ModuleMethod, NamespaceConfig, NamespaceError};
use crate::ports::{AuthDecision, Authorizer, ModuleLoader, NamespaceApi};
use async_trait::async_trait;
use nsb_01_value_codec::{decode_bsv, decode_native, encode_bsv, encode_native_as};
use shared_types::grammar::strip_root;
use shared_types::{
    DynValue, Fault, FaultResult, MethodCall, MethodReply, WireValue, INTROSPECTABLE_INTERFACE,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Calling convention selected by the interface name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convention {
    Native,
    Boxed,
}

pub struct Dispatcher {
    config: NamespaceConfig,
    registry: Arc<ModuleRegistry>,
    authorizer: Arc<dyn Authorizer>,
}

impl Dispatcher {
    pub fn new(
        config: NamespaceConfig,
        registry: Arc<ModuleRegistry>,
        authorizer: Arc<dyn Authorizer>,
    ) -> Self {
        Self {
            config,
            registry,
            authorizer,
        }
    }

    /// Validate `config`, build a registry over `loader` and register the
    /// preload list.
    pub fn from_config(
        config: NamespaceConfig,
        loader: Arc<dyn ModuleLoader>,
        authorizer: Arc<dyn Authorizer>,
    ) -> Result<Self, NamespaceError> {
        config.validate()?;
        let registry = Arc::new(ModuleRegistry::new(loader));
        for name in &config.preload {
            if !registry.register(name) {
                return Err(NamespaceError::load_failed(name, "invalid module name"));
            }
        }
        Ok(Self::new(config, registry, authorizer))
    }

    pub fn config(&self) -> &NamespaceConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<ModuleRegistry> {
        &self.registry
    }

    fn convention(&self, interface: &str) -> Option<Convention> {
        if interface == self.config.native_interface {
            Some(Convention::Native)
        } else if interface == self.config.boxed_interface {
            Some(Convention::Boxed)
        } else {
            None
        }
    }

    fn introspect(&self, path: &str) -> String {
        let mut objects: Vec<ObjectDescription> = vec![introspection::manager_object(&self.config)];
        objects.extend(
            self.registry
                .loaded_modules()
                .iter()
                .map(|module| introspection::module_object(&self.config, module)),
        );
        introspection::introspect(path, &objects)
    }

    async fn authorize(&self, call: &MethodCall) -> FaultResult<()> {
        let action_id = action_id_for(&self.config, call);
        match self.authorizer.check(&call.sender, &action_id).await {
            AuthDecision::Granted => Ok(()),
            AuthDecision::Denied { result } => {
                info!(
                    sender = %call.sender.unique_name,
                    pid = call.sender.pid,
                    action_id = %action_id,
                    result = %result,
                    "Call not authorized"
                );
                Err(Fault::authorization_required(action_id, result))
            }
        }
    }

    async fn manage(&self, call: &MethodCall) -> MethodReply {
        if call.interface != self.config.manager_interface {
            return Err(Fault::unknown_method(format!(
                "interface '{}' is not served on the namespace root",
                call.interface
            )));
        }
        match call.member.as_str() {
            "Import" => {
                let name = match call.args.as_slice() {
                    [WireValue::String(name)] => name,
                    _ => {
                        return Err(Fault::invalid_args(format!(
                            "Import expects one string argument, got '{}'",
                            call.signature()
                        )))
                    }
                };
                let imported = self.registry.import(name).await;
                Ok(vec![WireValue::Boolean(imported)])
            }
            other => Err(Fault::unknown_method(format!(
                "unknown management method '{}'",
                other
            ))),
        }
    }

    async fn call_module(&self, suffix: &str, call: &MethodCall) -> MethodReply {
        let module = match self.registry.resolve(suffix) {
            Some(module) => module,
            None => {
                debug!(path = %call.path, "Importing module on first call");
                if !self.registry.import_path(suffix).await {
                    return Err(Fault::unknown_method(format!(
                        "automatic import failed, unknown object '{}'",
                        call.path
                    )));
                }
                self.registry.resolve(suffix).ok_or_else(|| {
                    Fault::unknown_method(format!(
                        "automatic import failed, unknown object '{}'",
                        call.path
                    ))
                })?
            }
        };

        let method = module.method(&call.member).ok_or_else(|| {
            Fault::unknown_method(format!(
                "method '{}' not found in module '{}'",
                call.member,
                module.name()
            ))
        })?;

        let convention = self.convention(&call.interface).ok_or_else(|| {
            Fault::unknown_method(format!(
                "interface '{}' not found on '{}'",
                call.interface, call.path
            ))
        })?;

        if call.args.len() != method.params.len() {
            return Err(Fault::invalid_args(format!(
                "{} expects {} argument(s), got {}",
                method.name,
                method.params.len(),
                call.args.len()
            )));
        }

        let args = decode_args(method, convention, &call.args)?;
        let result = method.call(&args)?;
        encode_result(method, convention, &result)
    }
}

fn decode_args(
    method: &ModuleMethod,
    convention: Convention,
    args: &[WireValue],
) -> FaultResult<Vec<DynValue>> {
    method
        .params
        .iter()
        .zip(args)
        .enumerate()
        .map(|(i, (kind, wire))| {
            let value = match convention {
                Convention::Native => decode_native(wire, Some(*kind)),
                Convention::Boxed => decode_bsv(wire),
            }
            .map_err(|e| Fault::new(e.kind, format!("{} (argument {})", e.message, i)))?;

            if !kind.accepts(&value) {
                return Err(Fault::invalid_args(format!(
                    "expected {}, got {} (argument {})",
                    kind,
                    value.type_label(),
                    i
                )));
            }
            Ok(value)
        })
        .collect()
}

fn encode_result(
    method: &ModuleMethod,
    convention: Convention,
    result: &DynValue,
) -> MethodReply {
    let Some(kind) = method.returns else {
        return Ok(Vec::new());
    };
    let wire = match convention {
        Convention::Native => encode_native_as(result, &kind.native_wire_type())?,
        Convention::Boxed => encode_bsv(result)?.into_wire(),
    };
    Ok(vec![wire])
}

#[async_trait]
impl NamespaceApi for Dispatcher {
    async fn invoke(&self, call: &MethodCall) -> MethodReply {
        debug!(
            serial = %call.serial,
            sender = %call.sender.unique_name,
            path = %call.path,
            interface = %call.interface,
            member = %call.member,
            "Dispatching call"
        );

        if call.interface == INTROSPECTABLE_INTERFACE && call.member == "Introspect" {
            return Ok(vec![WireValue::String(self.introspect(&call.path))]);
        }

        let Some(suffix) = strip_root(&self.config.root_path, &call.path) else {
            return Err(Fault::unknown_method(format!(
                "no object at '{}'",
                call.path
            )));
        };

        self.authorize(call).await?;

        let reply = if suffix.is_empty() {
            self.manage(call).await
        } else {
            self.call_module(suffix, call).await
        };

        if let Err(fault) = &reply {
            warn!(
                path = %call.path,
                member = %call.member,
                fault = %fault,
                "Call failed"
            );
        }
        reply
    }

    async fn import(&self, name: &str) -> bool {
        self.registry.import(name).await
    }
}
