//! `Echo`: hands every parameter kind straight back.
//!
//! Used to exercise both conventions end to end.

use crate::domain::{Module, ModuleMethod};
use shared_types::{DynValue, Fault, ValueKind};

pub const NAME: &str = "Echo";

fn echo(name: &str, kind: ValueKind) -> ModuleMethod {
    ModuleMethod::new(name, vec![kind], Some(kind), |args| {
        Ok(args.first().cloned().unwrap_or(DynValue::Nil))
    })
}

pub fn module() -> Module {
    Module::new(NAME)
        .with_method(echo("ParamBoolean", ValueKind::Boolean))
        .with_method(echo("ParamInteger", ValueKind::Integer))
        .with_method(echo("ParamFloat", ValueKind::Float))
        .with_method(echo("ParamString", ValueKind::String))
        .with_method(echo("ParamPath", ValueKind::ObjectPath))
        .with_method(echo("ParamSignature", ValueKind::Signature))
        .with_method(echo("ParamList", ValueKind::List))
        .with_method(echo("ParamMap", ValueKind::Map))
        .with_method(echo("ParamTerm", ValueKind::Term))
        .with_method(echo("ParamAny", ValueKind::Any))
        .with_method(ModuleMethod::new(
            "Fail",
            vec![ValueKind::String],
            None,
            |args| {
                let message = args
                    .first()
                    .and_then(DynValue::as_str)
                    .unwrap_or("failure requested");
                Err(Fault::failed(message))
            },
        ))
        .with_method(ModuleMethod::new("Touch", vec![], None, |_| Ok(DynValue::Nil)))
}
