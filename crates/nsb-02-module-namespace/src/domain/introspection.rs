//! Introspection XML.
//!
//! Every reply starts with the doctype and the `Introspectable` interface.
//! An object exactly at the requested path contributes its interfaces; an
//! object below it contributes a child `<node>` named after the first path
//! element under the requested path (each name once).

use super::config::NamespaceConfig;
use super::module::Module;
use shared_types::grammar::join_path;
use shared_types::{WireType, INTROSPECTABLE_INTERFACE};

pub const DOCTYPE: &str = "<!DOCTYPE node PUBLIC \"-//freedesktop//DTD D-BUS Object Introspection 1.0//EN\"\n\"http://www.freedesktop.org/standards/dbus/1.0/introspect.dtd\">";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    fn as_str(self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgDescription {
    pub name: String,
    pub signature: String,
    pub direction: Direction,
}

impl ArgDescription {
    pub fn input(name: impl Into<String>, signature: &WireType) -> Self {
        Self {
            name: name.into(),
            signature: signature.signature(),
            direction: Direction::In,
        }
    }

    pub fn output(name: impl Into<String>, signature: &WireType) -> Self {
        Self {
            name: name.into(),
            signature: signature.signature(),
            direction: Direction::Out,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescription {
    pub name: String,
    pub args: Vec<ArgDescription>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDescription {
    pub name: String,
    pub methods: Vec<MethodDescription>,
}

/// An object served at a full path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectDescription {
    pub path: String,
    pub interfaces: Vec<InterfaceDescription>,
}

/// The root object and its management interface.
pub fn manager_object(config: &NamespaceConfig) -> ObjectDescription {
    ObjectDescription {
        path: config.root_path.clone(),
        interfaces: vec![InterfaceDescription {
            name: config.manager_interface.clone(),
            methods: vec![MethodDescription {
                name: "Import".into(),
                args: vec![
                    ArgDescription::input("name", &WireType::String),
                    ArgDescription::output("ret", &WireType::Boolean),
                ],
            }],
        }],
    }
}

/// A loaded module, under both conventions.
pub fn module_object(config: &NamespaceConfig, module: &Module) -> ObjectDescription {
    let native = module
        .methods()
        .map(|method| {
            let mut args: Vec<ArgDescription> = method
                .native_params()
                .iter()
                .enumerate()
                .map(|(i, wire)| ArgDescription::input(format!("arg{}", i), wire))
                .collect();
            if let Some(ret) = method.native_return() {
                args.push(ArgDescription::output("ret", &ret));
            }
            MethodDescription {
                name: method.name.clone(),
                args,
            }
        })
        .collect();

    let bsv = WireType::bsv();
    let boxed = module
        .methods()
        .map(|method| {
            let mut args: Vec<ArgDescription> = (0..method.params.len())
                .map(|i| ArgDescription::input(format!("arg{}", i), &bsv))
                .collect();
            if method.returns.is_some() {
                args.push(ArgDescription::output("ret", &bsv));
            }
            MethodDescription {
                name: method.name.clone(),
                args,
            }
        })
        .collect();

    ObjectDescription {
        path: join_path(&config.root_path, &module.object_name()),
        interfaces: vec![
            InterfaceDescription {
                name: config.native_interface.clone(),
                methods: native,
            },
            InterfaceDescription {
                name: config.boxed_interface.clone(),
                methods: boxed,
            },
        ],
    }
}

/// Path below `requested`, without the leading slash.
fn sub_path<'a>(requested: &str, object: &'a str) -> Option<&'a str> {
    if requested == "/" {
        return object.strip_prefix('/').filter(|rest| !rest.is_empty());
    }
    object.strip_prefix(requested)?.strip_prefix('/')
}

/// Introspection document for `requested` given all served objects.
pub fn introspect(requested: &str, objects: &[ObjectDescription]) -> String {
    let mut xml = String::with_capacity(512);
    xml.push_str(DOCTYPE);
    xml.push_str("\n<node>\n");
    xml.push_str(&format!(" <interface name='{}'>\n", INTROSPECTABLE_INTERFACE));
    xml.push_str("  <method name='Introspect'>\n");
    xml.push_str("   <arg name='xml_data' type='s' direction='out'/>\n");
    xml.push_str("  </method>\n");
    xml.push_str(" </interface>\n");

    let mut announced: Vec<&str> = Vec::new();
    for object in objects {
        if object.path == requested {
            write_interfaces(&mut xml, &object.interfaces);
            continue;
        }
        let Some(rest) = sub_path(requested, &object.path) else {
            continue;
        };
        let node = rest.split('/').next().unwrap_or(rest);
        if !announced.contains(&node) {
            xml.push_str(&format!(" <node name='{}'/>\n", node));
            announced.push(node);
        }
    }

    xml.push_str("</node>\n");
    xml
}

fn write_interfaces(xml: &mut String, interfaces: &[InterfaceDescription]) {
    for interface in interfaces {
        xml.push_str(&format!(" <interface name='{}'>\n", interface.name));
        for method in &interface.methods {
            xml.push_str(&format!("  <method name='{}'>\n", method.name));
            for arg in &method.args {
                xml.push_str(&format!(
                    "   <arg name='{}' type='{}' direction='{}'/>\n",
                    arg.name,
                    arg.signature,
                    arg.direction.as_str()
                ));
            }
            xml.push_str("  </method>\n");
        }
        xml.push_str(" </interface>\n");
    }
}
