//! Resolved proto document
//!
//! The generator first resolves every service and message into these plain
//! blocks, then renders them in one pass. A document that fails to resolve is
//! never rendered.

use crate::writer::CodeWriter;

pub const PROTO_SYNTAX: &str = "proto3";
pub const EMPTY_IMPORT: &str = "google/protobuf/empty.proto";
pub const STRUCT_IMPORT: &str = "google/protobuf/struct.proto";
pub const STRUCT_TYPE: &str = "google.protobuf.Struct";

/// One `rpc` line of a service block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcMethod {
    pub name: String,
    pub request: String,
    pub response: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceBlock {
    pub name: String,
    pub methods: Vec<RpcMethod>,
}

/// A numbered scalar field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtoField {
    pub proto_type: String,
    pub name: String,
    pub number: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBlock {
    pub name: String,
    pub fields: Vec<ProtoField>,
}

impl MessageBlock {
    /// Build a message numbering `(type, name)` pairs from 1 in order
    pub fn numbered<I>(name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let fields = fields
            .into_iter()
            .zip(1u32..)
            .map(|((proto_type, name), number)| ProtoField {
                proto_type,
                name,
                number,
            })
            .collect();
        Self {
            name: name.into(),
            fields,
        }
    }

    pub fn uses_struct(&self) -> bool {
        self.fields.iter().any(|f| f.proto_type == STRUCT_TYPE)
    }
}

/// A whole `.proto` file: header, then all services, then all messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtoDocument {
    pub package: String,
    pub imports: Vec<String>,
    pub services: Vec<ServiceBlock>,
    pub messages: Vec<MessageBlock>,
}

impl ProtoDocument {
    pub fn render(&self) -> String {
        let mut writer = CodeWriter::new();

        writer.write_line(&format!("syntax = \"{}\";", PROTO_SYNTAX));
        writer.write_line("");
        writer.write_line(&format!("package {};", self.package));
        writer.write_line("");
        for import in &self.imports {
            writer.write_line(&format!("import \"{}\";", import));
        }
        writer.write_line("");

        for service in &self.services {
            writer.write_line(&format!("service {} {{", service.name));
            {
                let mut body = writer.indent();
                for method in &service.methods {
                    body.write_line(&format!(
                        "rpc {}({}) returns ({}) {{}}",
                        method.name, method.request, method.response
                    ));
                }
            }
            writer.write_line("}");
            writer.write_line("");
        }

        for message in &self.messages {
            writer.write_line(&format!("message {} {{", message.name));
            {
                let mut body = writer.indent();
                for field in &message.fields {
                    body.write_line(&format!(
                        "{} {} = {};",
                        field.proto_type, field.name, field.number
                    ));
                }
            }
            writer.write_line("}");
            writer.write_line("");
        }

        writer.into_code()
    }
}
