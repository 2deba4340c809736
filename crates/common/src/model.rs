//! Model registry representation
//!
//! These types mirror what the host ORM exposes about its models: ordered
//! fields with internal type tags, an abstract flag, the primary key, and the
//! optional `grpc_methods` / `grpc_messages` override maps.

use crate::OrderedMap;
use serde::{Deserialize, Serialize};

/// Primary-key field name used when a model does not declare one
pub const DEFAULT_PK: &str = "id";

fn default_pk() -> String {
    DEFAULT_PK.to_string()
}

/// A single model field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name, unique within its model
    pub name: String,

    /// Internal type tag reported by the host (e.g. "CharField")
    #[serde(rename = "type")]
    pub type_tag: String,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_tag: type_tag.into(),
        }
    }
}

/// Reference to the message used as an RPC request or response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRef {
    /// Message name; the model's own name when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default)]
    pub is_stream: bool,
}

impl MessageRef {
    pub fn named(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            is_stream: false,
        }
    }

    pub fn stream(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            is_stream: true,
        }
    }
}

/// Signature of one RPC method
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSpec {
    #[serde(default)]
    pub request: MessageRef,

    #[serde(default)]
    pub response: MessageRef,
}

impl MethodSpec {
    pub fn new(request: MessageRef, response: MessageRef) -> Self {
        Self { request, response }
    }
}

/// Field selection for a message: every model field, or an explicit list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMessageFields", into = "RawMessageFields")]
pub enum MessageFields {
    /// The `"*"` sentinel: all fields in declaration order
    All,
    Fields(Vec<String>),
}

impl MessageFields {
    pub fn list<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Fields(names.into_iter().map(Into::into).collect())
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawMessageFields {
    Wildcard(String),
    Fields(Vec<String>),
}

impl TryFrom<RawMessageFields> for MessageFields {
    type Error = String;

    fn try_from(raw: RawMessageFields) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawMessageFields::Wildcard(s) if s == "*" => Ok(Self::All),
            RawMessageFields::Wildcard(s) => Err(format!(
                "message fields must be \"*\" or a list of field names, got \"{}\"",
                s
            )),
            RawMessageFields::Fields(names) => Ok(Self::Fields(names)),
        }
    }
}

impl From<MessageFields> for RawMessageFields {
    fn from(fields: MessageFields) -> Self {
        match fields {
            MessageFields::All => Self::Wildcard("*".to_string()),
            MessageFields::Fields(names) => Self::Fields(names),
        }
    }
}

/// A message to emit: selected model fields followed by `google.protobuf.Struct` fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSpec {
    pub fields: MessageFields,
    pub struct_fields: Vec<String>,
}

impl MessageSpec {
    pub fn with_struct_field(mut self, name: impl Into<String>) -> Self {
        self.struct_fields.push(name.into());
        self
    }
}

impl From<MessageFields> for MessageSpec {
    fn from(fields: MessageFields) -> Self {
        Self {
            fields,
            struct_fields: Vec::new(),
        }
    }
}

/// Reflection snapshot of one ORM model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub name: String,

    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,

    #[serde(default = "default_pk")]
    pub pk: String,

    /// Fields in declaration order
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grpc_methods: Option<OrderedMap<MethodSpec>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grpc_messages: Option<OrderedMap<MessageFields>>,

    #[serde(default)]
    pub use_struct_filter_request: bool,

    #[serde(default)]
    pub use_struct_pagination_request: bool,
}

impl ModelDescriptor {
    /// Create a concrete model with no fields and the default primary key
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_abstract: false,
            pk: default_pk(),
            fields: Vec::new(),
            grpc_methods: None,
            grpc_messages: None,
            use_struct_filter_request: false,
            use_struct_pagination_request: false,
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, type_tag: impl Into<String>) -> Self {
        self.fields.push(FieldDescriptor::new(name, type_tag));
        self
    }

    pub fn with_pk(mut self, pk: impl Into<String>) -> Self {
        self.pk = pk.into();
        self
    }

    pub fn with_methods(mut self, methods: OrderedMap<MethodSpec>) -> Self {
        self.grpc_methods = Some(methods);
        self
    }

    pub fn with_messages(mut self, messages: OrderedMap<MessageFields>) -> Self {
        self.grpc_messages = Some(messages);
        self
    }

    pub fn into_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn primary_key_field_name(&self) -> &str {
        &self.pk
    }

    /// Whether the List request should carry struct filter/pagination fields
    pub fn uses_struct_requests(&self) -> bool {
        self.use_struct_filter_request || self.use_struct_pagination_request
    }
}

/// An application grouping: the package scope of one generated file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDescriptor {
    pub name: String,

    #[serde(default)]
    pub models: Vec<ModelDescriptor>,
}

impl AppDescriptor {
    pub fn new(name: impl Into<String>, models: Vec<ModelDescriptor>) -> Self {
        Self {
            name: name.into(),
            models,
        }
    }

    pub fn model(&self, name: &str) -> Option<&ModelDescriptor> {
        self.models.iter().find(|m| m.name == name)
    }

    /// Models that produce output (abstract models are skipped)
    pub fn concrete_models(&self) -> impl Iterator<Item = &ModelDescriptor> {
        self.models.iter().filter(|m| !m.is_abstract)
    }
}

/// The host model registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRegistry {
    #[serde(default)]
    pub apps: Vec<AppDescriptor>,
}

impl ModelRegistry {
    pub fn new(apps: Vec<AppDescriptor>) -> Self {
        Self { apps }
    }

    pub fn app(&self, name: &str) -> Option<&AppDescriptor> {
        self.apps.iter().find(|a| a.name == name)
    }
}
