//! Protocol Buffer schema generation from model metadata
//!
//! This crate turns the models of one application (or a single model) into a
//! proto3 document:
//! - a `service <Model>Controller` per concrete model with its RPC methods
//! - the request/response messages, fields numbered positionally from 1
//!
//! Methods and messages come from the model's `grpc_methods` /
//! `grpc_messages` overrides when present, otherwise from the default
//! CRUD mixins (see [`mixins`]).

pub mod mixins;
mod plan;
mod writer;

pub use mixins::{MixinDefaults, ModelMixin};
pub use plan::{
    MessageBlock, ProtoDocument, ProtoField, RpcMethod, ServiceBlock, EMPTY_IMPORT, STRUCT_IMPORT,
    STRUCT_TYPE,
};
pub use writer::{CodeWriter, IndentGuard, INDENT_UNIT};

use model_proto_generator_common::{
    GeneratorError, MessageFields, MessageRef, MessageSpec, ModelDescriptor, ModelRegistry,
    OrderedMap, Result,
};
use model_proto_generator_parser::TypeMapper;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Proto generator for one application scope
///
/// Reads the registry only; every call to [`ProtoGenerator::generate`]
/// builds its own document and writer.
pub struct ProtoGenerator<'r> {
    registry: &'r ModelRegistry,
    app_name: String,
    model_name: Option<String>,
    method_mixins: Vec<Box<dyn MixinDefaults>>,
    message_mixins: Vec<Box<dyn MixinDefaults>>,
}

impl<'r> ProtoGenerator<'r> {
    /// Create a generator for a whole application, or a single model of it
    pub fn new(registry: &'r ModelRegistry, app_name: &str, model_name: Option<&str>) -> Self {
        Self {
            registry,
            app_name: app_name.to_string(),
            model_name: model_name.map(String::from),
            method_mixins: ModelMixin::sources(&ModelMixin::METHOD_ORDER),
            message_mixins: ModelMixin::sources(&ModelMixin::MESSAGE_ORDER),
        }
    }

    /// Replace the default method sources; later sources win on name collisions
    pub fn with_method_mixins(mut self, mixins: Vec<Box<dyn MixinDefaults>>) -> Self {
        self.method_mixins = mixins;
        self
    }

    /// Replace the default message sources; later sources win on name collisions
    pub fn with_message_mixins(mut self, mixins: Vec<Box<dyn MixinDefaults>>) -> Self {
        self.message_mixins = mixins;
        self
    }

    /// Generate the proto document text
    pub fn generate(&self) -> Result<String> {
        let document = self.plan()?;
        Ok(document.render())
    }

    /// Generate and write the document, creating parent directories
    ///
    /// Nothing is written if generation fails.
    pub fn generate_to_file(&self, path: &Path) -> Result<()> {
        let code = self.generate()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                GeneratorError::Generation(format!(
                    "Failed to create output directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        fs::write(path, code).map_err(|e| {
            GeneratorError::Generation(format!("Failed to write {}: {}", path.display(), e))
        })?;

        Ok(())
    }

    /// Resolve the full document without rendering it
    pub fn plan(&self) -> Result<ProtoDocument> {
        let models = self.resolve_models()?;

        let mut services = Vec::new();
        for model in &models {
            if let Some(service) = self.plan_service(model)? {
                services.push(service);
            }
        }

        let mut messages = Vec::new();
        let mut seen = HashSet::new();
        for model in &models {
            for message in self.plan_messages(model)? {
                if !seen.insert(message.name.clone()) {
                    return Err(GeneratorError::DuplicateMessage(message.name));
                }
                messages.push(message);
            }
        }

        let mut imports = vec![EMPTY_IMPORT.to_string()];
        if messages.iter().any(MessageBlock::uses_struct) {
            imports.push(STRUCT_IMPORT.to_string());
        }

        tracing::info!(
            package = %self.app_name,
            models = models.len(),
            services = services.len(),
            messages = messages.len(),
            "generated proto document"
        );

        Ok(ProtoDocument {
            package: self.app_name.clone(),
            imports,
            services,
            messages,
        })
    }

    fn resolve_models(&self) -> Result<Vec<&'r ModelDescriptor>> {
        let app = self
            .registry
            .app(&self.app_name)
            .ok_or_else(|| GeneratorError::UnknownScope(self.app_name.clone()))?;

        match &self.model_name {
            Some(model_name) => {
                let model = app.model(model_name).ok_or_else(|| {
                    GeneratorError::UnknownScope(format!("{}.{}", self.app_name, model_name))
                })?;
                if model.is_abstract {
                    tracing::debug!(model = %model.name, "skipping abstract model");
                    return Ok(Vec::new());
                }
                Ok(vec![model])
            },
            None => Ok(app.concrete_models().collect()),
        }
    }

    fn plan_service(&self, model: &ModelDescriptor) -> Result<Option<ServiceBlock>> {
        let defaults;
        let methods = match &model.grpc_methods {
            Some(overrides) => {
                tracing::debug!(model = %model.name, "using grpc_methods override");
                overrides
            },
            None => {
                defaults = mixins::merge_default_methods(&self.method_mixins, model);
                &defaults
            },
        };

        if methods.is_empty() {
            tracing::debug!(model = %model.name, "no methods, service omitted");
            return Ok(None);
        }

        validate_identifier("model", &model.name)?;
        let methods = methods
            .iter()
            .map(|(name, spec)| -> Result<RpcMethod> {
                validate_identifier("method", name)?;
                Ok(RpcMethod {
                    name: name.to_string(),
                    request: construct_method_message(&spec.request, model)?,
                    response: construct_method_message(&spec.response, model)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(ServiceBlock {
            name: format!("{}Controller", model.name),
            methods,
        }))
    }

    fn plan_messages(&self, model: &ModelDescriptor) -> Result<Vec<MessageBlock>> {
        let specs: OrderedMap<MessageSpec> = match &model.grpc_messages {
            Some(overrides) => {
                tracing::debug!(model = %model.name, "using grpc_messages override");
                overrides
                    .iter()
                    .map(|(name, fields)| (name, MessageSpec::from(fields.clone())))
                    .collect()
            },
            None => mixins::merge_default_messages(&self.message_mixins, model),
        };

        specs
            .iter()
            .map(|(name, spec)| plan_message(model, name, spec))
            .collect()
    }
}

/// Render a request/response reference, e.g. `stream BookListResponse`
///
/// The model's own name is used when the reference names no message.
pub fn construct_method_message(spec: &MessageRef, model: &ModelDescriptor) -> Result<String> {
    let message = spec.message.as_deref().unwrap_or(&model.name);
    validate_message_reference(message)?;
    Ok(format!(
        "{}{}",
        if spec.is_stream { "stream " } else { "" },
        message
    ))
}

fn plan_message(model: &ModelDescriptor, name: &str, spec: &MessageSpec) -> Result<MessageBlock> {
    validate_identifier("message", name)?;

    let field_names: Vec<&str> = match &spec.fields {
        MessageFields::All => model.field_names().collect(),
        MessageFields::Fields(names) => names.iter().map(String::as_str).collect(),
    };

    let mut fields = Vec::with_capacity(field_names.len() + spec.struct_fields.len());
    for field_name in field_names {
        let field = model
            .field(field_name)
            .ok_or_else(|| GeneratorError::UnknownField {
                model: model.name.clone(),
                message: name.to_string(),
                field: field_name.to_string(),
            })?;
        fields.push((
            TypeMapper::map_type(&field.type_tag).to_string(),
            field.name.clone(),
        ));
    }
    for struct_field in &spec.struct_fields {
        fields.push((STRUCT_TYPE.to_string(), struct_field.clone()));
    }

    Ok(MessageBlock::numbered(name, fields))
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {},
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn validate_identifier(kind: &'static str, name: &str) -> Result<()> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(GeneratorError::InvalidIdentifier {
            kind,
            name: name.to_string(),
        })
    }
}

/// Message references may be fully qualified, e.g. `google.protobuf.Empty`
fn validate_message_reference(name: &str) -> Result<()> {
    if name.split('.').all(is_identifier) {
        Ok(())
    } else {
        Err(GeneratorError::InvalidIdentifier {
            kind: "message reference",
            name: name.to_string(),
        })
    }
}

/// Generate the proto document for an application or one of its models
/// (convenience function)
pub fn generate_proto(
    registry: &ModelRegistry,
    app_name: &str,
    model_name: Option<&str>,
) -> Result<String> {
    ProtoGenerator::new(registry, app_name, model_name).generate()
}
