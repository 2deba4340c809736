//! Default RPC methods and messages contributed by the CRUD mixins
//!
//! A model without `grpc_methods` gets the union of every mixin's default
//! methods; a model without `grpc_messages` gets the union of their default
//! messages. Unions are merged in a fixed order where a later source replaces
//! an earlier entry of the same name without moving it.

use model_proto_generator_common::{
    MessageFields, MessageRef, MessageSpec, MethodSpec, ModelDescriptor, OrderedMap,
};

/// Struct field carrying `django-filter` style list filters
pub const FILTERS_FIELD: &str = "_filters";

/// Struct field carrying pagination parameters
pub const PAGINATION_FIELD: &str = "_pagination";

/// A source of default methods and messages for a model
#[cfg_attr(test, mockall::automock)]
pub trait MixinDefaults {
    fn default_methods(&self, model: &ModelDescriptor) -> OrderedMap<MethodSpec>;

    fn default_messages(&self, model: &ModelDescriptor) -> OrderedMap<MessageSpec>;
}

/// The built-in CRUD + list mixins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelMixin {
    List,
    Create,
    Retrieve,
    Update,
    Destroy,
}

impl ModelMixin {
    /// Merge order for default methods
    pub const METHOD_ORDER: [ModelMixin; 5] = [
        ModelMixin::List,
        ModelMixin::Create,
        ModelMixin::Retrieve,
        ModelMixin::Update,
        ModelMixin::Destroy,
    ];

    /// Merge order for default messages
    pub const MESSAGE_ORDER: [ModelMixin; 5] = [
        ModelMixin::Create,
        ModelMixin::List,
        ModelMixin::Retrieve,
        ModelMixin::Update,
        ModelMixin::Destroy,
    ];

    pub fn verb(self) -> &'static str {
        match self {
            ModelMixin::List => "List",
            ModelMixin::Create => "Create",
            ModelMixin::Retrieve => "Retrieve",
            ModelMixin::Update => "Update",
            ModelMixin::Destroy => "Destroy",
        }
    }

    pub fn method_name(self, model_name: &str) -> String {
        format!("{}{}", self.verb(), model_name)
    }

    pub fn request_message(self, model_name: &str) -> String {
        format!("{}{}Request", model_name, self.verb())
    }

    pub fn response_message(self, model_name: &str) -> String {
        format!("{}{}Response", model_name, self.verb())
    }

    /// Boxed sources in the given order, ready for the generator
    pub fn sources(order: &[ModelMixin]) -> Vec<Box<dyn MixinDefaults>> {
        order
            .iter()
            .map(|mixin| Box::new(*mixin) as Box<dyn MixinDefaults>)
            .collect()
    }
}

impl MixinDefaults for ModelMixin {
    fn default_methods(&self, model: &ModelDescriptor) -> OrderedMap<MethodSpec> {
        let request = MessageRef::named(self.request_message(&model.name));
        let response = match self {
            ModelMixin::List => MessageRef::stream(self.response_message(&model.name)),
            _ => MessageRef::named(self.response_message(&model.name)),
        };

        let mut methods = OrderedMap::new();
        methods.insert(
            self.method_name(&model.name),
            MethodSpec::new(request, response),
        );
        methods
    }

    fn default_messages(&self, model: &ModelDescriptor) -> OrderedMap<MessageSpec> {
        let pk_only = || MessageFields::list([model.primary_key_field_name()]);
        let mut messages: OrderedMap<MessageSpec> = OrderedMap::new();

        match self {
            ModelMixin::List => {
                if model.uses_struct_requests() {
                    let mut request = MessageSpec::from(MessageFields::Fields(Vec::new()));
                    if model.use_struct_filter_request {
                        request = request.with_struct_field(FILTERS_FIELD);
                    }
                    if model.use_struct_pagination_request {
                        request = request.with_struct_field(PAGINATION_FIELD);
                    }
                    messages.insert(self.request_message(&model.name), request);
                }
                messages.insert(
                    self.response_message(&model.name),
                    MessageFields::All.into(),
                );
            },
            ModelMixin::Create => {
                messages.insert(self.request_message(&model.name), MessageFields::All.into());
            },
            ModelMixin::Retrieve | ModelMixin::Destroy => {
                messages.insert(self.request_message(&model.name), pk_only().into());
            },
            // Update contributes no default message
            ModelMixin::Update => {},
        }

        messages
    }
}

/// Union of every source's default methods, in source order
pub fn merge_default_methods(
    sources: &[Box<dyn MixinDefaults>],
    model: &ModelDescriptor,
) -> OrderedMap<MethodSpec> {
    let mut merged = OrderedMap::new();
    for source in sources {
        merged.extend_from(source.default_methods(model));
    }
    merged
}

/// Union of every source's default messages, in source order
pub fn merge_default_messages(
    sources: &[Box<dyn MixinDefaults>],
    model: &ModelDescriptor,
) -> OrderedMap<MessageSpec> {
    let mut merged = OrderedMap::new();
    for source in sources {
        merged.extend_from(source.default_messages(model));
    }
    merged
}
