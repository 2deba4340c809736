//! Integration tests for registry loading

use model_proto_generator_common::{MessageFields, MessageRef};
use model_proto_generator_parser::{load_registry, RegistryFormat, RegistryLoader, TypeMapper};
use std::fs;
use tempfile::TempDir;

const LIBRARY_YAML: &str = r#"
apps:
  - name: library
    models:
      - name: Timestamped
        abstract: true
        fields:
          - { name: created, type: DateTimeField }
      - name: Book
        fields:
          - { name: id, type: AutoField }
          - { name: title, type: CharField }
          - { name: price, type: DecimalField }
          - { name: cover, type: ImageField }
        grpc_methods:
          Stream:
            request: { message: BookStreamRequest }
            response: { is_stream: true }
          Count: {}
        grpc_messages:
          BookStreamRequest: [title]
          Book: "*"
        use_struct_filter_request: true
"#;

#[test]
fn test_load_yaml_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("models.yaml");
    fs::write(&path, LIBRARY_YAML).unwrap();

    let registry = load_registry(&path).unwrap();
    let app = registry.app("library").unwrap();
    assert_eq!(app.models.len(), 2);
    assert_eq!(
        app.concrete_models().map(|m| m.name.as_str()).collect::<Vec<_>>(),
        vec!["Book"]
    );

    let book = app.model("Book").unwrap();
    assert!(book.use_struct_filter_request);
    assert!(!book.use_struct_pagination_request);

    let methods = book.grpc_methods.as_ref().unwrap();
    assert_eq!(methods.keys().collect::<Vec<_>>(), vec!["Stream", "Count"]);
    let stream = methods.get("Stream").unwrap();
    assert_eq!(stream.request, MessageRef::named("BookStreamRequest"));
    assert!(stream.response.is_stream);
    assert_eq!(stream.response.message, None);
    assert_eq!(methods.get("Count").unwrap().request, MessageRef::default());

    let messages = book.grpc_messages.as_ref().unwrap();
    assert_eq!(messages.keys().collect::<Vec<_>>(), vec!["BookStreamRequest", "Book"]);
    assert_eq!(messages.get("Book"), Some(&MessageFields::All));
}

#[test]
fn test_json_file_without_extension_is_sniffed() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("registry");
    fs::write(
        &path,
        r#"{"apps": [{"name": "shop", "models": [{"name": "Item", "pk": "sku", "fields": [{"name": "sku", "type": "SlugField"}]}]}]}"#,
    )
    .unwrap();

    let registry = load_registry(&path).unwrap();
    let item = registry.app("shop").and_then(|a| a.model("Item")).unwrap();
    assert_eq!(item.primary_key_field_name(), "sku");
}

#[test]
fn test_explicit_format_overrides_extension() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("models.txt");
    fs::write(&path, "apps:\n  - name: empty\n").unwrap();

    let registry = RegistryLoader::from_file(&path, Some(RegistryFormat::Yaml)).unwrap();
    assert!(registry.app("empty").unwrap().models.is_empty());

    assert!(RegistryLoader::from_file(&path, Some(RegistryFormat::Json)).is_err());
}

#[test]
fn test_invalid_wildcard_is_rejected() {
    let yaml = "apps:\n  - name: library\n    models:\n      - name: Book\n        fields:\n          - { name: id, type: AutoField }\n        grpc_messages:\n          Book: __all__\n";
    assert!(RegistryLoader::parse_str(yaml, RegistryFormat::Yaml).is_err());
}

#[test]
fn test_registry_fields_map_to_scalars() {
    let registry = RegistryLoader::parse_str(LIBRARY_YAML, RegistryFormat::Yaml).unwrap();
    let book = registry.app("library").and_then(|a| a.model("Book")).unwrap();

    let types: Vec<_> = book
        .fields
        .iter()
        .map(|f| TypeMapper::map_type(&f.type_tag))
        .collect();
    assert_eq!(types, vec!["int32", "string", "string", "string"]);
    assert!(!TypeMapper::is_known("ImageField"));
}
