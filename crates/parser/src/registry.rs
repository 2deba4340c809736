//! Model registry document loader
//!
//! Reads the host's model registry snapshot from a JSON or YAML document and
//! checks it for structural consistency before any generation happens.

use model_proto_generator_common::{GeneratorError, ModelDescriptor, ModelRegistry, Result};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

/// Serialization format of a registry document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryFormat {
    Json,
    Yaml,
}

impl fmt::Display for RegistryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryFormat::Json => write!(f, "JSON"),
            RegistryFormat::Yaml => write!(f, "YAML"),
        }
    }
}

impl RegistryFormat {
    /// Detect the format from the file extension, falling back to content sniffing
    pub fn detect(path: &Path, content: &str) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .as_deref()
        {
            Some("json") => RegistryFormat::Json,
            Some("yaml") | Some("yml") => RegistryFormat::Yaml,
            _ => Self::sniff(content),
        }
    }

    fn sniff(content: &str) -> Self {
        if content.trim_start().starts_with('{') {
            RegistryFormat::Json
        } else {
            RegistryFormat::Yaml
        }
    }
}

/// Loads and validates model registry documents
pub struct RegistryLoader;

impl RegistryLoader {
    /// Load a registry from a file
    ///
    /// # Example
    /// ```rust,ignore
    /// let registry = RegistryLoader::from_file("models.yaml", None)?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        format: Option<RegistryFormat>,
    ) -> Result<ModelRegistry> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Parse(format!(
                "Failed to read registry file {}: {}",
                path.display(),
                e
            ))
        })?;

        let format = format.unwrap_or_else(|| RegistryFormat::detect(path, &content));
        tracing::debug!(path = %path.display(), %format, "loading model registry");
        Self::parse_str(&content, format)
    }

    /// Parse and validate a registry document
    pub fn parse_str(content: &str, format: RegistryFormat) -> Result<ModelRegistry> {
        let registry: ModelRegistry = match format {
            RegistryFormat::Json => serde_json::from_str(content)?,
            RegistryFormat::Yaml => serde_yaml::from_str(content)?,
        };
        Self::validate(&registry)?;
        Ok(registry)
    }

    /// Check names are unique and every concrete model's primary key exists
    pub fn validate(registry: &ModelRegistry) -> Result<()> {
        let mut app_names = HashSet::new();
        for app in &registry.apps {
            if !app_names.insert(app.name.as_str()) {
                return Err(GeneratorError::Parse(format!(
                    "Duplicate application '{}'",
                    app.name
                )));
            }

            let mut model_names = HashSet::new();
            for model in &app.models {
                if !model_names.insert(model.name.as_str()) {
                    return Err(GeneratorError::Parse(format!(
                        "Duplicate model '{}' in application '{}'",
                        model.name, app.name
                    )));
                }
                Self::validate_model(&app.name, model)?;
            }
        }
        Ok(())
    }

    fn validate_model(app_name: &str, model: &ModelDescriptor) -> Result<()> {
        let mut field_names = HashSet::new();
        for field in &model.fields {
            if !field_names.insert(field.name.as_str()) {
                return Err(GeneratorError::Parse(format!(
                    "Duplicate field '{}' on model '{}.{}'",
                    field.name, app_name, model.name
                )));
            }
        }

        if !model.is_abstract && model.field(&model.pk).is_none() {
            return Err(GeneratorError::Parse(format!(
                "Primary key '{}' is not a field of model '{}.{}'",
                model.pk, app_name, model.name
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML_REGISTRY: &str = r#"
apps:
  - name: library
    models:
      - name: Book
        fields:
          - { name: id, type: AutoField }
          - { name: title, type: CharField }
"#;

    #[test]
    fn test_detect_by_extension() {
        assert_eq!(
            RegistryFormat::detect(Path::new("models.json"), ""),
            RegistryFormat::Json
        );
        assert_eq!(
            RegistryFormat::detect(Path::new("models.YML"), ""),
            RegistryFormat::Yaml
        );
    }

    #[test]
    fn test_detect_by_content() {
        assert_eq!(
            RegistryFormat::detect(Path::new("models"), "  {\"apps\": []}"),
            RegistryFormat::Json
        );
        assert_eq!(
            RegistryFormat::detect(Path::new("models"), "apps: []"),
            RegistryFormat::Yaml
        );
    }

    #[test]
    fn test_parse_yaml_registry() {
        let registry = RegistryLoader::parse_str(YAML_REGISTRY, RegistryFormat::Yaml).unwrap();
        let book = registry.app("library").and_then(|a| a.model("Book")).unwrap();
        assert_eq!(book.field_names().collect::<Vec<_>>(), vec!["id", "title"]);
    }

    #[test]
    fn test_missing_pk_is_rejected() {
        let yaml = "apps:\n  - name: library\n    models:\n      - name: Book\n        pk: isbn\n        fields:\n          - { name: id, type: AutoField }\n";
        let err = RegistryLoader::parse_str(yaml, RegistryFormat::Yaml).unwrap_err();
        assert!(err.to_string().contains("Primary key 'isbn'"));
    }

    #[test]
    fn test_abstract_model_needs_no_pk() {
        let yaml = "apps:\n  - name: library\n    models:\n      - name: Base\n        abstract: true\n        fields:\n          - { name: created, type: DateTimeField }\n";
        assert!(RegistryLoader::parse_str(yaml, RegistryFormat::Yaml).is_ok());
    }

    #[test]
    fn test_duplicate_field_is_rejected() {
        let json = r#"{"apps": [{"name": "library", "models": [{"name": "Book", "fields": [
            {"name": "id", "type": "AutoField"},
            {"name": "id", "type": "CharField"}
        ]}]}]}"#;
        let err = RegistryLoader::parse_str(json, RegistryFormat::Json).unwrap_err();
        assert!(err.to_string().contains("Duplicate field 'id'"));
    }

    #[test]
    fn test_duplicate_app_is_rejected() {
        let json = r#"{"apps": [{"name": "library"}, {"name": "library"}]}"#;
        let err = RegistryLoader::parse_str(json, RegistryFormat::Json).unwrap_err();
        assert!(err.to_string().contains("Duplicate application"));
    }
}
