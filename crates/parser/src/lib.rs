//! Model registry parsing for proto generation
//!
//! This crate loads the host's model registry snapshot (applications, models,
//! fields and override maps) and maps field type tags to proto scalar types.
//!
//! ## Registry Documents
//!
//! Registries are JSON or YAML documents. The format is taken from the file
//! extension when possible and sniffed from the content otherwise.

mod registry;
mod type_mapper;

pub use registry::{RegistryFormat, RegistryLoader};
pub use type_mapper::{TypeMapper, DEFAULT_PROTO_TYPE};

use model_proto_generator_common::{ModelRegistry, Result};
use std::path::Path;

/// Load a model registry from a file, auto-detecting its format
///
/// # Arguments
/// * `path` - Path to a JSON or YAML registry document
///
/// # Returns
/// * `ModelRegistry` - Validated registry snapshot
pub fn load_registry<P: AsRef<Path>>(path: P) -> Result<ModelRegistry> {
    RegistryLoader::from_file(path, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_registry() {
        let result = load_registry("does/not/exist.yaml");
        assert!(result.is_err());
    }
}
