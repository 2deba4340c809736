//! Type mapping from model field tags to protobuf scalar types
//!
//! Maps the host ORM's internal field type names to proto3 scalar types.
//! Temporal and decimal values travel as text to keep precision and ISO-8601
//! formatting intact.

/// Scalar type used for any tag missing from the table
pub const DEFAULT_PROTO_TYPE: &str = "string";

const TYPE_TABLE: &[(&str, &str)] = &[
    // Numeric
    ("AutoField", "int32"),
    ("SmallIntegerField", "int32"),
    ("IntegerField", "int32"),
    ("BigIntegerField", "int64"),
    ("PositiveSmallIntegerField", "int32"),
    ("PositiveIntegerField", "int32"),
    ("FloatField", "float"),
    ("DecimalField", "string"),
    // Boolean
    ("BooleanField", "bool"),
    ("NullBooleanField", "bool"),
    // Date and time
    ("DateField", "string"),
    ("TimeField", "string"),
    ("DateTimeField", "string"),
    ("DurationField", "string"),
    // String
    ("CharField", "string"),
    ("TextField", "string"),
    ("EmailField", "string"),
    ("SlugField", "string"),
    ("URLField", "string"),
    ("UUIDField", "string"),
    ("GenericIPAddressField", "string"),
    ("FilePathField", "string"),
    // Base field
    ("Field", "string"),
];

/// Maps field type tags to proto scalar type names
pub struct TypeMapper;

impl TypeMapper {
    /// Map a field type tag to its proto scalar type
    ///
    /// Never fails: unrecognized tags map to `string`.
    ///
    /// # Examples
    /// ```
    /// use model_proto_generator_parser::TypeMapper;
    ///
    /// assert_eq!(TypeMapper::map_type("AutoField"), "int32");
    /// assert_eq!(TypeMapper::map_type("BigIntegerField"), "int64");
    /// assert_eq!(TypeMapper::map_type("JSONField"), "string");
    /// ```
    pub fn map_type(type_tag: &str) -> &'static str {
        Self::lookup(type_tag).unwrap_or_else(|| {
            tracing::debug!(
                type_tag,
                "unknown field type tag, using {}",
                DEFAULT_PROTO_TYPE
            );
            DEFAULT_PROTO_TYPE
        })
    }

    /// Check whether a tag has an explicit entry in the table
    pub fn is_known(type_tag: &str) -> bool {
        Self::lookup(type_tag).is_some()
    }

    fn lookup(type_tag: &str) -> Option<&'static str> {
        TYPE_TABLE
            .iter()
            .find(|(tag, _)| *tag == type_tag)
            .map(|(_, proto)| *proto)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_integer_types() {
        for tag in [
            "AutoField",
            "SmallIntegerField",
            "IntegerField",
            "PositiveSmallIntegerField",
            "PositiveIntegerField",
        ] {
            assert_eq!(TypeMapper::map_type(tag), "int32", "{}", tag);
        }
        assert_eq!(TypeMapper::map_type("BigIntegerField"), "int64");
    }

    #[test]
    fn test_map_float_and_decimal() {
        assert_eq!(TypeMapper::map_type("FloatField"), "float");
        assert_eq!(TypeMapper::map_type("DecimalField"), "string");
    }

    #[test]
    fn test_map_boolean_types() {
        assert_eq!(TypeMapper::map_type("BooleanField"), "bool");
        assert_eq!(TypeMapper::map_type("NullBooleanField"), "bool");
    }

    #[test]
    fn test_map_temporal_types_as_text() {
        for tag in ["DateField", "TimeField", "DateTimeField", "DurationField"] {
            assert_eq!(TypeMapper::map_type(tag), "string", "{}", tag);
        }
    }

    #[test]
    fn test_map_text_types() {
        for tag in [
            "CharField",
            "TextField",
            "EmailField",
            "SlugField",
            "URLField",
            "UUIDField",
            "GenericIPAddressField",
            "FilePathField",
            "Field",
        ] {
            assert_eq!(TypeMapper::map_type(tag), "string", "{}", tag);
        }
    }

    #[test]
    fn test_unknown_tag_defaults_to_string() {
        assert_eq!(TypeMapper::map_type("ColorField"), "string");
        assert_eq!(TypeMapper::map_type(""), "string");
        assert!(!TypeMapper::is_known("ColorField"));
        assert!(TypeMapper::is_known("CharField"));
    }

    #[test]
    fn test_tags_are_case_sensitive() {
        assert!(!TypeMapper::is_known("autofield"));
        assert_eq!(TypeMapper::map_type("bigintegerfield"), "string");
    }
}
