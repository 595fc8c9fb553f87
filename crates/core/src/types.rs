//! Translation from registry value types to C++ type names.

use std::collections::BTreeMap;

use crate::config::GeneratorConfig;
use crate::registry::ValueTypeKind;

/// Built-in type table: registry value type to C++ type.
pub const BUILTIN_TYPES: &[(&str, &str)] = &[
    ("VipsImage", "VImage"),
    ("gint", "int"),
    ("gdouble", "double"),
    ("gboolean", "bool"),
    ("gchararray", "char *"),
    ("VipsArrayDouble", "std::vector<double>"),
    ("VipsArrayImage", "std::vector<VImage>"),
    ("VipsBlob", "VipsBlob *"),
];

/// Closed mapping from value-type identifiers to target type names.
///
/// Enumerations pass through under their own name. Anything else must be in
/// the table; there is no fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMapper {
    table: BTreeMap<String, String>,
    image_type: String,
}

impl Default for TypeMapper {
    fn default() -> Self {
        Self::new(&GeneratorConfig::default())
    }
}

impl TypeMapper {
    /// Build the built-in table extended with the entries from `config`.
    pub fn new(config: &GeneratorConfig) -> Self {
        let mut table: BTreeMap<String, String> = BUILTIN_TYPES
            .iter()
            .map(|(from, to)| ((*from).to_string(), (*to).to_string()))
            .collect();
        table.extend(
            config
                .types
                .iter()
                .map(|(from, to)| (from.clone(), to.clone())),
        );

        Self {
            table,
            image_type: config.image_type.clone(),
        }
    }

    /// Resolve a value type, or `None` when it is unknown.
    pub fn resolve(&self, value_type: &str, kind: ValueTypeKind) -> Option<String> {
        match kind {
            ValueTypeKind::Enum => Some(value_type.to_string()),
            ValueTypeKind::Primitive => self.table.get(value_type).cloned(),
        }
    }

    /// Whether `value_type` is the image handle that can act as a receiver.
    pub fn is_image(&self, value_type: &str) -> bool {
        value_type == self.image_type
    }
}
