//! Unit configuration.

use ormap_core::{MetadataConfig, TypeName};

/// Default unit name.
pub const DEFAULT_UNIT_NAME: &str = "default";

/// A named set of declared types resolved together by one session factory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitConfig {
    /// Unit name, used in diagnostics.
    pub name: String,

    /// Declared types of the unit; supertypes are added implicitly.
    pub types: Vec<TypeName>,

    /// Metadata resolution settings.
    pub metadata: MetadataConfig,
}

impl UnitConfig {
    /// Create an empty unit with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: Vec::new(),
            metadata: MetadataConfig::default(),
        }
    }

    /// Add a declared type.
    pub fn with_type(mut self, name: impl Into<TypeName>) -> Self {
        self.types.push(name.into());
        self
    }

    /// Add several declared types.
    pub fn with_types<I, T>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TypeName>,
    {
        self.types.extend(names.into_iter().map(Into::into));
        self
    }

    /// Set the metadata resolution settings.
    pub fn with_metadata_config(mut self, metadata: MetadataConfig) -> Self {
        self.metadata = metadata;
        self
    }
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self::new(DEFAULT_UNIT_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = UnitConfig::new("social")
            .with_type("Person")
            .with_types(["Company", "WorksAt"])
            .with_metadata_config(MetadataConfig::new().with_required_relation_endpoints());

        assert_eq!(config.name, "social");
        assert_eq!(config.types.len(), 3);
        assert!(config.metadata.require_relation_endpoints);
    }

    #[test]
    fn test_default() {
        let config = UnitConfig::default();
        assert_eq!(config.name, DEFAULT_UNIT_NAME);
        assert!(config.types.is_empty());
    }
}
