//! Metadata resolution configuration.

/// Default parameter name the invoking instance is bound to in derived queries.
pub const DEFAULT_THIS_BINDING: &str = "this";

/// Configuration of a metadata build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataConfig {
    /// Fail when a relation type resolves no from or no to entity type.
    ///
    /// When disabled, such relations are kept as structural relations with
    /// unset endpoints.
    pub require_relation_endpoints: bool,

    /// Parameter name for the invoking instance when a derived query does not name one.
    pub default_this_binding: String,
}

impl MetadataConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self {
            require_relation_endpoints: false,
            default_this_binding: DEFAULT_THIS_BINDING.to_string(),
        }
    }

    /// Require every relation type to resolve both endpoints.
    pub fn with_required_relation_endpoints(mut self) -> Self {
        self.require_relation_endpoints = true;
        self
    }

    /// Set the default binding name of the invoking instance.
    pub fn with_default_this_binding(mut self, name: impl Into<String>) -> Self {
        self.default_this_binding = name.into();
        self
    }
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MetadataConfig::default();
        assert!(!config.require_relation_endpoints);
        assert_eq!(config.default_this_binding, "this");
    }

    #[test]
    fn test_builder() {
        let config = MetadataConfig::new()
            .with_required_relation_endpoints()
            .with_default_this_binding("self");
        assert!(config.require_relation_endpoints);
        assert_eq!(config.default_this_binding, "self");
    }
}
