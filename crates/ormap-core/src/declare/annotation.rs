//! Annotations attached to declared types, methods and properties.

use super::TypeName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Meta-annotation markers through which schema intent is discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Definition {
    /// Marks a type as an entity type.
    Entity,
    /// Marks a type as a relation type.
    Relation,
    /// Marks a property as indexed.
    Index,
    /// Marks a type or method as a query definition.
    Query,
}

/// Explicit query binding of a derived-query method.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResultOf {
    /// Type defining the query; `None` derives it from the method or its value type.
    pub query: Option<TypeName>,
    /// Parameter name the invoking instance is bound to; `None` uses the configured default.
    pub using_this_as: Option<String>,
}

impl ResultOf {
    /// A result-of marker deriving its query from the method.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit query type.
    pub fn with_query(mut self, query: impl Into<TypeName>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Bind the invoking instance under the given parameter name.
    pub fn using_this_as(mut self, name: impl Into<String>) -> Self {
        self.using_this_as = Some(name.into());
        self
    }
}

/// A user or datastore annotation, optionally carrying definition markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomAnnotation {
    /// Annotation name (e.g. "Label").
    pub name: String,
    /// Definition markers declared on the annotation type.
    #[serde(default)]
    pub definitions: Vec<Definition>,
    /// Primary value.
    #[serde(default)]
    pub value: Option<String>,
    /// Additional named attributes.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl CustomAnnotation {
    /// Create an annotation without markers or values.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            definitions: Vec::new(),
            value: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Add a definition marker.
    pub fn with_definition(mut self, definition: Definition) -> Self {
        if !self.definitions.contains(&definition) {
            self.definitions.push(definition);
        }
        self
    }

    /// Set the primary value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set a named attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Check if this annotation carries a definition marker.
    pub fn defines(&self, definition: Definition) -> bool {
        self.definitions.contains(&definition)
    }
}

/// An annotation on a declared element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Annotation {
    /// The method is implemented by a named delegate.
    ImplementedBy(String),
    /// The method returns the result of a query.
    ResultOf(ResultOf),
    /// Any other annotation.
    Custom(CustomAnnotation),
}

impl From<CustomAnnotation> for Annotation {
    fn from(annotation: CustomAnnotation) -> Self {
        Annotation::Custom(annotation)
    }
}

impl From<ResultOf> for Annotation {
    fn from(result_of: ResultOf) -> Self {
        Annotation::ResultOf(result_of)
    }
}

/// Lookup helpers over an annotation list.
pub trait Annotated {
    /// The annotations declared on this element.
    fn annotations(&self) -> Vec<&Annotation>;

    /// The first custom annotation carrying the given definition marker.
    fn by_definition(&self, definition: Definition) -> Option<&CustomAnnotation> {
        self.annotations().into_iter().find_map(|a| match a {
            Annotation::Custom(custom) if custom.defines(definition) => Some(custom),
            _ => None,
        })
    }

    /// The first custom annotation with the given name.
    fn annotation(&self, name: &str) -> Option<&CustomAnnotation> {
        self.annotations().into_iter().find_map(|a| match a {
            Annotation::Custom(custom) if custom.name == name => Some(custom),
            _ => None,
        })
    }

    /// The result-of marker, if any.
    fn result_of(&self) -> Option<&ResultOf> {
        self.annotations().into_iter().find_map(|a| match a {
            Annotation::ResultOf(result_of) => Some(result_of),
            _ => None,
        })
    }

    /// The implemented-by delegate, if any.
    fn implemented_by(&self) -> Option<&str> {
        self.annotations().into_iter().find_map(|a| match a {
            Annotation::ImplementedBy(delegate) => Some(delegate.as_str()),
            _ => None,
        })
    }
}

impl Annotated for [Annotation] {
    fn annotations(&self) -> Vec<&Annotation> {
        self.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_definition() {
        let annotations = vec![
            Annotation::Custom(CustomAnnotation::new("Deprecated")),
            Annotation::Custom(
                CustomAnnotation::new("Label")
                    .with_definition(Definition::Entity)
                    .with_value("Person"),
            ),
        ];

        let label = annotations.as_slice().by_definition(Definition::Entity);
        assert_eq!(label.and_then(|a| a.value.as_deref()), Some("Person"));
        assert!(annotations.as_slice().by_definition(Definition::Relation).is_none());
        assert!(annotations.as_slice().annotation("Deprecated").is_some());
    }

    #[test]
    fn test_result_of_and_delegate() {
        let annotations = vec![
            Annotation::ResultOf(ResultOf::new().using_this_as("me")),
            Annotation::ImplementedBy("FullName".to_string()),
        ];

        let result_of = annotations.as_slice().result_of().unwrap();
        assert_eq!(result_of.using_this_as.as_deref(), Some("me"));
        assert!(result_of.query.is_none());
        assert_eq!(annotations.as_slice().implemented_by(), Some("FullName"));
    }

    #[test]
    fn test_definition_is_not_duplicated() {
        let annotation = CustomAnnotation::new("Indexed")
            .with_definition(Definition::Index)
            .with_definition(Definition::Index);
        assert_eq!(annotation.definitions.len(), 1);
    }
}
