//! Type classification into entity, relation and simple types.

use crate::declare::{DeclarationSource, Definition, TypeName};
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The kind of metadata a declared type resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// Addressable persisted object.
    Entity,
    /// Typed, directed edge between entities.
    Relation,
    /// Neither entity nor relation.
    Simple,
}

impl TypeKind {
    /// Lower-case name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            TypeKind::Entity => "entity",
            TypeKind::Relation => "relation",
            TypeKind::Simple => "simple",
        }
    }
}

/// Decides entity/relation-ness by searching definition markers through supertypes.
pub struct TypeClassifier<'a, S: ?Sized> {
    source: &'a S,
}

impl<'a, S> TypeClassifier<'a, S>
where
    S: DeclarationSource + ?Sized,
{
    /// Create a classifier over a declaration source.
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Check if a type or any of its supertypes carries the entity marker.
    pub fn is_entity(&self, name: &TypeName) -> bool {
        self.is_of_definition(name, Definition::Entity)
    }

    /// Check if a type or any of its supertypes carries the relation marker.
    pub fn is_relation(&self, name: &TypeName) -> bool {
        self.is_of_definition(name, Definition::Relation)
    }

    /// Classify a type, rejecting types that are both entity and relation.
    pub fn classify(&self, name: &TypeName) -> Result<TypeKind, Error> {
        match (self.is_entity(name), self.is_relation(name)) {
            (true, true) => Err(Error::ConflictingDefinitions {
                type_name: name.clone(),
            }),
            (true, false) => Ok(TypeKind::Entity),
            (false, true) => Ok(TypeKind::Relation),
            (false, false) => Ok(TypeKind::Simple),
        }
    }

    fn is_of_definition(&self, name: &TypeName, definition: Definition) -> bool {
        let mut visited = BTreeSet::new();
        self.search(name, definition, &mut visited)
    }

    // Depth-first, short-circuiting on the first match.
    fn search(
        &self,
        name: &TypeName,
        definition: Definition,
        visited: &mut BTreeSet<TypeName>,
    ) -> bool {
        if !visited.insert(name.clone()) {
            return false;
        }
        let Some(declared) = self.source.declared_type(name) else {
            return false;
        };
        if self.source.has_definition(name, definition) {
            return true;
        }
        declared
            .super_types
            .iter()
            .any(|super_type| self.search(super_type, definition, visited))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declare::{CustomAnnotation, DeclaredType, Declarations};

    fn entity_marker() -> CustomAnnotation {
        CustomAnnotation::new("Label").with_definition(Definition::Entity)
    }

    fn relation_marker() -> CustomAnnotation {
        CustomAnnotation::new("Relation").with_definition(Definition::Relation)
    }

    fn declarations() -> Declarations {
        Declarations::new()
            .with_type(DeclaredType::interface("Named"))
            .with_type(DeclaredType::interface("Base").annotated(entity_marker()))
            .with_type(DeclaredType::interface("Middle").extends("Named").extends("Base"))
            .with_type(DeclaredType::interface("Leaf").extends("Middle"))
            .with_type(DeclaredType::interface("Knows").annotated(relation_marker()))
            .with_type(DeclaredType::interface("Both").extends("Leaf").extends("Knows"))
            .with_type(DeclaredType::interface("Loop").extends("Loop"))
    }

    #[test]
    fn test_direct_and_inherited_entity() {
        let declarations = declarations();
        let classifier = TypeClassifier::new(&declarations);

        assert!(classifier.is_entity(&"Base".into()));
        assert!(classifier.is_entity(&"Leaf".into()));
        assert!(!classifier.is_entity(&"Named".into()));
        assert!(!classifier.is_relation(&"Leaf".into()));
    }

    #[test]
    fn test_classify() {
        let declarations = declarations();
        let classifier = TypeClassifier::new(&declarations);

        assert_eq!(classifier.classify(&"Leaf".into()).unwrap(), TypeKind::Entity);
        assert_eq!(classifier.classify(&"Knows".into()).unwrap(), TypeKind::Relation);
        assert_eq!(classifier.classify(&"Named".into()).unwrap(), TypeKind::Simple);
        assert_eq!(classifier.classify(&"Unknown".into()).unwrap(), TypeKind::Simple);
    }

    #[test]
    fn test_entity_and_relation_conflict() {
        let declarations = declarations();
        let classifier = TypeClassifier::new(&declarations);

        let err = classifier.classify(&"Both".into()).unwrap_err();
        assert!(matches!(err, Error::ConflictingDefinitions { .. }));
    }

    #[test]
    fn test_self_referencing_type_terminates() {
        let declarations = declarations();
        let classifier = TypeClassifier::new(&declarations);

        assert!(!classifier.is_entity(&"Loop".into()));
    }
}
