//! Type metadata registry.
//!
//! The resolved metadata graph, keyed by declared type. Read-only once built;
//! supertype and relation endpoint links are names looked up here.

use crate::classify::TypeKind;
use crate::datastore::{Discriminator, TypeMetadataMap};
use crate::declare::TypeName;
use crate::error::Error;
use crate::metadata::{
    Direction, EntityTypeMetadata, MethodMetadata, RelationTypeMetadata, TypeMetadata,
};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Immutable mapping from declared type to its resolved metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeMetadataRegistry {
    types: TypeMetadataMap,
    order: Vec<TypeName>,
    aggregated_discriminators: BTreeMap<TypeName, BTreeSet<Discriminator>>,
}

impl TypeMetadataRegistry {
    /// Create a registry from fully built metadata in registration order.
    pub(crate) fn new(types: TypeMetadataMap, order: Vec<TypeName>) -> Self {
        let mut registry = Self {
            types,
            order,
            aggregated_discriminators: BTreeMap::new(),
        };
        let aggregated = registry
            .entity_types()
            .map(|entity| {
                let name = entity.declared_type.clone();
                let discriminators = registry.collect_discriminators(&name);
                (name, discriminators)
            })
            .collect();
        registry.aggregated_discriminators = aggregated;
        registry
    }

    /// Get the metadata of a type.
    pub fn get(&self, name: &TypeName) -> Result<&TypeMetadata, Error> {
        self.types.get(name).ok_or_else(|| Error::MetadataNotFound {
            type_name: name.clone(),
        })
    }

    /// Look up the metadata of a type without failing.
    pub fn find(&self, name: &TypeName) -> Option<&TypeMetadata> {
        self.types.get(name)
    }

    /// Get the metadata of an entity type.
    pub fn entity_metadata(&self, name: &TypeName) -> Result<&EntityTypeMetadata, Error> {
        let metadata = self.get(name)?;
        metadata
            .as_entity()
            .ok_or_else(|| mismatch(name, TypeKind::Entity, metadata.kind()))
    }

    /// Get the metadata of a relation type.
    pub fn relation_metadata(&self, name: &TypeName) -> Result<&RelationTypeMetadata, Error> {
        let metadata = self.get(name)?;
        metadata
            .as_relation()
            .ok_or_else(|| mismatch(name, TypeKind::Relation, metadata.kind()))
    }

    /// Aggregated discriminators of one entity type: its own and those of all entity supertypes.
    pub fn aggregated_discriminators(&self, name: &TypeName) -> Option<&BTreeSet<Discriminator>> {
        self.aggregated_discriminators.get(name)
    }

    /// Union of the aggregated discriminators of the given types.
    ///
    /// Types that are not entity types contribute nothing.
    pub fn discriminators<'t>(
        &self,
        types: impl IntoIterator<Item = &'t TypeName>,
    ) -> BTreeSet<Discriminator> {
        types
            .into_iter()
            .filter_map(|name| self.aggregated_discriminators.get(name))
            .flatten()
            .cloned()
            .collect()
    }

    /// Resolve the entity types an instance carrying the given discriminators satisfies.
    ///
    /// A type matches when it has an own discriminator and all of its
    /// aggregated discriminators are present; types that only inherit a
    /// discriminator cannot be told apart from their supertype. Only the most
    /// specific matches are returned: a match that is a supertype of another
    /// match is dropped.
    pub fn types_for_discriminators(
        &self,
        discriminators: &BTreeSet<Discriminator>,
    ) -> BTreeSet<TypeName> {
        let matches: BTreeSet<&TypeName> = self
            .entity_types()
            .filter(|entity| entity.datastore.discriminator.is_some())
            .filter(|entity| {
                self.aggregated_discriminators
                    .get(&entity.declared_type)
                    .is_some_and(|aggregated| aggregated.is_subset(discriminators))
            })
            .map(|entity| &entity.declared_type)
            .collect();

        let covered: BTreeSet<&TypeName> = matches
            .iter()
            .flat_map(|name| self.super_type_closure(name))
            .collect();

        matches
            .into_iter()
            .filter(|name| !covered.contains(name))
            .cloned()
            .collect()
    }

    /// Direction of a relation between instances of the given source and target type sets.
    pub fn resolve_direction(
        &self,
        source_types: &BTreeSet<TypeName>,
        relation: &RelationTypeMetadata,
        target_types: &BTreeSet<TypeName>,
    ) -> Result<Direction, Error> {
        let contains = |types: &BTreeSet<TypeName>, endpoint: Option<&TypeName>| {
            endpoint.is_some_and(|endpoint| types.contains(endpoint))
        };
        [Direction::From, Direction::To]
            .into_iter()
            .find(|direction| {
                contains(source_types, relation.endpoint(*direction))
                    && contains(target_types, relation.endpoint(direction.inverse()))
            })
            .ok_or_else(|| Error::DirectionNotDefined {
                relation: relation.declared_type.clone(),
            })
    }

    /// Declared relation types stored under the given datastore discriminator.
    pub fn relation_types_for(&self, discriminator: &Discriminator) -> Vec<&RelationTypeMetadata> {
        self.relation_types()
            .filter(|relation| &relation.datastore.discriminator == discriminator)
            .collect()
    }

    /// The property of an entity type (or its supertypes) navigating a relation in a direction.
    ///
    /// The entity type itself is searched first, then its supertypes breadth-first.
    pub fn relation_property(
        &self,
        entity: &TypeName,
        relation: &TypeName,
        direction: Direction,
    ) -> Option<&MethodMetadata> {
        std::iter::once(entity)
            .chain(self.super_type_closure(entity))
            .filter_map(|name| self.types.get(name))
            .flat_map(TypeMetadata::methods)
            .find(|method| {
                method.relation_type() == Some(relation) && method.direction() == Some(direction)
            })
    }

    /// All supertypes of a type, transitively, breadth-first without duplicates.
    pub fn super_type_closure(&self, name: &TypeName) -> Vec<&TypeName> {
        let mut closure = Vec::new();
        let mut visited = BTreeSet::new();
        let mut queue: VecDeque<&TypeName> = self
            .types
            .get(name)
            .map(|m| m.super_types().iter().collect())
            .unwrap_or_default();

        while let Some(next) = queue.pop_front() {
            if !visited.insert(next) {
                continue;
            }
            closure.push(next);
            if let Some(metadata) = self.types.get(next) {
                queue.extend(metadata.super_types());
            }
        }
        closure
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if no type is registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterate over registered metadata by type name.
    pub fn iter(&self) -> impl Iterator<Item = (&TypeName, &TypeMetadata)> {
        self.types.iter()
    }

    /// All entity types.
    pub fn entity_types(&self) -> impl Iterator<Item = &EntityTypeMetadata> {
        self.types.values().filter_map(TypeMetadata::as_entity)
    }

    /// All relation types.
    pub fn relation_types(&self) -> impl Iterator<Item = &RelationTypeMetadata> {
        self.types.values().filter_map(TypeMetadata::as_relation)
    }

    /// Types in the order they were registered; supertypes come before subtypes.
    pub fn registration_order(&self) -> &[TypeName] {
        &self.order
    }

    /// Export the resolved graph as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn collect_discriminators(&self, name: &TypeName) -> BTreeSet<Discriminator> {
        std::iter::once(name)
            .chain(self.super_type_closure(name))
            .filter_map(|name| self.types.get(name))
            .filter_map(TypeMetadata::as_entity)
            .filter_map(|entity| entity.datastore.discriminator.clone())
            .collect()
    }
}

fn mismatch(name: &TypeName, expected: TypeKind, actual: TypeKind) -> Error {
    Error::MetadataTypeMismatch {
        type_name: name.clone(),
        expected: expected.name(),
        actual: actual.name(),
    }
}
