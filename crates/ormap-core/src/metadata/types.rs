//! Type metadata nodes.
//!
//! Supertypes are referenced by name and looked up in the registry; nodes
//! never own each other.

use super::{Direction, MethodMetadata, PrimitivePropertyMetadata};
use crate::classify::TypeKind;
use crate::datastore::{DatastoreEntityMetadata, DatastoreRelationMetadata, Payload};
use crate::declare::TypeName;
use serde::{Deserialize, Serialize};

/// The indexed property of an entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedPropertyMetadata {
    /// The indexed primitive property.
    pub property: PrimitivePropertyMetadata,
    /// Datastore index payload.
    pub datastore: Payload,
}

/// Metadata of an entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTypeMetadata {
    /// The declared type.
    pub declared_type: TypeName,
    /// Direct supertypes in declaration order.
    pub super_types: Vec<TypeName>,
    /// Own method metadata.
    pub methods: Vec<MethodMetadata>,
    /// Own indexed property.
    pub indexed_property: Option<IndexedPropertyMetadata>,
    /// Datastore entity metadata.
    pub datastore: DatastoreEntityMetadata,
}

/// Metadata of a relation type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationTypeMetadata {
    /// The declared type.
    pub declared_type: TypeName,
    /// Direct supertypes in declaration order.
    pub super_types: Vec<TypeName>,
    /// Own method metadata.
    pub methods: Vec<MethodMetadata>,
    /// Source entity type.
    pub from_type: Option<TypeName>,
    /// Target entity type.
    pub to_type: Option<TypeName>,
    /// Datastore relation metadata.
    pub datastore: DatastoreRelationMetadata,
}

impl RelationTypeMetadata {
    /// The entity type at the given end of the relation.
    pub fn endpoint(&self, direction: Direction) -> Option<&TypeName> {
        match direction {
            Direction::From => self.from_type.as_ref(),
            Direction::To => self.to_type.as_ref(),
        }
    }

    /// Check if both endpoints are resolved.
    ///
    /// A relation without both endpoints is structural only and cannot be
    /// instantiated on its own.
    pub fn is_instantiable(&self) -> bool {
        self.from_type.is_some() && self.to_type.is_some()
    }
}

/// Metadata of a type that is neither entity nor relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleTypeMetadata {
    /// The declared type.
    pub declared_type: TypeName,
    /// Direct supertypes in declaration order.
    pub super_types: Vec<TypeName>,
    /// Own method metadata.
    pub methods: Vec<MethodMetadata>,
}

/// Resolved metadata of one declared type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeMetadata {
    /// Entity type.
    Entity(EntityTypeMetadata),
    /// Relation type.
    Relation(RelationTypeMetadata),
    /// Simple type.
    Simple(SimpleTypeMetadata),
}

impl TypeMetadata {
    /// The declared type.
    pub fn declared_type(&self) -> &TypeName {
        match self {
            TypeMetadata::Entity(m) => &m.declared_type,
            TypeMetadata::Relation(m) => &m.declared_type,
            TypeMetadata::Simple(m) => &m.declared_type,
        }
    }

    /// Direct supertypes.
    pub fn super_types(&self) -> &[TypeName] {
        match self {
            TypeMetadata::Entity(m) => &m.super_types,
            TypeMetadata::Relation(m) => &m.super_types,
            TypeMetadata::Simple(m) => &m.super_types,
        }
    }

    /// Own method metadata.
    pub fn methods(&self) -> &[MethodMetadata] {
        match self {
            TypeMetadata::Entity(m) => &m.methods,
            TypeMetadata::Relation(m) => &m.methods,
            TypeMetadata::Simple(m) => &m.methods,
        }
    }

    /// The kind of this node.
    pub fn kind(&self) -> TypeKind {
        match self {
            TypeMetadata::Entity(_) => TypeKind::Entity,
            TypeMetadata::Relation(_) => TypeKind::Relation,
            TypeMetadata::Simple(_) => TypeKind::Simple,
        }
    }

    /// Entity metadata, if this is an entity type.
    pub fn as_entity(&self) -> Option<&EntityTypeMetadata> {
        match self {
            TypeMetadata::Entity(m) => Some(m),
            _ => None,
        }
    }

    /// Relation metadata, if this is a relation type.
    pub fn as_relation(&self) -> Option<&RelationTypeMetadata> {
        match self {
            TypeMetadata::Relation(m) => Some(m),
            _ => None,
        }
    }
}
