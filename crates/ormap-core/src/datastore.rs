//! The datastore seam.
//!
//! A datastore contributes storage-specific facts (discriminators, storage
//! shapes, relation directions) through a [`DatastoreMetadataFactory`]. The
//! engine attaches the results to metadata nodes as opaque payloads.

use crate::classify::{AccessorPair, AnnotatedMethod};
use crate::declare::{DeclaredType, TypeName};
use crate::error::Error;
use crate::metadata::{Direction, TypeMetadata};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque datastore payload attached to metadata nodes.
pub type Payload = serde_json::Value;

/// Metadata registered so far, keyed by declared type.
pub type TypeMetadataMap = BTreeMap<TypeName, TypeMetadata>;

/// Datastore tag identifying which declared types an instance satisfies.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Discriminator(String);

impl Discriminator {
    /// Create a discriminator.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The discriminator as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Discriminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Discriminator {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Datastore facts about an entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatastoreEntityMetadata {
    /// Own discriminator; `None` for entity types that only inherit one.
    pub discriminator: Option<Discriminator>,
    /// Storage shape.
    pub payload: Payload,
}

impl DatastoreEntityMetadata {
    /// Create entity metadata with a discriminator.
    pub fn new(discriminator: Option<Discriminator>, payload: Payload) -> Self {
        Self {
            discriminator,
            payload,
        }
    }
}

/// Datastore facts about a relation, declared or implicit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatastoreRelationMetadata {
    /// Relation discriminator (e.g. relationship type name).
    pub discriminator: Discriminator,
    /// Storage shape.
    pub payload: Payload,
}

impl DatastoreRelationMetadata {
    /// Create relation metadata.
    pub fn new(discriminator: Discriminator, payload: Payload) -> Self {
        Self {
            discriminator,
            payload,
        }
    }
}

/// What a relation's datastore metadata is derived from.
#[derive(Debug, Clone, Copy)]
pub enum RelationSource<'a> {
    /// A declared relation type.
    Type(&'a DeclaredType),
    /// A reference or collection property declaring an implicit relation.
    Property {
        /// The type declaring the property.
        declaring_type: &'a TypeName,
        /// The property.
        property: &'a AccessorPair,
    },
}

/// Factory for datastore-specific metadata, called while the registry is built.
///
/// Property hooks default to a null payload for datastores that need none.
pub trait DatastoreMetadataFactory {
    /// Entity metadata for a declared entity type.
    fn create_entity_metadata(
        &self,
        declared: &DeclaredType,
        registered: &TypeMetadataMap,
    ) -> Result<DatastoreEntityMetadata, Error>;

    /// Relation metadata for a declared relation type or an implicit relation property.
    fn create_relation_metadata(
        &self,
        source: RelationSource<'_>,
        registered: &TypeMetadataMap,
    ) -> Result<DatastoreRelationMetadata, Error>;

    /// Direction of an entity reference or collection property.
    fn relation_direction(
        &self,
        declaring_type: &TypeName,
        property: &AccessorPair,
    ) -> Result<Direction, Error>;

    /// Payload for a primitive property.
    fn create_primitive_metadata(&self, _property: &AccessorPair) -> Payload {
        Payload::Null
    }

    /// Payload for an enum property.
    fn create_enum_metadata(&self, _property: &AccessorPair) -> Payload {
        Payload::Null
    }

    /// Payload for a reference property.
    fn create_reference_metadata(&self, _property: &AccessorPair) -> Payload {
        Payload::Null
    }

    /// Payload for a collection property.
    fn create_collection_metadata(&self, _property: &AccessorPair) -> Payload {
        Payload::Null
    }

    /// Payload for an indexed property.
    fn create_indexed_metadata(&self, _property: &AccessorPair) -> Payload {
        Payload::Null
    }

    /// Payload for a method implemented by a delegate.
    fn create_implemented_by_metadata(&self, _method: &AnnotatedMethod) -> Payload {
        Payload::Null
    }
}
