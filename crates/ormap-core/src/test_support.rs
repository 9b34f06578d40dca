//! Label-based datastore factory and declaration helpers for unit tests.

use crate::classify::AccessorPair;
use crate::datastore::{
    DatastoreEntityMetadata, DatastoreMetadataFactory, DatastoreRelationMetadata, Discriminator,
    Payload, RelationSource, TypeMetadataMap,
};
use crate::declare::{Annotated, CustomAnnotation, DeclaredType, Definition, TypeName};
use crate::error::Error;
use crate::metadata::Direction;
use serde_json::json;

pub fn label(name: &str) -> CustomAnnotation {
    CustomAnnotation::new("Label")
        .with_definition(Definition::Entity)
        .with_value(name)
}

pub fn relation(name: &str) -> CustomAnnotation {
    CustomAnnotation::new("Relation")
        .with_definition(Definition::Relation)
        .with_value(name)
}

pub fn outgoing() -> CustomAnnotation {
    CustomAnnotation::new("Outgoing")
}

pub fn incoming() -> CustomAnnotation {
    CustomAnnotation::new("Incoming")
}

pub fn indexed() -> CustomAnnotation {
    CustomAnnotation::new("Indexed").with_definition(Definition::Index)
}

pub fn query(expression: &str) -> CustomAnnotation {
    CustomAnnotation::new("Query")
        .with_definition(Definition::Query)
        .with_value(expression)
}

/// Uses the `Label` value as entity discriminator and the `Relation` value
/// (or the property name) as relation discriminator.
#[derive(Debug, Default)]
pub struct LabelFactory;

impl DatastoreMetadataFactory for LabelFactory {
    fn create_entity_metadata(
        &self,
        declared: &DeclaredType,
        _registered: &TypeMetadataMap,
    ) -> Result<DatastoreEntityMetadata, Error> {
        let discriminator = declared
            .annotation("Label")
            .and_then(|label| label.value.as_deref())
            .map(Discriminator::from);
        Ok(DatastoreEntityMetadata::new(discriminator, Payload::Null))
    }

    fn create_relation_metadata(
        &self,
        source: RelationSource<'_>,
        _registered: &TypeMetadataMap,
    ) -> Result<DatastoreRelationMetadata, Error> {
        let name = match source {
            RelationSource::Type(declared) => declared
                .annotation("Relation")
                .and_then(|relation| relation.value.clone())
                .unwrap_or_else(|| declared.name.to_string()),
            RelationSource::Property { property, .. } => property
                .annotation("Relation")
                .and_then(|relation| relation.value.clone())
                .unwrap_or_else(|| property.name.to_uppercase()),
        };
        Ok(DatastoreRelationMetadata::new(
            Discriminator::new(name.clone()),
            json!({ "type": name }),
        ))
    }

    fn relation_direction(
        &self,
        _declaring_type: &TypeName,
        property: &AccessorPair,
    ) -> Result<Direction, Error> {
        match (
            property.annotation("Outgoing").is_some(),
            property.annotation("Incoming").is_some(),
        ) {
            (true, true) => Err(Error::datastore(
                property.name.clone(),
                "both outgoing and incoming",
            )),
            (false, true) => Ok(Direction::To),
            _ => Ok(Direction::From),
        }
    }

    fn create_primitive_metadata(&self, property: &AccessorPair) -> Payload {
        json!({ "name": property.name })
    }
}
