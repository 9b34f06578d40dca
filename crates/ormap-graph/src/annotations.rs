//! Graph mapping annotations.
//!
//! Each constructor returns a [`CustomAnnotation`] carrying the definition
//! markers the core engine classifies by.

use ormap_core::{CustomAnnotation, Definition};

/// Name of the entity label annotation.
pub const LABEL: &str = "Label";
/// Name of the relationship type annotation.
pub const RELATION: &str = "Relation";
/// Name of the outgoing direction marker.
pub const OUTGOING: &str = "Outgoing";
/// Name of the incoming direction marker.
pub const INCOMING: &str = "Incoming";
/// Name of the index marker.
pub const INDEXED: &str = "Indexed";
/// Name of the Cypher query annotation.
pub const CYPHER: &str = "Cypher";
/// Name of the storage property rename annotation.
pub const PROPERTY: &str = "Property";

/// Attribute of [`INDEXED`] marking a unique index.
pub const UNIQUE: &str = "unique";

/// Marks a type as an entity stored as nodes with the given label.
pub fn label(name: &str) -> CustomAnnotation {
    CustomAnnotation::new(LABEL)
        .with_definition(Definition::Entity)
        .with_value(name)
}

/// Marks a type as an entity labeled with its own type name.
pub fn default_label() -> CustomAnnotation {
    CustomAnnotation::new(LABEL).with_definition(Definition::Entity)
}

/// Marks a type as a relation stored as relationships of the given type.
pub fn relation(name: &str) -> CustomAnnotation {
    CustomAnnotation::new(RELATION)
        .with_definition(Definition::Relation)
        .with_value(name)
}

/// Marks a type as a relation named after its type name.
pub fn default_relation() -> CustomAnnotation {
    CustomAnnotation::new(RELATION).with_definition(Definition::Relation)
}

/// Names the relationship type of a reference or collection property.
///
/// Unlike [`relation`], this carries no definition marker and is meant for
/// properties.
pub fn relationship(name: &str) -> CustomAnnotation {
    CustomAnnotation::new(RELATION).with_value(name)
}

/// Navigate a relationship from the declaring node.
pub fn outgoing() -> CustomAnnotation {
    CustomAnnotation::new(OUTGOING)
}

/// Navigate a relationship towards the declaring node.
pub fn incoming() -> CustomAnnotation {
    CustomAnnotation::new(INCOMING)
}

/// Marks a primitive property as the lookup key of its entity type.
pub fn indexed() -> CustomAnnotation {
    CustomAnnotation::new(INDEXED).with_definition(Definition::Index)
}

/// Marks a primitive property as a unique lookup key.
pub fn unique_index() -> CustomAnnotation {
    indexed().with_attribute(UNIQUE, "true")
}

/// Marks a type or method as a Cypher query.
pub fn cypher(expression: &str) -> CustomAnnotation {
    CustomAnnotation::new(CYPHER)
        .with_definition(Definition::Query)
        .with_value(expression)
}

/// Stores a property under a different name.
pub fn property(name: &str) -> CustomAnnotation {
    CustomAnnotation::new(PROPERTY).with_value(name)
}
