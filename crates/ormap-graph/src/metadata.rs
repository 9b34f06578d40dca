//! Typed graph payloads.
//!
//! The core engine stores datastore payloads as opaque JSON values; these
//! types give them a shape on the way in and out.

use ormap_core::{Error, Payload};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Storage shape of an entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMetadata {
    /// Own node label; `None` for entity types that only inherit labels.
    pub label: Option<String>,
}

/// Storage shape of a declared or implicit relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipMetadata {
    /// Relationship type name.
    pub relationship_type: String,
}

/// Storage shape of a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyMetadata {
    /// Node or relationship property name.
    pub name: String,
}

/// Storage shape of an indexed property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexMetadata {
    /// Indexed property name.
    pub property: String,
    /// Whether the index enforces uniqueness.
    pub unique: bool,
}

impl NodeMetadata {
    /// Encode as a payload.
    pub fn to_payload(&self) -> Payload {
        json!({ "label": self.label })
    }

    /// Decode from a payload.
    pub fn from_payload(payload: &Payload) -> Result<Self, Error> {
        Ok(Self::deserialize(payload)?)
    }
}

impl RelationshipMetadata {
    /// Encode as a payload.
    pub fn to_payload(&self) -> Payload {
        json!({ "relationship_type": self.relationship_type })
    }

    /// Decode from a payload.
    pub fn from_payload(payload: &Payload) -> Result<Self, Error> {
        Ok(Self::deserialize(payload)?)
    }
}

impl PropertyMetadata {
    /// Encode as a payload.
    pub fn to_payload(&self) -> Payload {
        json!({ "name": self.name })
    }

    /// Decode from a payload.
    pub fn from_payload(payload: &Payload) -> Result<Self, Error> {
        Ok(Self::deserialize(payload)?)
    }
}

impl IndexMetadata {
    /// Encode as a payload.
    pub fn to_payload(&self) -> Payload {
        json!({ "property": self.property, "unique": self.unique })
    }

    /// Decode from a payload.
    pub fn from_payload(payload: &Payload) -> Result<Self, Error> {
        Ok(Self::deserialize(payload)?)
    }
}
