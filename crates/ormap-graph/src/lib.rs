//! ORMAP Graph - Labeled property graph datastore metadata.
//!
//! Entity types map to nodes discriminated by labels, relation types and
//! reference properties to typed relationships, and derived queries to Cypher
//! expressions.

pub mod annotations;
pub mod factory;
pub mod metadata;
pub mod query;

pub use factory::GraphMetadataFactory;
pub use metadata::{IndexMetadata, NodeMetadata, PropertyMetadata, RelationshipMetadata};
pub use query::CypherQuery;
