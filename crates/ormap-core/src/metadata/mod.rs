//! Metadata graph nodes produced by the builder.

mod direction;
mod method;
mod types;

pub use direction::Direction;
pub use method::{
    EntityCollectionMetadata, EntityReferenceMetadata, EnumPropertyMetadata,
    ImplementedByMetadata, MethodMetadata, PrimitivePropertyMetadata, QueryExpression,
    RelationBinding, RelationCollectionMetadata, RelationReferenceMetadata, ResultOfMetadata,
    UnsupportedOperationMetadata,
};
pub use types::{
    EntityTypeMetadata, IndexedPropertyMetadata, RelationTypeMetadata, SimpleTypeMetadata,
    TypeMetadata,
};
