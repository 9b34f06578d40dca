//! ORMAP Core - Metadata resolution engine.
//!
//! This crate compiles a set of declared interface types and their
//! annotations into a closed graph of entity, relation and simple type
//! metadata that a runtime dispatcher can use without re-inspecting the
//! declarations.

pub mod builder;
pub mod classify;
pub mod config;
pub mod datastore;
pub mod declare;
pub mod error;
pub mod metadata;
pub mod registry;
pub mod resolve;

#[cfg(test)]
mod test_support;

pub use builder::MetadataBuilder;
pub use classify::{classify_methods, AccessorPair, AnnotatedMethod, TypeClassifier, TypeKind};
pub use config::{MetadataConfig, DEFAULT_THIS_BINDING};
pub use datastore::{
    DatastoreEntityMetadata, DatastoreMetadataFactory, DatastoreRelationMetadata, Discriminator,
    Payload, RelationSource, TypeMetadataMap,
};
pub use declare::{
    Annotated, Annotation, CollectionKind, CustomAnnotation, DeclarationSource, Declarations,
    DeclaredType, Definition, MethodDecl, ParamDecl, ResultOf, ScalarType, TypeName, TypeShape,
    ValueType,
};
pub use error::Error;
pub use metadata::{
    Direction, EntityCollectionMetadata, EntityReferenceMetadata, EntityTypeMetadata,
    EnumPropertyMetadata, ImplementedByMetadata, IndexedPropertyMetadata, MethodMetadata,
    PrimitivePropertyMetadata, QueryExpression, RelationBinding, RelationCollectionMetadata,
    RelationReferenceMetadata, RelationTypeMetadata, ResultOfMetadata, SimpleTypeMetadata,
    TypeMetadata, UnsupportedOperationMetadata,
};
pub use registry::TypeMetadataRegistry;
pub use resolve::{CyclicDependency, DependencyResolver};

/// Build the metadata registry for a set of declared types.
///
/// Supertypes of the given types are resolved as well. The registry is only
/// returned when every type succeeded.
pub fn build_registry<S, F>(
    source: &S,
    factory: &F,
    config: &MetadataConfig,
    types: impl IntoIterator<Item = TypeName>,
) -> Result<TypeMetadataRegistry, Error>
where
    S: DeclarationSource + ?Sized,
    F: DatastoreMetadataFactory + ?Sized,
{
    MetadataBuilder::new(source, factory, config).build(types)
}
