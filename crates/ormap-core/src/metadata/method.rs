//! Method metadata: the resolved meaning of each declared method.

use super::Direction;
use crate::classify::{AccessorPair, AnnotatedMethod};
use crate::datastore::{DatastoreRelationMetadata, Payload};
use crate::declare::{CollectionKind, CustomAnnotation, MethodDecl, TypeName, ValueType};
use serde::{Deserialize, Serialize};

/// The relation navigated by an entity reference or collection property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationBinding {
    /// A declared relation type, looked up in the registry.
    Declared(TypeName),
    /// An implicit relation derived by the datastore from the property.
    Implicit(DatastoreRelationMetadata),
}

/// A property holding a primitive value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimitivePropertyMetadata {
    /// The accessor pair.
    pub property: AccessorPair,
    /// Datastore payload.
    pub datastore: Payload,
}

/// A property holding an enum value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumPropertyMetadata {
    /// The accessor pair.
    pub property: AccessorPair,
    /// The enum type.
    pub enum_type: TypeName,
    /// Allowed variants.
    pub variants: Vec<String>,
    /// Datastore payload.
    pub datastore: Payload,
}

/// A property referencing a single entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityReferenceMetadata {
    /// The accessor pair.
    pub property: AccessorPair,
    /// Referenced entity type.
    pub target: TypeName,
    /// Relation used to store the reference.
    pub relation: RelationBinding,
    /// Direction of navigation.
    pub direction: Direction,
    /// Datastore payload.
    pub datastore: Payload,
}

/// A property referencing a single relation instance of a declared relation type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationReferenceMetadata {
    /// The accessor pair.
    pub property: AccessorPair,
    /// The relation type.
    pub relation: TypeName,
    /// Direction of navigation.
    pub direction: Direction,
    /// Datastore payload.
    pub datastore: Payload,
}

/// A property holding a collection of entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityCollectionMetadata {
    /// The accessor pair.
    pub property: AccessorPair,
    /// Element entity type.
    pub element: TypeName,
    /// Container kind.
    pub collection: CollectionKind,
    /// Relation used to store the elements.
    pub relation: RelationBinding,
    /// Direction of navigation.
    pub direction: Direction,
    /// Datastore payload.
    pub datastore: Payload,
}

/// A property holding a collection of relation instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationCollectionMetadata {
    /// The accessor pair.
    pub property: AccessorPair,
    /// The relation type.
    pub relation: TypeName,
    /// Container kind.
    pub collection: CollectionKind,
    /// Direction of navigation.
    pub direction: Direction,
    /// Datastore payload.
    pub datastore: Payload,
}

/// Where a derived query's expression is defined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryExpression {
    /// A declared type carrying the query definition.
    Type(TypeName),
    /// The method itself carries the query definition.
    Method {
        /// Method name.
        method: String,
        /// The query-defining annotation.
        definition: CustomAnnotation,
    },
}

/// A method whose invocation executes a parameterized query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultOfMetadata {
    /// The classified method.
    pub method: AnnotatedMethod,
    /// Query expression.
    pub query: QueryExpression,
    /// Row type (element type for result shapes).
    pub return_type: ValueType,
    /// Parameter name the invoking instance is bound to.
    pub using_this_as: String,
    /// Query parameter names in argument order.
    pub parameters: Vec<String>,
    /// Whether the method returns a single row.
    pub single_result: bool,
}

/// A method implemented by a user-supplied delegate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImplementedByMetadata {
    /// The classified method.
    pub method: AnnotatedMethod,
    /// Delegate identifier.
    pub delegate: String,
    /// Datastore payload.
    pub datastore: Payload,
}

/// A method with no storage meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnsupportedOperationMetadata {
    /// The declared method.
    pub method: MethodDecl,
}

/// Resolved metadata of one classified method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MethodMetadata {
    /// Primitive property.
    Primitive(PrimitivePropertyMetadata),
    /// Enum property.
    Enum(EnumPropertyMetadata),
    /// Single entity reference.
    EntityReference(EntityReferenceMetadata),
    /// Single relation reference.
    RelationReference(RelationReferenceMetadata),
    /// Entity collection.
    EntityCollection(EntityCollectionMetadata),
    /// Relation collection.
    RelationCollection(RelationCollectionMetadata),
    /// Derived query.
    ResultOf(ResultOfMetadata),
    /// Delegate-implemented method.
    ImplementedBy(ImplementedByMetadata),
    /// Opaque method.
    Unsupported(UnsupportedOperationMetadata),
}

impl MethodMetadata {
    /// Property or method name.
    pub fn name(&self) -> &str {
        match self {
            MethodMetadata::ResultOf(m) => m.method.name(),
            MethodMetadata::ImplementedBy(m) => m.method.name(),
            MethodMetadata::Unsupported(m) => &m.method.name,
            _ => self.property().map(|p| p.name.as_str()).unwrap_or_default(),
        }
    }

    /// The accessor pair of a storage-backed property.
    pub fn property(&self) -> Option<&AccessorPair> {
        match self {
            MethodMetadata::Primitive(m) => Some(&m.property),
            MethodMetadata::Enum(m) => Some(&m.property),
            MethodMetadata::EntityReference(m) => Some(&m.property),
            MethodMetadata::RelationReference(m) => Some(&m.property),
            MethodMetadata::EntityCollection(m) => Some(&m.property),
            MethodMetadata::RelationCollection(m) => Some(&m.property),
            _ => None,
        }
    }

    /// Names of the declared methods covered by this entry.
    pub fn method_names(&self) -> Vec<&str> {
        match self {
            MethodMetadata::ResultOf(m) => m.method.method_names(),
            MethodMetadata::ImplementedBy(m) => m.method.method_names(),
            MethodMetadata::Unsupported(m) => vec![m.method.name.as_str()],
            _ => self
                .property()
                .map(|p| p.getter_name().into_iter().chain(p.setter_name()).collect())
                .unwrap_or_default(),
        }
    }

    /// Declared relation type navigated by this property, if any.
    pub fn relation_type(&self) -> Option<&TypeName> {
        match self {
            MethodMetadata::EntityReference(EntityReferenceMetadata {
                relation: RelationBinding::Declared(relation),
                ..
            })
            | MethodMetadata::EntityCollection(EntityCollectionMetadata {
                relation: RelationBinding::Declared(relation),
                ..
            }) => Some(relation),
            MethodMetadata::RelationReference(m) => Some(&m.relation),
            MethodMetadata::RelationCollection(m) => Some(&m.relation),
            _ => None,
        }
    }

    /// Direction of a reference or collection property.
    pub fn direction(&self) -> Option<Direction> {
        match self {
            MethodMetadata::EntityReference(m) => Some(m.direction),
            MethodMetadata::RelationReference(m) => Some(m.direction),
            MethodMetadata::EntityCollection(m) => Some(m.direction),
            MethodMetadata::RelationCollection(m) => Some(m.direction),
            _ => None,
        }
    }

    /// Short kind name used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            MethodMetadata::Primitive(_) => "primitive",
            MethodMetadata::Enum(_) => "enum",
            MethodMetadata::EntityReference(_) => "entity reference",
            MethodMetadata::RelationReference(_) => "relation reference",
            MethodMetadata::EntityCollection(_) => "entity collection",
            MethodMetadata::RelationCollection(_) => "relation collection",
            MethodMetadata::ResultOf(_) => "result of",
            MethodMetadata::ImplementedBy(_) => "implemented by",
            MethodMetadata::Unsupported(_) => "unsupported",
        }
    }
}
