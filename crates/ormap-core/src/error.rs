//! Core error types.
//!
//! Every variant is a static declaration defect: metadata construction aborts
//! on the first one and no partial registry is ever returned.

use crate::declare::{TypeName, ValueType};
use thiserror::Error;

/// Metadata resolution errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The declared supertype graph contains a cycle.
    #[error("cyclic type dependency: {}", format_cycle(.cycle))]
    CyclicDependency {
        /// Types on the cycle, closed by repeating the first one.
        cycle: Vec<TypeName>,
    },

    /// A supertype or referenced type is not known to the declaration source.
    #[error("type '{type_name}' is not declared")]
    UnknownType {
        /// The missing type.
        type_name: TypeName,
    },

    /// A resolved type is not a pure interface.
    #[error("type '{type_name}' is not an interface")]
    NotAnInterface {
        /// The offending type.
        type_name: TypeName,
    },

    /// A type is marked as both entity and relation.
    #[error("type '{type_name}' is declared as both entity and relation")]
    ConflictingDefinitions {
        /// The offending type.
        type_name: TypeName,
    },

    /// Getter and setter of a property disagree on the value type.
    #[error(
        "get and set methods for property '{property}' of type '{type_name}' do not declare the same {detail}: {getter} <> {setter}"
    )]
    PropertyTypeConflict {
        /// The declaring type.
        type_name: TypeName,
        /// The property name.
        property: String,
        /// Either "type" or "generic type".
        detail: &'static str,
        /// Value type declared by the getter.
        getter: ValueType,
        /// Value type declared by the setter.
        setter: ValueType,
    },

    /// Two getters were declared for one property (e.g. `getX` and `isX`).
    #[error("property '{property}' of type '{type_name}' declares more than one {accessor}")]
    DuplicateAccessor {
        /// The declaring type.
        type_name: TypeName,
        /// The property name.
        property: String,
        /// Either "getter" or "setter".
        accessor: &'static str,
    },

    /// The direction of a relation property cannot be matched to the declaring type.
    #[error("cannot determine direction of relation '{relation}' for property '{property}' of type '{type_name}'")]
    AmbiguousDirection {
        /// The declaring type.
        type_name: TypeName,
        /// The property name.
        property: String,
        /// The relation type.
        relation: TypeName,
    },

    /// A relation is not defined between the given instance type sets.
    #[error("relation '{relation}' is not defined between the given instance types")]
    DirectionNotDefined {
        /// The relation type.
        relation: TypeName,
    },

    /// More than one indexed property on an entity type.
    #[error("entity type '{type_name}' declares more than one indexed property: '{first}' and '{second}'")]
    MultipleIndexedProperties {
        /// The entity type.
        type_name: TypeName,
        /// The first indexed property.
        first: String,
        /// The second indexed property.
        second: String,
    },

    /// An index marker on a non-primitive property.
    #[error("only primitive properties can be indexed: '{property}' of type '{type_name}'")]
    NonPrimitiveIndex {
        /// The declaring type.
        type_name: TypeName,
        /// The property name.
        property: String,
    },

    /// A derived-query parameter has no name binding.
    #[error(
        "cannot determine parameter names for '{method}' of type '{type_name}', parameter {index} has no binding"
    )]
    MissingParameterBinding {
        /// The declaring type.
        type_name: TypeName,
        /// The method name.
        method: String,
        /// Zero-based parameter position.
        index: usize,
    },

    /// A derived query without a resolvable query definition.
    #[error("no query definition found for '{method}' of type '{type_name}' (value type {value_type})")]
    UndefinedQuery {
        /// The declaring type.
        type_name: TypeName,
        /// The method name.
        method: String,
        /// The resolved query value type.
        value_type: ValueType,
    },

    /// A collection property whose element type cannot be stored.
    #[error("unsupported element type {element} for collection property '{property}' of type '{type_name}'")]
    UnsupportedCollectionElement {
        /// The declaring type.
        type_name: TypeName,
        /// The property name.
        property: String,
        /// The element type.
        element: ValueType,
    },

    /// A reference property to a type that is neither entity nor relation.
    #[error("unsupported type '{target}' for reference property '{property}' of type '{type_name}'")]
    UnsupportedReferenceType {
        /// The declaring type.
        type_name: TypeName,
        /// The property name.
        property: String,
        /// The referenced type.
        target: TypeName,
    },

    /// A relation type without resolvable endpoints (strict mode only).
    #[error("relation type '{type_name}' does not declare both a from and a to entity type")]
    UnresolvedRelationEndpoints {
        /// The relation type.
        type_name: TypeName,
    },

    /// Registry lookup miss.
    #[error("cannot resolve metadata for type '{type_name}'")]
    MetadataNotFound {
        /// The requested type.
        type_name: TypeName,
    },

    /// Registry lookup hit of the wrong kind.
    #[error("expected {expected} metadata but got {actual} for type '{type_name}'")]
    MetadataTypeMismatch {
        /// The requested type.
        type_name: TypeName,
        /// The requested kind.
        expected: &'static str,
        /// The registered kind.
        actual: &'static str,
    },

    /// The injected datastore metadata factory rejected a declaration.
    #[error("datastore error for '{subject}': {message}")]
    Datastore {
        /// Type or property the factory was asked about.
        subject: String,
        /// Factory-supplied reason.
        message: String,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

fn format_cycle(cycle: &[TypeName]) -> String {
    cycle
        .iter()
        .map(TypeName::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl Error {
    /// Create a datastore error.
    pub fn datastore(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Datastore {
            subject: subject.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
