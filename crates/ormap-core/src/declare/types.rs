//! Type names and value types of declared methods.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Stable nominal identity of a declared type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    /// Create a type name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl Borrow<str> for TypeName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Scalar data types a property can hold directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarType {
    /// Boolean value.
    Bool,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// 32-bit floating point.
    Float32,
    /// 64-bit floating point.
    Float64,
    /// UTF-8 string.
    String,
    /// Binary data.
    Bytes,
    /// Timestamp (microseconds since Unix epoch).
    Timestamp,
    /// UUID (128-bit identifier).
    Uuid,
}

impl ScalarType {
    /// Lower-case name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            ScalarType::Bool => "bool",
            ScalarType::Int32 => "int32",
            ScalarType::Int64 => "int64",
            ScalarType::Float32 => "float32",
            ScalarType::Float64 => "float64",
            ScalarType::String => "string",
            ScalarType::Bytes => "bytes",
            ScalarType::Timestamp => "timestamp",
            ScalarType::Uuid => "uuid",
        }
    }
}

/// Container kinds for collection-valued properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    /// Ordered list.
    List,
    /// Unordered set.
    Set,
    /// Lazily iterated sequence.
    Iterable,
}

impl CollectionKind {
    fn name(&self) -> &'static str {
        match self {
            CollectionKind::List => "List",
            CollectionKind::Set => "Set",
            CollectionKind::Iterable => "Iterable",
        }
    }
}

/// The value type of a declared method's return or parameter.
///
/// The constructor is the *raw* type; the element of a container is its
/// *generic argument*.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// No value (method returns nothing).
    Void,
    /// A scalar value.
    Scalar(ScalarType),
    /// A named type: declared interface, enum or opaque value type.
    Named(TypeName),
    /// A collection of elements.
    Collection {
        /// Container kind.
        kind: CollectionKind,
        /// Element type.
        element: Box<ValueType>,
    },
    /// A query result shape yielding rows of the element type.
    QueryResult(Box<ValueType>),
}

impl ValueType {
    /// Create a scalar value type.
    pub fn scalar(scalar: ScalarType) -> Self {
        ValueType::Scalar(scalar)
    }

    /// Create a named value type.
    pub fn named(name: impl Into<TypeName>) -> Self {
        ValueType::Named(name.into())
    }

    /// Create a list of the given element type.
    pub fn list(element: ValueType) -> Self {
        ValueType::Collection {
            kind: CollectionKind::List,
            element: Box::new(element),
        }
    }

    /// Create a set of the given element type.
    pub fn set(element: ValueType) -> Self {
        ValueType::Collection {
            kind: CollectionKind::Set,
            element: Box::new(element),
        }
    }

    /// Create an iterable of the given element type.
    pub fn iterable(element: ValueType) -> Self {
        ValueType::Collection {
            kind: CollectionKind::Iterable,
            element: Box::new(element),
        }
    }

    /// Create a query result shape of the given row type.
    pub fn query_result(element: ValueType) -> Self {
        ValueType::QueryResult(Box::new(element))
    }

    /// Check if this is the void type.
    pub fn is_void(&self) -> bool {
        matches!(self, ValueType::Void)
    }

    /// The generic argument of a container type.
    pub fn type_argument(&self) -> Option<&ValueType> {
        match self {
            ValueType::Collection { element, .. } | ValueType::QueryResult(element) => {
                Some(element)
            }
            _ => None,
        }
    }

    /// Check if two value types share the same raw type, ignoring generic arguments.
    pub fn same_raw_type(&self, other: &ValueType) -> bool {
        match (self, other) {
            (
                ValueType::Collection { kind: left, .. },
                ValueType::Collection { kind: right, .. },
            ) => left == right,
            (ValueType::QueryResult(_), ValueType::QueryResult(_)) => true,
            _ => self == other,
        }
    }

    /// Check if this is a result or collection shape whose rows are unwrapped by derived queries.
    pub fn is_result_shape(&self) -> bool {
        matches!(
            self,
            ValueType::QueryResult(_) | ValueType::Collection { .. }
        )
    }

    /// The named type, if this is a named value type.
    pub fn as_named(&self) -> Option<&TypeName> {
        match self {
            ValueType::Named(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Void => f.write_str("void"),
            ValueType::Scalar(scalar) => f.write_str(scalar.name()),
            ValueType::Named(name) => write!(f, "{name}"),
            ValueType::Collection { kind, element } => write!(f, "{}<{element}>", kind.name()),
            ValueType::QueryResult(element) => write!(f, "Result<{element}>"),
        }
    }
}
