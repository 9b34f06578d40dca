//! Declared method signatures.

use super::{Annotated, Annotation, ValueType};
use serde::{Deserialize, Serialize};

/// A declared method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDecl {
    /// Parameter value type.
    pub value_type: ValueType,
    /// Query parameter name this argument binds to.
    #[serde(default)]
    pub binding: Option<String>,
}

impl ParamDecl {
    /// Create an unbound parameter.
    pub fn new(value_type: ValueType) -> Self {
        Self {
            value_type,
            binding: None,
        }
    }

    /// Create a parameter bound to a query parameter name.
    pub fn bound(value_type: ValueType, binding: impl Into<String>) -> Self {
        Self {
            value_type,
            binding: Some(binding.into()),
        }
    }
}

/// A method declared directly on a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDecl {
    /// Method name.
    pub name: String,
    /// Parameters in declaration order.
    #[serde(default)]
    pub parameters: Vec<ParamDecl>,
    /// Return type.
    #[serde(default = "void")]
    pub returns: ValueType,
    /// Annotations on the method.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

fn void() -> ValueType {
    ValueType::Void
}

impl MethodDecl {
    /// Create a method with no parameters returning nothing.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            returns: ValueType::Void,
            annotations: Vec::new(),
        }
    }

    /// Set the return type.
    pub fn returns(mut self, value_type: ValueType) -> Self {
        self.returns = value_type;
        self
    }

    /// Append a parameter.
    pub fn with_param(mut self, param: ParamDecl) -> Self {
        self.parameters.push(param);
        self
    }

    /// Add an annotation.
    pub fn annotated(mut self, annotation: impl Into<Annotation>) -> Self {
        self.annotations.push(annotation.into());
        self
    }
}

impl Annotated for MethodDecl {
    fn annotations(&self) -> Vec<&Annotation> {
        self.annotations.iter().collect()
    }
}
