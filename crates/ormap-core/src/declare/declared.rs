//! Declared types.

use super::{Annotated, Annotation, MethodDecl, TypeName, ValueType};
use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};

/// Structural shape of a declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeShape {
    /// Pure interface: methods only, no state.
    Interface,
    /// Enumeration with its variant names.
    Enum {
        /// Variant names in declaration order.
        variants: Vec<String>,
    },
    /// Concrete type with state.
    Class,
}

/// A nominal type with its supertypes, annotations and directly declared methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredType {
    /// Type name (unique within a declaration set).
    pub name: TypeName,
    /// Structural shape.
    pub shape: TypeShape,
    /// Directly declared supertypes in declaration order.
    #[serde(default)]
    pub super_types: Vec<TypeName>,
    /// Type annotations.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    /// Methods declared directly on this type.
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
}

impl DeclaredType {
    /// Create an interface type.
    pub fn interface(name: impl Into<TypeName>) -> Self {
        Self::with_shape(name, TypeShape::Interface)
    }

    /// Create an enum type.
    pub fn enumeration(
        name: impl Into<TypeName>,
        variants: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self::with_shape(
            name,
            TypeShape::Enum {
                variants: variants.into_iter().map(Into::into).collect(),
            },
        )
    }

    /// Create a concrete class type.
    pub fn class(name: impl Into<TypeName>) -> Self {
        Self::with_shape(name, TypeShape::Class)
    }

    fn with_shape(name: impl Into<TypeName>, shape: TypeShape) -> Self {
        Self {
            name: name.into(),
            shape,
            super_types: Vec::new(),
            annotations: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Add a supertype.
    pub fn extends(mut self, super_type: impl Into<TypeName>) -> Self {
        self.super_types.push(super_type.into());
        self
    }

    /// Add a type annotation.
    pub fn annotated(mut self, annotation: impl Into<Annotation>) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    /// Add a method.
    pub fn with_method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }

    /// Add a read-write property as a `get`/`set` method pair.
    pub fn with_property(self, name: &str, value_type: ValueType) -> Self {
        self.with_annotated_property(name, value_type, Vec::<Annotation>::new())
    }

    /// Add a read-write property whose getter carries the given annotations.
    pub fn with_annotated_property(
        mut self,
        name: &str,
        value_type: ValueType,
        annotations: impl IntoIterator<Item = impl Into<Annotation>>,
    ) -> Self {
        let suffix = name.to_case(Case::Pascal);
        let mut getter = MethodDecl::new(format!("get{suffix}")).returns(value_type.clone());
        getter.annotations = annotations.into_iter().map(Into::into).collect();
        let setter = MethodDecl::new(format!("set{suffix}"))
            .with_param(super::ParamDecl::new(value_type));
        self.methods.push(getter);
        self.methods.push(setter);
        self
    }

    /// Check if this type is a pure interface.
    pub fn is_interface(&self) -> bool {
        matches!(self.shape, TypeShape::Interface)
    }

    /// Enum variants, if this is an enum type.
    pub fn enum_variants(&self) -> Option<&[String]> {
        match &self.shape {
            TypeShape::Enum { variants } => Some(variants),
            _ => None,
        }
    }
}

impl Annotated for DeclaredType {
    fn annotations(&self) -> Vec<&Annotation> {
        self.annotations.iter().collect()
    }
}
