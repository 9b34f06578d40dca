//! Declaration sources: the read-only query surface the engine inspects.

use super::{Annotated, DeclaredType, Definition, TypeName};
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Read access to declared types and their annotations.
pub trait DeclarationSource {
    /// Look up a declared type by name.
    fn declared_type(&self, name: &TypeName) -> Option<&DeclaredType>;

    /// Check if a type directly carries an annotation with the given definition marker.
    fn has_definition(&self, name: &TypeName, definition: Definition) -> bool {
        self.declared_type(name)
            .is_some_and(|ty| ty.by_definition(definition).is_some())
    }

    /// Look up a declared type, failing if it is unknown.
    fn require(&self, name: &TypeName) -> Result<&DeclaredType, Error> {
        self.declared_type(name).ok_or_else(|| Error::UnknownType {
            type_name: name.clone(),
        })
    }
}

/// In-memory set of declared types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Declarations {
    types: BTreeMap<TypeName, DeclaredType>,
}

impl Declarations {
    /// Create an empty declaration set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declared type, replacing any previous declaration of the same name.
    pub fn with_type(mut self, declared: DeclaredType) -> Self {
        self.insert(declared);
        self
    }

    /// Add a declared type.
    pub fn insert(&mut self, declared: DeclaredType) {
        self.types.insert(declared.name.clone(), declared);
    }

    /// Number of declared types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Serialize the declaration set to JSON.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize a declaration set from JSON.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }
}

impl DeclarationSource for Declarations {
    fn declared_type(&self, name: &TypeName) -> Option<&DeclaredType> {
        self.types.get(name)
    }
}

impl FromIterator<DeclaredType> for Declarations {
    fn from_iter<I: IntoIterator<Item = DeclaredType>>(iter: I) -> Self {
        let mut declarations = Self::new();
        for declared in iter {
            declarations.insert(declared);
        }
        declarations
    }
}
