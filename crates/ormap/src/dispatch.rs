//! Dispatch tables.
//!
//! A dispatch table maps every declared method name of a composite type set
//! to the handler that executes it against a live instance. Tables are built
//! once from the metadata graph and never re-inspect declarations.

use crate::error::{Error, Result};
use ormap_core::{MethodMetadata, TypeMetadataRegistry, TypeName};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, trace};

/// How a declared method is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handler {
    /// Read a primitive or enum property.
    PrimitiveGet,
    /// Write a primitive or enum property.
    PrimitiveSet,
    /// Read a single entity or relation reference.
    ReferenceGet,
    /// Replace a single entity or relation reference.
    ReferenceSet,
    /// Read an entity or relation collection.
    CollectionGet,
    /// Execute a derived query.
    DerivedQueryInvoke,
    /// Call a user-supplied delegate.
    DelegateInvoke,
    /// Call the underlying implementation directly.
    Unsupported,
}

/// One resolved method of a composite type set.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchEntry {
    /// The type declaring the method.
    pub declaring_type: TypeName,
    /// The handler to run.
    pub handler: Handler,
    /// Metadata the handler runs with.
    pub metadata: MethodMetadata,
}

/// Method dispatch for a composite set of types.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchTable {
    types: BTreeSet<TypeName>,
    entries: BTreeMap<String, DispatchEntry>,
}

impl DispatchTable {
    /// Build the table for a composite type set.
    ///
    /// The given types are searched before their supertypes, so a method
    /// declared on a more specific type wins.
    pub fn build(registry: &TypeMetadataRegistry, types: &BTreeSet<TypeName>) -> Result<Self> {
        let mut search = Vec::new();
        for name in types {
            registry.get(name)?;
            search.push(name);
        }
        for name in types {
            search.extend(registry.super_type_closure(name));
        }

        let mut visited = BTreeSet::new();
        let mut entries = BTreeMap::new();
        for name in search {
            if !visited.insert(name) {
                continue;
            }
            let metadata = registry.get(name)?;
            for method in metadata.methods() {
                for method_name in method.method_names() {
                    if entries.contains_key(method_name) {
                        continue;
                    }
                    let handler = handler_for(method, method_name);
                    trace!(type_name = %name, method = method_name, ?handler, "dispatch entry");
                    entries.insert(
                        method_name.to_string(),
                        DispatchEntry {
                            declaring_type: name.clone(),
                            handler,
                            metadata: method.clone(),
                        },
                    );
                }
            }
        }

        debug!(types = ?types, methods = entries.len(), "built dispatch table");
        Ok(Self {
            types: types.clone(),
            entries,
        })
    }

    /// The composite type set.
    pub fn types(&self) -> &BTreeSet<TypeName> {
        &self.types
    }

    /// Look up a method.
    pub fn get(&self, method: &str) -> Option<&DispatchEntry> {
        self.entries.get(method)
    }

    /// Look up a method, failing if it is not declared on the type set.
    pub fn resolve(&self, method: &str) -> Result<&DispatchEntry> {
        self.get(method).ok_or_else(|| Error::UndefinedMethod {
            method: method.to_string(),
            types: self
                .types
                .iter()
                .map(TypeName::as_str)
                .collect::<Vec<_>>()
                .join("+"),
        })
    }

    /// Declared method names in lexical order.
    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of dispatchable methods.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn handler_for(method: &MethodMetadata, method_name: &str) -> Handler {
    let is_setter = method
        .property()
        .and_then(|property| property.setter_name())
        .is_some_and(|setter| setter == method_name);

    match method {
        MethodMetadata::Primitive(_) | MethodMetadata::Enum(_) if is_setter => Handler::PrimitiveSet,
        MethodMetadata::Primitive(_) | MethodMetadata::Enum(_) => Handler::PrimitiveGet,
        MethodMetadata::EntityReference(_) | MethodMetadata::RelationReference(_) if is_setter => {
            Handler::ReferenceSet
        }
        MethodMetadata::EntityReference(_) | MethodMetadata::RelationReference(_) => {
            Handler::ReferenceGet
        }
        // collections are modified through the returned collection
        MethodMetadata::EntityCollection(_) | MethodMetadata::RelationCollection(_) if is_setter => {
            Handler::Unsupported
        }
        MethodMetadata::EntityCollection(_) | MethodMetadata::RelationCollection(_) => {
            Handler::CollectionGet
        }
        MethodMetadata::ResultOf(m) => match m.method.as_property() {
            Some(property) if property.setter_name() == Some(method_name) => Handler::Unsupported,
            _ => Handler::DerivedQueryInvoke,
        },
        MethodMetadata::ImplementedBy(_) => Handler::DelegateInvoke,
        MethodMetadata::Unsupported(_) => Handler::Unsupported,
    }
}
