//! Declared-type model.
//!
//! An explicit schema description of interface types, their annotations and
//! method signatures. The engine reads it only through [`DeclarationSource`].

mod annotation;
mod declared;
mod method;
mod source;
mod types;

pub use annotation::{Annotated, Annotation, CustomAnnotation, Definition, ResultOf};
pub use declared::{DeclaredType, TypeShape};
pub use method::{MethodDecl, ParamDecl};
pub use source::{DeclarationSource, Declarations};
pub use types::{CollectionKind, ScalarType, TypeName, ValueType};
