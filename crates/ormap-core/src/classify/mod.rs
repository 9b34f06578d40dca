//! Classifiers run per declared type before metadata is built.

mod kind;
mod method;

pub use kind::{TypeClassifier, TypeKind};
pub use method::{classify_methods, AccessorPair, AnnotatedMethod};
