//! ORMAP - Object-to-datastore mapping over declared interface types.
//!
//! This crate ties the metadata resolution engine to a datastore and exposes
//! the session factory that owns the resolved metadata graph.
//!
//! # Quick Start
//!
//! ```ignore
//! use ormap::{SessionFactory, UnitConfig};
//! use ormap::core::{Declarations, DeclaredType, ScalarType, ValueType};
//! use ormap::graph::{annotations::label, GraphMetadataFactory};
//!
//! let source = Declarations::new().with_type(
//!     DeclaredType::interface("Person")
//!         .annotated(label("Person"))
//!         .with_property("name", ValueType::scalar(ScalarType::String)),
//! );
//! let factory = SessionFactory::new(
//!     UnitConfig::new("people").with_type("Person"),
//!     &source,
//!     &GraphMetadataFactory::new(),
//! )?;
//! let table = factory.dispatch_table([&"Person".into()])?;
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod session;

pub use config::{UnitConfig, DEFAULT_UNIT_NAME};
pub use dispatch::{DispatchEntry, DispatchTable, Handler};
pub use error::{Error, Result};
pub use session::SessionFactory;

/// Re-export the metadata resolution engine.
pub use ormap_core as core;

/// Re-export the graph datastore metadata.
#[cfg(feature = "graph")]
pub use ormap_graph as graph;
