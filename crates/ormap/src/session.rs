//! Session factory.

use crate::config::UnitConfig;
use crate::dispatch::DispatchTable;
use crate::error::{Error, Result};
use ormap_core::{
    DatastoreMetadataFactory, DeclarationSource, Discriminator, MetadataBuilder,
    TypeMetadataRegistry, TypeName,
};
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Owns the resolved metadata graph of one unit.
///
/// The registry is built exactly once in [`SessionFactory::new`] and shared
/// read-only afterwards. Dispatch tables are built lazily per composite type
/// set and cached.
pub struct SessionFactory {
    config: UnitConfig,
    registry: Arc<TypeMetadataRegistry>,
    dispatch: RwLock<HashMap<BTreeSet<TypeName>, Arc<DispatchTable>>>,
}

impl SessionFactory {
    /// Resolve the unit's declared types and create the factory.
    ///
    /// Fails without returning a factory if any declared type is defective.
    #[instrument(skip_all, fields(unit = %config.name))]
    pub fn new<S, F>(config: UnitConfig, source: &S, datastore: &F) -> Result<Self>
    where
        S: DeclarationSource + ?Sized,
        F: DatastoreMetadataFactory + ?Sized,
    {
        if config.types.is_empty() {
            return Err(Error::Config {
                unit: config.name.clone(),
                message: "no types declared".to_string(),
            });
        }

        let registry = MetadataBuilder::new(source, datastore, &config.metadata)
            .build(config.types.iter().cloned())?;
        info!(
            types = registry.len(),
            entities = registry.entity_types().count(),
            relations = registry.relation_types().count(),
            "session factory ready"
        );

        Ok(Self {
            config,
            registry: Arc::new(registry),
            dispatch: RwLock::new(HashMap::new()),
        })
    }

    /// The unit name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// The unit configuration.
    pub fn config(&self) -> &UnitConfig {
        &self.config
    }

    /// Shared handle to the resolved metadata graph.
    pub fn registry(&self) -> Arc<TypeMetadataRegistry> {
        Arc::clone(&self.registry)
    }

    /// Dispatch table for a composite type set, built on first use.
    pub fn dispatch_table<'t>(
        &self,
        types: impl IntoIterator<Item = &'t TypeName>,
    ) -> Result<Arc<DispatchTable>> {
        let key: BTreeSet<TypeName> = types.into_iter().cloned().collect();
        if let Some(table) = self.dispatch.read().get(&key) {
            return Ok(Arc::clone(table));
        }

        let mut cache = self.dispatch.write();
        if let Some(table) = cache.get(&key) {
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(DispatchTable::build(&self.registry, &key)?);
        debug!(types = ?key, "cached dispatch table");
        cache.insert(key, Arc::clone(&table));
        Ok(table)
    }

    /// Dispatch table for an instance carrying the given discriminators.
    pub fn dispatch_table_for(
        &self,
        discriminators: &BTreeSet<Discriminator>,
    ) -> Result<Arc<DispatchTable>> {
        let types = self.registry.types_for_discriminators(discriminators);
        if types.is_empty() {
            return Err(Error::NoMatchingType {
                discriminators: discriminators.iter().map(|d| d.to_string()).collect(),
            });
        }
        self.dispatch_table(&types)
    }

    /// Number of cached dispatch tables.
    pub fn cached_tables(&self) -> usize {
        self.dispatch.read().len()
    }
}
