//! Metadata builder.
//!
//! Builds one metadata node per declared type in dependency order, so that
//! every supertype is registered before its subtypes. Relation types that an
//! entity property refers to are built on demand. The registry is published
//! only after every type succeeded.

use crate::classify::{
    classify_methods, AccessorPair, AnnotatedMethod, TypeClassifier, TypeKind,
};
use crate::config::MetadataConfig;
use crate::datastore::{DatastoreMetadataFactory, RelationSource, TypeMetadataMap};
use crate::declare::{
    Annotated, CollectionKind, DeclarationSource, DeclaredType, Definition, ResultOf, TypeName,
    ValueType,
};
use crate::error::Error;
use crate::metadata::{
    Direction, EntityCollectionMetadata, EntityReferenceMetadata, EntityTypeMetadata,
    EnumPropertyMetadata, ImplementedByMetadata, IndexedPropertyMetadata, MethodMetadata,
    PrimitivePropertyMetadata, QueryExpression, RelationBinding, RelationCollectionMetadata,
    RelationReferenceMetadata, RelationTypeMetadata, ResultOfMetadata, SimpleTypeMetadata,
    TypeMetadata, UnsupportedOperationMetadata,
};
use crate::registry::TypeMetadataRegistry;
use crate::resolve::DependencyResolver;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use tracing::{debug, instrument, trace};

/// One-shot builder of a [`TypeMetadataRegistry`].
pub struct MetadataBuilder<'a, S: ?Sized, F: ?Sized> {
    source: &'a S,
    factory: &'a F,
    config: &'a MetadataConfig,
    classifier: TypeClassifier<'a, S>,
    methods: BTreeMap<TypeName, Vec<AnnotatedMethod>>,
    registered: TypeMetadataMap,
    order: Vec<TypeName>,
    in_progress: Vec<TypeName>,
}

impl<'a, S, F> MetadataBuilder<'a, S, F>
where
    S: DeclarationSource + ?Sized,
    F: DatastoreMetadataFactory + ?Sized,
{
    /// Create a builder over a declaration source and a datastore factory.
    pub fn new(source: &'a S, factory: &'a F, config: &'a MetadataConfig) -> Self {
        Self {
            source,
            factory,
            config,
            classifier: TypeClassifier::new(source),
            methods: BTreeMap::new(),
            registered: BTreeMap::new(),
            order: Vec::new(),
            in_progress: Vec::new(),
        }
    }

    /// Build the registry for the given types and all of their supertypes.
    ///
    /// Input order and duplicates do not affect the result.
    #[instrument(skip_all)]
    pub fn build(
        mut self,
        types: impl IntoIterator<Item = TypeName>,
    ) -> Result<TypeMetadataRegistry, Error> {
        let types: BTreeSet<TypeName> = types.into_iter().collect();
        let source = self.source;
        let ordered = DependencyResolver::new(types, |name: &TypeName| {
            source
                .declared_type(name)
                .map(|declared| declared.super_types.clone())
                .unwrap_or_default()
        })
        .resolve()?;
        debug!(count = ordered.len(), types = ?ordered, "processing types");

        for name in &ordered {
            self.ensure_classified(name)?;
        }
        for name in &ordered {
            self.get_or_create(name)?;
        }

        debug!(count = self.registered.len(), "type metadata resolved");
        Ok(TypeMetadataRegistry::new(self.registered, self.order))
    }

    fn ensure_classified(&mut self, name: &TypeName) -> Result<(), Error> {
        if self.methods.contains_key(name) {
            return Ok(());
        }
        let source = self.source;
        let declared = source.require(name)?;
        if !declared.is_interface() {
            return Err(Error::NotAnInterface {
                type_name: name.clone(),
            });
        }
        let methods = classify_methods(declared)?;
        self.methods.insert(name.clone(), methods);
        Ok(())
    }

    fn get_or_create(&mut self, name: &TypeName) -> Result<(), Error> {
        if self.registered.contains_key(name) {
            return Ok(());
        }
        if let Some(start) = self.in_progress.iter().position(|n| n == name) {
            let mut cycle = self.in_progress[start..].to_vec();
            cycle.push(name.clone());
            return Err(Error::CyclicDependency { cycle });
        }
        self.ensure_classified(name)?;

        self.in_progress.push(name.clone());
        let created = self.create(name);
        self.in_progress.pop();
        let metadata = created?;

        debug!(type_name = %name, kind = metadata.kind().name(), "registering type metadata");
        self.registered.insert(name.clone(), metadata);
        self.order.push(name.clone());
        Ok(())
    }

    fn create(&mut self, name: &TypeName) -> Result<TypeMetadata, Error> {
        let source = self.source;
        let declared = source.require(name)?;
        let super_types = declared.super_types.clone();
        for super_type in &super_types {
            self.get_or_create(super_type)?;
        }

        let kind = self.classifier.classify(name)?;
        let annotated = self.methods.get(name).cloned().unwrap_or_default();
        let mut methods = Vec::with_capacity(annotated.len());
        for method in &annotated {
            let metadata = self.method_metadata(name, method)?;
            trace!(type_name = %name, method = metadata.name(), kind = metadata.kind_name(), "resolved method");
            methods.push(metadata);
        }

        match kind {
            TypeKind::Entity => self.entity_metadata(declared, super_types, methods),
            TypeKind::Relation => self.relation_metadata(declared, super_types, methods),
            TypeKind::Simple => Ok(TypeMetadata::Simple(SimpleTypeMetadata {
                declared_type: name.clone(),
                super_types,
                methods,
            })),
        }
    }

    fn entity_metadata(
        &self,
        declared: &DeclaredType,
        super_types: Vec<TypeName>,
        methods: Vec<MethodMetadata>,
    ) -> Result<TypeMetadata, Error> {
        let indexed_property = self.indexed_property(&declared.name, &methods)?;
        let datastore = self
            .factory
            .create_entity_metadata(declared, &self.registered)?;
        Ok(TypeMetadata::Entity(EntityTypeMetadata {
            declared_type: declared.name.clone(),
            super_types,
            methods,
            indexed_property,
            datastore,
        }))
    }

    fn indexed_property(
        &self,
        type_name: &TypeName,
        methods: &[MethodMetadata],
    ) -> Result<Option<IndexedPropertyMetadata>, Error> {
        let mut indexed: Option<IndexedPropertyMetadata> = None;
        for method in methods {
            if !is_indexed(method) {
                continue;
            }
            let MethodMetadata::Primitive(primitive) = method else {
                return Err(Error::NonPrimitiveIndex {
                    type_name: type_name.clone(),
                    property: method.name().to_string(),
                });
            };
            if let Some(first) = &indexed {
                return Err(Error::MultipleIndexedProperties {
                    type_name: type_name.clone(),
                    first: first.property.property.name.clone(),
                    second: primitive.property.name.clone(),
                });
            }
            indexed = Some(IndexedPropertyMetadata {
                property: primitive.clone(),
                datastore: self.factory.create_indexed_metadata(&primitive.property),
            });
        }
        Ok(indexed)
    }

    fn relation_metadata(
        &self,
        declared: &DeclaredType,
        super_types: Vec<TypeName>,
        methods: Vec<MethodMetadata>,
    ) -> Result<TypeMetadata, Error> {
        let (from_type, to_type) = self.relation_endpoints(&methods, &super_types);
        trace!(
            type_name = %declared.name,
            from = ?from_type,
            to = ?to_type,
            "resolved relation endpoints"
        );
        if self.config.require_relation_endpoints && (from_type.is_none() || to_type.is_none()) {
            return Err(Error::UnresolvedRelationEndpoints {
                type_name: declared.name.clone(),
            });
        }
        let datastore = self
            .factory
            .create_relation_metadata(RelationSource::Type(declared), &self.registered)?;
        Ok(TypeMetadata::Relation(RelationTypeMetadata {
            declared_type: declared.name.clone(),
            super_types,
            methods,
            from_type,
            to_type,
            datastore,
        }))
    }

    // Own methods first, then supertypes breadth-first. The first type found per direction wins.
    fn relation_endpoints(
        &self,
        methods: &[MethodMetadata],
        super_types: &[TypeName],
    ) -> (Option<TypeName>, Option<TypeName>) {
        let mut from_type = None;
        let mut to_type = None;
        let mut queue: VecDeque<&TypeName> = super_types.iter().collect();
        let mut visited = BTreeSet::new();
        let mut current = Some(methods);

        while let Some(methods) = current {
            for method in methods {
                if let MethodMetadata::EntityReference(reference) = method {
                    let slot = match reference.direction {
                        Direction::From => &mut from_type,
                        Direction::To => &mut to_type,
                    };
                    if slot.is_none() {
                        *slot = Some(reference.target.clone());
                    }
                }
            }
            if from_type.is_some() && to_type.is_some() {
                break;
            }

            current = None;
            while let Some(next) = queue.pop_front() {
                if !visited.insert(next) {
                    continue;
                }
                if let Some(super_metadata) = self.registered.get(next) {
                    queue.extend(super_metadata.super_types());
                    current = Some(super_metadata.methods());
                    break;
                }
            }
        }
        (from_type, to_type)
    }

    fn method_metadata(
        &mut self,
        declaring_type: &TypeName,
        method: &AnnotatedMethod,
    ) -> Result<MethodMetadata, Error> {
        if let Some(delegate) = method.implemented_by() {
            return Ok(MethodMetadata::ImplementedBy(ImplementedByMetadata {
                method: method.clone(),
                delegate: delegate.to_string(),
                datastore: self.factory.create_implemented_by_metadata(method),
            }));
        }
        if let Some(result_of) = method.result_of() {
            let metadata = self.result_of_metadata(declaring_type, method, result_of)?;
            return Ok(MethodMetadata::ResultOf(metadata));
        }
        match method {
            AnnotatedMethod::Property(property) => self.property_metadata(declaring_type, property),
            AnnotatedMethod::User(declared) => {
                Ok(MethodMetadata::Unsupported(UnsupportedOperationMetadata {
                    method: declared.clone(),
                }))
            }
        }
    }

    fn result_of_metadata(
        &self,
        declaring_type: &TypeName,
        method: &AnnotatedMethod,
        result_of: &ResultOf,
    ) -> Result<ResultOfMetadata, Error> {
        let returns = method.returns();
        let (return_type, single_result) = match returns.type_argument() {
            Some(element) if returns.is_result_shape() => (element.clone(), false),
            _ => (returns.clone(), true),
        };

        let query = match &result_of.query {
            Some(query) => QueryExpression::Type(query.clone()),
            None => match method.by_definition(Definition::Query) {
                Some(definition) => QueryExpression::Method {
                    method: method.name().to_string(),
                    definition: definition.clone(),
                },
                None => match return_type.as_named() {
                    Some(query_type)
                        if self.source.has_definition(query_type, Definition::Query) =>
                    {
                        QueryExpression::Type(query_type.clone())
                    }
                    _ => {
                        return Err(Error::UndefinedQuery {
                            type_name: declaring_type.clone(),
                            method: method.name().to_string(),
                            value_type: return_type.clone(),
                        })
                    }
                },
            },
        };

        let parameters = method
            .parameters()
            .iter()
            .enumerate()
            .map(|(index, param)| {
                param
                    .binding
                    .clone()
                    .ok_or_else(|| Error::MissingParameterBinding {
                        type_name: declaring_type.clone(),
                        method: method.name().to_string(),
                        index,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let using_this_as = result_of
            .using_this_as
            .clone()
            .unwrap_or_else(|| self.config.default_this_binding.clone());

        Ok(ResultOfMetadata {
            method: method.clone(),
            query,
            return_type,
            using_this_as,
            parameters,
            single_result,
        })
    }

    fn property_metadata(
        &mut self,
        declaring_type: &TypeName,
        property: &AccessorPair,
    ) -> Result<MethodMetadata, Error> {
        match &property.value_type {
            ValueType::Collection { kind, element } => {
                self.collection_metadata(declaring_type, property, *kind, element)
            }
            ValueType::Named(target) => self.named_metadata(declaring_type, property, target),
            _ => Ok(self.primitive(property)),
        }
    }

    fn collection_metadata(
        &mut self,
        declaring_type: &TypeName,
        property: &AccessorPair,
        collection: CollectionKind,
        element: &ValueType,
    ) -> Result<MethodMetadata, Error> {
        let unsupported = || Error::UnsupportedCollectionElement {
            type_name: declaring_type.clone(),
            property: property.name.clone(),
            element: element.clone(),
        };
        let element_type = match element {
            ValueType::Scalar(_) => return Ok(self.primitive(property)),
            ValueType::Named(name) => name,
            _ => return Err(unsupported()),
        };
        if self.enum_variants(element_type).is_some()
            || self.source.declared_type(element_type).is_none()
        {
            return Ok(self.primitive(property));
        }

        match self.classifier.classify(element_type)? {
            TypeKind::Entity => {
                let (relation, direction) = self.entity_relation(declaring_type, property)?;
                Ok(MethodMetadata::EntityCollection(EntityCollectionMetadata {
                    property: property.clone(),
                    element: element_type.clone(),
                    collection,
                    relation,
                    direction,
                    datastore: self.factory.create_collection_metadata(property),
                }))
            }
            TypeKind::Relation => {
                let direction =
                    self.declared_relation_direction(declaring_type, property, element_type)?;
                Ok(MethodMetadata::RelationCollection(RelationCollectionMetadata {
                    property: property.clone(),
                    relation: element_type.clone(),
                    collection,
                    direction,
                    datastore: self.factory.create_collection_metadata(property),
                }))
            }
            TypeKind::Simple => Err(unsupported()),
        }
    }

    fn named_metadata(
        &mut self,
        declaring_type: &TypeName,
        property: &AccessorPair,
        target: &TypeName,
    ) -> Result<MethodMetadata, Error> {
        if let Some(variants) = self.enum_variants(target) {
            return Ok(MethodMetadata::Enum(EnumPropertyMetadata {
                property: property.clone(),
                enum_type: target.clone(),
                variants,
                datastore: self.factory.create_enum_metadata(property),
            }));
        }

        match self.classifier.classify(target)? {
            TypeKind::Entity => {
                let (relation, direction) = self.entity_relation(declaring_type, property)?;
                Ok(MethodMetadata::EntityReference(EntityReferenceMetadata {
                    property: property.clone(),
                    target: target.clone(),
                    relation,
                    direction,
                    datastore: self.factory.create_reference_metadata(property),
                }))
            }
            TypeKind::Relation => {
                let direction = self.declared_relation_direction(declaring_type, property, target)?;
                Ok(MethodMetadata::RelationReference(RelationReferenceMetadata {
                    property: property.clone(),
                    relation: target.clone(),
                    direction,
                    datastore: self.factory.create_reference_metadata(property),
                }))
            }
            TypeKind::Simple if self.source.declared_type(target).is_some() => {
                Err(Error::UnsupportedReferenceType {
                    type_name: declaring_type.clone(),
                    property: property.name.clone(),
                    target: target.clone(),
                })
            }
            // Opaque value types unknown to the source are stored as primitives.
            TypeKind::Simple => Ok(self.primitive(property)),
        }
    }

    fn primitive(&self, property: &AccessorPair) -> MethodMetadata {
        MethodMetadata::Primitive(PrimitivePropertyMetadata {
            property: property.clone(),
            datastore: self.factory.create_primitive_metadata(property),
        })
    }

    // A relation marker naming a declared relation type binds the property to
    // that type; anything else is an implicit relation derived by the datastore.
    fn entity_relation(
        &mut self,
        declaring_type: &TypeName,
        property: &AccessorPair,
    ) -> Result<(RelationBinding, Direction), Error> {
        if let Some(relation) = self.declared_relation_name(property)? {
            let direction = self.declared_relation_direction(declaring_type, property, &relation)?;
            trace!(%declaring_type, property = %property.name, %relation, "bound to declared relation");
            return Ok((RelationBinding::Declared(relation), direction));
        }
        let direction = self.factory.relation_direction(declaring_type, property)?;
        let relation = self.implicit_relation(declaring_type, property)?;
        Ok((relation, direction))
    }

    fn declared_relation_name(&self, property: &AccessorPair) -> Result<Option<TypeName>, Error> {
        let Some(name) = property
            .by_definition(Definition::Relation)
            .and_then(|annotation| annotation.value.as_deref())
        else {
            return Ok(None);
        };
        let name = TypeName::from(name);
        if self.source.declared_type(&name).is_none() {
            return Ok(None);
        }
        match self.classifier.classify(&name)? {
            TypeKind::Relation => Ok(Some(name)),
            _ => Ok(None),
        }
    }

    fn implicit_relation(
        &self,
        declaring_type: &TypeName,
        property: &AccessorPair,
    ) -> Result<RelationBinding, Error> {
        let metadata = self.factory.create_relation_metadata(
            RelationSource::Property {
                declaring_type,
                property,
            },
            &self.registered,
        )?;
        Ok(RelationBinding::Implicit(metadata))
    }

    // The declaring type must be exactly one of the relation's endpoints.
    fn declared_relation_direction(
        &mut self,
        declaring_type: &TypeName,
        property: &AccessorPair,
        relation: &TypeName,
    ) -> Result<Direction, Error> {
        self.get_or_create(relation)?;
        let relation_metadata = self
            .registered
            .get(relation)
            .and_then(TypeMetadata::as_relation)
            .ok_or_else(|| Error::MetadataNotFound {
                type_name: relation.clone(),
            })?;

        if relation_metadata.from_type.as_ref() == Some(declaring_type) {
            Ok(Direction::From)
        } else if relation_metadata.to_type.as_ref() == Some(declaring_type) {
            Ok(Direction::To)
        } else {
            Err(Error::AmbiguousDirection {
                type_name: declaring_type.clone(),
                property: property.name.clone(),
                relation: relation.clone(),
            })
        }
    }

    fn enum_variants(&self, name: &TypeName) -> Option<Vec<String>> {
        self.source
            .declared_type(name)
            .and_then(DeclaredType::enum_variants)
            .map(<[String]>::to_vec)
    }
}

fn is_indexed(method: &MethodMetadata) -> bool {
    let definition = match method {
        MethodMetadata::ResultOf(m) => m.method.by_definition(Definition::Index),
        MethodMetadata::ImplementedBy(m) => m.method.by_definition(Definition::Index),
        MethodMetadata::Unsupported(m) => m.method.by_definition(Definition::Index),
        _ => method
            .property()
            .and_then(|p| p.by_definition(Definition::Index)),
    };
    definition.is_some()
}
