//! Graph datastore metadata factory.

use crate::annotations::{INCOMING, INDEXED, LABEL, OUTGOING, PROPERTY, RELATION, UNIQUE};
use crate::metadata::{IndexMetadata, NodeMetadata, PropertyMetadata, RelationshipMetadata};
use convert_case::{Case, Casing};
use ormap_core::{
    AccessorPair, Annotated, DatastoreEntityMetadata, DatastoreMetadataFactory,
    DatastoreRelationMetadata, DeclaredType, Definition, Direction, Discriminator, Error, Payload,
    RelationSource, TypeMetadataMap, TypeName,
};
use tracing::debug;

/// Maps entity types to labeled nodes and relations to typed relationships.
///
/// - The `Label` value (or the type name when empty) is the entity discriminator.
/// - The `Relation` value (or the upper snake case type or property name) is the
///   relation discriminator.
/// - `Outgoing` navigates from the declaring node, `Incoming` towards it;
///   properties without a marker are outgoing.
#[derive(Debug, Clone, Default)]
pub struct GraphMetadataFactory;

impl GraphMetadataFactory {
    /// Create a graph metadata factory.
    pub fn new() -> Self {
        Self
    }

    fn storage_name(property: &AccessorPair) -> String {
        property
            .annotation(PROPERTY)
            .and_then(|annotation| annotation.value.clone())
            .unwrap_or_else(|| property.name.clone())
    }
}

impl DatastoreMetadataFactory for GraphMetadataFactory {
    fn create_entity_metadata(
        &self,
        declared: &DeclaredType,
        _registered: &TypeMetadataMap,
    ) -> Result<DatastoreEntityMetadata, Error> {
        let label = declared.annotation(LABEL).map(|annotation| {
            annotation
                .value
                .clone()
                .unwrap_or_else(|| declared.name.to_string())
        });
        if let Some(label) = &label {
            if label.is_empty() || label.contains(':') {
                return Err(Error::datastore(
                    declared.name.as_str(),
                    format!("invalid node label '{label}'"),
                ));
            }
        }
        debug!(type_name = %declared.name, label = ?label, "created node metadata");

        let node = NodeMetadata { label };
        Ok(DatastoreEntityMetadata::new(
            node.label.as_deref().map(Discriminator::from),
            node.to_payload(),
        ))
    }

    fn create_relation_metadata(
        &self,
        source: RelationSource<'_>,
        _registered: &TypeMetadataMap,
    ) -> Result<DatastoreRelationMetadata, Error> {
        // Qualified relation annotations carry the relation definition themselves.
        let (annotation, fallback) = match source {
            RelationSource::Type(declared) => (
                declared
                    .by_definition(Definition::Relation)
                    .or_else(|| declared.annotation(RELATION)),
                declared.name.as_str(),
            ),
            RelationSource::Property { property, .. } => (
                property
                    .by_definition(Definition::Relation)
                    .or_else(|| property.annotation(RELATION)),
                property.name.as_str(),
            ),
        };
        let relationship_type = annotation
            .and_then(|annotation| annotation.value.clone())
            .unwrap_or_else(|| fallback.to_case(Case::UpperSnake));
        debug!(%relationship_type, "created relationship metadata");

        let relationship = RelationshipMetadata { relationship_type };
        Ok(DatastoreRelationMetadata::new(
            Discriminator::new(relationship.relationship_type.as_str()),
            relationship.to_payload(),
        ))
    }

    fn relation_direction(
        &self,
        declaring_type: &TypeName,
        property: &AccessorPair,
    ) -> Result<Direction, Error> {
        match (
            property.annotation(OUTGOING).is_some(),
            property.annotation(INCOMING).is_some(),
        ) {
            (true, true) => Err(Error::datastore(
                format!("{declaring_type}.{}", property.name),
                "property is marked both outgoing and incoming",
            )),
            (false, true) => Ok(Direction::To),
            _ => Ok(Direction::From),
        }
    }

    fn create_primitive_metadata(&self, property: &AccessorPair) -> Payload {
        PropertyMetadata {
            name: Self::storage_name(property),
        }
        .to_payload()
    }

    fn create_enum_metadata(&self, property: &AccessorPair) -> Payload {
        self.create_primitive_metadata(property)
    }

    fn create_indexed_metadata(&self, property: &AccessorPair) -> Payload {
        let unique = property
            .annotation(INDEXED)
            .and_then(|annotation| annotation.attributes.get(UNIQUE))
            .is_some_and(|value| value == "true");
        IndexMetadata {
            property: Self::storage_name(property),
            unique,
        }
        .to_payload()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::{
        default_label, default_relation, incoming, label, outgoing, property, relationship,
        unique_index,
    };
    use ormap_core::{CustomAnnotation, ScalarType, ValueType};

    fn pair(declared: &DeclaredType, name: &str) -> AccessorPair {
        ormap_core::classify_methods(declared)
            .unwrap()
            .into_iter()
            .find_map(|m| m.as_property().filter(|p| p.name == name).cloned())
            .unwrap()
    }

    #[test]
    fn test_labels() {
        let factory = GraphMetadataFactory::new();
        let registered = TypeMetadataMap::new();

        let person = DeclaredType::interface("Person").annotated(label("Human"));
        let metadata = factory.create_entity_metadata(&person, &registered).unwrap();
        assert_eq!(metadata.discriminator, Some(Discriminator::from("Human")));

        let employee = DeclaredType::interface("Employee").annotated(default_label());
        let metadata = factory.create_entity_metadata(&employee, &registered).unwrap();
        assert_eq!(metadata.discriminator, Some(Discriminator::from("Employee")));

        let inherited = DeclaredType::interface("Versioned").extends("Person");
        let metadata = factory.create_entity_metadata(&inherited, &registered).unwrap();
        assert_eq!(metadata.discriminator, None);

        let invalid = DeclaredType::interface("Bad").annotated(label("A:B"));
        assert!(matches!(
            factory.create_entity_metadata(&invalid, &registered),
            Err(Error::Datastore { .. })
        ));
    }

    #[test]
    fn test_relationship_types() {
        let factory = GraphMetadataFactory::new();
        let registered = TypeMetadataMap::new();

        let works_at = DeclaredType::interface("WorksAt").annotated(default_relation());
        let metadata = factory
            .create_relation_metadata(RelationSource::Type(&works_at), &registered)
            .unwrap();
        assert_eq!(metadata.discriminator.as_str(), "WORKS_AT");

        let person = DeclaredType::interface("Person")
            .with_property("bestFriend", ValueType::named("Person"))
            .with_annotated_property(
                "colleagues",
                ValueType::list(ValueType::named("Person")),
                [relationship("WORKS_WITH")],
            );
        let name = TypeName::from("Person");
        let best_friend = pair(&person, "bestFriend");
        let metadata = factory
            .create_relation_metadata(
                RelationSource::Property {
                    declaring_type: &name,
                    property: &best_friend,
                },
                &registered,
            )
            .unwrap();
        assert_eq!(metadata.discriminator.as_str(), "BEST_FRIEND");

        let colleagues = pair(&person, "colleagues");
        let metadata = factory
            .create_relation_metadata(
                RelationSource::Property {
                    declaring_type: &name,
                    property: &colleagues,
                },
                &registered,
            )
            .unwrap();
        assert_eq!(metadata.discriminator.as_str(), "WORKS_WITH");
        assert_eq!(
            RelationshipMetadata::from_payload(&metadata.payload)
                .unwrap()
                .relationship_type,
            "WORKS_WITH"
        );
    }

    #[test]
    fn test_qualified_relationship_types() {
        let factory = GraphMetadataFactory::new();
        let registered = TypeMetadataMap::new();
        let one_to_one = CustomAnnotation::new("QualifiedOneToOne")
            .with_definition(Definition::Relation)
            .with_value("OneToOne");

        let person = DeclaredType::interface("Person").with_annotated_property(
            "partner",
            ValueType::named("Person"),
            [one_to_one.clone()],
        );
        let name = TypeName::from("Person");
        let partner = pair(&person, "partner");
        let metadata = factory
            .create_relation_metadata(
                RelationSource::Property {
                    declaring_type: &name,
                    property: &partner,
                },
                &registered,
            )
            .unwrap();
        assert_eq!(metadata.discriminator.as_str(), "OneToOne");

        let pairing = DeclaredType::interface("Pairing").annotated(one_to_one);
        let metadata = factory
            .create_relation_metadata(RelationSource::Type(&pairing), &registered)
            .unwrap();
        assert_eq!(metadata.discriminator.as_str(), "OneToOne");
    }

    #[test]
    fn test_directions() {
        let factory = GraphMetadataFactory::new();
        let person = DeclaredType::interface("Person")
            .with_property("friends", ValueType::list(ValueType::named("Person")))
            .with_annotated_property("follows", ValueType::named("Person"), [outgoing()])
            .with_annotated_property("followers", ValueType::list(ValueType::named("Person")), [incoming()])
            .with_annotated_property("confused", ValueType::named("Person"), [outgoing(), incoming()]);
        let name = TypeName::from("Person");

        let direction = |property: &str| factory.relation_direction(&name, &pair(&person, property));
        assert_eq!(direction("friends").unwrap(), Direction::From);
        assert_eq!(direction("follows").unwrap(), Direction::From);
        assert_eq!(direction("followers").unwrap(), Direction::To);
        assert!(matches!(
            direction("confused"),
            Err(Error::Datastore { ref subject, .. }) if subject == "Person.confused"
        ));
    }

    #[test]
    fn test_property_payloads() {
        let factory = GraphMetadataFactory::new();
        let string = ValueType::scalar(ScalarType::String);
        let person = DeclaredType::interface("Person")
            .with_annotated_property("email", string.clone(), [unique_index(), property("mail")])
            .with_property("name", string);

        let email = pair(&person, "email");
        assert_eq!(
            PropertyMetadata::from_payload(&factory.create_primitive_metadata(&email))
                .unwrap()
                .name,
            "mail"
        );
        assert_eq!(
            IndexMetadata::from_payload(&factory.create_indexed_metadata(&email)).unwrap(),
            IndexMetadata {
                property: "mail".to_string(),
                unique: true,
            }
        );

        let name = pair(&person, "name");
        assert_eq!(
            PropertyMetadata::from_payload(&factory.create_enum_metadata(&name))
                .unwrap()
                .name,
            "name"
        );
    }

    proptest::proptest! {
        #[test]
        fn prop_derived_relationship_types_are_upper_snake(name in "[A-Z][a-z]{1,6}([A-Z][a-z]{1,6}){0,3}") {
            let factory = GraphMetadataFactory::new();
            let declared = DeclaredType::interface(name.as_str()).annotated(default_relation());
            let metadata = factory
                .create_relation_metadata(RelationSource::Type(&declared), &TypeMetadataMap::new())
                .unwrap();
            let relationship_type = metadata.discriminator.as_str();
            proptest::prop_assert!(relationship_type
                .chars()
                .all(|c| c.is_ascii_uppercase() || c == '_'));
            proptest::prop_assert_eq!(relationship_type.replace('_', ""), name.to_uppercase());
        }
    }
}
