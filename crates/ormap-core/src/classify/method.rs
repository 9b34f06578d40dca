//! Method classification.
//!
//! Partitions the methods declared directly on a type into accessor pairs and
//! opaque user methods. Classification is a pure function of the declaration.

use crate::declare::{Annotated, Annotation, DeclaredType, MethodDecl, ParamDecl, ValueType};
use crate::error::Error;
use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::trace;

/// A property identified by name with an optional getter and setter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessorPair {
    /// Property name (lower camel case).
    pub name: String,
    /// Value type shared by getter and setter.
    pub value_type: ValueType,
    /// Getter (no parameters, non-void return).
    pub getter: Option<MethodDecl>,
    /// Setter (one parameter, void return).
    pub setter: Option<MethodDecl>,
}

impl AccessorPair {
    /// Name of the getter method, if declared.
    pub fn getter_name(&self) -> Option<&str> {
        self.getter.as_ref().map(|m| m.name.as_str())
    }

    /// Name of the setter method, if declared.
    pub fn setter_name(&self) -> Option<&str> {
        self.setter.as_ref().map(|m| m.name.as_str())
    }
}

// Getter annotations come first; they hold the meta information that also applies to setters.
impl Annotated for AccessorPair {
    fn annotations(&self) -> Vec<&Annotation> {
        self.getter
            .iter()
            .chain(self.setter.iter())
            .flat_map(|m| m.annotations.iter())
            .collect()
    }
}

/// A classified method: either a property accessor pair or an opaque user method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotatedMethod {
    /// Getter and/or setter of one property.
    Property(AccessorPair),
    /// Any other method.
    User(MethodDecl),
}

impl AnnotatedMethod {
    /// Property name or method name.
    pub fn name(&self) -> &str {
        match self {
            AnnotatedMethod::Property(pair) => &pair.name,
            AnnotatedMethod::User(method) => &method.name,
        }
    }

    /// Names of the declared methods this entry covers.
    pub fn method_names(&self) -> Vec<&str> {
        match self {
            AnnotatedMethod::Property(pair) => {
                pair.getter_name().into_iter().chain(pair.setter_name()).collect()
            }
            AnnotatedMethod::User(method) => vec![method.name.as_str()],
        }
    }

    /// Return type as seen by a caller: the getter's value for properties.
    pub fn returns(&self) -> &ValueType {
        match self {
            AnnotatedMethod::Property(pair) => pair
                .getter
                .as_ref()
                .map(|g| &g.returns)
                .unwrap_or(&ValueType::Void),
            AnnotatedMethod::User(method) => &method.returns,
        }
    }

    /// Parameters as seen by a caller: none for property getters.
    pub fn parameters(&self) -> &[ParamDecl] {
        match self {
            AnnotatedMethod::Property(_) => &[],
            AnnotatedMethod::User(method) => &method.parameters,
        }
    }

    /// The accessor pair, if this is a property.
    pub fn as_property(&self) -> Option<&AccessorPair> {
        match self {
            AnnotatedMethod::Property(pair) => Some(pair),
            AnnotatedMethod::User(_) => None,
        }
    }
}

impl Annotated for AnnotatedMethod {
    fn annotations(&self) -> Vec<&Annotation> {
        match self {
            AnnotatedMethod::Property(pair) => pair.annotations(),
            AnnotatedMethod::User(method) => method.annotations(),
        }
    }
}

enum Accessor {
    Getter(String),
    Setter(String),
}

enum Slot {
    Property(String),
    User(MethodDecl),
}

#[derive(Default)]
struct Accessors {
    getter: Option<MethodDecl>,
    setter: Option<MethodDecl>,
}

/// Classify the methods declared directly on a type.
///
/// Entries keep declaration order; an accessor pair sits where its first
/// accessor was declared.
pub fn classify_methods(declared: &DeclaredType) -> Result<Vec<AnnotatedMethod>, Error> {
    let mut slots = Vec::new();
    let mut accessors: BTreeMap<String, Accessors> = BTreeMap::new();

    for method in &declared.methods {
        match accessor_of(method) {
            Some(Accessor::Getter(name)) => {
                let entry = accessors.entry(name.clone()).or_insert_with(|| {
                    slots.push(Slot::Property(name.clone()));
                    Accessors::default()
                });
                if entry.getter.is_some() {
                    return Err(Error::DuplicateAccessor {
                        type_name: declared.name.clone(),
                        property: name,
                        accessor: "getter",
                    });
                }
                entry.getter = Some(method.clone());
            }
            Some(Accessor::Setter(name)) => {
                let entry = accessors.entry(name.clone()).or_insert_with(|| {
                    slots.push(Slot::Property(name.clone()));
                    Accessors::default()
                });
                if entry.setter.is_some() {
                    return Err(Error::DuplicateAccessor {
                        type_name: declared.name.clone(),
                        property: name,
                        accessor: "setter",
                    });
                }
                entry.setter = Some(method.clone());
            }
            None => slots.push(Slot::User(method.clone())),
        }
    }

    let mut methods = Vec::with_capacity(slots.len());
    for slot in slots {
        match slot {
            Slot::Property(name) => {
                let Accessors { getter, setter } = accessors.remove(&name).unwrap_or_default();
                let value_type = property_type(declared, &name, getter.as_ref(), setter.as_ref())?;
                trace!(type_name = %declared.name, property = %name, %value_type, "classified property");
                methods.push(AnnotatedMethod::Property(AccessorPair {
                    name,
                    value_type,
                    getter,
                    setter,
                }));
            }
            Slot::User(method) => {
                trace!(type_name = %declared.name, method = %method.name, "classified user method");
                methods.push(AnnotatedMethod::User(method));
            }
        }
    }
    Ok(methods)
}

fn accessor_of(method: &MethodDecl) -> Option<Accessor> {
    match method.parameters.len() {
        0 if !method.returns.is_void() => strip_accessor_prefix(&method.name, "get")
            .or_else(|| strip_accessor_prefix(&method.name, "is"))
            .map(Accessor::Getter),
        1 if method.returns.is_void() => {
            strip_accessor_prefix(&method.name, "set").map(Accessor::Setter)
        }
        _ => None,
    }
}

fn strip_accessor_prefix(method_name: &str, prefix: &str) -> Option<String> {
    method_name
        .strip_prefix(prefix)
        .filter(|rest| rest.starts_with(|c: char| c.is_ascii_uppercase()))
        .map(|rest| rest.to_case(Case::Camel))
}

fn property_type(
    declared: &DeclaredType,
    name: &str,
    getter: Option<&MethodDecl>,
    setter: Option<&MethodDecl>,
) -> Result<ValueType, Error> {
    let getter_type = getter.map(|g| g.returns.clone());
    let setter_type = setter
        .and_then(|s| s.parameters.first())
        .map(|p| p.value_type.clone());

    match (getter_type, setter_type) {
        (Some(getter), Some(setter)) => {
            if getter == setter {
                return Ok(getter);
            }
            let detail = if getter.same_raw_type(&setter) {
                "generic type"
            } else {
                "type"
            };
            Err(Error::PropertyTypeConflict {
                type_name: declared.name.clone(),
                property: name.to_string(),
                detail,
                getter,
                setter,
            })
        }
        (Some(value_type), None) | (None, Some(value_type)) => Ok(value_type),
        (None, None) => Ok(ValueType::Void),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declare::{CustomAnnotation, ResultOf, ScalarType};

    fn string() -> ValueType {
        ValueType::scalar(ScalarType::String)
    }

    #[test]
    fn test_pairs_getter_and_setter() {
        let person = DeclaredType::interface("Person").with_property("name", string());
        let methods = classify_methods(&person).unwrap();

        assert_eq!(methods.len(), 1);
        let pair = methods[0].as_property().unwrap();
        assert_eq!(pair.name, "name");
        assert_eq!(pair.getter_name(), Some("getName"));
        assert_eq!(pair.setter_name(), Some("setName"));
        assert_eq!(pair.value_type, string());
    }

    #[test]
    fn test_boolean_getter_prefix() {
        let person = DeclaredType::interface("Person")
            .with_method(MethodDecl::new("isActive").returns(ValueType::scalar(ScalarType::Bool)))
            .with_method(
                MethodDecl::new("setActive")
                    .with_param(ParamDecl::new(ValueType::scalar(ScalarType::Bool))),
            );
        let methods = classify_methods(&person).unwrap();

        assert_eq!(methods.len(), 1);
        assert_eq!(methods[0].name(), "active");
        assert_eq!(methods[0].method_names(), vec!["isActive", "setActive"]);
    }

    #[test]
    fn test_read_only_and_write_only_properties() {
        let person = DeclaredType::interface("Person")
            .with_method(MethodDecl::new("getAge").returns(ValueType::scalar(ScalarType::Int32)))
            .with_method(MethodDecl::new("setNickname").with_param(ParamDecl::new(string())));
        let methods = classify_methods(&person).unwrap();

        let age = methods[0].as_property().unwrap();
        assert!(age.setter.is_none());
        let nickname = methods[1].as_property().unwrap();
        assert!(nickname.getter.is_none());
        assert_eq!(nickname.value_type, string());
        assert_eq!(methods[1].returns(), &ValueType::Void);
    }

    #[test]
    fn test_opaque_methods() {
        let person = DeclaredType::interface("Person")
            .with_method(MethodDecl::new("greet").with_param(ParamDecl::new(string())))
            .with_method(MethodDecl::new("getaway").returns(string()))
            .with_method(MethodDecl::new("setName"))
            .with_method(MethodDecl::new("getFriend").with_param(ParamDecl::new(string())).returns(string()));
        let methods = classify_methods(&person).unwrap();

        assert_eq!(methods.len(), 4);
        assert!(methods.iter().all(|m| matches!(m, AnnotatedMethod::User(_))));
    }

    #[test]
    fn test_declaration_order_is_kept() {
        let person = DeclaredType::interface("Person")
            .with_method(MethodDecl::new("setName").with_param(ParamDecl::new(string())))
            .with_method(MethodDecl::new("reset"))
            .with_method(MethodDecl::new("getName").returns(string()));
        let methods = classify_methods(&person).unwrap();

        let names: Vec<_> = methods.iter().map(AnnotatedMethod::name).collect();
        assert_eq!(names, vec!["name", "reset"]);
    }

    #[test]
    fn test_type_conflict() {
        let person = DeclaredType::interface("Person")
            .with_method(MethodDecl::new("getName").returns(string()))
            .with_method(
                MethodDecl::new("setName")
                    .with_param(ParamDecl::new(ValueType::scalar(ScalarType::Int32))),
            );
        let err = classify_methods(&person).unwrap_err();

        assert!(matches!(
            err,
            Error::PropertyTypeConflict { detail: "type", ref property, .. } if property == "name"
        ));
    }

    #[test]
    fn test_generic_type_conflict() {
        let person = DeclaredType::interface("Person")
            .with_method(MethodDecl::new("getFriends").returns(ValueType::list(ValueType::named("Person"))))
            .with_method(
                MethodDecl::new("setFriends")
                    .with_param(ParamDecl::new(ValueType::list(ValueType::named("Group")))),
            );
        let err = classify_methods(&person).unwrap_err();

        assert!(matches!(
            err,
            Error::PropertyTypeConflict {
                detail: "generic type",
                ..
            }
        ));
    }

    #[test]
    fn test_duplicate_getter() {
        let person = DeclaredType::interface("Person")
            .with_method(MethodDecl::new("getActive").returns(ValueType::scalar(ScalarType::Bool)))
            .with_method(MethodDecl::new("isActive").returns(ValueType::scalar(ScalarType::Bool)));
        let err = classify_methods(&person).unwrap_err();

        assert!(matches!(err, Error::DuplicateAccessor { accessor: "getter", .. }));
    }

    #[test]
    fn test_pair_annotations_prefer_getter() {
        let person = DeclaredType::interface("Person")
            .with_method(
                MethodDecl::new("getName")
                    .returns(string())
                    .annotated(CustomAnnotation::new("Property").with_value("n")),
            )
            .with_method(
                MethodDecl::new("setName")
                    .with_param(ParamDecl::new(string()))
                    .annotated(CustomAnnotation::new("Property").with_value("ignored")),
            );
        let methods = classify_methods(&person).unwrap();

        let annotation = methods[0].annotation("Property").unwrap();
        assert_eq!(annotation.value.as_deref(), Some("n"));
        assert!(methods[0].result_of().is_none());
    }

    #[test]
    fn test_user_method_annotations() {
        let person = DeclaredType::interface("Person").with_method(
            MethodDecl::new("friendsOfFriends")
                .returns(ValueType::query_result(ValueType::named("Person")))
                .annotated(ResultOf::new()),
        );
        let methods = classify_methods(&person).unwrap();
        assert!(methods[0].result_of().is_some());
    }
}
