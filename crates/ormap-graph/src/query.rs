//! Cypher expressions of derived queries.

use crate::annotations::CYPHER;
use ormap_core::{Annotated, DeclarationSource, Error, QueryExpression, ResultOfMetadata};
use std::collections::BTreeMap;

/// A derived query ready for execution against a graph store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CypherQuery {
    /// The Cypher expression.
    pub expression: String,
    /// Parameter name the invoking instance is bound to.
    pub this_binding: String,
    /// Query parameter names in argument order.
    pub parameters: Vec<String>,
}

impl CypherQuery {
    /// Resolve the Cypher expression of a derived query method.
    pub fn resolve<S>(source: &S, metadata: &ResultOfMetadata) -> Result<Self, Error>
    where
        S: DeclarationSource + ?Sized,
    {
        let expression = match &metadata.query {
            QueryExpression::Method { method, definition } => definition
                .value
                .clone()
                .ok_or_else(|| Error::datastore(method.as_str(), "query has no expression"))?,
            QueryExpression::Type(query_type) => source
                .require(query_type)?
                .annotation(CYPHER)
                .and_then(|cypher| cypher.value.clone())
                .ok_or_else(|| {
                    Error::datastore(query_type.as_str(), "type does not define a Cypher query")
                })?,
        };
        Ok(Self {
            expression,
            this_binding: metadata.using_this_as.clone(),
            parameters: metadata.parameters.clone(),
        })
    }

    /// Bind call arguments to parameter names, with the invoking instance under its binding.
    pub fn bind<V: Clone>(&self, this: V, arguments: &[V]) -> Result<BTreeMap<String, V>, Error> {
        if arguments.len() != self.parameters.len() {
            return Err(Error::datastore(
                self.expression.as_str(),
                format!(
                    "expected {} arguments, got {}",
                    self.parameters.len(),
                    arguments.len()
                ),
            ));
        }
        let mut bindings: BTreeMap<String, V> = self
            .parameters
            .iter()
            .cloned()
            .zip(arguments.iter().cloned())
            .collect();
        bindings.insert(self.this_binding.clone(), this);
        Ok(bindings)
    }
}
