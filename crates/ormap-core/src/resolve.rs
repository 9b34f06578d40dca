//! Dependency resolution.
//!
//! Orders elements so that every element comes after all of its dependencies.
//! Dependencies outside the initial set are pulled into the output as well.

use crate::declare::TypeName;
use crate::error::Error;
use std::collections::BTreeMap;

/// A dependency cycle, closed by repeating its first element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CyclicDependency<T>(pub Vec<T>);

impl From<CyclicDependency<TypeName>> for Error {
    fn from(cycle: CyclicDependency<TypeName>) -> Self {
        Error::CyclicDependency { cycle: cycle.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Topological sorter over a dependency function.
pub struct DependencyResolver<T, F> {
    elements: Vec<T>,
    dependencies: F,
}

impl<T, F> DependencyResolver<T, F>
where
    T: Ord + Clone,
    F: Fn(&T) -> Vec<T>,
{
    /// Create a resolver for the given elements.
    pub fn new(elements: impl IntoIterator<Item = T>, dependencies: F) -> Self {
        Self {
            elements: elements.into_iter().collect(),
            dependencies,
        }
    }

    /// Resolve the dependency order.
    ///
    /// The order is deterministic: elements are visited in input order and
    /// dependencies in the order the dependency function returns them.
    pub fn resolve(&self) -> Result<Vec<T>, CyclicDependency<T>> {
        let mut marks = BTreeMap::new();
        let mut path = Vec::new();
        let mut ordered = Vec::new();
        for element in &self.elements {
            self.visit(element, &mut marks, &mut path, &mut ordered)?;
        }
        Ok(ordered)
    }

    fn visit(
        &self,
        element: &T,
        marks: &mut BTreeMap<T, Mark>,
        path: &mut Vec<T>,
        ordered: &mut Vec<T>,
    ) -> Result<(), CyclicDependency<T>> {
        match marks.get(element) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Visiting) => {
                let start = path.iter().position(|e| e == element).unwrap_or(0);
                let mut cycle = path[start..].to_vec();
                cycle.push(element.clone());
                return Err(CyclicDependency(cycle));
            }
            None => {}
        }

        marks.insert(element.clone(), Mark::Visiting);
        path.push(element.clone());
        for dependency in (self.dependencies)(element) {
            self.visit(&dependency, marks, path, ordered)?;
        }
        path.pop();
        marks.insert(element.clone(), Mark::Done);
        ordered.push(element.clone());
        Ok(())
    }
}
