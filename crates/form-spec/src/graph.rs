use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::spec::field::FormField;
use crate::spec::form::FormSchema;

/// Derived fields that cannot be ordered because they sit on, or downstream
/// of, a dependency cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("derived fields form a dependency cycle: {}", .fields.join(", "))]
pub struct CycleError {
    pub fields: Vec<String>,
}

/// Dependency graph over the derived fields of a form.
///
/// Only derived parents create edges; plain fields and unknown ids are inputs.
#[derive(Debug)]
pub struct DependencyGraph<'a> {
    derived: Vec<&'a FormField>,
    /// For each entry of `derived`, the indexes of its distinct derived parents.
    parents: Vec<BTreeSet<usize>>,
}

impl<'a> DependencyGraph<'a> {
    pub fn new(form: &'a FormSchema) -> Self {
        let derived: Vec<&FormField> = form.derived_fields().collect();
        let index: BTreeMap<&str, usize> = derived
            .iter()
            .enumerate()
            .map(|(idx, field)| (field.id.as_str(), idx))
            .collect();

        let parents = derived
            .iter()
            .map(|field| {
                field
                    .derived
                    .parent_field_ids
                    .iter()
                    .filter_map(|parent| index.get(parent.as_str()).copied())
                    .collect()
            })
            .collect();

        Self { derived, parents }
    }

    /// Derived fields in an order where every derived parent precedes its
    /// children. Ties keep schema order.
    pub fn evaluation_order(&self) -> Result<Vec<&'a FormField>, CycleError> {
        let (ordered, cyclic) = self.partition();
        if cyclic.is_empty() {
            Ok(ordered)
        } else {
            Err(CycleError {
                fields: cyclic.iter().map(|field| field.id.clone()).collect(),
            })
        }
    }

    /// Like [`Self::evaluation_order`] but never fails: fields that cannot be
    /// ordered are appended in schema order.
    pub fn plan(&self) -> Vec<&'a FormField> {
        let (mut ordered, cyclic) = self.partition();
        ordered.extend(cyclic);
        ordered
    }

    pub fn has_cycle(&self) -> bool {
        !self.partition().1.is_empty()
    }

    fn partition(&self) -> (Vec<&'a FormField>, Vec<&'a FormField>) {
        let count = self.derived.len();
        let mut pending: Vec<usize> = self.parents.iter().map(BTreeSet::len).collect();
        let mut done = vec![false; count];
        let mut ordered = Vec::with_capacity(count);

        // Repeatedly take the first ready field in schema order.
        while let Some(next) = (0..count).find(|&idx| !done[idx] && pending[idx] == 0) {
            done[next] = true;
            ordered.push(self.derived[next]);
            for (child, parents) in self.parents.iter().enumerate() {
                if !done[child] && parents.contains(&next) {
                    pending[child] -= 1;
                }
            }
        }

        let cyclic = (0..count)
            .filter(|&idx| !done[idx])
            .map(|idx| self.derived[idx])
            .collect();
        (ordered, cyclic)
    }
}
