use std::collections::BTreeMap;

use time::Date;
use tracing::debug;

use crate::expr::today;
use crate::graph::DependencyGraph;
use crate::spec::field::FormField;
use crate::spec::form::FormSchema;
use crate::value::{FieldValue, ValueMap};

/// Recomputes every derived field of `form` against `values`, using today's date.
pub fn recompute(form: &FormSchema, values: &ValueMap) -> ValueMap {
    recompute_on(form, values, today())
}

/// Recomputes every derived field in one bounded sweep.
///
/// Derived fields run in dependency order and read their parents from the
/// output map, so an acyclic form reaches its fixed point in a single call.
/// Fields caught in a cycle run last against whatever their parents hold.
pub fn recompute_on(form: &FormSchema, values: &ValueMap, today: Date) -> ValueMap {
    let graph = DependencyGraph::new(form);
    if graph.has_cycle() {
        debug!(form_id = %form.id, "derived fields contain a cycle; values may lag");
    }

    let mut next = values.clone();
    for field in graph.plan() {
        match derive_value(field, &next, today) {
            Some(value) => {
                next.insert(field.id.clone(), value);
            }
            None => {
                next.remove(&field.id);
            }
        }
    }
    next
}

/// Derived outputs that differ from `values`. `None` means the value is cleared.
pub fn derived_changes(
    form: &FormSchema,
    values: &ValueMap,
    today: Date,
) -> BTreeMap<String, Option<FieldValue>> {
    let next = recompute_on(form, values, today);
    form.derived_fields()
        .filter_map(|field| {
            let updated = next.get(&field.id);
            (values.get(&field.id) != updated).then(|| (field.id.clone(), updated.cloned()))
        })
        .collect()
}

fn derive_value(field: &FormField, values: &ValueMap, today: Date) -> Option<FieldValue> {
    let expression = field.derived.expression_name.as_ref()?;
    let parents: Vec<Option<FieldValue>> = field
        .derived
        .parent_field_ids
        .iter()
        .map(|parent| values.get(parent).cloned())
        .collect();
    Some(expression.evaluate_on(&parents, today))
}
