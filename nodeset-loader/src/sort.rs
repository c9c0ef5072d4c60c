use std::cmp::Reverse;
use std::collections::BinaryHeap;

use hashbrown::HashMap;

use crate::error::{Diagnostic, Diagnostics};
use crate::node::NodeClass;
use crate::store::NodeStore;

/// Order nodes so that the target of every inverse hierarchical reference
/// (the node's parent) comes before the node itself.
///
/// Kahn's algorithm over one vertex per node, one edge per inverse
/// hierarchical reference whose target exists in the store. Ties are broken
/// by class order, then document order within a class: nodes are flattened in
/// emission order and a min-heap over flat indices picks among ready
/// vertices.
///
/// Returns, for every class, the bucket positions in emission order. Nodes
/// caught in a reference cycle cannot be ordered; they are appended in
/// document order and reported as a diagnostic.
pub(crate) fn hierarchical_order(
    store: &NodeStore,
    diagnostics: &mut Diagnostics,
) -> [Vec<usize>; NodeClass::COUNT] {
    let mut flat = Vec::with_capacity(store.len());
    for class in NodeClass::EMISSION_ORDER {
        for (position, node) in store.nodes(class).iter().enumerate() {
            flat.push((node, class, position));
        }
    }

    let mut by_id: HashMap<(u16, &str), usize> = HashMap::with_capacity(flat.len());
    for (vertex, &(node, _, _)) in flat.iter().enumerate() {
        let id = &node.base().node_id;
        if id.is_null() {
            continue;
        }
        by_id
            .entry((id.namespace_index, id.id.as_str()))
            .or_insert(vertex);
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); flat.len()];
    let mut missing_parents = vec![0usize; flat.len()];
    for (vertex, &(node, _, _)) in flat.iter().enumerate() {
        for reference in &node.base().hierarchical_refs {
            if reference.is_forward {
                continue;
            }
            let key = (reference.target.namespace_index, reference.target.id.as_str());
            let Some(&parent) = by_id.get(&key) else {
                // A parent outside the document imposes no ordering.
                continue;
            };
            if parent == vertex {
                continue;
            }
            children[parent].push(vertex);
            missing_parents[vertex] += 1;
        }
    }

    let mut ready: BinaryHeap<Reverse<usize>> = missing_parents
        .iter()
        .enumerate()
        .filter(|(_, &count)| count == 0)
        .map(|(vertex, _)| Reverse(vertex))
        .collect();
    let mut order = Vec::with_capacity(flat.len());
    while let Some(Reverse(vertex)) = ready.pop() {
        order.push(vertex);
        for &child in &children[vertex] {
            missing_parents[child] -= 1;
            if missing_parents[child] == 0 {
                ready.push(Reverse(child));
            }
        }
    }

    if order.len() < flat.len() {
        let mut stuck: Vec<usize> = missing_parents
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(vertex, _)| vertex)
            .collect();
        diagnostics.report(Diagnostic::HierarchyCycle {
            nodes: stuck
                .iter()
                .map(|&vertex| flat[vertex].0.base().node_id.raw.clone())
                .collect(),
        });
        order.append(&mut stuck);
    }

    let mut by_class: [Vec<usize>; NodeClass::COUNT] = Default::default();
    for vertex in order {
        let (_, class, position) = flat[vertex];
        by_class[class.index()].push(position);
    }
    by_class
}
