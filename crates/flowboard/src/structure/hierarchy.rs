//! Parent/child index over a diagram's nodes.

use std::collections::HashMap;

use indexmap::IndexSet;

use flowboard_core::{identifier::Id, model::Node};

/// A parent→children index built from the nodes' parent links.
///
/// Built once per operation that needs it and discarded afterwards; the
/// nodes themselves remain the only record of containment.
#[derive(Debug, Default)]
pub struct Hierarchy {
    children: HashMap<Id, Vec<Id>>,
}

impl Hierarchy {
    /// Indexes the parent links of `nodes`.
    pub fn build<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Self {
        let mut children: HashMap<Id, Vec<Id>> = HashMap::new();
        for node in nodes {
            if let Some(parent) = node.parent() {
                children.entry(parent).or_default().push(node.id());
            }
        }
        Self { children }
    }

    /// Returns the direct children of `id`, in node order.
    pub fn children_of(&self, id: Id) -> &[Id] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns every node transitively contained in `id`, excluding `id` itself.
    pub fn descendants_of(&self, id: Id) -> IndexSet<Id> {
        let mut closure = self.closure([id]);
        closure.shift_remove(&id);
        closure
    }

    /// Returns `roots` together with everything they transitively contain.
    ///
    /// Roots come first in the given order, followed by descendants in
    /// breadth-first order.
    pub fn closure(&self, roots: impl IntoIterator<Item = Id>) -> IndexSet<Id> {
        let mut closure: IndexSet<Id> = roots.into_iter().collect();
        let mut cursor = 0;
        while let Some(&current) = closure.get_index(cursor) {
            for &child in self.children_of(current) {
                closure.insert(child);
            }
            cursor += 1;
        }
        closure
    }
}
