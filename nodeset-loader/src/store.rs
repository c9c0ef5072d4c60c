use crate::node::{NodeClass, NodeType};

/// Per-class buckets of finished node records.
///
/// Within a bucket, nodes stay in document order until the sorter decides the
/// final emission order.
#[derive(Debug, Default)]
pub(crate) struct NodeStore {
    buckets: [Vec<NodeType>; NodeClass::COUNT],
}

impl NodeStore {
    pub fn insert(&mut self, node: NodeType) {
        self.buckets[node.node_class().index()].push(node);
    }

    pub fn nodes(&self, class: NodeClass) -> &[NodeType] {
        &self.buckets[class.index()]
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut NodeType> {
        self.buckets.iter_mut().flat_map(|bucket| bucket.iter_mut())
    }
}
