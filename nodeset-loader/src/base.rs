use crate::node_id::NodeId;
use crate::references::Reference;

/// Attributes shared by every node class, together with the node's outgoing
/// references.
///
/// References are kept in two lists split by how their type was classified
/// when the reference was finalized: hierarchical references structure the
/// containment tree and drive emission order, everything else is carried
/// along untouched.
#[derive(Debug, Clone)]
pub struct Base {
    /// Id of this node.
    pub node_id: NodeId,
    /// Browse name, unique among siblings.
    pub browse_name: String,
    /// Human readable display name, empty if the document declares none.
    pub display_name: String,
    /// Optional description text.
    pub description: Option<String>,
    /// Outgoing references whose type is hierarchical.
    pub hierarchical_refs: Vec<Reference>,
    /// Outgoing references of all other types.
    pub non_hierarchical_refs: Vec<Reference>,
}

impl Base {
    /// Create a base record with empty optional attributes and no references.
    pub fn new(node_id: NodeId, browse_name: String) -> Self {
        Self {
            node_id,
            browse_name,
            display_name: String::new(),
            description: None,
            hierarchical_refs: Vec::new(),
            non_hierarchical_refs: Vec::new(),
        }
    }

    /// Iterate over all outgoing references, hierarchical first.
    pub fn references(&self) -> impl Iterator<Item = &Reference> {
        self.hierarchical_refs
            .iter()
            .chain(self.non_hierarchical_refs.iter())
    }
}
