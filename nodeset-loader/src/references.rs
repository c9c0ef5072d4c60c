use crate::node_id::NodeId;

/// A typed, directed edge from the node that owns it to a target node.
///
/// Targets appear as character data inside the reference element, so the
/// target id starts out as captured raw text and is resolved against the
/// namespace table when the enclosing references block closes.
#[derive(Debug, Clone)]
pub struct Reference {
    /// Id of the reference type.
    pub ref_type: NodeId,
    /// `true` for a forward reference, `false` for an inverse one.
    pub is_forward: bool,
    /// Id of the target node.
    pub target: NodeId,
}
