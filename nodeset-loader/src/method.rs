use crate::base::Base;
use crate::node_id::NodeId;

/// A method node.
#[derive(Debug, Clone)]
pub struct Method {
    /// Common node attributes and references.
    pub base: Base,
    /// Id of the parent node, when the document declares one.
    pub parent_node_id: Option<NodeId>,
}
