use crate::base::Base;
use crate::node_id::NodeId;

/// A variable node.
///
/// Scalar attributes are carried as the raw strings found in the document;
/// only ids are resolved at this layer.
#[derive(Debug, Clone)]
pub struct Variable {
    /// Common node attributes and references.
    pub base: Base,
    /// Id of the parent node, when the document declares one.
    pub parent_node_id: Option<NodeId>,
    /// Id of the variable's data type. Alias names are resolved, so this is
    /// always a real id by the time the node is emitted.
    pub data_type: NodeId,
    /// Raw `ValueRank` attribute, `-1` (scalar) if absent.
    pub value_rank: String,
    /// Raw `ArrayDimensions` attribute, empty if absent.
    pub array_dimensions: String,
}
