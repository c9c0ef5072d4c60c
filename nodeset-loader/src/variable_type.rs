use crate::base::Base;
use crate::node_id::NodeId;

/// A variable type node.
#[derive(Debug, Clone)]
pub struct VariableType {
    /// Common node attributes and references.
    pub base: Base,
    /// Raw `IsAbstract` attribute, `false` if absent.
    pub is_abstract: String,
    /// Id of the data type instances of this type use. Alias names are
    /// resolved, so this is always a real id by the time the node is emitted.
    pub data_type: NodeId,
    /// Raw `ValueRank` attribute, `-1` (scalar) if absent.
    pub value_rank: String,
    /// Raw `ArrayDimensions` attribute, empty if absent.
    pub array_dimensions: String,
}
