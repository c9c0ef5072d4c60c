use crate::base::Base;
use crate::node_id::NodeId;

/// An object node.
#[derive(Debug, Clone)]
pub struct Object {
    /// Common node attributes and references.
    pub base: Base,
    /// Id of the parent node, when the document declares one.
    pub parent_node_id: Option<NodeId>,
    /// Raw `EventNotifier` attribute. Interpreting the bit mask is left to
    /// the consumer.
    pub event_notifier: Option<String>,
}
