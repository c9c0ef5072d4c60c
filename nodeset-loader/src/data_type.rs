use crate::base::Base;

/// A data type node.
#[derive(Debug, Clone)]
pub struct DataType {
    /// Common node attributes and references.
    pub base: Base,
}
