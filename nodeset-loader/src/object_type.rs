use crate::base::Base;

/// An object type node.
#[derive(Debug, Clone)]
pub struct ObjectType {
    /// Common node attributes and references.
    pub base: Base,
    /// Raw `IsAbstract` attribute, `false` if absent.
    pub is_abstract: String,
}
