use crate::node_id::NodeId;
use crate::reference_type::ReferenceType;

/// The seven hierarchical reference types defined by the base information
/// model, by the alias names documents use for them.
const WELL_KNOWN_HIERARCHICAL: [&str; 7] = [
    "HasChild",
    "Organizes",
    "HasEventSource",
    "HasNotifier",
    "Aggregates",
    "HasSubtype",
    "HasComponent",
];

/// Stateful predicate deciding whether a reference type is hierarchical.
///
/// Seeded with the well-known hierarchical types; grows as the document
/// declares reference types that are subtypes of a hierarchical type. The set
/// never shrinks during a session, so a reference classified hierarchical
/// stays hierarchical.
///
/// Comparison is by id body only, which mirrors how documents mix alias names
/// and numeric ids when naming reference types.
#[derive(Debug)]
pub struct HierarchyClassifier {
    hierarchical: Vec<String>,
}

impl HierarchyClassifier {
    /// Create a classifier holding only the well-known types.
    pub fn new() -> Self {
        Self {
            hierarchical: WELL_KNOWN_HIERARCHICAL
                .iter()
                .map(|name| (*name).to_owned())
                .collect(),
        }
    }

    /// Whether references of the given type structure the containment tree.
    pub fn is_hierarchical(&self, ref_type: &NodeId) -> bool {
        self.hierarchical.iter().any(|known| known == &ref_type.id)
    }

    /// Inspect a reference type node that just finished parsing. A type that
    /// declares an inverse hierarchical reference (typically `HasSubtype`
    /// back to its parent type) is itself hierarchical from here on.
    pub fn observe_reference_type(&mut self, node: &ReferenceType) {
        let declares_parent = node
            .base
            .hierarchical_refs
            .iter()
            .any(|reference| !reference.is_forward);
        if declares_parent && !self.is_hierarchical(&node.base.node_id) {
            self.hierarchical.push(node.base.node_id.id.clone());
        }
    }
}

impl Default for HierarchyClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::base::Base;
    use crate::node_id::NodeId;
    use crate::reference_type::ReferenceType;
    use crate::references::Reference;

    use super::HierarchyClassifier;

    fn id(body: &str) -> NodeId {
        NodeId {
            namespace_index: 0,
            id: body.to_owned(),
            raw: body.to_owned(),
        }
    }

    fn reference_type(body: &str, inverse_parent: Option<&str>) -> ReferenceType {
        let mut base = Base::new(id(body), body.to_owned());
        if let Some(parent) = inverse_parent {
            base.hierarchical_refs.push(Reference {
                ref_type: id("HasSubtype"),
                is_forward: false,
                target: id(parent),
            });
        }
        ReferenceType { base }
    }

    #[test]
    fn test_well_known_types() {
        let classifier = HierarchyClassifier::new();
        assert!(classifier.is_hierarchical(&id("HasComponent")));
        assert!(classifier.is_hierarchical(&id("Organizes")));
        assert!(!classifier.is_hierarchical(&id("HasTypeDefinition")));
    }

    #[test]
    fn test_subtype_becomes_hierarchical() {
        let mut classifier = HierarchyClassifier::new();
        assert!(!classifier.is_hierarchical(&id("i=100")));
        classifier.observe_reference_type(&reference_type("i=100", Some("i=34")));
        assert!(classifier.is_hierarchical(&id("i=100")));
    }

    #[test]
    fn test_forward_only_type_stays_non_hierarchical() {
        let mut classifier = HierarchyClassifier::new();
        let mut node = reference_type("i=101", None);
        node.base.hierarchical_refs.push(Reference {
            ref_type: id("HasSubtype"),
            is_forward: true,
            target: id("i=102"),
        });
        classifier.observe_reference_type(&node);
        assert!(!classifier.is_hierarchical(&id("i=101")));
    }
}
