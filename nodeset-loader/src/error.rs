use log::warn;
use nodeset_xml::XmlReadError;
use thiserror::Error;

#[derive(Debug, Error)]
/// Fatal error raised while loading a node set. Any of these aborts the
/// session; everything it owned is released.
pub enum LoadError {
    #[error("failed to read node set document: {0}")]
    /// The document could not be opened or read.
    Io(#[from] std::io::Error),
    #[error("failed to parse node set XML: {0}")]
    /// The XML scanner rejected the document.
    Xml(#[from] XmlReadError),
    #[error("missing required attribute {attribute} on <{element}>")]
    /// A recognized element lacks an attribute that has no default.
    MissingRequiredAttribute {
        /// Element the attribute was expected on.
        element: String,
        /// Name of the missing attribute.
        attribute: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Soft finding recorded while loading. Diagnostics never abort the session,
/// they are collected and returned alongside the emitted nodes.
pub enum Diagnostic {
    #[error("malformed node id {raw:?}: expected an ns=<index>; prefix")]
    /// A node id contained a semicolon but no `ns=` prefix.
    MalformedNodeId {
        /// The textual form found in the document.
        raw: String,
    },
    #[error("node id {raw:?} names namespace {local_index} which is not declared")]
    /// A node id referenced a namespace index the document never declared.
    UnknownNamespace {
        /// The textual form found in the document.
        raw: String,
        /// The local namespace index that could not be translated.
        local_index: u16,
    },
    #[error("hierarchical references form a cycle through {nodes:?}")]
    /// Nodes whose hierarchical references form a cycle. They are emitted in
    /// document order instead of dependency order.
    HierarchyCycle {
        /// Ids of the nodes involved, in document order.
        nodes: Vec<String>,
    },
}

/// Accumulator for soft findings. Each finding is logged when recorded.
#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn report(&mut self, diagnostic: Diagnostic) {
        warn!("{diagnostic}");
        self.items.push(diagnostic);
    }

    pub fn into_inner(self) -> Vec<Diagnostic> {
        self.items
    }
}
