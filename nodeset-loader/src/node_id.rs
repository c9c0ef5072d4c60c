use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{Diagnostic, Diagnostics};
use crate::namespaces::NamespaceTable;

/// Identifier of a node, as carried through the load session.
///
/// The textual form the document used is kept verbatim in `raw`; it serves as
/// the pre-resolution key for deferred alias lookup and in error messages.
/// Equality and hashing only consider the namespace index and the id body.
#[derive(Debug, Clone)]
pub struct NodeId {
    /// Namespace index after translation through the namespace table.
    pub namespace_index: u16,
    /// The id body, e.g. `i=2253`. Opaque to the loader.
    pub id: String,
    /// The textual form found in the document.
    pub raw: String,
}

impl PartialEq for NodeId {
    fn eq(&self, other: &Self) -> bool {
        self.namespace_index == other.namespace_index && self.id == other.id
    }
}

impl Eq for NodeId {}

impl Hash for NodeId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.namespace_index.hash(state);
        self.id.hash(state);
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace_index > 0 {
            write!(f, "ns={};{}", self.namespace_index, self.id)
        } else {
            f.write_str(&self.id)
        }
    }
}

impl NodeId {
    /// The null id.
    pub fn null() -> Self {
        Self {
            namespace_index: 0,
            id: String::new(),
            raw: "null".to_owned(),
        }
    }

    /// An id with an empty or zero body is the null id.
    pub fn is_null(&self) -> bool {
        self.id.is_empty() || self.id == "0"
    }

    /// A placeholder id that only carries raw text. Used for reference
    /// targets between capture and resolution.
    pub(crate) fn with_raw(raw: &str) -> Self {
        Self {
            namespace_index: 0,
            id: String::new(),
            raw: raw.to_owned(),
        }
    }

    /// Parse a node id of the form `ns=<index>;<body>` or bare `<body>` and
    /// translate the local namespace index through `namespaces`.
    ///
    /// Parsing is deliberately lenient: a missing or non-numeric index reads
    /// as zero, and ids that cannot be mapped to a declared namespace are
    /// kept with index zero and their raw text retained. Such ids produce a
    /// [`Diagnostic`] instead of failing the session.
    pub(crate) fn parse(
        raw: Option<&str>,
        namespaces: &NamespaceTable,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let Some(raw) = raw.filter(|r| !r.is_empty()) else {
            return Self::null();
        };
        let Some((prefix, body)) = raw.split_once(';') else {
            return Self {
                namespace_index: 0,
                id: raw.to_owned(),
                raw: raw.to_owned(),
            };
        };
        let local_index = match prefix.strip_prefix("ns=") {
            Some(digits) => leading_decimal(digits),
            None => {
                diagnostics.report(Diagnostic::MalformedNodeId {
                    raw: raw.to_owned(),
                });
                0
            }
        };
        let namespace_index = if local_index > 0 {
            match namespaces.translate(local_index) {
                Some(global) => global,
                None => {
                    diagnostics.report(Diagnostic::UnknownNamespace {
                        raw: raw.to_owned(),
                        local_index,
                    });
                    0
                }
            }
        } else {
            0
        };
        Self {
            namespace_index,
            id: body.to_owned(),
            raw: raw.to_owned(),
        }
    }
}

fn leading_decimal(s: &str) -> u16 {
    let digits = s.bytes().take_while(|b| b.is_ascii_digit()).count();
    s[..digits].parse().unwrap_or(0)
}
