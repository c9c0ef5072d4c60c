/// URI of the base OPC UA namespace, always present at local index 0.
pub const BASE_NAMESPACE_URI: &str = "http://opcfoundation.org/UA/";

/// One namespace declared by the document. Its local index is its position
/// in the table; the global index is whatever the host assigned for the URI.
#[derive(Debug, Clone)]
pub struct Namespace {
    /// The namespace URI.
    pub uri: String,
    /// Host-assigned global index, zero until assigned.
    pub global_index: u16,
}

/// Ordered table of the namespaces a document declares.
///
/// Entry 0 is implicit and reserved for the base namespace; user namespaces
/// start at local index 1, in declaration order.
#[derive(Debug)]
pub struct NamespaceTable {
    entries: Vec<Namespace>,
}

impl NamespaceTable {
    /// Create a table holding only the implicit base entry.
    pub fn new() -> Self {
        Self {
            entries: vec![Namespace {
                uri: BASE_NAMESPACE_URI.to_owned(),
                global_index: 0,
            }],
        }
    }

    /// Append an empty entry with a provisional global index of zero and
    /// return its local index.
    pub fn reserve_local(&mut self) -> u16 {
        self.entries.push(Namespace {
            uri: String::new(),
            global_index: 0,
        });
        (self.entries.len() - 1) as u16
    }

    /// Set the URI of a reserved entry.
    pub fn set_uri(&mut self, local_index: u16, uri: &str) {
        if let Some(entry) = self.entries.get_mut(local_index as usize) {
            entry.uri = uri.to_owned();
        }
    }

    /// Store the host-assigned global index for a local index.
    pub fn assign_global(&mut self, local_index: u16, global_index: u16) {
        if let Some(entry) = self.entries.get_mut(local_index as usize) {
            entry.global_index = global_index;
        }
    }

    /// The URI at a local index, or the empty string for unknown indices.
    pub fn uri(&self, local_index: u16) -> &str {
        self.entries
            .get(local_index as usize)
            .map(|entry| entry.uri.as_str())
            .unwrap_or("")
    }

    /// Map a document-local namespace index to its global index. Returns
    /// `None` for indices the document never declared.
    pub fn translate(&self, local_index: u16) -> Option<u16> {
        self.entries
            .get(local_index as usize)
            .map(|entry| entry.global_index)
    }

    /// Iterate over the entries together with their local indices.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &Namespace)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(local, entry)| (local as u16, entry))
    }

    /// Number of entries, including the implicit base entry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The table always holds the implicit base entry.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for NamespaceTable {
    fn default() -> Self {
        Self::new()
    }
}
