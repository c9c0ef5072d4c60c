use crate::node_id::NodeId;

/// Document-local short name for a node id.
#[derive(Debug, Clone)]
pub struct Alias {
    /// The alias name, e.g. `Int32`.
    pub name: String,
    /// The resolved id the name stands for.
    pub id: NodeId,
}

/// Aliases declared by the document.
///
/// Lookup is a linear scan; documents declare at most a few dozen aliases.
#[derive(Debug, Default)]
pub struct AliasTable {
    aliases: Vec<Alias>,
}

impl AliasTable {
    /// Record an alias. The id has already been resolved against the
    /// namespace table at the point the alias element closed.
    pub fn define(&mut self, name: String, id: NodeId) {
        self.aliases.push(Alias { name, id });
    }

    /// Look up an alias by name.
    pub fn resolve(&self, name: &str) -> Option<&NodeId> {
        self.aliases
            .iter()
            .find(|alias| alias.name == name)
            .map(|alias| &alias.id)
    }
}
