use nodeset_xml::attribute;
use nodeset_xml::events::BytesStart;

use crate::alias::AliasTable;
use crate::base::Base;
use crate::data_type::DataType;
use crate::error::{Diagnostics, LoadError};
use crate::hierarchy::HierarchyClassifier;
use crate::import::ImportTarget;
use crate::method::Method;
use crate::namespaces::NamespaceTable;
use crate::node::{NodeClass, NodeType};
use crate::node_id::NodeId;
use crate::object::Object;
use crate::object_type::ObjectType;
use crate::reference_type::ReferenceType;
use crate::references::Reference;
use crate::store::NodeStore;
use crate::variable::Variable;
use crate::variable_type::VariableType;

/// Where the state machine currently is in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    Init,
    NamespaceUris,
    Uri,
    Alias,
    Node,
    DisplayName,
    Description,
    References,
    Reference,
    Unknown,
}

/// Destination of the next character data run. Set by the routing action of
/// the most recent element open; cleared once a run has been deposited.
#[derive(Debug, Clone, Copy)]
enum CharSlot {
    None,
    Uri,
    AliasId,
    DisplayName,
    Description,
    ReferenceTarget { hierarchical: bool },
}

struct PendingAlias {
    name: String,
    raw_id: Option<String>,
}

/// Event-driven parser for NodeSet documents.
///
/// Consumes scanner events one at a time and builds up the session state:
/// the namespace and alias tables, the hierarchy classifier, and the store of
/// finished node records. The host namespace callback fires as namespace
/// URIs close; everything else is deferred until the document has been fully
/// scanned.
pub(crate) struct NodeSetParser<'a> {
    target: &'a mut dyn ImportTarget,
    state: ParserState,
    resume: ParserState,
    unknown_depth: u32,
    slot: CharSlot,
    pending_namespace: u16,
    pending_alias: Option<PendingAlias>,
    node: Option<NodeType>,
    namespaces: NamespaceTable,
    aliases: AliasTable,
    classifier: HierarchyClassifier,
    store: NodeStore,
    diagnostics: Diagnostics,
}

impl<'a> NodeSetParser<'a> {
    pub fn new(target: &'a mut dyn ImportTarget) -> Self {
        Self {
            target,
            state: ParserState::Init,
            resume: ParserState::Init,
            unknown_depth: 0,
            slot: CharSlot::None,
            pending_namespace: 0,
            pending_alias: None,
            node: None,
            namespaces: NamespaceTable::new(),
            aliases: AliasTable::default(),
            classifier: HierarchyClassifier::new(),
            store: NodeStore::default(),
            diagnostics: Diagnostics::default(),
        }
    }

    pub fn element_start(&mut self, element: &BytesStart<'_>) -> Result<(), LoadError> {
        if self.state == ParserState::Unknown {
            self.unknown_depth += 1;
            return Ok(());
        }
        let name = element.local_name();
        let name = name.as_ref();
        match self.state {
            ParserState::Init => match name {
                // The root element and the alias container carry no state of
                // their own.
                b"UANodeSet" | b"Aliases" => {}
                b"NamespaceUris" => self.state = ParserState::NamespaceUris,
                b"Alias" => self.begin_alias(element)?,
                b"UAObject" => self.begin_node(element, "UAObject", NodeClass::Object)?,
                b"UAVariable" => self.begin_node(element, "UAVariable", NodeClass::Variable)?,
                b"UAMethod" => self.begin_node(element, "UAMethod", NodeClass::Method)?,
                b"UAObjectType" => {
                    self.begin_node(element, "UAObjectType", NodeClass::ObjectType)?
                }
                b"UAVariableType" => {
                    self.begin_node(element, "UAVariableType", NodeClass::VariableType)?
                }
                b"UADataType" => self.begin_node(element, "UADataType", NodeClass::DataType)?,
                b"UAReferenceType" => {
                    self.begin_node(element, "UAReferenceType", NodeClass::ReferenceType)?
                }
                _ => self.enter_unknown(ParserState::Init),
            },
            ParserState::NamespaceUris => match name {
                b"Uri" => {
                    self.pending_namespace = self.namespaces.reserve_local();
                    self.slot = CharSlot::Uri;
                    self.state = ParserState::Uri;
                }
                _ => self.enter_unknown(ParserState::NamespaceUris),
            },
            ParserState::Node => match name {
                b"DisplayName" => {
                    self.slot = CharSlot::DisplayName;
                    self.state = ParserState::DisplayName;
                }
                b"Description" => {
                    self.slot = CharSlot::Description;
                    self.state = ParserState::Description;
                }
                b"References" => self.state = ParserState::References,
                _ => self.enter_unknown(ParserState::Node),
            },
            ParserState::References => match name {
                b"Reference" => self.begin_reference(element)?,
                _ => self.enter_unknown(ParserState::References),
            },
            ParserState::Uri
            | ParserState::Alias
            | ParserState::DisplayName
            | ParserState::Description
            | ParserState::Reference => self.enter_unknown(self.state),
            ParserState::Unknown => {}
        }
        Ok(())
    }

    pub fn element_end(&mut self, name: &[u8]) {
        if self.state == ParserState::Unknown {
            self.unknown_depth -= 1;
            if self.unknown_depth == 0 {
                self.state = self.resume;
            }
            return;
        }
        match self.state {
            ParserState::Init => {}
            ParserState::NamespaceUris => {
                if name == b"NamespaceUris" {
                    self.state = ParserState::Init;
                }
            }
            ParserState::Uri => {
                if name == b"Uri" {
                    self.finish_namespace();
                }
            }
            ParserState::Alias => {
                if name == b"Alias" {
                    self.finish_alias();
                }
            }
            ParserState::DisplayName => {
                if name == b"DisplayName" {
                    self.slot = CharSlot::None;
                    self.state = ParserState::Node;
                }
            }
            ParserState::Description => {
                if name == b"Description" {
                    self.slot = CharSlot::None;
                    self.state = ParserState::Node;
                }
            }
            ParserState::References => {
                if name == b"References" {
                    self.finish_references();
                }
            }
            ParserState::Reference => {
                // Targets are not resolved here: the loop at the close of the
                // references block handles text captured late.
                if name == b"Reference" {
                    self.slot = CharSlot::None;
                    self.state = ParserState::References;
                }
            }
            ParserState::Node => match name {
                b"UAObject" | b"UAVariable" | b"UAMethod" | b"UAObjectType"
                | b"UAVariableType" | b"UADataType" | b"UAReferenceType" => self.finish_node(),
                _ => {}
            },
            ParserState::Unknown => {}
        }
    }

    /// Deposit a character data run into the slot set by the last routing
    /// action. The first run wins; whitespace-only runs never consume the
    /// slot.
    pub fn characters(&mut self, text: &str) {
        if self.state == ParserState::Unknown {
            return;
        }
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        match std::mem::replace(&mut self.slot, CharSlot::None) {
            CharSlot::None => {}
            CharSlot::Uri => self.namespaces.set_uri(self.pending_namespace, text),
            CharSlot::AliasId => {
                if let Some(pending) = self.pending_alias.as_mut() {
                    pending.raw_id = Some(text.to_owned());
                }
            }
            CharSlot::DisplayName => {
                if let Some(node) = self.node.as_mut() {
                    node.base_mut().display_name = text.to_owned();
                }
            }
            CharSlot::Description => {
                if let Some(node) = self.node.as_mut() {
                    node.base_mut().description = Some(text.to_owned());
                }
            }
            CharSlot::ReferenceTarget { hierarchical } => {
                if let Some(node) = self.node.as_mut() {
                    let base = node.base_mut();
                    let list = if hierarchical {
                        &mut base.hierarchical_refs
                    } else {
                        &mut base.non_hierarchical_refs
                    };
                    if let Some(reference) = list.last_mut() {
                        reference.target = NodeId::with_raw(text);
                    }
                }
            }
        }
    }

    /// Tear-down at end of document: aliases may be declared anywhere, so ids
    /// captured as alias names are only replaced now.
    pub fn finish(mut self) -> (NodeStore, Diagnostics) {
        let aliases = &self.aliases;
        for node in self.store.iter_mut() {
            match node {
                NodeType::Variable(variable) => resolve_alias(&mut variable.data_type, aliases),
                NodeType::VariableType(variable_type) => {
                    resolve_alias(&mut variable_type.data_type, aliases)
                }
                _ => {}
            }
            let base = node.base_mut();
            for reference in base
                .hierarchical_refs
                .iter_mut()
                .chain(base.non_hierarchical_refs.iter_mut())
            {
                resolve_alias(&mut reference.ref_type, aliases);
                resolve_alias(&mut reference.target, aliases);
            }
        }
        (self.store, self.diagnostics)
    }

    fn enter_unknown(&mut self, resume: ParserState) {
        self.resume = resume;
        self.unknown_depth = 1;
        self.state = ParserState::Unknown;
    }

    fn begin_alias(&mut self, element: &BytesStart<'_>) -> Result<(), LoadError> {
        let name = require_attr(element, "Alias", "Alias")?;
        self.pending_alias = Some(PendingAlias { name, raw_id: None });
        self.slot = CharSlot::AliasId;
        self.state = ParserState::Alias;
        Ok(())
    }

    fn finish_alias(&mut self) {
        self.slot = CharSlot::None;
        if let Some(pending) = self.pending_alias.take() {
            let id = NodeId::parse(
                pending.raw_id.as_deref(),
                &self.namespaces,
                &mut self.diagnostics,
            );
            self.aliases.define(pending.name, id);
        }
        self.state = ParserState::Init;
    }

    fn finish_namespace(&mut self) {
        self.slot = CharSlot::None;
        let uri = self.namespaces.uri(self.pending_namespace).to_owned();
        let global = self.target.register_namespace(&uri);
        self.namespaces.assign_global(self.pending_namespace, global);
        self.state = ParserState::NamespaceUris;
    }

    fn begin_node(
        &mut self,
        element: &BytesStart<'_>,
        element_name: &str,
        class: NodeClass,
    ) -> Result<(), LoadError> {
        let raw_id = require_attr(element, "NodeId", element_name)?;
        let node_id = NodeId::parse(Some(&raw_id), &self.namespaces, &mut self.diagnostics);
        let browse_name = require_attr(element, "BrowseName", element_name)?;
        let base = Base::new(node_id, browse_name);
        let node = match class {
            NodeClass::Object => NodeType::Object(Box::new(Object {
                base,
                parent_node_id: self.parent_node_id(element)?,
                event_notifier: attribute(element, "EventNotifier")?,
            })),
            NodeClass::Variable => NodeType::Variable(Box::new(Variable {
                base,
                parent_node_id: self.parent_node_id(element)?,
                data_type: self.data_type(element)?,
                value_rank: attr_or(element, "ValueRank", "-1")?,
                array_dimensions: attr_or(element, "ArrayDimensions", "")?,
            })),
            NodeClass::Method => NodeType::Method(Box::new(Method {
                base,
                parent_node_id: self.parent_node_id(element)?,
            })),
            NodeClass::ObjectType => NodeType::ObjectType(Box::new(ObjectType {
                base,
                is_abstract: attr_or(element, "IsAbstract", "false")?,
            })),
            NodeClass::VariableType => NodeType::VariableType(Box::new(VariableType {
                base,
                is_abstract: attr_or(element, "IsAbstract", "false")?,
                data_type: self.data_type(element)?,
                value_rank: attr_or(element, "ValueRank", "-1")?,
                array_dimensions: attr_or(element, "ArrayDimensions", "")?,
            })),
            NodeClass::DataType => NodeType::DataType(Box::new(DataType { base })),
            NodeClass::ReferenceType => NodeType::ReferenceType(Box::new(ReferenceType { base })),
        };
        self.node = Some(node);
        self.state = ParserState::Node;
        Ok(())
    }

    fn finish_node(&mut self) {
        if let Some(node) = self.node.take() {
            if let NodeType::ReferenceType(reference_type) = &node {
                self.classifier.observe_reference_type(reference_type);
            }
            self.store.insert(node);
        }
        self.state = ParserState::Init;
    }

    fn begin_reference(&mut self, element: &BytesStart<'_>) -> Result<(), LoadError> {
        let is_forward = attr_or(element, "IsForward", "true")? == "true";
        let raw_type = require_attr(element, "ReferenceType", "Reference")?;
        let ref_type = NodeId::parse(Some(&raw_type), &self.namespaces, &mut self.diagnostics);
        // Classified with the set as it stands right now; a type declared
        // hierarchical later in the document does not reclassify this edge.
        let hierarchical = self.classifier.is_hierarchical(&ref_type);
        let reference = Reference {
            ref_type,
            is_forward,
            target: NodeId::with_raw(""),
        };
        if let Some(node) = self.node.as_mut() {
            let base = node.base_mut();
            if hierarchical {
                base.hierarchical_refs.push(reference);
            } else {
                base.non_hierarchical_refs.push(reference);
            }
        }
        self.slot = CharSlot::ReferenceTarget { hierarchical };
        self.state = ParserState::Reference;
        Ok(())
    }

    fn finish_references(&mut self) {
        if let Some(node) = self.node.as_mut() {
            let base = node.base_mut();
            for reference in base
                .hierarchical_refs
                .iter_mut()
                .chain(base.non_hierarchical_refs.iter_mut())
            {
                let resolved = if reference.target.raw.is_empty() {
                    NodeId::null()
                } else {
                    NodeId::parse(
                        Some(&reference.target.raw),
                        &self.namespaces,
                        &mut self.diagnostics,
                    )
                };
                reference.target = resolved;
            }
        }
        self.state = ParserState::Node;
    }

    fn parent_node_id(&mut self, element: &BytesStart<'_>) -> Result<Option<NodeId>, LoadError> {
        let raw = attribute(element, "ParentNodeId")?;
        Ok(raw.map(|raw| NodeId::parse(Some(&raw), &self.namespaces, &mut self.diagnostics)))
    }

    fn data_type(&mut self, element: &BytesStart<'_>) -> Result<NodeId, LoadError> {
        let raw = attr_or(element, "DataType", "i=24")?;
        Ok(NodeId::parse(
            Some(&raw),
            &self.namespaces,
            &mut self.diagnostics,
        ))
    }
}

fn resolve_alias(id: &mut NodeId, aliases: &AliasTable) {
    if let Some(alias_id) = aliases.resolve(&id.raw) {
        if !alias_id.is_null() {
            *id = alias_id.clone();
        }
    }
}

fn require_attr(
    element: &BytesStart<'_>,
    name: &str,
    element_name: &str,
) -> Result<String, LoadError> {
    attribute(element, name)?.ok_or_else(|| LoadError::MissingRequiredAttribute {
        element: element_name.to_owned(),
        attribute: name.to_owned(),
    })
}

fn attr_or(element: &BytesStart<'_>, name: &str, default: &str) -> Result<String, LoadError> {
    Ok(attribute(element, name)?.unwrap_or_else(|| default.to_owned()))
}
