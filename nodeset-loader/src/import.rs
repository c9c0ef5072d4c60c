use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

use log::debug;
use nodeset_xml::events::Event;
use nodeset_xml::{XmlReadError, XmlStreamReader};

use crate::error::{Diagnostic, LoadError};
use crate::node::{NodeClass, NodeType};
use crate::parser::NodeSetParser;
use crate::sort;

/// Consumer side of a load session.
///
/// Both callbacks are invoked synchronously from inside the session and must
/// not call back into it. Node records are borrowed from session storage;
/// implementations have to clone whatever they want to keep.
pub trait ImportTarget {
    /// Map a namespace URI declared by the document to a global namespace
    /// index. Invoked once per declared URI, in declaration order, while the
    /// document is being parsed.
    fn register_namespace(&mut self, uri: &str) -> u16;

    /// Receive one node. Invoked once per recognized node element, in
    /// emission order: class buckets in the fixed class order, and within a
    /// bucket every node after its hierarchical parents.
    fn on_node(&mut self, node: &NodeType);
}

/// Outcome of a completed load session.
#[derive(Debug)]
pub struct LoadSummary {
    /// Number of nodes handed to [`ImportTarget::on_node`].
    pub nodes_emitted: usize,
    /// Soft findings collected while loading. Empty for a clean document.
    pub diagnostics: Vec<Diagnostic>,
}

/// Load a NodeSet document from a file.
pub fn load_file(
    path: impl AsRef<Path>,
    target: &mut dyn ImportTarget,
) -> Result<LoadSummary, LoadError> {
    load_from(File::open(path)?, target)
}

/// Load a NodeSet document from a string.
pub fn load_str(document: &str, target: &mut dyn ImportTarget) -> Result<LoadSummary, LoadError> {
    load_from(document.as_bytes(), target)
}

/// Load a NodeSet document from a reader.
///
/// Runs the full pipeline: scan and parse the document, resolve deferred
/// aliases, order nodes by their hierarchical references, and emit every node
/// to `target`.
pub fn load_from(
    input: impl Read,
    target: &mut dyn ImportTarget,
) -> Result<LoadSummary, LoadError> {
    let started = Instant::now();
    let mut reader = XmlStreamReader::new(input);
    let mut parser = NodeSetParser::new(&mut *target);
    loop {
        match reader.next_event()? {
            Event::Start(e) => parser.element_start(&e)?,
            Event::Empty(e) => {
                parser.element_start(&e)?;
                parser.element_end(e.local_name().as_ref());
            }
            Event::End(e) => parser.element_end(e.local_name().as_ref()),
            Event::Text(t) => {
                let text = t.unescape().map_err(XmlReadError::from)?;
                parser.characters(&text);
            }
            Event::CData(t) => {
                let text = String::from_utf8_lossy(&t);
                parser.characters(&text);
            }
            Event::Eof => break,
            _ => {}
        }
    }
    let (store, mut diagnostics) = parser.finish();
    let parsed = Instant::now();

    let order = sort::hierarchical_order(&store, &mut diagnostics);
    let sorted = Instant::now();

    let mut nodes_emitted = 0;
    for class in NodeClass::EMISSION_ORDER {
        let bucket = store.nodes(class);
        for &position in &order[class.index()] {
            target.on_node(&bucket[position]);
            nodes_emitted += 1;
        }
    }
    debug!("parse: {:?}", parsed - started);
    debug!("sort: {:?}", sorted - parsed);
    debug!("emit: {:?}", sorted.elapsed());
    debug!("total: {:?}, {} nodes", started.elapsed(), nodes_emitted);

    Ok(LoadSummary {
        nodes_emitted,
        diagnostics: diagnostics.into_inner(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use crate::error::{Diagnostic, LoadError};
    use crate::node::{NodeClass, NodeType};

    use super::{load_str, ImportTarget};

    /// Target that records every callback and hands out preconfigured global
    /// namespace indices.
    #[derive(Default)]
    struct Recorder {
        globals: VecDeque<u16>,
        uris: Vec<String>,
        nodes: Vec<NodeType>,
    }

    impl Recorder {
        fn with_globals(globals: &[u16]) -> Self {
            Self {
                globals: globals.iter().copied().collect(),
                ..Default::default()
            }
        }

        fn emitted_ids(&self) -> Vec<String> {
            self.nodes
                .iter()
                .map(|node| node.base().node_id.to_string())
                .collect()
        }
    }

    impl ImportTarget for Recorder {
        fn register_namespace(&mut self, uri: &str) -> u16 {
            self.uris.push(uri.to_owned());
            self.globals
                .pop_front()
                .unwrap_or(self.uris.len() as u16)
        }

        fn on_node(&mut self, node: &NodeType) {
            self.nodes.push(node.clone());
        }
    }

    #[test]
    fn test_minimal_document() {
        let xml = r#"<UANodeSet xmlns="http://opcfoundation.org/UA/2011/03/UANodeSet.xsd">
  <NamespaceUris>
    <Uri>urn:x</Uri>
  </NamespaceUris>
  <UAObject NodeId="ns=1;i=10" BrowseName="A"/>
</UANodeSet>"#;
        let mut target = Recorder::with_globals(&[3]);
        let summary = load_str(xml, &mut target).unwrap();
        assert_eq!(summary.nodes_emitted, 1);
        assert!(summary.diagnostics.is_empty());
        assert_eq!(target.uris, vec!["urn:x"]);
        let node = &target.nodes[0];
        assert_eq!(node.node_class(), NodeClass::Object);
        assert_eq!(node.base().node_id.namespace_index, 3);
        assert_eq!(node.base().node_id.id, "i=10");
        assert_eq!(node.base().node_id.raw, "ns=1;i=10");
        assert_eq!(node.base().browse_name, "A");
    }

    #[test]
    fn test_display_name_and_description() {
        let xml = r#"<UANodeSet>
  <UAObject NodeId="i=1" BrowseName="Root">
    <DisplayName>My Root</DisplayName>
    <Description>The root of everything</Description>
  </UAObject>
</UANodeSet>"#;
        let mut target = Recorder::default();
        load_str(xml, &mut target).unwrap();
        let node = &target.nodes[0];
        assert_eq!(node.base().display_name, "My Root");
        assert_eq!(
            node.base().description.as_deref(),
            Some("The root of everything")
        );
    }

    #[test]
    fn test_alias_resolves_variable_data_type() {
        let xml = r#"<UANodeSet>
  <Aliases>
    <Alias Alias="Int32">i=6</Alias>
  </Aliases>
  <UAVariable NodeId="i=99" BrowseName="V" DataType="Int32"/>
</UANodeSet>"#;
        let mut target = Recorder::default();
        load_str(xml, &mut target).unwrap();
        let NodeType::Variable(variable) = &target.nodes[0] else {
            panic!("expected a variable");
        };
        assert_eq!(variable.data_type.namespace_index, 0);
        assert_eq!(variable.data_type.id, "i=6");
        assert_eq!(variable.value_rank, "-1");
        assert_eq!(variable.array_dimensions, "");
    }

    #[test]
    fn test_alias_declared_after_use() {
        let xml = r#"<UANodeSet>
  <UAVariable NodeId="i=99" BrowseName="V" DataType="Int32"/>
  <Aliases>
    <Alias Alias="Int32">i=6</Alias>
  </Aliases>
</UANodeSet>"#;
        let mut target = Recorder::default();
        load_str(xml, &mut target).unwrap();
        let NodeType::Variable(variable) = &target.nodes[0] else {
            panic!("expected a variable");
        };
        assert_eq!(variable.data_type.id, "i=6");
    }

    #[test]
    fn test_alias_declared_after_reference_target() {
        let xml = r#"<UANodeSet>
  <NamespaceUris>
    <Uri>urn:x</Uri>
  </NamespaceUris>
  <UAObject NodeId="i=1" BrowseName="A">
    <References>
      <Reference ReferenceType="HasTypeDefinition">MyType</Reference>
    </References>
  </UAObject>
  <Aliases>
    <Alias Alias="MyType">ns=1;i=40</Alias>
  </Aliases>
</UANodeSet>"#;
        let mut target = Recorder::with_globals(&[2]);
        load_str(xml, &mut target).unwrap();
        let base = target.nodes[0].base();
        assert!(base.hierarchical_refs.is_empty());
        let reference = &base.non_hierarchical_refs[0];
        assert_eq!(reference.target.namespace_index, 2);
        assert_eq!(reference.target.id, "i=40");
    }

    #[test]
    fn test_inverse_reference_orders_parent_first() {
        let xml = r#"<UANodeSet>
  <UAObject NodeId="i=2" BrowseName="B">
    <References>
      <Reference ReferenceType="HasComponent" IsForward="false">i=1</Reference>
    </References>
  </UAObject>
  <UAObject NodeId="i=1" BrowseName="A"/>
</UANodeSet>"#;
        let mut target = Recorder::default();
        load_str(xml, &mut target).unwrap();
        assert_eq!(target.emitted_ids(), vec!["i=1", "i=2"]);
    }

    #[test]
    fn test_user_declared_hierarchical_reference_type() {
        let xml = r#"<UANodeSet>
  <NamespaceUris>
    <Uri>urn:x</Uri>
  </NamespaceUris>
  <UAReferenceType NodeId="ns=1;i=100" BrowseName="HasFoo">
    <References>
      <Reference ReferenceType="HasSubtype" IsForward="false">i=34</Reference>
    </References>
  </UAReferenceType>
  <UAObject NodeId="ns=1;i=7" BrowseName="Child">
    <References>
      <Reference ReferenceType="ns=1;i=100" IsForward="false">ns=1;i=6</Reference>
    </References>
  </UAObject>
  <UAObject NodeId="ns=1;i=6" BrowseName="Parent"/>
</UANodeSet>"#;
        let mut target = Recorder::with_globals(&[5]);
        load_str(xml, &mut target).unwrap();
        assert_eq!(
            target.emitted_ids(),
            vec!["ns=5;i=100", "ns=5;i=6", "ns=5;i=7"]
        );
        let child = target.nodes[2].base();
        assert_eq!(child.hierarchical_refs.len(), 1);
        assert_eq!(child.hierarchical_refs[0].ref_type.id, "i=100");
    }

    #[test]
    fn test_is_forward_defaults_to_true() {
        let xml = r#"<UANodeSet>
  <NamespaceUris>
    <Uri>urn:a</Uri>
  </NamespaceUris>
  <UAObject NodeId="i=3" BrowseName="O">
    <References>
      <Reference ReferenceType="HasComponent">ns=1;i=5</Reference>
    </References>
  </UAObject>
</UANodeSet>"#;
        let mut target = Recorder::with_globals(&[7]);
        load_str(xml, &mut target).unwrap();
        let reference = &target.nodes[0].base().hierarchical_refs[0];
        assert!(reference.is_forward);
        assert_eq!(reference.target.namespace_index, 7);
        assert_eq!(reference.target.id, "i=5");
    }

    #[test]
    fn test_second_namespace_translated() {
        let xml = r#"<UANodeSet>
  <NamespaceUris>
    <Uri>urn:a</Uri>
    <Uri>urn:b</Uri>
  </NamespaceUris>
  <UAObject NodeId="ns=2;i=9" BrowseName="N"/>
</UANodeSet>"#;
        let mut target = Recorder::with_globals(&[7, 4]);
        load_str(xml, &mut target).unwrap();
        assert_eq!(target.uris, vec!["urn:a", "urn:b"]);
        let id = &target.nodes[0].base().node_id;
        assert_eq!(id.namespace_index, 4);
        assert_eq!(id.id, "i=9");
    }

    #[test]
    fn test_unknown_subtree_skipped() {
        let xml = r#"<UANodeSet>
  <Models>
    <Model ModelUri="urn:m">
      <UAObject NodeId="i=1" BrowseName="Hidden"/>
    </Model>
  </Models>
  <UAObject NodeId="i=2" BrowseName="Visible">
    <Value>
      <ListOfExtensionObject>ignored</ListOfExtensionObject>
    </Value>
  </UAObject>
</UANodeSet>"#;
        let mut target = Recorder::default();
        let summary = load_str(xml, &mut target).unwrap();
        assert_eq!(summary.nodes_emitted, 1);
        assert_eq!(target.emitted_ids(), vec!["i=2"]);
    }

    #[test]
    fn test_missing_node_id_is_fatal() {
        let xml = r#"<UANodeSet>
  <UAObject BrowseName="A"/>
</UANodeSet>"#;
        let mut target = Recorder::default();
        let error = load_str(xml, &mut target).unwrap_err();
        match error {
            LoadError::MissingRequiredAttribute { element, attribute } => {
                assert_eq!(element, "UAObject");
                assert_eq!(attribute, "NodeId");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_node_id_is_null() {
        let xml = r#"<UANodeSet>
  <UAObject NodeId="" BrowseName="A"/>
</UANodeSet>"#;
        let mut target = Recorder::default();
        let summary = load_str(xml, &mut target).unwrap();
        assert_eq!(summary.nodes_emitted, 1);
        assert!(target.nodes[0].base().node_id.is_null());
    }

    #[test]
    fn test_variable_type_node() {
        let xml = r#"<UANodeSet>
  <Aliases>
    <Alias Alias="Int32">i=6</Alias>
  </Aliases>
  <UAVariableType NodeId="i=60" BrowseName="BaseVar" IsAbstract="true" DataType="Int32" ValueRank="1"/>
  <UAObject NodeId="i=61" BrowseName="O"/>
</UANodeSet>"#;
        let mut target = Recorder::default();
        load_str(xml, &mut target).unwrap();
        // Type classes are emitted before instances.
        let NodeType::VariableType(variable_type) = &target.nodes[0] else {
            panic!("expected a variable type first");
        };
        assert_eq!(variable_type.is_abstract, "true");
        assert_eq!(variable_type.data_type.id, "i=6");
        assert_eq!(variable_type.value_rank, "1");
        assert_eq!(target.nodes[1].node_class(), NodeClass::Object);
    }

    #[test]
    fn test_cycle_emits_in_document_order() {
        let xml = r#"<UANodeSet>
  <UAObject NodeId="i=1" BrowseName="A">
    <References>
      <Reference ReferenceType="Organizes" IsForward="false">i=2</Reference>
    </References>
  </UAObject>
  <UAObject NodeId="i=2" BrowseName="B">
    <References>
      <Reference ReferenceType="Organizes" IsForward="false">i=1</Reference>
    </References>
  </UAObject>
</UANodeSet>"#;
        let mut target = Recorder::default();
        let summary = load_str(xml, &mut target).unwrap();
        assert_eq!(target.emitted_ids(), vec!["i=1", "i=2"]);
        assert_eq!(
            summary.diagnostics,
            vec![Diagnostic::HierarchyCycle {
                nodes: vec!["i=1".to_owned(), "i=2".to_owned()]
            }]
        );
    }

    #[test]
    fn test_unresolvable_namespace_kept_with_raw() {
        let xml = r#"<UANodeSet>
  <UAObject NodeId="ns=4;i=2" BrowseName="A"/>
</UANodeSet>"#;
        let mut target = Recorder::default();
        let summary = load_str(xml, &mut target).unwrap();
        let id = &target.nodes[0].base().node_id;
        assert_eq!(id.namespace_index, 0);
        assert_eq!(id.id, "i=2");
        assert_eq!(id.raw, "ns=4;i=2");
        assert_eq!(
            summary.diagnostics,
            vec![Diagnostic::UnknownNamespace {
                raw: "ns=4;i=2".to_owned(),
                local_index: 4
            }]
        );
    }

    #[test]
    fn test_emission_count_matches_recognized_nodes() {
        let xml = r#"<UANodeSet>
  <UADataType NodeId="i=1" BrowseName="D"/>
  <UAReferenceType NodeId="i=2" BrowseName="R"/>
  <UAObjectType NodeId="i=3" BrowseName="OT"/>
  <UAObject NodeId="i=4" BrowseName="O"/>
  <UAMethod NodeId="i=5" BrowseName="M"/>
  <UAVariable NodeId="i=6" BrowseName="V"/>
  <Extensions><Extension>not a node</Extension></Extensions>
</UANodeSet>"#;
        let mut target = Recorder::default();
        let summary = load_str(xml, &mut target).unwrap();
        assert_eq!(summary.nodes_emitted, 6);
        // Fixed class order.
        assert_eq!(target.emitted_ids(), vec!["i=2", "i=1", "i=3", "i=4", "i=5", "i=6"]);
    }

    #[test]
    fn test_loading_twice_is_deterministic() {
        let xml = r#"<UANodeSet>
  <NamespaceUris>
    <Uri>urn:x</Uri>
  </NamespaceUris>
  <UAObject NodeId="ns=1;i=2" BrowseName="B">
    <References>
      <Reference ReferenceType="HasComponent" IsForward="false">ns=1;i=1</Reference>
    </References>
  </UAObject>
  <UAObject NodeId="ns=1;i=1" BrowseName="A"/>
  <UAVariable NodeId="ns=1;i=3" BrowseName="V"/>
</UANodeSet>"#;
        let mut first = Recorder::with_globals(&[2]);
        let mut second = Recorder::with_globals(&[2]);
        load_str(xml, &mut first).unwrap();
        load_str(xml, &mut second).unwrap();
        assert_eq!(first.emitted_ids(), second.emitted_ids());
        assert_eq!(first.uris, second.uris);
    }
}
