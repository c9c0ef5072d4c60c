#![warn(missing_docs)]

//! Streaming loader for OPC UA NodeSet2 XML documents.
//!
//! The loader scans a document once, building fully resolved node records
//! (ids translated through the document's namespace table, aliases resolved
//! even when declared after use), classifies references as hierarchical or
//! not, and hands every node to a consumer in dependency order: each node is
//! emitted after the targets of its inverse hierarchical references.
//!
//! The consumer supplies two callbacks through [`ImportTarget`]: one mapping
//! namespace URIs to global indices, one receiving nodes. A session is
//! single-threaded and synchronous; all storage is owned by the session and
//! released when the load call returns.
//!
//! ```no_run
//! use nodeset_loader::{load_file, ImportTarget, NodeType};
//!
//! struct Printer;
//!
//! impl ImportTarget for Printer {
//!     fn register_namespace(&mut self, _uri: &str) -> u16 {
//!         1
//!     }
//!
//!     fn on_node(&mut self, node: &NodeType) {
//!         println!("{}", node.base().node_id);
//!     }
//! }
//!
//! let mut printer = Printer;
//! let summary = load_file("Opc.Ua.NodeSet2.xml", &mut printer)?;
//! println!("{} nodes loaded", summary.nodes_emitted);
//! # Ok::<(), nodeset_loader::LoadError>(())
//! ```

mod alias;
mod base;
mod data_type;
mod error;
mod hierarchy;
mod import;
mod method;
mod namespaces;
mod node;
mod node_id;
mod object;
mod object_type;
mod parser;
mod reference_type;
mod references;
mod sort;
mod store;
mod variable;
mod variable_type;

pub use alias::{Alias, AliasTable};
pub use base::Base;
pub use data_type::DataType;
pub use error::{Diagnostic, LoadError};
pub use hierarchy::HierarchyClassifier;
pub use import::{load_file, load_from, load_str, ImportTarget, LoadSummary};
pub use method::Method;
pub use namespaces::{Namespace, NamespaceTable, BASE_NAMESPACE_URI};
pub use node::{NodeClass, NodeType};
pub use node_id::NodeId;
pub use object::Object;
pub use object_type::ObjectType;
pub use reference_type::ReferenceType;
pub use references::Reference;
pub use variable::Variable;
pub use variable_type::VariableType;
