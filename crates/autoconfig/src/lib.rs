//! # autoconfig - configuration trees from YAML documents
//!
//! Load a YAML document, address its settings by path, fill in references between settings,
//! write it back and compare it with another one.
//!
//! ## Introduction for developers
//!
//! Read this to understand how `autoconfig` works internally.
//!
//! ### Terms
//!
//! - a `document` is a YAML file whose top level is a mapping
//! - a `node` ([node::ConfigNode]) is one level of the tree: an ordered list of named `fields`
//! - a `field` holds a [value::Value]: a scalar, a list or a nested node
//! - a `subset` is a named top-level section of a document
//! - a `reference` is a string field such as `${train.seed}` pointing at another field
//!
//! ```yaml
//! seed: 42
//! train:
//!   seed: ${seed}
//!   lr: "0.1"
//!   layers: [64, 32]
//! eval:
//!   batch: 16
//! ```
//!
//! ### Loading
//!
//! see [document::parse_document] and [node::ConfigNode::from_path]
//!
//! The YAML parser produces a generic mapping. Nothing about its shape is validated: a missing
//! setting only shows up when it is looked up.
//!
//! ### Building the tree
//!
//! see [builder::build]
//!
//! Every mapping-valued field becomes a child node, so the document above yields the paths
//! `seed`, `train.seed`, `train.lr`, `train.layers`, `eval.batch`.
//!
//! - with a subset (`BuildOptions::default().subset("train")`) only that section is used and its
//!   fields land directly in the root: `seed`, `lr`, `layers`
//! - in flattened mode (option `local_subsets` or a `_local_: true` key in the document) nested
//!   mappings are merged into the node that contains them instead of becoming child nodes
//!
//! Afterwards string fields that read as numbers are converted ([coerce::coerce_numbers]):
//! `"0.1"` becomes `0.1`, `"3.0"` becomes `3`. List elements are never touched.
//!
//! ### Addressing
//!
//! see [path::FieldPath]
//!
//! `get`, `get_mut` and `set` on [node::ConfigNode] take a dotted string or a list of segments.
//! `set` never creates intermediate nodes.
//!
//! ### Reuse
//!
//! see [reuse::Resolver]
//!
//! References are parsed once into a typed [reference::Token] and looked up as absolute paths
//! in a root tree, following references to references. Unknown targets are reported and left as
//! they are; a target holding the ignore sentinel `???` is left for a later pass. A field whose
//! chain loops is reported and left as it is. Fields are rewritten in document order, so later
//! lookups see earlier substitutions.
//!
//! ### Output
//!
//! [serialize::to_document] writes block YAML with a 4 space indent; reading it back yields the
//! same fields and values. [diff::diff] compares two trees, [template::render_template] turns
//! command-line argument definitions into a starter document.
//!
pub mod builder;
pub mod coerce;
pub mod diff;
pub mod document;
pub mod node;
pub mod path;
pub mod reference;
pub mod reuse;
pub mod serialize;
pub mod template;
pub mod value;

pub use builder::BuildOptions;
pub use node::ConfigNode;
pub use path::FieldPath;
pub use value::Value;
