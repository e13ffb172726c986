//! Turning a parsed document into a [ConfigNode] tree
//!
//! Mapping-valued fields either become child nodes (`a.b.c` paths) or, in flattened mode,
//! have their fields merged into the node that is being built.
//!
//! Flattened mode is switched on by [BuildOptions::local_subsets] or by the control key
//! [LOCAL_KEY] in a mapping. The control key applies to the mapping that contains it and to
//! every mapping below it, unless one of those sets it again. It is read once per mapping
//! before any field is processed, so key order does not matter. The control key itself is
//! kept as an ordinary field.
use crate::coerce::coerce_numbers;
use crate::node::ConfigNode;
use crate::value::{key_name, Value};
use serde_yaml::Mapping;

/// Control key toggling flattened mode
pub const LOCAL_KEY: &str = "_local_";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Only populate the tree from this top-level section
    pub subset: Option<String>,
    /// Start out in flattened mode
    pub local_subsets: bool,
    /// Log what was loaded at info level
    pub verbose: bool,
}

impl BuildOptions {
    pub fn subset(mut self, subset: impl Into<String>) -> Self {
        self.subset = Some(subset.into());
        self
    }

    pub fn local_subsets(mut self, local_subsets: bool) -> Self {
        self.local_subsets = local_subsets;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Namespaced,
    Flattened,
}

impl Layout {
    fn from_flag(local_subsets: bool) -> Self {
        if local_subsets {
            Layout::Flattened
        } else {
            Layout::Namespaced
        }
    }

    /// Layout for `mapping` given the one inherited from its parent
    fn for_mapping(self, mapping: &Mapping) -> Self {
        match mapping.get(LOCAL_KEY) {
            Some(control) => Layout::from_flag(is_truthy(control)),
            None => self,
        }
    }
}

/// Build a tree from a document's top-level mapping
///
/// Numeric coercion runs on the result.
pub fn build(document: &Mapping, options: &BuildOptions) -> ConfigNode {
    let mut root = ConfigNode::new();
    let layout = Layout::from_flag(options.local_subsets).for_mapping(document);

    match &options.subset {
        None => populate(&mut root, document, layout),
        Some(subset) => {
            match document.get(subset.as_str()).map(untag) {
                Some(serde_yaml::Value::Mapping(section)) => populate(&mut root, section, layout),
                Some(_) => tracing::warn!(%subset, "subset is not a mapping, tree is empty"),
                None => tracing::warn!(%subset, "subset not found, tree is empty"),
            }
            root.set_subset(Some(subset.clone()));
        }
    }

    coerce_numbers(&mut root);
    root
}

fn populate(node: &mut ConfigNode, mapping: &Mapping, inherited: Layout) {
    let layout = inherited.for_mapping(mapping);

    for (key, value) in mapping {
        let name = key_name(key);

        let serde_yaml::Value::Mapping(section) = untag(value) else {
            node.insert(name, Value::from(value.clone()));
            continue;
        };

        match layout {
            Layout::Flattened => {
                tracing::trace!(%name, "flatten section into parent");
                populate(node, section, layout);
            }
            Layout::Namespaced => {
                let mut child = ConfigNode::for_subset(name.clone());
                populate(&mut child, section, layout);
                node.insert(name, child);
            }
        }
    }
}

fn untag(value: &serde_yaml::Value) -> &serde_yaml::Value {
    match value {
        serde_yaml::Value::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

/// Loose truthiness: `false`, `0`, `null` and the empty string or collection are false
fn is_truthy(value: &serde_yaml::Value) -> bool {
    use serde_yaml::Value as Yaml;

    match untag(value) {
        Yaml::Null => false,
        Yaml::Bool(b) => *b,
        Yaml::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Yaml::String(s) => !s.is_empty(),
        Yaml::Sequence(seq) => !seq.is_empty(),
        Yaml::Mapping(mapping) => !mapping.is_empty(),
        Yaml::Tagged(_) => true,
    }
}
