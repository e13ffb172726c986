//! One level of the configuration tree
use crate::value::Value;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// Ordered bag of named fields
///
/// Besides its fields a node carries bookkeeping that is never part of the field set:
/// the subset (section name) it was built from and, on the root, the document it was loaded from.
/// Bookkeeping is ignored by equality, serialization and diffing.
#[derive(Debug, Clone, Default)]
pub struct ConfigNode {
    fields: IndexMap<String, Value>,
    subset: Option<String>,
    source_path: Option<PathBuf>,
}

impl ConfigNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn for_subset(subset: impl Into<String>) -> Self {
        Self {
            subset: Some(subset.into()),
            ..Default::default()
        }
    }

    /// Name of the section this node was built from
    pub fn subset(&self) -> Option<&str> {
        self.subset.as_deref()
    }

    pub(crate) fn set_subset(&mut self, subset: Option<String>) {
        self.subset = subset;
    }

    /// Document this tree was loaded from (root only)
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub(crate) fn set_source_path(&mut self, path: Option<PathBuf>) {
        self.source_path = path;
    }

    /// Direct field access, no path walking
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Assign a field directly
    ///
    /// An existing field keeps its position, a new one is appended. Returns the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(name.into(), value.into())
    }

    /// Remove a field, preserving the order of the remaining ones
    pub fn pop(&mut self, name: &str) -> Option<Value> {
        self.fields.shift_remove(name)
    }

    /// Top-level field names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.fields.iter()
    }

    pub fn iter_mut(&mut self) -> indexmap::map::IterMut<'_, String, Value> {
        self.fields.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Nested plain mapping of all fields, child nodes stripped of their bookkeeping
    pub fn get_kwargs(&self) -> IndexMap<String, Value> {
        self.fields
            .iter()
            .map(|(name, value)| {
                let value = match value {
                    Value::Node(child) => Value::Node(child.get_kwargs().into_iter().collect()),
                    other => other.clone(),
                };
                (name.clone(), value)
            })
            .collect()
    }

    /// Copy every field of `source` into this node
    pub fn reassign(&mut self, source: &ConfigNode) {
        for (name, value) in source {
            self.fields.insert(name.clone(), value.clone());
        }
    }

    pub(crate) fn clear(&mut self) {
        self.fields.clear();
    }
}

/// Equality over fields only
impl PartialEq for ConfigNode {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl FromIterator<(String, Value)> for ConfigNode {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
            ..Default::default()
        }
    }
}

impl<'a> IntoIterator for &'a ConfigNode {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl IntoIterator for ConfigNode {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/// # Panic
/// Panics if the field does not exist
impl std::ops::Index<&str> for ConfigNode {
    type Output = Value;

    fn index(&self, name: &str) -> &Value {
        self.fields
            .get(name)
            .unwrap_or_else(|| panic!("no field named {name:?}"))
    }
}

/// Renders the node as a document
impl std::fmt::Display for ConfigNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&crate::serialize::to_document(self, &[]))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pop_keeps_order() {
        let mut node: ConfigNode = [("a", 1), ("b", 2), ("c", 3)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), Value::from(v)))
            .collect();

        assert_eq!(node.pop("b"), Some(Value::Integer(2)));
        assert_eq!(node.pop("b"), None);
        assert_eq!(node.keys().collect::<Vec<_>>(), ["a", "c"]);
    }

    #[test]
    fn insert_overwrites_in_place() {
        let mut node = ConfigNode::new();
        node.insert("a", 1);
        node.insert("b", 2);
        assert_eq!(node.insert("a", "x"), Some(Value::Integer(1)));
        assert_eq!(node.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(node["a"], Value::from("x"));
    }

    #[test]
    fn equality_ignores_bookkeeping() {
        let mut a = ConfigNode::for_subset("train");
        a.insert("lr", 0.1);
        let mut b = ConfigNode::new();
        b.insert("lr", 0.1);

        assert_eq!(a, b);
    }

    #[test]
    fn reassign_copies_fields() {
        let mut target = ConfigNode::new();
        target.insert("a", 1);
        let mut source = ConfigNode::new();
        source.insert("a", 2);
        source.insert("b", 3);

        target.reassign(&source);
        assert_eq!(target, source);
    }

    #[test]
    fn kwargs_leave_out_bookkeeping() {
        let node = crate::yaml_node!(
            "train:\n  lr: 0.1\n  opt:\n    kind: adam\neval:\n  lr: 0.2\n",
            crate::builder::BuildOptions::default().subset("train")
        );
        assert_eq!(node.subset(), Some("train"));
        assert_eq!(node.get("opt").unwrap().as_node().unwrap().subset(), Some("opt"));

        let kwargs = node.get_kwargs();
        assert_eq!(kwargs.keys().collect::<Vec<_>>(), ["lr", "opt"]);
        assert_eq!(kwargs["lr"], Value::Decimal(0.1));

        let opt = kwargs["opt"].as_node().unwrap();
        assert_eq!(opt.subset(), None);
        assert_eq!(opt.source_path(), None);
        assert_eq!(opt.field("kind"), Some(&Value::from("adam")));
    }
}
