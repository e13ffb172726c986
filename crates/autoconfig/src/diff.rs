//! Comparing two trees
//!
//! Additions and removals are only detected between the top-level field names. Below the top
//! level only differing values are reported, under dotted keys (`train.lr`). A field that is a
//! nested node on one side and a plain value on the other cannot be compared and is skipped.
use crate::builder::BuildOptions;
use crate::document::LoadError;
use crate::node::ConfigNode;
use crate::path::FieldPath;
use crate::value::Value;
use indexmap::IndexMap;
use std::path::Path;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Diff {
    /// Top-level fields of A that B lacks, with A's values
    pub missing_from_b: IndexMap<String, Value>,
    /// Top-level fields only B has, with B's values
    pub only_in_b: IndexMap<String, Value>,
    /// Dotted key to `"A | B"`
    pub different: IndexMap<String, String>,
}

impl Diff {
    pub fn is_empty(&self) -> bool {
        self.missing_from_b.is_empty() && self.only_in_b.is_empty() && self.different.is_empty()
    }
}

pub fn diff(a: &ConfigNode, b: &ConfigNode) -> Diff {
    let mut result = Diff::default();

    for (name, value) in a {
        if !b.contains(name) {
            result.missing_from_b.insert(name.clone(), value.clone());
        }
    }

    for (name, value) in b {
        if !a.contains(name) {
            result.only_in_b.insert(name.clone(), value.clone());
        }
    }

    collect_different(a, b, &FieldPath::default(), &mut result.different);
    result
}

fn collect_different(
    a: &ConfigNode,
    b: &ConfigNode,
    prefix: &FieldPath,
    different: &mut IndexMap<String, String>,
) {
    for (name, value_a) in a {
        let Some(value_b) = b.field(name) else {
            continue;
        };
        if value_a == value_b {
            continue;
        }

        let field = prefix.child(name.as_str());
        match (value_a, value_b) {
            (Value::Node(node_a), Value::Node(node_b)) => {
                collect_different(node_a, node_b, &field, different)
            }
            (Value::Node(_), _) | (_, Value::Node(_)) => {
                tracing::debug!(%field, "nested on one side only, skipped");
            }
            _ => {
                different.insert(field.to_string(), format!("{value_a} | {value_b}"));
            }
        }
    }
}

/// Load two documents in full and compare them
pub fn diff_files(a: impl AsRef<Path>, b: impl AsRef<Path>) -> Result<Diff, LoadError> {
    let options = BuildOptions::default();
    let a = ConfigNode::from_path(a, &options)?;
    let b = ConfigNode::from_path(b, &options)?;

    Ok(diff(&a, &b))
}

/// Human-readable report
impl std::fmt::Display for Diff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use crate::serialize::fields_to_document;

        if self.is_empty() {
            return writeln!(f, "No differences found.");
        }

        if !self.missing_from_b.is_empty() {
            writeln!(f, "===== Missing from B =====")?;
            f.write_str(&fields_to_document(&self.missing_from_b, &[]))?;
        }

        if !self.only_in_b.is_empty() {
            writeln!(f, "===== Only in B =====")?;
            f.write_str(&fields_to_document(&self.only_in_b, &[]))?;
        }

        if !self.different.is_empty() {
            writeln!(f, "===== Different <A | B> =====")?;
            for (key, values) in &self.different {
                writeln!(f, "{key}: {values}")?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::yaml_node;
    use pretty_assertions::assert_eq;

    #[test]
    fn identical() {
        let a = yaml_node!("a: 1\nb:\n  c: [1, 2]\n");
        let result = diff(&a, &a.clone());

        assert!(result.is_empty());
        assert_eq!(result.to_string(), "No differences found.\n");
    }

    #[test]
    fn top_level_added_and_removed() {
        let a = yaml_node!("a: 1\nshared: 2\n");
        let b = yaml_node!("shared: 2\nb:\n  x: 1\n");
        let result = diff(&a, &b);

        assert_eq!(result.missing_from_b.keys().collect::<Vec<_>>(), ["a"]);
        assert_eq!(result.only_in_b.keys().collect::<Vec<_>>(), ["b"]);
        assert!(result.different.is_empty());
    }

    #[test]
    fn nested_changes_use_dotted_keys() {
        let a = yaml_node!("train:\n  lr: 0.1\n  opt:\n    kind: adam\n    only_a: 1\n");
        let b = yaml_node!("train:\n  lr: 0.2\n  opt:\n    kind: sgd\n");
        let result = diff(&a, &b);

        assert!(result.missing_from_b.is_empty());
        assert_eq!(
            result.different,
            IndexMap::from([
                ("train.lr".to_string(), "0.1 | 0.2".to_string()),
                ("train.opt.kind".to_string(), "adam | sgd".to_string()),
            ])
        );
    }

    #[test]
    fn asymmetric_nesting_is_skipped() {
        let a = yaml_node!("x:\n  y: 1\nz: 1\n");
        let b = yaml_node!("x: 1\nz: 2\n");
        let result = diff(&a, &b);

        assert_eq!(result.different.keys().collect::<Vec<_>>(), ["z"]);
    }

    #[test]
    fn symmetry() {
        let a = yaml_node!("a: 1\nb: 2\nc:\n  d: 3\n");
        let b = yaml_node!("b: 3\ne: 4\nf: 5\n");

        let forward = diff(&a, &b);
        let backward = diff(&b, &a);

        assert_eq!(forward.only_in_b, backward.missing_from_b);
        assert_eq!(forward.missing_from_b, backward.only_in_b);
    }

    #[test]
    fn report() {
        let a = yaml_node!("a: 1\nb:\n  c: 2\n");
        let b = yaml_node!("b:\n  c: 3\nd: [1]\n");

        assert_eq!(
            diff(&a, &b).to_string(),
            "===== Missing from B =====\na: 1\n===== Only in B =====\nd:\n  - 1\n===== Different <A | B> =====\nb.c: 2 | 3\n"
        );
    }
}
