//! Filling in reuse references
//!
//! A field whose value is a reference (`${path.to.value}` by default) is replaced by the value
//! found at that path in a root tree. References to references are followed.
//!
//! Fields are visited in document order and each substitution is written back immediately, so
//! when a tree is resolved against itself later lookups already see the rewritten values.
//!
//! Resolution is meant to be run more than once while upstream values become available:
//! - a reference that points nowhere is reported and left untouched
//! - a reference that ends at the ignore sentinel (`???`) is left untouched
//! - a reference chain that loops back on itself is reported as [CyclicReference] and left untouched
use crate::node::ConfigNode;
use crate::path::FieldPath;
use crate::reference::Markers;
use crate::value::Value;

pub const IGNORE_SENTINEL: &str = "???";
pub const MAX_DEPTH: usize = 10;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("cyclic reference at `{field}`: {}", format_chain(.chain))]
pub struct CyclicReference {
    pub field: FieldPath,
    pub chain: Vec<FieldPath>,
}

fn format_chain(chain: &[FieldPath]) -> String {
    chain
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Outcome of one pass, field paths are relative to the resolved node
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ResolveReport {
    pub resolved: Vec<FieldPath>,
    pub ignored: Vec<FieldPath>,
    /// Field and the reference that could not be found
    pub unresolved: Vec<(FieldPath, FieldPath)>,
    pub cyclic: Vec<CyclicReference>,
}

impl ResolveReport {
    pub fn is_complete(&self) -> bool {
        self.ignored.is_empty() && self.unresolved.is_empty() && self.cyclic.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Resolver {
    markers: Markers,
    ignore: Option<String>,
    max_depth: usize,
    verbose: bool,
}

impl Default for Resolver {
    fn default() -> Self {
        Self {
            markers: Markers::default(),
            ignore: Some(IGNORE_SENTINEL.to_string()),
            max_depth: MAX_DEPTH,
            verbose: true,
        }
    }
}

enum Chase {
    Found(Value),
    Missing(FieldPath),
    Cycle(Vec<FieldPath>),
}

impl Resolver {
    pub fn markers(mut self, markers: Markers) -> Self {
        self.markers = markers;
        self
    }

    /// Sentinel that suppresses substitution, `None` disables it
    pub fn ignore(mut self, ignore: Option<&str>) -> Self {
        self.ignore = ignore.map(str::to_string);
        self
    }

    /// Maximum number of lookups when following a chain
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    /// When false, unresolved references are logged at debug instead of warn level
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Resolve the references in `node` and all nodes below it, looking them up in `root`
    pub fn resolve(&self, node: &mut ConfigNode, root: &ConfigNode) -> ResolveReport {
        self.run(node, Some(root))
    }

    /// Resolve a tree against itself
    pub fn resolve_in_place(&self, root: &mut ConfigNode) -> ResolveReport {
        self.run(root, None)
    }

    /// Without a separate `root` the lookups go to `node` itself
    fn run(&self, node: &mut ConfigNode, root: Option<&ConfigNode>) -> ResolveReport {
        let mut report = ResolveReport::default();

        // leaves substituted with a section are not walked again in the same pass
        let mut fields = vec![];
        collect_leaves(node, &FieldPath::default(), &mut fields);

        for field in fields {
            let chase = {
                let lookup = root.unwrap_or(&*node);
                let Some(target) = node.get(&field).ok().and_then(|v| self.markers.reference(v))
                else {
                    continue;
                };
                self.chase(lookup, &field, target)
            };

            match chase {
                Chase::Missing(missing) => {
                    if self.verbose {
                        tracing::warn!(%field, reference = %missing, "could not find value for reuse");
                    } else {
                        tracing::debug!(%field, reference = %missing, "could not find value for reuse");
                    }
                    report.unresolved.push((field, missing));
                }
                Chase::Cycle(chain) => {
                    let cycle = CyclicReference { field, chain };
                    tracing::warn!("{cycle}");
                    report.cyclic.push(cycle);
                }
                Chase::Found(found) if self.is_ignored(&found) => {
                    tracing::debug!(%field, "reference source is ignored");
                    report.ignored.push(field);
                }
                Chase::Found(found) => {
                    tracing::trace!(%field, value = %found, "resolved");
                    if let Ok(slot) = node.get_mut(&field) {
                        *slot = found;
                    }
                    report.resolved.push(field);
                }
            }
        }

        report
    }

    /// Follow a chain of references starting at `target`
    fn chase(&self, root: &ConfigNode, field: &FieldPath, target: FieldPath) -> Chase {
        let mut chain: Vec<FieldPath> = vec![];
        let mut target = target;

        loop {
            if chain.contains(&target) {
                chain.push(target);
                return Chase::Cycle(chain);
            }

            let Ok(value) = root.get(&target) else {
                return Chase::Missing(target);
            };
            chain.push(target);

            match self.markers.reference(value) {
                Some(next) if chain.len() < self.max_depth => target = next,
                Some(_) => {
                    tracing::debug!(%field, depth = self.max_depth, "reference chain too deep, stopping");
                    return Chase::Found(value.clone());
                }
                None => return Chase::Found(value.clone()),
            }
        }
    }

    fn is_ignored(&self, value: &Value) -> bool {
        matches!((&self.ignore, value), (Some(ignore), Value::String(s)) if s == ignore)
    }
}

/// Paths of every non-node field below `node`, in document order
fn collect_leaves(node: &ConfigNode, prefix: &FieldPath, out: &mut Vec<FieldPath>) {
    for (name, value) in node {
        let field = prefix.child(name.as_str());
        match value {
            Value::Node(child) => collect_leaves(child, &field, out),
            _ => out.push(field),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::yaml_node;
    use pretty_assertions::assert_eq;

    #[test]
    fn chained_references() {
        let mut node = yaml_node!("a: 1\nb: ${a}\nc: ${b}\n");
        let report = Resolver::default().resolve_in_place(&mut node);

        assert_eq!(node["b"], Value::Integer(1));
        assert_eq!(node["c"], Value::Integer(1));
        assert!(report.is_complete());
    }

    #[test]
    fn unresolvable_reference_is_kept() {
        let mut node = yaml_node!("a: 1\nb: ${missing.path}\nc: ${a}\n");
        let report = Resolver::default().resolve_in_place(&mut node);

        assert_eq!(node["b"], Value::from("${missing.path}"));
        assert_eq!(node["c"], Value::Integer(1));
        assert_eq!(
            report.unresolved,
            vec![(FieldPath::from("b"), FieldPath::from("missing.path"))]
        );
    }

    #[test]
    fn ignore_sentinel_is_stable() {
        let mut node = yaml_node!("a: '???'\nb: ${a}\n");
        let resolver = Resolver::default();

        for _ in 0..3 {
            let report = resolver.resolve_in_place(&mut node);
            assert_eq!(node["b"], Value::from("${a}"));
            assert_eq!(report.ignored, vec![FieldPath::from("b")]);
        }

        node.set("a", 5).unwrap();
        resolver.resolve_in_place(&mut node);
        assert_eq!(node["b"], Value::Integer(5));
    }

    #[test]
    fn ignore_can_be_disabled() {
        let mut node = yaml_node!("a: '???'\nb: ${a}\n");
        Resolver::default()
            .ignore(None)
            .resolve_in_place(&mut node);
        assert_eq!(node["b"], Value::from("???"));
    }

    #[test]
    fn nested_references_are_absolute() {
        let mut node = yaml_node!("seed: 3\ntrain:\n  seed: ${seed}\n  opt:\n    lr: 0.1\neval:\n  lr: ${train.opt.lr}\n");
        let report = Resolver::default().resolve_in_place(&mut node);

        assert_eq!(node.get("train.seed"), Ok(&Value::Integer(3)));
        assert_eq!(node.get("eval.lr"), Ok(&Value::Decimal(0.1)));
        assert_eq!(
            report.resolved,
            vec![FieldPath::from("train.seed"), FieldPath::from("eval.lr")]
        );
    }

    #[test]
    fn reference_to_section_copies_it() {
        let mut node = yaml_node!("base:\n  lr: 0.1\ncopy: ${base}\n");
        Resolver::default().resolve_in_place(&mut node);
        assert_eq!(node.get("copy.lr"), Ok(&Value::Decimal(0.1)));
    }

    #[test]
    fn resolve_subtree_against_other_root() {
        let root = yaml_node!("shared:\n  seed: 9\n");
        let mut node = yaml_node!("seed: ${shared.seed}\n");
        Resolver::default().resolve(&mut node, &root);
        assert_eq!(node["seed"], Value::Integer(9));
    }

    #[test]
    fn section_reference_sees_resolved_fields() {
        let mut node = yaml_node!("seed: 3\nbase:\n  x: ${seed}\ncopy: ${base}\n");
        let report = Resolver::default().resolve_in_place(&mut node);

        assert_eq!(node.get("copy.x"), Ok(&Value::Integer(3)));
        assert!(report.is_complete());
    }

    #[test]
    fn section_copied_before_its_source_settles_on_a_second_pass() {
        let mut node = yaml_node!("copy: ${base}\nbase:\n  x: ${seed}\nseed: 3\n");
        let resolver = Resolver::default();

        resolver.resolve_in_place(&mut node);
        assert_eq!(node.get("copy.x"), Ok(&Value::from("${seed}")));
        assert_eq!(node.get("base.x"), Ok(&Value::Integer(3)));

        resolver.resolve_in_place(&mut node);
        assert_eq!(node.get("copy.x"), Ok(&Value::Integer(3)));
    }

    #[test]
    fn long_chain_in_document_order() {
        let mut text = "v0: 1\n".to_string();
        for i in 1..=12 {
            text.push_str(&format!("v{i}: ${{v{}}}\n", i - 1));
        }
        let mut node = yaml_node!(&text);
        let report = Resolver::default().resolve_in_place(&mut node);

        assert_eq!(node["v12"], Value::Integer(1));
        assert_eq!(report.resolved.len(), 12);
    }

    #[test]
    fn depth_bound_on_reversed_chain() {
        let mut node = yaml_node!("d: ${c}\nc: ${b}\nb: ${a}\na: 1\n");
        Resolver::default()
            .max_depth(2)
            .resolve_in_place(&mut node);

        assert_eq!(node["d"], Value::from("${a}"));
        assert_eq!(node["c"], Value::Integer(1));
        assert_eq!(node["b"], Value::Integer(1));
    }

    #[test]
    fn cycle_is_reported_and_others_resolve() {
        let mut node = yaml_node!("x: ${a}\na: ${b}\nb: ${a}\nseed: 1\ny: ${seed}\n");
        let report = Resolver::default().resolve_in_place(&mut node);

        assert_eq!(node["x"], Value::from("${a}"));
        assert_eq!(node["a"], Value::from("${b}"));
        assert_eq!(node["b"], Value::from("${a}"));
        assert_eq!(node["y"], Value::Integer(1));
        assert_eq!(report.resolved, vec![FieldPath::from("y")]);
        assert_eq!(
            report.cyclic[0],
            CyclicReference {
                field: "x".into(),
                chain: vec!["a".into(), "b".into(), "a".into()],
            }
        );
        assert_eq!(
            report.cyclic.iter().map(|c| c.field.to_string()).collect::<Vec<_>>(),
            ["x", "a", "b"]
        );
        assert!(!report.is_complete());
    }

    #[test]
    fn self_reference_is_a_cycle() {
        let mut node = yaml_node!("a: ${a}\n");
        let report = Resolver::default().resolve_in_place(&mut node);

        assert_eq!(node["a"], Value::from("${a}"));
        assert_eq!(
            report.cyclic,
            vec![CyclicReference {
                field: "a".into(),
                chain: vec!["a".into(), "a".into()],
            }]
        );
    }
}
