//! Loading and saving documents
//!
//! A document is YAML whose top level is a mapping. An empty document counts as an empty mapping.
//! The root [ConfigNode] remembers the path it was loaded from so it can be [reset](ConfigNode::reset).
use crate::builder::{build, BuildOptions};
use crate::node::ConfigNode;
use crate::reference::Markers;
use crate::reuse::{ResolveReport, Resolver};
use serde_yaml::Mapping;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("IO error")]
    IoError(#[from] std::io::Error),
    #[error("Unable to parse yaml document")]
    YamlParseFailed(#[from] serde_yaml::Error),
    #[error("Top level of the document is not a mapping")]
    NotAMapping,
    #[error("Tree was not loaded from a file")]
    NoSourcePath,
}

/// Parse document text into its top-level mapping
pub fn parse_document(text: &str) -> Result<Mapping, LoadError> {
    let blank = text.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    });
    if blank {
        return Ok(Mapping::new());
    }

    match serde_yaml::from_str::<serde_yaml::Value>(text)? {
        serde_yaml::Value::Mapping(mapping) => Ok(mapping),
        serde_yaml::Value::Null => Ok(Mapping::new()),
        _ => Err(LoadError::NotAMapping),
    }
}

pub fn read_document(path: &Path) -> Result<Mapping, LoadError> {
    tracing::debug!(path=%path.display(), "loading file");
    let contents = std::fs::read_to_string(path)?;
    parse_document(&contents)
}

/// How [ConfigNode::save_to_yaml_with] writes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveOptions {
    /// Field names left out at every level
    pub exclude: Vec<String>,
    /// Append to the file instead of replacing it
    pub append: bool,
}

impl ConfigNode {
    pub fn from_path(path: impl AsRef<Path>, options: &BuildOptions) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let document = read_document(path)?;

        let mut root = build(&document, options);
        root.set_source_path(Some(path.to_path_buf()));
        log_loaded(path, options);

        Ok(root)
    }

    pub fn from_yaml_str(text: &str, options: &BuildOptions) -> Result<Self, LoadError> {
        Ok(build(&parse_document(text)?, options))
    }

    /// Rebuild this tree from the document it was loaded from
    ///
    /// All in-place changes are discarded.
    pub fn reset(&mut self, options: &BuildOptions) -> Result<(), LoadError> {
        let path: PathBuf = self.source_path().ok_or(LoadError::NoSourcePath)?.into();
        let document = read_document(&path)?;

        let rebuilt = build(&document, options);
        self.clear();
        self.reassign(&rebuilt);
        self.set_subset(rebuilt.subset().map(str::to_string));
        log_loaded(&path, options);

        Ok(())
    }

    pub fn to_yaml_string(&self) -> String {
        crate::serialize::to_document(self, &[])
    }

    /// Write the tree as a document, replacing the file
    pub fn save_to_yaml(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        self.save_to_yaml_with(path, &SaveOptions::default())
    }

    pub fn save_to_yaml_with(
        &self,
        path: impl AsRef<Path>,
        options: &SaveOptions,
    ) -> std::io::Result<()> {
        let exclude: Vec<&str> = options.exclude.iter().map(String::as_str).collect();
        let text = crate::serialize::to_document(self, &exclude);

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .append(options.append)
            .truncate(!options.append)
            .open(path.as_ref())?;
        file.write_all(text.as_bytes())?;
        file.flush()
    }

    /// Resolve references against this tree with default settings and the given markers
    pub fn update_reuse(&mut self, start: &str, end: &str) -> ResolveReport {
        Resolver::default()
            .markers(Markers::new(start, end))
            .resolve_in_place(self)
    }
}

fn log_loaded(path: &Path, options: &BuildOptions) {
    let subset = options.subset.as_deref().unwrap_or("<all>");
    if options.verbose {
        tracing::info!(path=%path.display(), subset, "configuration loaded");
    } else {
        tracing::debug!(path=%path.display(), subset, "configuration loaded");
    }
}

/// Utility macro to build a [ConfigNode] from document text
///
/// ```
/// # use autoconfig::yaml_node;
/// let node = yaml_node!("seed: 42");
/// assert_eq!(node.get("seed").unwrap().as_i64(), Some(42));
/// ```
///
/// With build options
/// ```
/// # use autoconfig::{yaml_node, builder::BuildOptions};
/// let node = yaml_node!("train: {lr: 0.1}", BuildOptions::default().subset("train"));
/// assert_eq!(node.get("lr").unwrap().as_f64(), Some(0.1));
/// ```
///
/// # Panic
/// Panics on invalid input
///
/// ```should_panic
/// # use autoconfig::yaml_node;
/// yaml_node!("- not a mapping");
/// ```
#[macro_export]
macro_rules! yaml_node {
    { $text:expr } => {
        $crate::yaml_node!($text, $crate::builder::BuildOptions::default())
    };
    { $text:expr, $options:expr } => {
        $crate::node::ConfigNode::from_yaml_str($text, &$options).expect("document must parse")
    };
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_document_is_empty_mapping() {
        assert_eq!(parse_document("").unwrap(), Mapping::new());
        assert_eq!(parse_document("# only a comment\n").unwrap(), Mapping::new());
    }

    #[test]
    fn non_mapping_document_fails() {
        assert!(matches!(
            parse_document("- a\n- b\n"),
            Err(LoadError::NotAMapping)
        ));
        assert!(matches!(
            parse_document("a: [1"),
            Err(LoadError::YamlParseFailed(_))
        ));
    }

    #[test]
    fn reset_without_source_fails() {
        let mut node = yaml_node!("a: 1");
        assert!(matches!(
            node.reset(&BuildOptions::default()),
            Err(LoadError::NoSourcePath)
        ));
    }

    #[test]
    fn update_reuse_with_custom_markers() {
        let mut node = yaml_node!("a: 1\nb: <<a>>\nc: ${a}\n");
        node.update_reuse("<<", ">>");

        assert_eq!(node.get("b").unwrap().as_i64(), Some(1));
        assert_eq!(node.get("c").unwrap().as_str(), Some("${a}"));
    }
}
