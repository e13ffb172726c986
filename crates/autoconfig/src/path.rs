//! Addressing fields at arbitrary depth
//!
//! A [FieldPath] is an ordered list of field names. `"a.b.c"` parses into three segments;
//! a field name that itself contains a dot can only be addressed with the segmented form
//! (`["a.b", "c"]`).
use crate::node::ConfigNode;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Path extended by one more field name
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.into());
        Self(segments)
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

impl From<&str> for FieldPath {
    fn from(value: &str) -> Self {
        Self(value.split('.').map(str::to_string).collect())
    }
}

impl From<String> for FieldPath {
    fn from(value: String) -> Self {
        value.as_str().into()
    }
}

impl From<&FieldPath> for FieldPath {
    fn from(value: &FieldPath) -> Self {
        value.clone()
    }
}

impl From<Vec<String>> for FieldPath {
    fn from(value: Vec<String>) -> Self {
        Self(value)
    }
}

impl From<Vec<&str>> for FieldPath {
    fn from(value: Vec<&str>) -> Self {
        value.as_slice().into()
    }
}

impl From<&[&str]> for FieldPath {
    fn from(value: &[&str]) -> Self {
        Self(value.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for FieldPath {
    fn from(value: [&str; N]) -> Self {
        value.as_slice().into()
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("no field at `{path}` (`{segment}` is missing or not a nested node)")]
pub struct PathNotFound {
    pub path: FieldPath,
    pub segment: String,
}

impl PathNotFound {
    fn new(path: &FieldPath, segment: &str) -> Self {
        Self {
            path: path.clone(),
            segment: segment.to_string(),
        }
    }
}

impl ConfigNode {
    /// Read the value at `path`
    ///
    /// Every segment but the last must name a nested node.
    pub fn get(&self, path: impl Into<FieldPath>) -> Result<&Value, PathNotFound> {
        let path = path.into();
        let Some((last, parents)) = path.0.split_last() else {
            return Err(PathNotFound::new(&path, ""));
        };

        let mut node = self;
        for segment in parents {
            node = node
                .field(segment)
                .and_then(Value::as_node)
                .ok_or_else(|| PathNotFound::new(&path, segment))?;
        }

        node.field(last)
            .ok_or_else(|| PathNotFound::new(&path, last))
    }

    pub fn get_mut(&mut self, path: impl Into<FieldPath>) -> Result<&mut Value, PathNotFound> {
        let path = path.into();
        let parent = self.parent_mut(&path)?;
        let last = &path.0[path.0.len() - 1];

        parent
            .field_mut(last)
            .ok_or_else(|| PathNotFound::new(&path, last))
    }

    /// Assign `value` at `path`
    ///
    /// Intermediate nodes are never created. The final segment is assigned as a plain field,
    /// replacing whatever was there. Returns the previous value.
    pub fn set(
        &mut self,
        path: impl Into<FieldPath>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, PathNotFound> {
        let path = path.into();
        let parent = self.parent_mut(&path)?;
        let last = path.0[path.0.len() - 1].clone();

        tracing::trace!(%path, "set field");
        Ok(parent.insert(last, value))
    }

    /// Node owning the last segment of a non-empty path
    fn parent_mut(&mut self, path: &FieldPath) -> Result<&mut ConfigNode, PathNotFound> {
        let Some((_, parents)) = path.0.split_last() else {
            return Err(PathNotFound::new(path, ""));
        };

        let mut node = self;
        for segment in parents {
            node = node
                .field_mut(segment)
                .and_then(Value::as_node_mut)
                .ok_or_else(|| PathNotFound::new(path, segment))?;
        }

        Ok(node)
    }
}
