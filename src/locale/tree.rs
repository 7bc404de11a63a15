use crate::error::{AuditError, Result};
use indexmap::IndexMap;
use serde_json::Value;

/// Delimiter between key path segments
pub const KEY_DELIMITER: char = '.';

/// Split a key path into its segments, rejecting empty paths and empty segments
pub fn segments(path: &str) -> Result<Vec<&str>> {
    let parts: Vec<&str> = path.split(KEY_DELIMITER).collect();
    if parts.iter().any(|p| p.is_empty()) {
        return Err(AuditError::InvalidKeyPath(path.to_string()));
    }
    Ok(parts)
}

/// A node in a locale tree
#[derive(Debug, Clone, PartialEq)]
pub enum LocaleNode {
    /// Translatable string
    Text(String),
    /// Nested section
    Branch(LocaleTree),
    /// Any other scalar or sequence (number, bool, null, array), kept verbatim
    Literal(Value),
}

impl LocaleNode {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            LocaleNode::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_branch(&self) -> bool {
        matches!(self, LocaleNode::Branch(_))
    }

    /// Whether the node counts as an absent translation
    pub fn is_null(&self) -> bool {
        matches!(self, LocaleNode::Literal(Value::Null))
    }
}

impl From<&str> for LocaleNode {
    fn from(s: &str) -> Self {
        LocaleNode::Text(s.to_string())
    }
}

impl From<String> for LocaleNode {
    fn from(s: String) -> Self {
        LocaleNode::Text(s)
    }
}

/// One language's translation catalog as an ordered nested mapping.
///
/// Keys keep their declaration order, so traversal and serialization are
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocaleTree {
    entries: IndexMap<String, LocaleNode>,
}

impl LocaleTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of direct children
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate over direct children in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &LocaleNode)> {
        self.entries.iter()
    }

    /// Insert a direct child, replacing any previous value under `key`
    pub fn insert(&mut self, key: impl Into<String>, node: LocaleNode) {
        self.entries.insert(key.into(), node);
    }

    /// Every leaf's full dotted path, depth-first in declaration order.
    ///
    /// Branches are never reported, including empty ones.
    pub fn key_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        self.collect_paths(None, &mut paths);
        paths
    }

    fn collect_paths(&self, prefix: Option<&str>, paths: &mut Vec<String>) {
        for (key, node) in &self.entries {
            let full = join(prefix, key);
            match node {
                LocaleNode::Branch(child) => child.collect_paths(Some(&full), paths),
                _ => paths.push(full),
            }
        }
    }

    /// Number of leaves in the tree
    pub fn leaf_count(&self) -> usize {
        self.entries
            .values()
            .map(|node| match node {
                LocaleNode::Branch(child) => child.leaf_count(),
                _ => 1,
            })
            .sum()
    }

    /// Paths whose value is blank text, null, or an empty section
    pub fn empty_value_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        self.collect_empty(None, &mut paths);
        paths
    }

    fn collect_empty(&self, prefix: Option<&str>, paths: &mut Vec<String>) {
        for (key, node) in &self.entries {
            let full = join(prefix, key);
            match node {
                LocaleNode::Text(s) if s.trim().is_empty() => paths.push(full),
                LocaleNode::Literal(Value::Null) => paths.push(full),
                LocaleNode::Branch(child) if child.is_empty() => paths.push(full),
                LocaleNode::Branch(child) => child.collect_empty(Some(&full), paths),
                _ => {}
            }
        }
    }

    /// Resolve a key path to a leaf or subtree.
    ///
    /// Returns `None` if a segment is missing or the path descends through a leaf.
    pub fn get(&self, path: &str) -> Option<&LocaleNode> {
        let mut parts = path.split(KEY_DELIMITER);
        let first = parts.next()?;
        let mut node = self.entries.get(first)?;
        for part in parts {
            match node {
                LocaleNode::Branch(child) => node = child.entries.get(part)?,
                _ => return None,
            }
        }
        Some(node)
    }

    pub fn get_text(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(LocaleNode::as_text)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Set the value at `path`, creating missing intermediate sections.
    ///
    /// Siblings are left untouched. Fails with `StructuralConflict` when an
    /// intermediate segment already holds a leaf.
    pub fn set(&mut self, path: &str, value: impl Into<LocaleNode>) -> Result<()> {
        let parts = segments(path)?;
        let (last, parents) = match parts.split_last() {
            Some(split) => split,
            None => return Err(AuditError::InvalidKeyPath(path.to_string())),
        };

        let mut current = self;
        for (depth, part) in parents.iter().enumerate() {
            let slot = current
                .entries
                .entry((*part).to_string())
                .or_insert_with(|| LocaleNode::Branch(LocaleTree::new()));
            current = match slot {
                LocaleNode::Branch(child) => child,
                _ => {
                    return Err(AuditError::structural_conflict(
                        path,
                        parts[..=depth].join("."),
                    ))
                }
            };
        }

        current.entries.insert((*last).to_string(), value.into());
        Ok(())
    }
}

fn join(prefix: Option<&str>, key: &str) -> String {
    match prefix {
        Some(p) => format!("{}{}{}", p, KEY_DELIMITER, key),
        None => key.to_string(),
    }
}
