//! Entries and entry schemas as seen by primaries.

use serde::{Deserialize, Serialize};

use crate::tree::{split_parent, DirectoryTree};
use crate::types::EntryAttributes;

/// Type-level description of a class of entries.
///
/// The path is the schema's canonical identifier, e.g.
/// `docker/containers/container`. It is known before any concrete entry of
/// the class has been listed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntrySchema {
    path: String,
    label: String,
    singleton: bool,
}

impl EntrySchema {
    pub fn new(path: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
            singleton: false,
        }
    }

    /// Marks the schema as describing exactly one entry.
    pub fn singleton(mut self) -> Self {
        self.singleton = true;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_singleton(&self) -> bool {
        self.singleton
    }
}

/// A concrete node of the virtual filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub path: String,
    pub attributes: Option<EntryAttributes>,
    pub schema: Option<EntrySchema>,
}

impl Entry {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            attributes: None,
            schema: None,
        }
    }

    pub fn with_attributes(mut self, attributes: EntryAttributes) -> Self {
        self.attributes = Some(attributes);
        self
    }

    pub fn with_schema(mut self, schema: EntrySchema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Materializes the node at `path` of a synthesized tree.
    ///
    /// Returns `None` for paths the tree does not know. Volume nodes carry no
    /// schema.
    pub fn from_tree(tree: &DirectoryTree, path: &str) -> Option<Self> {
        if !tree.contains(path) {
            return None;
        }
        let (_, name) = split_parent(path);
        Some(Self {
            name: name.to_string(),
            path: path.to_string(),
            attributes: tree.attributes(path).cloned(),
            schema: None,
        })
    }

    pub fn schema(&self) -> Option<&EntrySchema> {
        self.schema.as_ref()
    }

    pub fn attributes(&self) -> Option<&EntryAttributes> {
        self.attributes.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = "96 1 1 1 41ed mnt/dir\n0 1 1 1 81a4 mnt/dir/file\n";

    #[test]
    fn materializes_tree_nodes() {
        let tree = DirectoryTree::parse(DUMP, "mnt").expect("parse");

        let file = Entry::from_tree(&tree, "/dir/file").expect("file");
        assert_eq!(file.name, "file");
        assert_eq!(file.attributes().map(EntryAttributes::size), Some(0));
        assert!(file.schema().is_none());

        let root = Entry::from_tree(&tree, "").expect("root");
        assert_eq!(root.name, "");
        assert!(root.attributes().is_none());

        assert!(Entry::from_tree(&tree, "/nope").is_none());
    }

    #[test]
    fn builds_schema() {
        let schema = EntrySchema::new("docker/containers", "containers").singleton();
        assert_eq!(schema.path(), "docker/containers");
        assert_eq!(schema.label(), "containers");
        assert!(schema.is_singleton());
    }
}
