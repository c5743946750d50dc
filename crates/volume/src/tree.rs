//! Directory tree synthesis from a flat stat dump.
//!
//! Remote volumes offer no listing API, only a recursive stat. The records
//! are grouped by parent path into a two-level map:
//!
//! ```text
//! ""          -> { "path" -> attrs, "path1" -> attrs }
//! "/path"     -> { "has" -> attrs }
//! "/path1"    -> { "a file" -> attrs }
//! ```
//!
//! Directories appear both as a child of their parent and as an outer key of
//! their own. Files only appear as children.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::io::BufRead;

use rayon::prelude::*;

use crate::config::ScanConfig;
use crate::error::Result;
use crate::stat::{parse_stat_line, StatRecord};
use crate::types::EntryAttributes;

/// Children of one directory, keyed by base name.
pub type DirectoryListing = BTreeMap<String, EntryAttributes>;

/// Tree of anchor-relative paths synthesized from a stat dump.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryTree {
    directories: BTreeMap<String, DirectoryListing>,
    root_attributes: Option<EntryAttributes>,
}

impl DirectoryTree {
    /// Builds a tree from an in-memory dump.
    pub fn parse(dump: &str, anchor: &str) -> Result<Self> {
        Self::from_lines(dump.lines(), anchor)
    }

    /// Builds a tree from dump lines. The first undecodable line aborts the
    /// build.
    pub fn from_lines<I, S>(lines: I, anchor: &str) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = TreeBuilder::new();
        for line in lines {
            let line = line.as_ref();
            if line.trim().is_empty() {
                continue;
            }
            builder.insert(parse_stat_line(line, anchor)?);
        }
        Ok(builder.finish())
    }

    /// Builds a tree from a reader, e.g. the stdout of a remote stat.
    pub fn from_reader<R: BufRead>(reader: R, anchor: &str) -> Result<Self> {
        let mut builder = TreeBuilder::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            builder.insert(parse_stat_line(&line, anchor)?);
        }
        Ok(builder.finish())
    }

    /// Builds a tree, decoding records in parallel.
    ///
    /// Decoding is spread across the rayon pool; merging stays sequential.
    /// The result is identical to [`DirectoryTree::parse`].
    pub fn par_parse(dump: &str, anchor: &str) -> Result<Self> {
        let lines: Vec<&str> = dump
            .lines()
            .filter(|line| !line.trim().is_empty())
            .collect();
        let records = lines
            .par_iter()
            .map(|line| parse_stat_line(line, anchor))
            .collect::<Result<Vec<_>>>()?;

        let mut builder = TreeBuilder::new();
        for record in records {
            builder.insert(record);
        }
        Ok(builder.finish())
    }

    /// Builds a tree for the scan described by `config`.
    pub fn from_config(dump: &str, config: &ScanConfig) -> Result<Self> {
        config.validate()?;
        let line_count = dump.lines().count();
        if line_count >= config.parallel_threshold {
            log::debug!("decoding {line_count} stat lines in parallel");
            Self::par_parse(dump, &config.mountpoint)
        } else {
            Self::parse(dump, &config.mountpoint)
        }
    }

    /// Returns the children of `path`, or `None` if it is not a directory.
    pub fn children(&self, path: &str) -> Option<&DirectoryListing> {
        self.directories.get(path)
    }

    /// Returns the attributes of `path`.
    ///
    /// The root only has attributes when the dump included a record for the
    /// anchor itself.
    pub fn attributes(&self, path: &str) -> Option<&EntryAttributes> {
        if path.is_empty() {
            return self.root_attributes.as_ref();
        }
        let (parent, name) = split_parent(path);
        self.directories.get(parent)?.get(name)
    }

    pub fn root_attributes(&self) -> Option<&EntryAttributes> {
        self.root_attributes.as_ref()
    }

    pub fn is_dir(&self, path: &str) -> bool {
        self.directories.contains_key(path)
    }

    /// Returns true if `path` is the root, a directory, or a child of one.
    pub fn contains(&self, path: &str) -> bool {
        path.is_empty() || self.is_dir(path) || self.attributes(path).is_some()
    }

    /// Iterates over directory paths and their listings, in path order.
    pub fn directories(&self) -> btree_map::Iter<'_, String, DirectoryListing> {
        self.directories.iter()
    }

    /// Number of directories, root included.
    pub fn len(&self) -> usize {
        self.directories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directories.is_empty()
    }
}

/// Splits a path at its last separator into `(parent, name)`.
///
/// A path without a separator has the root (`""`) as its parent.
pub fn split_parent(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(index) => (&path[..index], &path[index + 1..]),
        None => ("", path),
    }
}

struct TreeBuilder {
    directories: BTreeMap<String, DirectoryListing>,
    root_attributes: Option<EntryAttributes>,
    records: usize,
}

impl TreeBuilder {
    fn new() -> Self {
        let mut directories = BTreeMap::new();
        directories.insert(String::new(), DirectoryListing::new());
        Self {
            directories,
            root_attributes: None,
            records: 0,
        }
    }

    fn insert(&mut self, record: StatRecord) {
        self.records += 1;
        let StatRecord { path, attributes } = record;

        if path.is_empty() {
            self.root_attributes = Some(attributes);
            return;
        }

        let is_dir = attributes.is_dir();
        let (parent, name) = split_parent(&path);
        self.directories
            .entry(parent.to_string())
            .or_default()
            .insert(name.to_string(), attributes);

        // Merge with a listing created earlier by one of its children.
        if is_dir {
            self.directories.entry(path).or_default();
        }
    }

    fn finish(self) -> DirectoryTree {
        log::debug!(
            "built directory tree from {} stat records ({} directories)",
            self.records,
            self.directories.len()
        );
        DirectoryTree {
            directories: self.directories,
            root_attributes: self.root_attributes,
        }
    }
}
