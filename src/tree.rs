//! Folding the flat catalog into a directory tree.
//!
//! A node is either a [`Directory`] of named children or a [`TreeNode::Leaf`]
//! marker. Leaves carry nothing: the concatenated segment names on the way
//! down form the catalog path used to look the file up.

use std::collections::{HashMap, HashSet};

use crate::catalog::{Catalog, EntryKind};
use crate::classify::IconKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    Directory(Directory),
    Leaf,
}

impl TreeNode {
    pub fn is_directory(&self) -> bool {
        matches!(self, TreeNode::Directory(_))
    }

    pub fn as_directory(&self) -> Option<&Directory> {
        match self {
            TreeNode::Directory(dir) => Some(dir),
            TreeNode::Leaf => None,
        }
    }

    fn as_directory_mut(&mut self) -> Option<&mut Directory> {
        match self {
            TreeNode::Directory(dir) => Some(dir),
            TreeNode::Leaf => None,
        }
    }
}

/// Named children in first-encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directory {
    children: Vec<(String, TreeNode)>,
    index: HashMap<String, usize>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn children(&self) -> impl Iterator<Item = (&str, &TreeNode)> {
        self.children.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn get(&self, name: &str) -> Option<&TreeNode> {
        self.index.get(name).map(|&i| &self.children[i].1)
    }

    /// Walk a slash-delimited path from this directory.
    ///
    /// The empty path names no node.
    pub fn lookup(&self, path: &str) -> Option<&TreeNode> {
        let mut segments = path.split('/').filter(|s| !s.is_empty()).peekable();
        if segments.peek().is_none() {
            return None;
        }

        let mut current = self;
        while let Some(segment) = segments.next() {
            let node = current.get(segment)?;
            if segments.peek().is_none() {
                return Some(node);
            }
            current = node.as_directory()?;
        }
        None
    }

    /// Append a child. An existing child of the same name is replaced in place.
    pub fn insert(&mut self, name: &str, node: TreeNode) {
        match self.index.get(name) {
            Some(&i) => self.children[i].1 = node,
            None => {
                self.index.insert(name.to_string(), self.children.len());
                self.children.push((name.to_string(), node));
            }
        }
    }

    /// Child directory `name`, created if missing.
    ///
    /// A leaf in the way is turned into an empty directory; the second value
    /// reports whether that happened.
    fn ensure_directory(&mut self, name: &str) -> Option<(&mut Directory, bool)> {
        let i = match self.index.get(name) {
            Some(&i) => i,
            None => {
                self.insert(name, TreeNode::Directory(Directory::new()));
                self.children.len() - 1
            }
        };

        let slot = &mut self.children[i].1;
        let replaced = !slot.is_directory();
        if replaced {
            *slot = TreeNode::Directory(Directory::new());
        }
        slot.as_directory_mut().map(|dir| (dir, replaced))
    }

    /// Full paths of every leaf below this directory, depth-first.
    pub fn file_paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_file_paths(self, "", &mut out);
        out
    }

    /// Flatten into display rows, descending only into expanded folders.
    pub fn rows(&self, expanded: &HashSet<String>, catalog: &Catalog) -> Vec<TreeRow> {
        let mut out = Vec::new();
        push_rows(self, "", 0, expanded, catalog, &mut out);
        out
    }
}

fn join_path(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_string()
    } else {
        format!("{base}/{name}")
    }
}

fn collect_file_paths(dir: &Directory, base: &str, out: &mut Vec<String>) {
    for (name, node) in dir.children() {
        let path = join_path(base, name);
        match node {
            TreeNode::Leaf => out.push(path),
            TreeNode::Directory(sub) => collect_file_paths(sub, &path, out),
        }
    }
}

fn push_rows(
    dir: &Directory,
    base: &str,
    depth: usize,
    expanded: &HashSet<String>,
    catalog: &Catalog,
    out: &mut Vec<TreeRow>,
) {
    for (name, node) in dir.children() {
        let path = join_path(base, name);
        match node {
            TreeNode::Leaf => out.push(TreeRow {
                size: catalog.file_size(&path),
                icon: IconKind::for_file(name),
                name: name.to_string(),
                path,
                depth,
                is_dir: false,
                expanded: false,
            }),
            TreeNode::Directory(sub) => {
                let is_open = expanded.contains(&path);
                out.push(TreeRow {
                    size: None,
                    icon: IconKind::Folder,
                    name: name.to_string(),
                    path: path.clone(),
                    depth,
                    is_dir: true,
                    expanded: is_open,
                });
                if is_open {
                    push_rows(sub, &path, depth + 1, expanded, catalog, out);
                }
            }
        }
    }
}

/// One visible line of the tree pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub path: String,
    pub name: String,
    pub depth: usize,
    pub is_dir: bool,
    pub expanded: bool,
    pub icon: IconKind,
    /// Uncompressed size for files
    pub size: Option<u64>,
}

/// A name that the catalog used both as a file and as a directory.
///
/// The directory interpretation is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathConflict {
    pub path: String,
}

/// Root directory of an archive plus the conflicts met while building it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveTree {
    root: Directory,
    conflicts: Vec<PathConflict>,
}

impl ArchiveTree {
    pub fn root(&self) -> &Directory {
        &self.root
    }

    pub fn conflicts(&self) -> &[PathConflict] {
        &self.conflicts
    }

    pub fn into_root(self) -> Directory {
        self.root
    }
}

/// Fold the catalog into a tree.
///
/// Intermediate segments always become directories, so implicit and explicit
/// directories coalesce. When a file and a directory share a path the
/// directory wins, whichever came first.
pub fn build_tree(catalog: &Catalog) -> ArchiveTree {
    let mut root = Directory::new();
    let mut conflicts = Vec::new();

    'entries: for entry in catalog.entries() {
        let segments: Vec<&str> = entry.path.split('/').filter(|s| !s.is_empty()).collect();
        let Some((last, parents)) = segments.split_last() else {
            continue;
        };

        let mut current = &mut root;
        let mut walked = String::new();
        for segment in parents {
            walked = join_path(&walked, segment);
            let Some((dir, replaced)) = current.ensure_directory(segment) else {
                continue 'entries;
            };
            if replaced {
                record_conflict(&mut conflicts, &walked);
            }
            current = dir;
        }

        match entry.kind {
            EntryKind::Directory => {
                if let Some((_, true)) = current.ensure_directory(last) {
                    record_conflict(&mut conflicts, &entry.path);
                }
            }
            EntryKind::File => match current.get(last) {
                None => current.insert(last, TreeNode::Leaf),
                Some(TreeNode::Leaf) => {}
                Some(TreeNode::Directory(_)) => record_conflict(&mut conflicts, &entry.path),
            },
        }
    }

    log::debug!(
        "built tree with {} top-level nodes, {} conflicts",
        root.len(),
        conflicts.len()
    );

    ArchiveTree { root, conflicts }
}

fn record_conflict(conflicts: &mut Vec<PathConflict>, path: &str) {
    log::warn!("path conflict at {path}: keeping directory, dropping file");
    conflicts.push(PathConflict {
        path: path.to_string(),
    });
}
