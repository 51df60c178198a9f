//! Query filtering over the archive tree.

use std::borrow::Cow;

use crate::tree::{Directory, TreeNode};

/// Prune `root` to the nodes whose name contains `query`, plus their ancestors.
///
/// Matching is a case-insensitive substring test on each node's own name,
/// not its path. A directory survives when its name matches or when any
/// child survives; its children are filtered either way. The query is
/// trimmed first and a blank query borrows `root` unchanged.
///
/// Always filter the full tree: re-filtering a filtered tree with a different
/// query cannot bring back nodes that were pruned.
pub fn filter<'a>(root: &'a Directory, query: &str) -> Cow<'a, Directory> {
    let query = query.trim();
    if query.is_empty() {
        return Cow::Borrowed(root);
    }
    Cow::Owned(filter_directory(root, &query.to_lowercase()))
}

fn filter_directory(dir: &Directory, needle: &str) -> Directory {
    let mut out = Directory::new();
    for (name, node) in dir.children() {
        let matches = name.to_lowercase().contains(needle);
        match node {
            TreeNode::Leaf => {
                if matches {
                    out.insert(name, TreeNode::Leaf);
                }
            }
            TreeNode::Directory(sub) => {
                let kept = filter_directory(sub, needle);
                if matches || !kept.is_empty() {
                    out.insert(name, TreeNode::Directory(kept));
                }
            }
        }
    }
    out
}
