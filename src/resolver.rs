use std::sync::Arc;

use crate::archive::ArchiveHandle;
use crate::catalog::Catalog;
use crate::classify::ContentKind;
use crate::error::{ViewerError, ViewerResult};
use crate::preview::{ByteSource, PreviewResult, Resolution};
use crate::tree::{ArchiveTree, TreeNode};

/// Turns a selected file path into a [`Resolution`].
///
/// Cloning is cheap; every clone resolves against the same archive. Each
/// call only ever reads the path it was given, so overlapping calls cannot
/// cross-deliver content.
#[derive(Clone)]
pub struct ContentResolver {
    archive: Arc<dyn ArchiveHandle>,
    catalog: Arc<Catalog>,
    tree: Arc<ArchiveTree>,
}

impl ContentResolver {
    pub fn new(
        archive: Arc<dyn ArchiveHandle>,
        catalog: Arc<Catalog>,
        tree: Arc<ArchiveTree>,
    ) -> Self {
        Self {
            archive,
            catalog,
            tree,
        }
    }

    /// Fail unless `path` names a leaf of the tree.
    pub(crate) fn expect_file(&self, path: &str) -> ViewerResult<()> {
        match self.tree.root().lookup(path) {
            Some(TreeNode::Leaf) => Ok(()),
            Some(TreeNode::Directory(_)) => {
                log::error!("file operation on directory {path}");
                Err(ViewerError::NotAFile(path.to_string()))
            }
            None => Err(ViewerError::EntryNotFound(path.to_string())),
        }
    }

    /// Resolve the file at `path`.
    ///
    /// Text is decoded eagerly (UTF-8, invalid sequences replaced); images,
    /// documents and unknown types get a lazy [`ByteSource`]. The reported
    /// size is the catalog's uncompressed size, not the decoded length.
    pub async fn resolve(&self, path: &str) -> ViewerResult<Resolution> {
        self.expect_file(path)?;

        let size = self
            .catalog
            .file_size(path)
            .ok_or_else(|| ViewerError::EntryNotFound(path.to_string()))?;
        if !self.archive.contains(path) {
            return Err(ViewerError::EntryNotFound(path.to_string()));
        }

        let kind = ContentKind::from_name(path);
        log::debug!("resolving {path} as {kind:?} ({size} bytes)");

        let preview = match kind {
            ContentKind::Text => {
                let bytes = self.archive.read(path).await?;
                PreviewResult::Text {
                    content: String::from_utf8_lossy(&bytes).into_owned(),
                }
            }
            ContentKind::Image => PreviewResult::Image {
                source: self.source(path, size),
            },
            ContentKind::Document => PreviewResult::Document {
                source: self.source(path, size),
            },
            ContentKind::Binary => PreviewResult::Unresolved {
                source: self.source(path, size),
            },
        };

        Ok(Resolution {
            path: path.to_string(),
            size,
            preview,
        })
    }

    fn source(&self, path: &str, size: u64) -> ByteSource {
        ByteSource::new(&self.archive, path, size)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn tree(&self) -> &ArchiveTree {
        &self.tree
    }

    pub(crate) fn archive(&self) -> &Arc<dyn ArchiveHandle> {
        &self.archive
    }
}
