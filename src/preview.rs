use std::sync::{Arc, Weak};

use crate::archive::ArchiveHandle;
use crate::classify::ContentKind;
use crate::error::{ViewerError, ViewerResult};

/// Lazy handle to one entry's bytes.
///
/// Nothing is decoded until [`read`](Self::read) is called. The handle only
/// weakly refers to its archive: once the archive is replaced, the handle is
/// released and reads fail with [`ViewerError::EntryNotFound`].
#[derive(Clone)]
pub struct ByteSource {
    archive: Weak<dyn ArchiveHandle>,
    path: String,
    size: u64,
}

impl ByteSource {
    pub(crate) fn new(archive: &Arc<dyn ArchiveHandle>, path: &str, size: u64) -> Self {
        Self {
            archive: Arc::downgrade(archive),
            path: path.to_string(),
            size,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Uncompressed size from the catalog
    pub fn size(&self) -> u64 {
        self.size
    }

    /// MIME type for image and document sources
    pub fn mime_type(&self) -> Option<&'static str> {
        ContentKind::mime_type(&self.path)
    }

    /// Whether the archive behind this handle has been dropped
    pub fn is_released(&self) -> bool {
        self.archive.strong_count() == 0
    }

    pub async fn read(&self) -> ViewerResult<Vec<u8>> {
        let archive = self
            .archive
            .upgrade()
            .ok_or_else(|| ViewerError::EntryNotFound(self.path.clone()))?;
        archive.read(&self.path).await
    }
}

impl std::fmt::Debug for ByteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteSource")
            .field("path", &self.path)
            .field("size", &self.size)
            .field("released", &self.is_released())
            .finish()
    }
}

/// Previewable form of a resolved entry.
#[derive(Debug, Clone)]
pub enum PreviewResult {
    Text { content: String },
    Image { source: ByteSource },
    Document { source: ByteSource },
    /// No renderer for this type; the bytes can still be downloaded
    Unresolved { source: ByteSource },
}

impl PreviewResult {
    pub fn kind(&self) -> ContentKind {
        match self {
            PreviewResult::Text { .. } => ContentKind::Text,
            PreviewResult::Image { .. } => ContentKind::Image,
            PreviewResult::Document { .. } => ContentKind::Document,
            PreviewResult::Unresolved { .. } => ContentKind::Binary,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            PreviewResult::Text { content } => Some(content),
            _ => None,
        }
    }

    pub fn source(&self) -> Option<&ByteSource> {
        match self {
            PreviewResult::Text { .. } => None,
            PreviewResult::Image { source }
            | PreviewResult::Document { source }
            | PreviewResult::Unresolved { source } => Some(source),
        }
    }
}

/// A resolved entry: its path, catalog size and preview.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub path: String,
    /// Uncompressed size in bytes, from the catalog
    pub size: u64,
    pub preview: PreviewResult,
}

impl Resolution {
    pub fn size_label(&self) -> String {
        size_label(self.size)
    }

    /// Last path segment, used as the suggested download name
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Format a byte count in KiB with two decimals.
///
/// Sizes below one KiB show as `<1 KB` rather than `0.00 KB`.
///
/// ```
/// use zipview::size_label;
///
/// assert_eq!(size_label(0), "0 KB");
/// assert_eq!(size_label(5), "<1 KB");
/// assert_eq!(size_label(1536), "1.50 KB");
/// ```
pub fn size_label(size: u64) -> String {
    const KB: u64 = 1024;

    if size == 0 {
        "0 KB".to_string()
    } else if size < KB {
        "<1 KB".to_string()
    } else {
        format!("{:.2} KB", size as f64 / KB as f64)
    }
}
