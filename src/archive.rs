//! The archive decoding seam.
//!
//! [`ArchiveHandle`] is what the rest of the engine sees of a loaded
//! archive: a flat list of entry descriptors and an async read addressed by
//! path. [`ZipArchive`] implements it on top of the [`zip`](crate::zip) decoder.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::catalog::normalize_entry_name;
use crate::error::{ViewerError, ViewerResult};
use crate::io::{MemoryReader, ReadAt};
use crate::zip::{DecodeOptions, ZipExtractor, ZipFileEntry};

/// Entry descriptor as reported by the decoder, before cataloguing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub name: String,
    pub is_directory: bool,
    pub uncompressed_size: u64,
}

impl RawEntry {
    pub fn file(name: &str, uncompressed_size: u64) -> Self {
        Self {
            name: name.to_string(),
            is_directory: false,
            uncompressed_size,
        }
    }

    pub fn directory(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_directory: true,
            uncompressed_size: 0,
        }
    }
}

/// A loaded archive.
#[async_trait]
pub trait ArchiveHandle: Send + Sync {
    /// Entry descriptors in archive order
    fn entries(&self) -> &[RawEntry];

    /// Whether a file exists at this (catalog-normalized) path
    fn contains(&self, path: &str) -> bool;

    /// Decode the full content of the file at `path`.
    ///
    /// Fails with [`ViewerError::EntryNotFound`] for unknown paths and
    /// [`ViewerError::Read`] when the entry exists but cannot be decoded.
    async fn read(&self, path: &str) -> ViewerResult<Vec<u8>>;
}

/// ZIP implementation of [`ArchiveHandle`]
pub struct ZipArchive<R: ReadAt + ?Sized> {
    extractor: ZipExtractor<R>,
    raw: Vec<RawEntry>,
    records: Vec<ZipFileEntry>,
    /// normalized file path -> index into `records`
    files: HashMap<String, usize>,
}

impl ZipArchive<MemoryReader> {
    /// Parse an archive held in memory.
    pub async fn from_bytes(bytes: Vec<u8>, options: DecodeOptions) -> ViewerResult<Self> {
        Self::open(Arc::new(MemoryReader::new(bytes)), options).await
    }
}

impl<R: ReadAt + ?Sized> ZipArchive<R> {
    /// Read the central directory of `reader`.
    ///
    /// No entry data is touched here.
    pub async fn open(reader: Arc<R>, options: DecodeOptions) -> ViewerResult<Self> {
        let extractor = ZipExtractor::with_options(reader, options);
        let records = extractor
            .list_files()
            .await
            .map_err(ViewerError::MalformedArchive)?;

        let raw = records
            .iter()
            .map(|r| RawEntry {
                name: r.file_name.clone(),
                is_directory: r.is_directory,
                uncompressed_size: r.uncompressed_size,
            })
            .collect();

        // Later records shadow earlier ones with the same name
        let files = records
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.is_directory)
            .filter_map(|(i, r)| normalize_entry_name(&r.file_name).map(|p| (p, i)))
            .collect();

        Ok(Self {
            extractor,
            raw,
            records,
            files,
        })
    }
}

#[async_trait]
impl<R: ReadAt + ?Sized + 'static> ArchiveHandle for ZipArchive<R> {
    fn entries(&self) -> &[RawEntry] {
        &self.raw
    }

    fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    async fn read(&self, path: &str) -> ViewerResult<Vec<u8>> {
        let index = *self
            .files
            .get(path)
            .ok_or_else(|| ViewerError::EntryNotFound(path.to_string()))?;
        self.extractor
            .extract_to_memory(&self.records[index])
            .await
            .map_err(|source| ViewerError::Read {
                path: path.to_string(),
                source,
            })
    }
}
