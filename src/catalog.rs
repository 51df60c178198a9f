//! Flat, normalized view of an archive's entry list.

use std::collections::{HashMap, HashSet};

use crate::archive::{ArchiveHandle, RawEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
}

/// One catalogued item.
///
/// `path` is slash-delimited, non-empty and has no leading or trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub path: String,
    pub kind: EntryKind,
    /// Uncompressed size in bytes; `None` for directories
    pub size: Option<u64>,
}

impl ArchiveEntry {
    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Last path segment
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Normalize a raw entry name into a catalog path.
///
/// Backslashes are treated as separators, empty and `.` segments are
/// dropped. Returns `None` for names that denote the archive root
/// (`""`, `"/"`, `"./"`).
pub fn normalize_entry_name(name: &str) -> Option<String> {
    let name = name.replace('\\', "/");
    let segments: Vec<&str> = name
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();
    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}

/// Ordered set of catalogued entries with path lookup for files.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<ArchiveEntry>,
    files: HashMap<String, usize>,
}

impl Catalog {
    /// Build the catalog from decoder output.
    ///
    /// Root-only names are discarded. A file listed twice keeps its first
    /// position and its last size; a directory listed twice appears once.
    pub fn build(raw: &[RawEntry]) -> Self {
        let mut entries = Vec::with_capacity(raw.len());
        let mut files: HashMap<String, usize> = HashMap::new();
        let mut directories: HashSet<String> = HashSet::new();

        for item in raw {
            let Some(path) = normalize_entry_name(&item.name) else {
                continue;
            };

            if item.is_directory {
                if directories.insert(path.clone()) {
                    entries.push(ArchiveEntry {
                        path,
                        kind: EntryKind::Directory,
                        size: None,
                    });
                }
                continue;
            }

            let entry = ArchiveEntry {
                path,
                kind: EntryKind::File,
                size: Some(item.uncompressed_size),
            };
            match files.get(&entry.path) {
                Some(&i) => entries[i] = entry,
                None => {
                    files.insert(entry.path.clone(), entries.len());
                    entries.push(entry);
                }
            }
        }

        log::debug!(
            "catalogued {} entries ({} files) from {} raw records",
            entries.len(),
            files.len(),
            raw.len()
        );

        Self { entries, files }
    }

    pub fn from_archive(archive: &dyn ArchiveHandle) -> Self {
        Self::build(archive.entries())
    }

    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Look up a file entry by catalog path
    pub fn file(&self, path: &str) -> Option<&ArchiveEntry> {
        self.files.get(path).map(|&i| &self.entries[i])
    }

    pub fn file_size(&self, path: &str) -> Option<u64> {
        self.file(path).and_then(|e| e.size)
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Shorthand for `Catalog::build(raw).entries().to_vec()`.
pub fn build_catalog(raw: &[RawEntry]) -> Vec<ArchiveEntry> {
    Catalog::build(raw).entries
}
