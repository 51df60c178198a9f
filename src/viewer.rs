//! The engine surface a host UI drives.
//!
//! [`ArchiveViewer`] owns the active archive, the query, the selection and
//! the current preview. Work that suspends (parsing an upload, decoding an
//! entry) is split off into values that do not borrow the viewer, so the
//! host can keep applying input while they run:
//!
//! - [`ArchiveViewer::open`] parses bytes into a [`LoadedArchive`], which
//!   [`ArchiveViewer::install`] swaps in;
//! - [`ArchiveViewer::select_file`] returns a [`PendingPreview`] whose
//!   [`resolve`](PendingPreview::resolve) output goes back through
//!   [`ArchiveViewer::apply`], which drops it if the archive or selection
//!   has moved on since.

use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

use crate::archive::{ArchiveHandle, ZipArchive};
use crate::catalog::Catalog;
use crate::config::ViewerConfig;
use crate::download::DownloadSink;
use crate::error::{ViewerError, ViewerResult};
use crate::filter::filter;
use crate::io::LocalFileReader;
use crate::preview::Resolution;
use crate::resolver::ContentResolver;
use crate::state::SelectionState;
use crate::tree::{ArchiveTree, Directory, PathConflict, TreeRow, build_tree};

/// A parsed archive with its catalog and tree, ready to install.
pub struct LoadedArchive {
    resolver: ContentResolver,
}

impl LoadedArchive {
    /// Catalog and tree an already-open archive.
    pub fn new(archive: Arc<dyn ArchiveHandle>) -> Self {
        let catalog = Catalog::from_archive(archive.as_ref());
        let tree = build_tree(&catalog);
        Self {
            resolver: ContentResolver::new(archive, Arc::new(catalog), Arc::new(tree)),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        self.resolver.catalog()
    }

    pub fn tree(&self) -> &ArchiveTree {
        self.resolver.tree()
    }
}

/// What the preview pane should show.
#[derive(Debug, Default)]
pub enum PreviewState {
    #[default]
    Empty,
    Loading {
        path: String,
    },
    Ready(Resolution),
    /// Resolution failed; distinct from an `Unresolved` preview
    Failed {
        path: String,
        error: ViewerError,
    },
}

/// A preview request detached from the viewer.
pub struct PendingPreview {
    generation: u64,
    path: String,
    resolver: ContentResolver,
}

impl PendingPreview {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub async fn resolve(self) -> ResolvedPreview {
        let outcome = self.resolver.resolve(&self.path).await;
        ResolvedPreview {
            generation: self.generation,
            path: self.path,
            outcome,
        }
    }
}

/// Outcome of a [`PendingPreview`], to be handed to [`ArchiveViewer::apply`].
pub struct ResolvedPreview {
    generation: u64,
    path: String,
    outcome: ViewerResult<Resolution>,
}

impl ResolvedPreview {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn outcome(&self) -> &ViewerResult<Resolution> {
        &self.outcome
    }

    pub fn into_outcome(self) -> ViewerResult<Resolution> {
        self.outcome
    }
}

pub struct ArchiveViewer {
    config: ViewerConfig,
    loaded: Option<LoadedArchive>,
    /// Bumped on every install; stale previews carry an older value
    generation: u64,
    query: String,
    /// Filtered tree for a non-blank query
    filtered: Option<Directory>,
    selection: SelectionState,
    preview: PreviewState,
}

impl Default for ArchiveViewer {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

impl ArchiveViewer {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            loaded: None,
            generation: 0,
            query: String::new(),
            filtered: None,
            selection: SelectionState::new(),
            preview: PreviewState::Empty,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Loading
    // -------------------------------------------------------------------------

    /// Parse archive bytes without touching any viewer state.
    pub async fn open(bytes: Vec<u8>, config: &ViewerConfig) -> ViewerResult<LoadedArchive> {
        let archive = ZipArchive::from_bytes(bytes, config.decode_options()).await?;
        Ok(LoadedArchive::new(Arc::new(archive)))
    }

    /// Open an archive file from disk, reading entries on demand.
    ///
    /// The file name must end in one of the configured extensions.
    pub async fn open_file(path: &Path, config: &ViewerConfig) -> ViewerResult<LoadedArchive> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !config.accepts(&name) {
            return Err(ViewerError::UnsupportedArchive(name));
        }

        let reader = LocalFileReader::new(path).map_err(|e| match e.downcast::<std::io::Error>() {
            Ok(io) => ViewerError::Io(io),
            Err(e) => ViewerError::MalformedArchive(e),
        })?;
        let archive = ZipArchive::open(Arc::new(reader), config.decode_options()).await?;
        Ok(LoadedArchive::new(Arc::new(archive)))
    }

    /// Make `loaded` the active archive.
    ///
    /// Selection, expansion, query and preview are reset. The previous
    /// archive is dropped, which releases byte sources handed out for it.
    pub fn install(&mut self, loaded: LoadedArchive) {
        self.generation += 1;
        log::info!(
            "loaded archive: {} entries, {} files, {} path conflicts",
            loaded.catalog().len(),
            loaded.catalog().file_count(),
            loaded.tree().conflicts().len()
        );
        self.loaded = Some(loaded);
        self.query.clear();
        self.filtered = None;
        self.selection = SelectionState::new();
        self.preview = PreviewState::Empty;
    }

    /// Parse and install archive bytes.
    ///
    /// On failure the current archive and state are left as they were.
    pub async fn load_archive(&mut self, bytes: Vec<u8>) -> ViewerResult<()> {
        let loaded = Self::open(bytes, &self.config).await?;
        self.install(loaded);
        Ok(())
    }

    /// Open and install an archive file from disk.
    pub async fn load_archive_file(&mut self, path: &Path) -> ViewerResult<()> {
        let loaded = Self::open_file(path, &self.config).await?;
        self.install(loaded);
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        self.loaded.as_ref().map(LoadedArchive::catalog)
    }

    pub fn conflicts(&self) -> &[PathConflict] {
        self.loaded
            .as_ref()
            .map(|l| l.tree().conflicts())
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Tree and query
    // -------------------------------------------------------------------------

    /// Filter the tree by `query`, always starting from the full tree.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.filtered = self
            .loaded
            .as_ref()
            .map(|l| filter(l.tree().root(), query))
            .and_then(|tree| match tree {
                Cow::Borrowed(_) => None,
                Cow::Owned(dir) => Some(dir),
            });
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// The tree to display: filtered when a query is set.
    pub fn tree(&self) -> Option<&Directory> {
        match &self.filtered {
            Some(dir) => Some(dir),
            None => self.loaded.as_ref().map(|l| l.tree().root()),
        }
    }

    /// True when there is nothing to show in the tree pane
    pub fn is_empty(&self) -> bool {
        self.tree().is_none_or(Directory::is_empty)
    }

    /// Visible rows of the displayed tree.
    pub fn rows(&self) -> Vec<TreeRow> {
        match (self.tree(), self.loaded.as_ref()) {
            (Some(tree), Some(loaded)) => {
                tree.rows(self.selection.expanded_folders(), loaded.catalog())
            }
            _ => Vec::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Selection and preview
    // -------------------------------------------------------------------------

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn preview(&self) -> &PreviewState {
        &self.preview
    }

    pub fn toggle_folder(&mut self, path: &str) {
        self.selection = self.selection.toggle_folder(path);
    }

    /// Make `path` the active file and start resolving it.
    ///
    /// Any previous preview is discarded. Returns `None` when no archive is
    /// loaded.
    pub fn select_file(&mut self, path: &str) -> Option<PendingPreview> {
        self.selection = self.selection.select_file(path);
        let loaded = self.loaded.as_ref()?;
        self.preview = PreviewState::Loading {
            path: path.to_string(),
        };
        Some(PendingPreview {
            generation: self.generation,
            path: path.to_string(),
            resolver: loaded.resolver.clone(),
        })
    }

    /// Install a resolved preview if it is still current.
    ///
    /// Returns `false`, leaving state untouched, when the archive was
    /// replaced or another file was selected since the request was made.
    pub fn apply(&mut self, resolved: ResolvedPreview) -> bool {
        if resolved.generation != self.generation
            || self.selection.active_file() != Some(resolved.path.as_str())
        {
            log::debug!("discarding stale preview for {}", resolved.path);
            return false;
        }

        self.preview = match resolved.outcome {
            Ok(resolution) => PreviewState::Ready(resolution),
            Err(error) => {
                log::warn!("cannot preview {}: {}", resolved.path, error);
                PreviewState::Failed {
                    path: resolved.path,
                    error,
                }
            }
        };
        true
    }

    /// Select, resolve and apply in one step.
    pub async fn preview_file(&mut self, path: &str) -> &PreviewState {
        if let Some(pending) = self.select_file(path) {
            let resolved = pending.resolve().await;
            self.apply(resolved);
        }
        &self.preview
    }

    /// Extract the active file and hand it to `sink` under its base name.
    ///
    /// Returns the suggested name used.
    pub async fn download_selected(&self, sink: &dyn DownloadSink) -> ViewerResult<String> {
        let loaded = self.loaded.as_ref().ok_or(ViewerError::NoArchive)?;
        let path = self.selection.active_file().ok_or(ViewerError::NoSelection)?;

        loaded.resolver.expect_file(path)?;
        let archive = loaded.resolver.archive();
        let bytes = archive.read(path).await?;
        let name = path.rsplit('/').next().unwrap_or(path).to_string();
        sink.save(&name, bytes)
            .await
            .map_err(|source| ViewerError::Download {
                name: name.clone(),
                source,
            })?;
        Ok(name)
    }
}
