//! # zipview
//!
//! Browse a ZIP archive as a virtual file tree, filter that tree by name and
//! preview individual entries on demand.
//!
//! Loading an archive only reads its Central Directory. The flat entry list
//! is normalized into a [`Catalog`], folded into a [`Directory`] tree, and
//! entry data is decoded only when a file is selected for preview or
//! download.
//!
//! ## Features
//!
//! - Archives from memory (an upload) or from a local file, read positionally
//! - ZIP64, STORED and DEFLATE, with CRC-32 verification
//! - Case-insensitive name filtering that keeps ancestor folders
//! - Text, image, document and opaque-binary previews with catalog sizes
//! - Stale preview results are dropped after reselection or archive swaps
//!
//! ## Example
//!
//! ```no_run
//! use zipview::{ArchiveViewer, PreviewState};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), zipview::ViewerError> {
//!     let bytes = std::fs::read("bundle.zip")?;
//!
//!     let mut viewer = ArchiveViewer::default();
//!     viewer.load_archive(bytes).await?;
//!
//!     viewer.set_query("readme");
//!     viewer.toggle_folder("docs");
//!     for row in viewer.rows() {
//!         println!("{}{}", "  ".repeat(row.depth), row.name);
//!     }
//!
//!     if let PreviewState::Ready(resolution) = viewer.preview_file("docs/readme.txt").await {
//!         println!("{} ({})", resolution.path, resolution.size_label());
//!     }
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod catalog;
pub mod classify;
pub mod config;
pub mod download;
pub mod error;
pub mod filter;
pub mod io;
pub mod preview;
pub mod resolver;
pub mod state;
pub mod tree;
pub mod viewer;
pub mod zip;

pub use archive::{ArchiveHandle, RawEntry, ZipArchive};
pub use catalog::{ArchiveEntry, Catalog, EntryKind, build_catalog};
pub use classify::{ContentKind, IconKind};
pub use config::ViewerConfig;
pub use download::{DirectorySink, DownloadSink};
pub use error::{ViewerError, ViewerResult};
pub use filter::filter;
pub use io::{LocalFileReader, MemoryReader, ReadAt};
pub use preview::{ByteSource, PreviewResult, Resolution, size_label};
pub use resolver::ContentResolver;
pub use state::SelectionState;
pub use tree::{ArchiveTree, Directory, PathConflict, TreeNode, TreeRow, build_tree};
pub use viewer::{ArchiveViewer, LoadedArchive, PendingPreview, PreviewState, ResolvedPreview};
