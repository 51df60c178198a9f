use thiserror::Error;

/// Failures surfaced by the viewer engine.
///
/// Decoder-level problems arrive as [`anyhow::Error`] and are wrapped here so
/// callers can tell a corrupt upload from a stale selection.
#[derive(Error, Debug)]
pub enum ViewerError {
    /// The container could not be parsed; a new upload is required.
    #[error("Malformed archive: {0:#}")]
    MalformedArchive(#[source] anyhow::Error),

    /// The upload was refused before decoding because of its file name.
    #[error("Unsupported archive type: {0}")]
    UnsupportedArchive(String),

    /// A directory path was handed to the content resolver.
    #[error("Not a file: {0}")]
    NotAFile(String),

    /// The path is absent from the currently loaded archive.
    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    /// The entry exists but its bytes could not be decoded.
    #[error("Cannot read {path}: {source:#}")]
    Read {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Cannot save {name}: {source:#}")]
    Download {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("No archive loaded")]
    NoArchive,

    #[error("No file selected")]
    NoSelection,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ViewerResult<T> = Result<T, ViewerError>;
