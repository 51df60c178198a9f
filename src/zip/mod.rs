//! ZIP container decoding.
//!
//! - [`structures`]: fixed-layout records (EOCD, ZIP64 records, header constants)
//! - [`parser`]: locating and parsing the Central Directory from a [`ReadAt`](crate::io::ReadAt) source
//! - [`extractor`]: decoding a single entry's data (STORED, DEFLATE) with CRC-32 verification
//!
//! Listing only touches the archive's tail, so a catalog can be built without
//! reading any entry data.
//!
//! ## Limitations
//!
//! - No encryption support
//! - No multi-disk archive support
//! - No BZIP2, LZMA, or other compression methods

mod extractor;
mod parser;
mod structures;

pub use extractor::{DecodeOptions, ZipExtractor};
pub use parser::ZipParser;
pub use structures::{CompressionMethod, ZipFileEntry};
