use flate2::Crc;
use flate2::read::DeflateDecoder;
use std::io::Read;
use std::sync::Arc;

use crate::io::ReadAt;
use anyhow::{Context, Result, bail};

use super::parser::ZipParser;
use super::structures::{CompressionMethod, ZipFileEntry};

/// Knobs applied while decoding entry data.
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    /// Compare the CRC-32 of decoded bytes against the central directory
    pub verify_crc: bool,
    /// Refuse entries whose declared uncompressed size exceeds this
    pub max_entry_size: Option<u64>,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            verify_crc: true,
            max_entry_size: None,
        }
    }
}

/// Reads and decompresses individual entries
pub struct ZipExtractor<R: ReadAt + ?Sized> {
    parser: ZipParser<R>,
    options: DecodeOptions,
}

impl<R: ReadAt + ?Sized> ZipExtractor<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self::with_options(reader, DecodeOptions::default())
    }

    pub fn with_options(reader: Arc<R>, options: DecodeOptions) -> Self {
        Self {
            parser: ZipParser::new(reader),
            options,
        }
    }

    /// List all entries in the archive
    pub async fn list_files(&self) -> Result<Vec<ZipFileEntry>> {
        self.parser.list_files().await
    }

    /// Decode one entry fully into memory.
    pub async fn extract_to_memory(&self, entry: &ZipFileEntry) -> Result<Vec<u8>> {
        if entry.is_directory {
            bail!("{} is a directory", entry.file_name);
        }
        if entry.is_encrypted() {
            bail!("{} is encrypted", entry.file_name);
        }
        if let Some(limit) = self.options.max_entry_size
            && entry.uncompressed_size > limit
        {
            bail!(
                "{} is {} bytes, above the {} byte limit",
                entry.file_name,
                entry.uncompressed_size,
                limit
            );
        }

        let data_offset = self.parser.data_offset(entry).await?;
        let archive_size = self.parser.reader().size();
        if data_offset
            .checked_add(entry.compressed_size)
            .is_none_or(|end| end > archive_size)
        {
            bail!(
                "Data for {} ({} bytes at offset {}) extends past end of archive",
                entry.file_name,
                entry.compressed_size,
                data_offset
            );
        }
        let mut raw = vec![0u8; entry.compressed_size as usize];
        self.parser
            .reader()
            .read_exact_at(data_offset, &mut raw)
            .await
            .with_context(|| format!("Truncated data for {}", entry.file_name))?;

        let data = match entry.compression_method {
            CompressionMethod::Stored => raw,
            CompressionMethod::Deflate => inflate(&raw, entry)?,
            CompressionMethod::Unknown(code) => bail!(
                "Unsupported compression method {} for {} (only STORED and DEFLATE are supported)",
                code,
                entry.file_name
            ),
        };

        if data.len() as u64 != entry.uncompressed_size {
            bail!(
                "{} decoded to {} bytes, expected {}",
                entry.file_name,
                data.len(),
                entry.uncompressed_size
            );
        }
        if self.options.verify_crc {
            let mut crc = Crc::new();
            crc.update(&data);
            if crc.sum() != entry.crc32 {
                bail!(
                    "CRC mismatch for {}: expected {:08x}, got {:08x}",
                    entry.file_name,
                    entry.crc32,
                    crc.sum()
                );
            }
        }

        Ok(data)
    }
}

fn inflate(raw: &[u8], entry: &ZipFileEntry) -> Result<Vec<u8>> {
    // Cap the preallocation; the declared size is untrusted
    let mut out = Vec::with_capacity(entry.uncompressed_size.min(1 << 24) as usize);
    DeflateDecoder::new(raw)
        .take(entry.uncompressed_size.saturating_add(1))
        .read_to_end(&mut out)
        .with_context(|| format!("Corrupt DEFLATE stream for {}", entry.file_name))?;
    Ok(out)
}
