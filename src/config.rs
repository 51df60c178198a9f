use crate::zip::DecodeOptions;

/// Settings for an [`ArchiveViewer`](crate::ArchiveViewer).
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// File-name suffixes accepted by `load_archive_file`, lowercase
    pub accepted_extensions: Vec<String>,
    /// Verify CRC-32 of every decoded entry
    pub verify_crc: bool,
    /// Refuse to decode entries larger than this many bytes
    pub max_entry_size: Option<u64>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            accepted_extensions: vec![".zip".to_string()],
            verify_crc: true,
            max_entry_size: None,
        }
    }
}

impl ViewerConfig {
    pub fn with_accepted_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accepted_extensions = extensions
            .into_iter()
            .map(|e| e.into().to_lowercase())
            .collect();
        self
    }

    pub fn with_verify_crc(mut self, verify: bool) -> Self {
        self.verify_crc = verify;
        self
    }

    pub fn with_max_entry_size(mut self, limit: Option<u64>) -> Self {
        self.max_entry_size = limit;
        self
    }

    /// Whether an upload named `file_name` may be opened
    pub fn accepts(&self, file_name: &str) -> bool {
        let lower = file_name.to_lowercase();
        self.accepted_extensions
            .iter()
            .any(|ext| lower.ends_with(ext.as_str()))
    }

    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            verify_crc: self.verify_crc,
            max_entry_size: self.max_entry_size,
        }
    }
}
