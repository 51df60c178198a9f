//! Extension-based classification of archive entries.
//!
//! Only the final extension counts, compared case-insensitively.

/// How an entry's content can be previewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// Paginated document (PDF)
    Document,
    Image,
    /// Plain or structured text, decoded as UTF-8
    Text,
    /// No known renderer
    Binary,
}

impl ContentKind {
    /// Classify by name. Precedence: document, image, text, binary.
    pub fn from_name(name: &str) -> Self {
        match extension(name).as_deref() {
            Some("pdf") => Self::Document,
            Some("png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp") => Self::Image,
            Some(
                "txt" | "md" | "json" | "js" | "css" | "html" | "xml" | "csv" | "ts" | "jsx"
                | "tsx",
            ) => Self::Text,
            _ => Self::Binary,
        }
    }

    /// MIME type to hand to a rendering surface, where one is known
    pub fn mime_type(name: &str) -> Option<&'static str> {
        match extension(name).as_deref() {
            Some("pdf") => Some("application/pdf"),
            Some("png") => Some("image/png"),
            Some("jpg" | "jpeg") => Some("image/jpeg"),
            Some("gif") => Some("image/gif"),
            Some("webp") => Some("image/webp"),
            Some("bmp") => Some("image/bmp"),
            _ => None,
        }
    }
}

/// Icon shown next to a tree row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconKind {
    Folder,
    Archive,
    Pdf,
    Image,
    Code,
    Text,
}

impl IconKind {
    pub fn for_file(name: &str) -> Self {
        match extension(name).as_deref() {
            Some("zip") => Self::Archive,
            Some("pdf") => Self::Pdf,
            Some("png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp") => Self::Image,
            Some("html" | "css" | "js" | "json" | "ts" | "jsx" | "tsx" | "md" | "xml") => {
                Self::Code
            }
            _ => Self::Text,
        }
    }
}

/// Lowercased text after the last `.` of the last path segment.
fn extension(name: &str) -> Option<String> {
    let base = name.rsplit('/').next().unwrap_or(name);
    base.rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
        .map(str::to_lowercase)
}
