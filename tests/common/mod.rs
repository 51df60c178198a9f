//! Minimal ZIP writer for building test archives in memory.

#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::Compression;
use flate2::Crc;
use flate2::write::DeflateEncoder;
use std::io::Write;

enum Kind {
    Stored,
    Deflated,
    Directory,
}

struct Pending {
    name: String,
    data: Vec<u8>,
    kind: Kind,
    /// (uncompressed, compressed) sizes announced through a ZIP64 extra field
    zip64: Option<(u64, u64)>,
}

#[derive(Default)]
pub struct ZipBuilder {
    entries: Vec<Pending>,
    comment: Vec<u8>,
}

impl ZipBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stored(mut self, name: &str, data: &[u8]) -> Self {
        self.entries.push(Pending {
            name: name.to_string(),
            data: data.to_vec(),
            kind: Kind::Stored,
            zip64: None,
        });
        self
    }

    pub fn deflated(mut self, name: &str, data: &[u8]) -> Self {
        self.entries.push(Pending {
            name: name.to_string(),
            data: data.to_vec(),
            kind: Kind::Deflated,
            zip64: None,
        });
        self
    }

    pub fn directory(mut self, name: &str) -> Self {
        self.entries.push(Pending {
            name: name.to_string(),
            data: Vec::new(),
            kind: Kind::Directory,
            zip64: None,
        });
        self
    }

    /// Make the central directory record of the last entry claim these
    /// sizes through a ZIP64 extra field, whatever its data really is.
    pub fn zip64_sizes(mut self, uncompressed: u64, compressed: u64) -> Self {
        if let Some(last) = self.entries.last_mut() {
            last.zip64 = Some((uncompressed, compressed));
        }
        self
    }

    pub fn comment(mut self, comment: &[u8]) -> Self {
        self.comment = comment.to_vec();
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = Vec::new();
        let mut central = Vec::new();

        for entry in &self.entries {
            let mut crc = Crc::new();
            crc.update(&entry.data);
            let (method, payload) = match entry.kind {
                Kind::Stored | Kind::Directory => (0u16, entry.data.clone()),
                Kind::Deflated => {
                    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
                    encoder.write_all(&entry.data).unwrap();
                    (8u16, encoder.finish().unwrap())
                }
            };
            let offset = out.len() as u32;
            let name = entry.name.as_bytes();

            // Local file header
            out.write_all(b"PK\x03\x04").unwrap();
            out.write_u16::<LittleEndian>(20).unwrap();
            out.write_u16::<LittleEndian>(0).unwrap();
            out.write_u16::<LittleEndian>(method).unwrap();
            out.write_u16::<LittleEndian>(0).unwrap();
            out.write_u16::<LittleEndian>(0x21).unwrap();
            out.write_u32::<LittleEndian>(crc.sum()).unwrap();
            out.write_u32::<LittleEndian>(payload.len() as u32).unwrap();
            out.write_u32::<LittleEndian>(entry.data.len() as u32).unwrap();
            out.write_u16::<LittleEndian>(name.len() as u16).unwrap();
            out.write_u16::<LittleEndian>(0).unwrap();
            out.write_all(name).unwrap();
            out.write_all(&payload).unwrap();

            // Central directory header
            central.write_all(b"PK\x01\x02").unwrap();
            central.write_u16::<LittleEndian>(20).unwrap();
            central.write_u16::<LittleEndian>(20).unwrap();
            central.write_u16::<LittleEndian>(0).unwrap();
            central.write_u16::<LittleEndian>(method).unwrap();
            central.write_u16::<LittleEndian>(0).unwrap();
            central.write_u16::<LittleEndian>(0x21).unwrap();
            central.write_u32::<LittleEndian>(crc.sum()).unwrap();
            let (compressed, uncompressed, extra_len) = match entry.zip64 {
                Some(_) => (0xFFFFFFFF, 0xFFFFFFFF, 20u16),
                None => (payload.len() as u32, entry.data.len() as u32, 0),
            };
            central.write_u32::<LittleEndian>(compressed).unwrap();
            central.write_u32::<LittleEndian>(uncompressed).unwrap();
            central.write_u16::<LittleEndian>(name.len() as u16).unwrap();
            central.write_u16::<LittleEndian>(extra_len).unwrap();
            central.write_u16::<LittleEndian>(0).unwrap();
            central.write_u16::<LittleEndian>(0).unwrap();
            central.write_u16::<LittleEndian>(0).unwrap();
            central.write_u32::<LittleEndian>(0).unwrap();
            central.write_u32::<LittleEndian>(offset).unwrap();
            central.write_all(name).unwrap();
            if let Some((uncompressed, compressed)) = entry.zip64 {
                central.write_u16::<LittleEndian>(0x0001).unwrap();
                central.write_u16::<LittleEndian>(16).unwrap();
                central.write_u64::<LittleEndian>(uncompressed).unwrap();
                central.write_u64::<LittleEndian>(compressed).unwrap();
            }
        }

        let cd_offset = out.len() as u32;
        out.write_all(&central).unwrap();

        out.write_all(b"PK\x05\x06").unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        out.write_u16::<LittleEndian>(self.entries.len() as u16).unwrap();
        out.write_u16::<LittleEndian>(self.entries.len() as u16).unwrap();
        out.write_u32::<LittleEndian>(central.len() as u32).unwrap();
        out.write_u32::<LittleEndian>(cd_offset).unwrap();
        out.write_u16::<LittleEndian>(self.comment.len() as u16).unwrap();
        out.write_all(&self.comment).unwrap();
        out
    }
}

/// The three-entry layout used throughout the tests.
pub fn sample_archive() -> Vec<u8> {
    ZipBuilder::new()
        .stored("docs/readme.txt", b"hello")
        .deflated("docs/img/logo.png", &[0x89, b'P', b'N', b'G', 0, 0, 0, 0])
        .deflated("LICENSE", "MIT License\n".repeat(100).as_bytes())
        .build()
}
