//! Hand-built ZIP fixtures.
//!
//! Archives here are assembled byte by byte, independent of the crate's
//! own encoder, so decoder tests don't just read back what the writer wrote.

#![allow(dead_code)]

use flate2::Compression;
use flate2::write::DeflateEncoder;
use std::io::Write;

pub const METHOD_STORED: u16 = 0;
pub const METHOD_DEFLATE: u16 = 8;

/// One record of a fixture archive.
pub struct Fixture {
    pub name: String,
    pub data: Vec<u8>,
    pub method: u16,
    pub flags: u16,
    pub external_attrs: u32,
    /// Overrides the CRC-32 written to both headers.
    pub crc_override: Option<u32>,
    /// Overrides the uncompressed size written to both headers.
    pub size_override: Option<u32>,
}

impl Fixture {
    pub fn stored(name: &str, data: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            data: data.to_vec(),
            method: METHOD_STORED,
            flags: 0,
            external_attrs: 0,
            crc_override: None,
            size_override: None,
        }
    }

    pub fn deflated(name: &str, data: &[u8]) -> Self {
        Self {
            method: METHOD_DEFLATE,
            ..Self::stored(name, data)
        }
    }

    pub fn dir(name: &str) -> Self {
        Self::stored(name, b"")
    }

    fn crc(&self) -> u32 {
        self.crc_override
            .unwrap_or_else(|| crc32fast::hash(&self.data))
    }

    fn declared_size(&self) -> u32 {
        self.size_override.unwrap_or(self.data.len() as u32)
    }

    /// The bytes as they sit in the archive.
    fn stored_bytes(&self) -> Vec<u8> {
        match self.method {
            METHOD_DEFLATE => {
                let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(&self.data).unwrap();
                encoder.finish().unwrap()
            }
            _ => self.data.clone(),
        }
    }
}

/// Assemble a ZIP archive from `fixtures`, followed by `comment`.
pub fn build_zip(fixtures: &[Fixture], comment: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut central = Vec::new();

    for fixture in fixtures {
        let crc = fixture.crc();
        let stored = fixture.stored_bytes();
        let offset = out.len() as u32;
        let name = fixture.name.as_bytes();

        out.extend_from_slice(b"PK\x03\x04");
        out.extend_from_slice(&20u16.to_le_bytes());
        out.extend_from_slice(&fixture.flags.to_le_bytes());
        out.extend_from_slice(&fixture.method.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes()); // time
        out.extend_from_slice(&0x21u16.to_le_bytes()); // date
        out.extend_from_slice(&crc.to_le_bytes());
        out.extend_from_slice(&(stored.len() as u32).to_le_bytes());
        out.extend_from_slice(&fixture.declared_size().to_le_bytes());
        out.extend_from_slice(&(name.len() as u16).to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(name);
        out.extend_from_slice(&stored);

        central.extend_from_slice(b"PK\x01\x02");
        central.extend_from_slice(&20u16.to_le_bytes());
        central.extend_from_slice(&20u16.to_le_bytes());
        central.extend_from_slice(&fixture.flags.to_le_bytes());
        central.extend_from_slice(&fixture.method.to_le_bytes());
        central.extend_from_slice(&0u16.to_le_bytes());
        central.extend_from_slice(&0x21u16.to_le_bytes());
        central.extend_from_slice(&crc.to_le_bytes());
        central.extend_from_slice(&(stored.len() as u32).to_le_bytes());
        central.extend_from_slice(&fixture.declared_size().to_le_bytes());
        central.extend_from_slice(&(name.len() as u16).to_le_bytes());
        central.extend_from_slice(&0u16.to_le_bytes()); // extra
        central.extend_from_slice(&0u16.to_le_bytes()); // comment
        central.extend_from_slice(&0u16.to_le_bytes()); // disk
        central.extend_from_slice(&0u16.to_le_bytes()); // internal attrs
        central.extend_from_slice(&fixture.external_attrs.to_le_bytes());
        central.extend_from_slice(&offset.to_le_bytes());
        central.extend_from_slice(name);
    }

    let cd_offset = out.len() as u32;
    out.extend_from_slice(&central);

    out.extend_from_slice(b"PK\x05\x06");
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&(fixtures.len() as u16).to_le_bytes());
    out.extend_from_slice(&(fixtures.len() as u16).to_le_bytes());
    out.extend_from_slice(&(central.len() as u32).to_le_bytes());
    out.extend_from_slice(&cd_offset.to_le_bytes());
    out.extend_from_slice(&(comment.len() as u16).to_le_bytes());
    out.extend_from_slice(comment);
    out
}

/// Assemble a ZIP64 archive from `fixtures`.
///
/// Sizes and offsets in both header kinds are saturated and carried in the
/// 0x0001 extra field; the classic EOCD points at a ZIP64 EOCD record
/// through a locator.
pub fn build_zip64(fixtures: &[Fixture]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut central = Vec::new();

    for fixture in fixtures {
        let crc = fixture.crc();
        let stored = fixture.stored_bytes();
        let offset = out.len() as u64;
        let name = fixture.name.as_bytes();

        out.extend_from_slice(b"PK\x03\x04");
        out.extend_from_slice(&45u16.to_le_bytes());
        out.extend_from_slice(&fixture.flags.to_le_bytes());
        out.extend_from_slice(&fixture.method.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0x21u16.to_le_bytes());
        out.extend_from_slice(&crc.to_le_bytes());
        out.extend_from_slice(&u32::MAX.to_le_bytes());
        out.extend_from_slice(&u32::MAX.to_le_bytes());
        out.extend_from_slice(&(name.len() as u16).to_le_bytes());
        out.extend_from_slice(&20u16.to_le_bytes());
        out.extend_from_slice(name);
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&16u16.to_le_bytes());
        out.extend_from_slice(&(fixture.declared_size() as u64).to_le_bytes());
        out.extend_from_slice(&(stored.len() as u64).to_le_bytes());
        out.extend_from_slice(&stored);

        central.extend_from_slice(b"PK\x01\x02");
        central.extend_from_slice(&45u16.to_le_bytes());
        central.extend_from_slice(&45u16.to_le_bytes());
        central.extend_from_slice(&fixture.flags.to_le_bytes());
        central.extend_from_slice(&fixture.method.to_le_bytes());
        central.extend_from_slice(&0u16.to_le_bytes());
        central.extend_from_slice(&0x21u16.to_le_bytes());
        central.extend_from_slice(&crc.to_le_bytes());
        central.extend_from_slice(&u32::MAX.to_le_bytes());
        central.extend_from_slice(&u32::MAX.to_le_bytes());
        central.extend_from_slice(&(name.len() as u16).to_le_bytes());
        central.extend_from_slice(&28u16.to_le_bytes()); // extra
        central.extend_from_slice(&0u16.to_le_bytes()); // comment
        central.extend_from_slice(&0u16.to_le_bytes()); // disk
        central.extend_from_slice(&0u16.to_le_bytes()); // internal attrs
        central.extend_from_slice(&fixture.external_attrs.to_le_bytes());
        central.extend_from_slice(&u32::MAX.to_le_bytes());
        central.extend_from_slice(name);
        central.extend_from_slice(&1u16.to_le_bytes());
        central.extend_from_slice(&24u16.to_le_bytes());
        central.extend_from_slice(&(fixture.declared_size() as u64).to_le_bytes());
        central.extend_from_slice(&(stored.len() as u64).to_le_bytes());
        central.extend_from_slice(&offset.to_le_bytes());
    }

    let cd_offset = out.len() as u64;
    out.extend_from_slice(&central);

    let eocd64_offset = out.len() as u64;
    out.extend_from_slice(b"PK\x06\x06");
    out.extend_from_slice(&44u64.to_le_bytes());
    out.extend_from_slice(&45u16.to_le_bytes());
    out.extend_from_slice(&45u16.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&(fixtures.len() as u64).to_le_bytes());
    out.extend_from_slice(&(fixtures.len() as u64).to_le_bytes());
    out.extend_from_slice(&(central.len() as u64).to_le_bytes());
    out.extend_from_slice(&cd_offset.to_le_bytes());

    out.extend_from_slice(b"PK\x06\x07");
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&eocd64_offset.to_le_bytes());
    out.extend_from_slice(&1u32.to_le_bytes());

    out.extend_from_slice(b"PK\x05\x06");
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&u16::MAX.to_le_bytes());
    out.extend_from_slice(&u16::MAX.to_le_bytes());
    out.extend_from_slice(&u32::MAX.to_le_bytes());
    out.extend_from_slice(&u32::MAX.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out
}

/// Offset of the first central directory record in an archive without comment.
pub fn central_directory_offset(data: &[u8]) -> usize {
    let eocd = data.len() - 22;
    u32::from_le_bytes(data[eocd + 16..eocd + 20].try_into().unwrap()) as usize
}
