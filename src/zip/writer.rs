//! Serializes a [`MergedArchive`] into a fresh ZIP container.
//!
//! Output is a pure function of the table and the [`EncodeOptions`]: entries
//! are written in table order, every record carries the same fixed DOS
//! timestamp, and DEFLATE output at a given level is stable.

use flate2::Compression;
use flate2::write::DeflateEncoder;
use std::io::Write;

use crate::entry::{ArchiveEntry, EntryKind};
use crate::error::{Error, Result};
use crate::merge::MergedArchive;

use super::structures::*;

/// Best compression, the level merged packs are written with by default.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 9;

/// Encoder settings.
#[derive(Debug, Clone, Copy)]
pub struct EncodeOptions {
    /// DEFLATE level, 0 (fastest) to 9 (smallest).
    pub compression_level: u32,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

/// Largest entry count a classic EOCD can hold; 0xFFFF marks ZIP64.
pub const MAX_ENTRIES: usize = u16::MAX as usize - 1;

/// Central directory data remembered while writing local records.
struct WrittenRecord {
    header: RecordHeader,
    external_attrs: u32,
    lfh_offset: u32,
}

/// Encode `table` as a ZIP archive.
///
/// Directories become zero-length stored records named with a trailing `/`.
/// Files with a payload are DEFLATE-compressed at
/// [`EncodeOptions::compression_level`]; empty files are stored.
///
/// # Errors
///
/// Returns [`Error::Encoding`] if the level is out of range, or the archive
/// would need ZIP64: 65535 or more entries, or a size or offset of
/// 0xFFFFFFFF or more. All-ones classic fields read back as ZIP64 markers.
pub fn encode(table: &MergedArchive, options: &EncodeOptions) -> Result<Vec<u8>> {
    if options.compression_level > 9 {
        return Err(Error::encoding(format!(
            "compression level {} is out of range 0-9",
            options.compression_level
        )));
    }
    let total_entries = u16::try_from(table.len())
        .ok()
        .filter(|n| *n < u16::MAX)
        .ok_or_else(|| {
            Error::encoding(format!(
                "{} entries exceed the {} supported without ZIP64",
                table.len(),
                MAX_ENTRIES
            ))
        })?;

    let level = Compression::new(options.compression_level);
    let mut out = Vec::new();
    let mut written = Vec::with_capacity(table.len());

    for entry in table {
        let lfh_offset = to_u32(out.len(), "local header offset")?;
        let (header, data) = prepare(entry, level)?;
        header.write_local(&mut out).map_err(io_error)?;
        out.extend_from_slice(&data);

        let external_attrs = if entry.is_directory() {
            DOS_DIRECTORY_ATTR
        } else {
            0
        };
        written.push(WrittenRecord {
            header,
            external_attrs,
            lfh_offset,
        });
    }

    let cd_start = out.len();
    for record in &written {
        record
            .header
            .write_central(&mut out, record.external_attrs, record.lfh_offset)
            .map_err(io_error)?;
    }

    EndOfCentralDirectory {
        disk_number: 0,
        disk_with_cd: 0,
        disk_entries: total_entries,
        total_entries,
        cd_size: to_u32(out.len() - cd_start, "central directory size")?,
        cd_offset: to_u32(cd_start, "central directory offset")?,
        comment_len: 0,
    }
    .write_to(&mut out)
    .map_err(io_error)?;

    Ok(out)
}

/// Build the record header and the bytes stored for one entry.
fn prepare(entry: &ArchiveEntry, level: Compression) -> Result<(RecordHeader, Vec<u8>)> {
    let name = entry.path.zip_name(entry.is_directory());
    let flags = if name.is_ascii() { 0 } else { FLAG_UTF8 };
    if name.len() > u16::MAX as usize {
        return Err(Error::encoding(format!(
            "entry name of {} bytes is too long",
            name.len()
        )));
    }

    let (method, crc32, uncompressed_size, data) = match &entry.kind {
        EntryKind::Directory => (CompressionMethod::Stored, 0, 0, Vec::new()),
        EntryKind::File { payload, .. } if payload.is_empty() => {
            (CompressionMethod::Stored, 0, 0, Vec::new())
        }
        EntryKind::File { payload, .. } => {
            let mut encoder = DeflateEncoder::new(Vec::new(), level);
            encoder.write_all(payload).map_err(io_error)?;
            let compressed = encoder.finish().map_err(io_error)?;
            (
                CompressionMethod::Deflate,
                crc32fast::hash(payload),
                payload.len(),
                compressed,
            )
        }
    };

    let header = RecordHeader {
        flags,
        compression_method: method,
        crc32,
        compressed_size: to_u32(data.len(), "compressed size")?,
        uncompressed_size: to_u32(uncompressed_size, "uncompressed size")?,
        file_name: name.into_bytes(),
    };
    Ok((header, data))
}

fn to_u32(value: usize, what: &str) -> Result<u32> {
    u32::try_from(value)
        .ok()
        .filter(|v| *v < u32::MAX)
        .ok_or_else(|| Error::encoding(format!("{} {} exceeds 4 GiB without ZIP64", what, value)))
}

fn io_error(err: std::io::Error) -> Error {
    Error::encoding(err.to_string())
}
