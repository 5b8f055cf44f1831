//! Turns an in-memory ZIP archive into owned [`ArchiveEntry`] values.

use flate2::read::DeflateDecoder;
use log::debug;
use std::io::Read;

use crate::entry::{ArchiveEntry, CompressionHint, EntryPath};
use crate::error::{Error, Result};
use crate::merge::{Insertion, MergedArchive};

use super::parser::ZipParser;
use super::structures::{CompressionMethod, ZipFileEntry};

/// Decoder settings.
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    /// Compare each inflated payload against its recorded CRC-32.
    pub verify_crc: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self { verify_crc: true }
    }
}

/// Decode every entry of `data` with default options.
///
/// See [`decode_with`].
pub fn decode(data: &[u8]) -> Result<Vec<ArchiveEntry>> {
    decode_with(data, &DecodeOptions::default())
}

/// Decode every entry of `data`, in central directory order.
///
/// If the archive names the same path twice, the later record wins and
/// takes the position of the first.
///
/// # Errors
///
/// - [`Error::InvalidArchive`] if the container cannot be parsed or an entry
///   name is not a valid path.
/// - [`Error::Decompression`] if a payload uses an unsupported method, is
///   encrypted, or fails to inflate or verify.
pub fn decode_with(data: &[u8], options: &DecodeOptions) -> Result<Vec<ArchiveEntry>> {
    let parser = ZipParser::new(data);
    let records = parser.list_files()?;
    let mut table = MergedArchive::with_capacity(records.len());

    for record in &records {
        let path = EntryPath::new(&record.file_name)?;

        let entry = if record.is_directory {
            ArchiveEntry::directory(path)
        } else {
            let raw = parser.raw_data(record)?;
            let (payload, hint) = inflate(record, raw)?;
            if options.verify_crc {
                verify_crc(record, &payload)?;
            }
            ArchiveEntry::file_with_hint(path, payload, hint)
        };

        if table.insert(entry) != Insertion::Added {
            debug!("duplicate entry '{}' in archive", record.file_name);
        }
    }

    Ok(table.into_entries())
}

/// Decompress one entry's data according to its method.
fn inflate(record: &ZipFileEntry, raw: &[u8]) -> Result<(Vec<u8>, CompressionHint)> {
    if record.is_encrypted() {
        return Err(Error::decompression(
            &record.file_name,
            "encrypted entries are not supported",
        ));
    }

    let (payload, hint) = match record.compression_method {
        CompressionMethod::Stored => (raw.to_vec(), CompressionHint::Stored),
        CompressionMethod::Deflate => {
            // Capacity is a hint only; a lying header must not cause a huge allocation.
            let capacity = record.uncompressed_size.min(raw.len() as u64 * 4) as usize;
            let mut out = Vec::with_capacity(capacity);
            // One byte past the declared size is enough to tell the stream lied.
            DeflateDecoder::new(raw)
                .take(record.uncompressed_size.saturating_add(1))
                .read_to_end(&mut out)
                .map_err(|e| Error::decompression(&record.file_name, e.to_string()))?;
            if out.len() as u64 > record.uncompressed_size {
                return Err(Error::decompression(
                    &record.file_name,
                    format!(
                        "inflates past its declared size of {} bytes",
                        record.uncompressed_size
                    ),
                ));
            }
            (out, CompressionHint::Deflated)
        }
        CompressionMethod::Unknown(method) => {
            return Err(Error::decompression(
                &record.file_name,
                format!("unsupported compression method {}", method),
            ));
        }
    };

    if payload.len() as u64 != record.uncompressed_size {
        return Err(Error::decompression(
            &record.file_name,
            format!(
                "expected {} bytes, got {}",
                record.uncompressed_size,
                payload.len()
            ),
        ));
    }

    Ok((payload, hint))
}

fn verify_crc(record: &ZipFileEntry, payload: &[u8]) -> Result<()> {
    let actual = crc32fast::hash(payload);
    if actual != record.crc32 {
        return Err(Error::decompression(
            &record.file_name,
            format!(
                "CRC mismatch: expected {:#010x}, got {:#010x}",
                record.crc32, actual
            ),
        ));
    }
    Ok(())
}
