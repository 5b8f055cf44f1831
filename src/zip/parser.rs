//! Low-level ZIP archive parser.
//!
//! This module handles the binary parsing of ZIP file structures from an
//! archive that is already fully loaded into memory.
//!
//! ## Parsing Strategy
//!
//! ZIP files are designed to be read from the end:
//! 1. Find the End of Central Directory (EOCD) at the buffer's end
//! 2. If ZIP64, read the ZIP64 EOCD for large file support
//! 3. Read the Central Directory to get metadata for all files
//! 4. For each entry, read its Local File Header to locate the data
//!
//! Every offset and length taken from the archive is bounds-checked against
//! the buffer before it is used.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};

use crate::error::{Error, Result};

use super::cp437;
use super::structures::*;

/// Maximum ZIP comment size allowed by the format (65535 bytes).
///
/// This limits the search area when looking for EOCD with a comment.
const MAX_COMMENT_SIZE: usize = 65535;

/// Low-level ZIP parser over an in-memory archive.
///
/// Typically used through [`decode`](super::decode) rather than directly.
///
/// ## Example
///
/// ```ignore
/// let parser = ZipParser::new(&bytes);
/// for entry in parser.list_files()? {
///     let data = parser.raw_data(&entry)?;
///     // Inflate data according to entry.compression_method...
/// }
/// ```
pub struct ZipParser<'a> {
    /// The complete archive
    data: &'a [u8],
}

impl<'a> ZipParser<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Borrow `len` bytes at `offset`, failing if they run past the end.
    fn slice(&self, offset: u64, len: u64, what: &str) -> Result<&'a [u8]> {
        let end = offset
            .checked_add(len)
            .filter(|end| *end <= self.data.len() as u64)
            .ok_or_else(|| {
                Error::invalid(format!(
                    "{} at offset {} (length {}) runs past end of archive ({} bytes)",
                    what,
                    offset,
                    len,
                    self.data.len()
                ))
            })?;
        Ok(&self.data[offset as usize..end as usize])
    }

    /// Find and parse the End of Central Directory record.
    ///
    /// Handles both the simple case (no comment) and archives with
    /// comments by searching backwards for the signature.
    ///
    /// # Returns
    ///
    /// A tuple of (EOCD record, offset of EOCD in the archive).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArchive`] if no valid EOCD can be found.
    pub fn find_eocd(&self) -> Result<(EndOfCentralDirectory, u64)> {
        let size = self.data.len();
        if size < EndOfCentralDirectory::SIZE {
            return Err(Error::invalid(format!(
                "{} bytes is too short to be a ZIP archive",
                size
            )));
        }

        // Common case: no comment, EOCD is the last 22 bytes.
        let offset = size - EndOfCentralDirectory::SIZE;
        let tail = &self.data[offset..];
        if &tail[0..4] == EndOfCentralDirectory::SIGNATURE && tail[20..22] == [0, 0] {
            let eocd = EndOfCentralDirectory::from_bytes(tail)?;
            return Ok((eocd, offset as u64));
        }

        // The EOCD could be earlier if there's a ZIP comment.
        let search_size = (MAX_COMMENT_SIZE + EndOfCentralDirectory::SIZE).min(size);
        let search_start = size - search_size;
        let buf = &self.data[search_start..];

        for i in (0..=buf.len() - EndOfCentralDirectory::SIZE).rev() {
            if &buf[i..i + 4] == EndOfCentralDirectory::SIGNATURE {
                // The comment length field must account for the remaining bytes.
                let comment_len = u16::from_le_bytes([buf[i + 20], buf[i + 21]]) as usize;

                if comment_len == buf.len() - i - EndOfCentralDirectory::SIZE {
                    let eocd = EndOfCentralDirectory::from_bytes(
                        &buf[i..i + EndOfCentralDirectory::SIZE],
                    )?;
                    return Ok((eocd, (search_start + i) as u64));
                }
            }
        }

        Err(Error::invalid("End of Central Directory record not found"))
    }

    /// Read the ZIP64 End of Central Directory record.
    ///
    /// Called when the regular EOCD indicates ZIP64 extensions are needed
    /// (fields set to 0xFFFF or 0xFFFFFFFF).
    pub fn read_zip64_eocd(&self, eocd_offset: u64) -> Result<Zip64EOCD> {
        // The locator sits immediately before the regular EOCD
        let locator_offset = eocd_offset
            .checked_sub(Zip64EOCDLocator::SIZE as u64)
            .ok_or_else(|| Error::invalid("missing ZIP64 End of Central Directory locator"))?;
        let locator = Zip64EOCDLocator::from_bytes(self.slice(
            locator_offset,
            Zip64EOCDLocator::SIZE as u64,
            "ZIP64 locator",
        )?)?;

        Zip64EOCD::from_bytes(self.slice(
            locator.eocd64_offset,
            Zip64EOCD::MIN_SIZE as u64,
            "ZIP64 End of Central Directory",
        )?)
    }

    /// List all entries of the archive, in central directory order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArchive`] if the directory is missing,
    /// truncated or has a bad record signature.
    pub fn list_files(&self) -> Result<Vec<ZipFileEntry>> {
        let (eocd, eocd_offset) = self.find_eocd()?;

        let (cd_offset, cd_size, total_entries) = if eocd.is_zip64() {
            let eocd64 = self.read_zip64_eocd(eocd_offset)?;
            (eocd64.cd_offset, eocd64.cd_size, eocd64.total_entries)
        } else {
            (
                eocd.cd_offset as u64,
                eocd.cd_size as u64,
                eocd.total_entries as u64,
            )
        };

        let cd_data = self.slice(cd_offset, cd_size, "central directory")?;

        // Each record is at least CDFH_MIN_SIZE bytes; don't trust the count further.
        if total_entries > cd_size / CDFH_MIN_SIZE as u64 {
            return Err(Error::invalid(format!(
                "central directory of {} bytes cannot hold {} entries",
                cd_size, total_entries
            )));
        }

        let mut entries = Vec::with_capacity(total_entries as usize);
        let mut cursor = Cursor::new(cd_data);

        for _ in 0..total_entries {
            entries.push(Self::parse_cdfh(&mut cursor)?);
        }

        Ok(entries)
    }

    /// Parse a Central Directory File Header from a cursor.
    fn parse_cdfh(cursor: &mut Cursor<&[u8]>) -> Result<ZipFileEntry> {
        let mut sig = [0u8; 4];
        cursor.read_exact(&mut sig)?;
        if sig != CDFH_SIGNATURE {
            return Err(Error::invalid(format!(
                "bad Central Directory File Header signature at directory offset {}",
                cursor.position() - 4
            )));
        }

        let _version_made_by = cursor.read_u16::<LittleEndian>()?;
        let _version_needed = cursor.read_u16::<LittleEndian>()?;
        let flags = cursor.read_u16::<LittleEndian>()?;
        let compression_method = cursor.read_u16::<LittleEndian>()?;
        let last_mod_time = cursor.read_u16::<LittleEndian>()?;
        let last_mod_date = cursor.read_u16::<LittleEndian>()?;
        let crc32 = cursor.read_u32::<LittleEndian>()?;
        let mut compressed_size = cursor.read_u32::<LittleEndian>()? as u64;
        let mut uncompressed_size = cursor.read_u32::<LittleEndian>()? as u64;
        let file_name_length = cursor.read_u16::<LittleEndian>()?;
        let extra_field_length = cursor.read_u16::<LittleEndian>()?;
        let file_comment_length = cursor.read_u16::<LittleEndian>()?;
        let _disk_number_start = cursor.read_u16::<LittleEndian>()?;
        let _internal_attrs = cursor.read_u16::<LittleEndian>()?;
        let external_attrs = cursor.read_u32::<LittleEndian>()?;
        let mut lfh_offset = cursor.read_u32::<LittleEndian>()? as u64;

        let mut file_name_bytes = vec![0u8; file_name_length as usize];
        cursor.read_exact(&mut file_name_bytes)?;
        let file_name = decode_file_name(file_name_bytes);

        // ZIP64 extended information lives in extra field 0x0001
        let extra_field_end = cursor.position() + extra_field_length as u64;
        if extra_field_end > cursor.get_ref().len() as u64 {
            return Err(Error::invalid(format!(
                "extra field of '{}' runs past the central directory",
                file_name
            )));
        }

        while cursor.position() + 4 <= extra_field_end {
            let header_id = cursor.read_u16::<LittleEndian>()?;
            let field_size = cursor.read_u16::<LittleEndian>()?;
            let field_end = (cursor.position() + field_size as u64).min(extra_field_end);

            if header_id == 0x0001 {
                // Fields are present only if the header field is saturated
                if uncompressed_size == 0xFFFFFFFF && cursor.position() + 8 <= field_end {
                    uncompressed_size = cursor.read_u64::<LittleEndian>()?;
                }
                if compressed_size == 0xFFFFFFFF && cursor.position() + 8 <= field_end {
                    compressed_size = cursor.read_u64::<LittleEndian>()?;
                }
                if lfh_offset == 0xFFFFFFFF && cursor.position() + 8 <= field_end {
                    lfh_offset = cursor.read_u64::<LittleEndian>()?;
                }
            }
            cursor.set_position(field_end);
        }

        cursor.set_position(extra_field_end + file_comment_length as u64);

        let is_directory = file_name.ends_with('/')
            || file_name.ends_with('\\')
            || (external_attrs & DOS_DIRECTORY_ATTR != 0 && uncompressed_size == 0);

        Ok(ZipFileEntry {
            file_name,
            flags,
            compression_method: CompressionMethod::from_u16(compression_method),
            compressed_size,
            uncompressed_size,
            crc32,
            lfh_offset,
            last_mod_time,
            last_mod_date,
            external_attrs,
            is_directory,
        })
    }

    /// Get the actual data offset for a file entry.
    ///
    /// The Local File Header has variable-length fields (filename, extra
    /// field) that may differ from the Central Directory entry, so the
    /// header has to be read to find where the data begins.
    pub fn data_offset(&self, entry: &ZipFileEntry) -> Result<u64> {
        let lfh = self.slice(entry.lfh_offset, LFH_SIZE as u64, "Local File Header")?;

        if &lfh[0..4] != LFH_SIGNATURE {
            return Err(Error::invalid(format!(
                "bad Local File Header signature for '{}'",
                entry.file_name
            )));
        }

        let mut cursor = Cursor::new(lfh);
        cursor.set_position(26); // Offset to filename length field

        let file_name_length = cursor.read_u16::<LittleEndian>()? as u64;
        let extra_field_length = cursor.read_u16::<LittleEndian>()? as u64;

        Ok(entry.lfh_offset + LFH_SIZE as u64 + file_name_length + extra_field_length)
    }

    /// Borrow the still-compressed bytes of an entry.
    pub fn raw_data(&self, entry: &ZipFileEntry) -> Result<&'a [u8]> {
        let offset = self.data_offset(entry)?;
        self.slice(offset, entry.compressed_size, "entry data")
    }
}

/// Decode an entry name.
///
/// Names flagged UTF-8 are UTF-8. Many writers also store UTF-8 without the
/// flag, so any name that is valid UTF-8 is taken as such; anything else is
/// code page 437. Neither path merges two different byte strings into one
/// name the way a lossy conversion would.
fn decode_file_name(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|err| cp437::decode(err.as_bytes()))
}
