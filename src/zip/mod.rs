//! ZIP archive reading and writing.
//!
//! This module converts between raw ZIP bytes and owned
//! [`ArchiveEntry`](crate::ArchiveEntry) values.
//!
//! ## Architecture
//!
//! - [`structures`]: Data structures representing ZIP format elements (EOCD, file headers, etc.)
//! - [`parser`]: Low-level parsing of ZIP structures from an in-memory archive
//! - [`decoder`]: Inflates and verifies every entry into an owned entry list
//! - [`cp437`]: Legacy name decoding for entries without the UTF-8 flag
//! - [`writer`]: Serializes an entry table into a new DEFLATE-compressed archive
//!
//! ## ZIP Format Overview
//!
//! A ZIP file consists of:
//! 1. Local file headers and compressed data for each file
//! 2. Central Directory with metadata for all files
//! 3. End of Central Directory (EOCD) record at the end
//!
//! ## Supported Features
//!
//! - Standard ZIP format (PKZIP APPNOTE 6.3.x compatible)
//! - ZIP64 extensions when reading
//! - STORED (no compression) and DEFLATE compression methods
//!
//! ## Limitations
//!
//! - No encryption support
//! - No multi-disk archive support
//! - No BZIP2, LZMA, or other compression methods
//! - Archives are written without ZIP64, so output is capped at 65534
//!   entries and sizes under 4 GiB

mod cp437;
mod decoder;
mod parser;
mod structures;
mod writer;

pub use decoder::{DecodeOptions, decode, decode_with};
pub use parser::ZipParser;
pub use structures::*;
pub use writer::{DEFAULT_COMPRESSION_LEVEL, EncodeOptions, MAX_ENTRIES, encode};
