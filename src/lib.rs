//! # packmerge
//!
//! Merge Minecraft resource-pack archives, hash them, and publish download
//! links.
//!
//! The core is the archive merge engine: two ZIP archives go in, one comes
//! out whose entries are the union of both inputs. When both inputs hold
//! the same path, the entry from the second archive wins. The result is
//! re-compressed with DEFLATE in a deterministic entry order, so merging the
//! same inputs twice yields identical bytes.
//!
//! ## Features
//!
//! - Decode STORED and DEFLATE entries, including ZIP64 archives
//! - Override-on-conflict merging with a fixed file-over-directory rule
//! - Optional synthesis of missing parent directory entries
//! - Load packs from local paths or HTTP URLs using Range requests
//! - SHA-1 digests and publishing into a served directory
//!
//! ## Example
//!
//! ```no_run
//! use packmerge::{MergeOptions, merge_archives};
//!
//! fn main() -> anyhow::Result<()> {
//!     let base = std::fs::read("base.zip")?;
//!     let overlay = std::fs::read("overlay.zip")?;
//!
//!     let merged = merge_archives(&base, &overlay, &MergeOptions::default())?;
//!     std::fs::write("merged.zip", &merged)?;
//!     println!("{}", packmerge::hash::sha1_hex(&merged));
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod engine;
pub mod entry;
pub mod error;
pub mod hash;
pub mod io;
pub mod merge;
pub mod share;
pub mod zip;

pub use cli::Cli;
pub use engine::{MergeOptions, merge_archives, merge_archives_blocking};
pub use entry::{ArchiveEntry, CompressionHint, EntryKind, EntryPath};
pub use error::{Error, InputSlot, Result, Stage};
pub use io::{HttpRangeReader, LocalFileReader, ReadAt};
pub use merge::{Insertion, MergedArchive, merge};
pub use zip::{DecodeOptions, EncodeOptions, decode, decode_with, encode};
