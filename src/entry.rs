//! Archive entries and their validated paths.

use std::fmt;

use crate::error::{Error, Result};

/// A normalized, slash-separated entry path.
///
/// Normalization turns backslashes into `/`, collapses repeated separators,
/// drops leading `/` and `.` segments, and strips the trailing `/` that
/// marks directories in ZIP names. Whether an entry is a directory is stored
/// on the [`ArchiveEntry`], not in the path, so `assets/` and `assets` are the
/// same key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryPath(String);

impl EntryPath {
    /// Parse and normalize a raw entry name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArchive`] if the name is empty after
    /// normalization, contains a NUL byte, or has a `..` segment.
    pub fn new(raw: &str) -> Result<Self> {
        if raw.contains('\0') {
            return Err(Error::invalid(format!(
                "entry name {:?} contains a NUL byte",
                raw
            )));
        }

        let mut segments = Vec::new();
        for segment in raw.split(['/', '\\']) {
            match segment {
                "" | "." => continue,
                ".." => {
                    return Err(Error::invalid(format!(
                        "entry name {:?} escapes the archive root",
                        raw
                    )));
                }
                s => segments.push(s),
            }
        }

        if segments.is_empty() {
            return Err(Error::invalid(format!("entry name {:?} is empty", raw)));
        }

        Ok(Self(segments.join("/")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Every proper prefix of this path, shortest first.
    ///
    /// `assets/minecraft/sounds.json` yields `assets` then `assets/minecraft`.
    pub fn ancestors(&self) -> impl Iterator<Item = EntryPath> + '_ {
        self.0
            .match_indices('/')
            .map(|(i, _)| EntryPath(self.0[..i].to_string()))
    }

    /// The name as written into a ZIP record.
    pub(crate) fn zip_name(&self, is_directory: bool) -> String {
        if is_directory {
            format!("{}/", self.0)
        } else {
            self.0.clone()
        }
    }
}

impl fmt::Display for EntryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EntryPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// How a file entry was stored in its source archive.
///
/// Informational only: output always re-compresses with the configured level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionHint {
    Stored,
    Deflated,
}

#[derive(Debug, Clone)]
pub enum EntryKind {
    Directory,
    File {
        payload: Vec<u8>,
        hint: CompressionHint,
    },
}

/// One named file or directory of an archive.
///
/// Equality compares path, kind and payload bytes. The compression hint is
/// ignored, so an entry decoded from a re-encoded archive equals its source.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub path: EntryPath,
    pub kind: EntryKind,
}

impl ArchiveEntry {
    pub fn directory(path: EntryPath) -> Self {
        Self {
            path,
            kind: EntryKind::Directory,
        }
    }

    pub fn file(path: EntryPath, payload: Vec<u8>) -> Self {
        Self::file_with_hint(path, payload, CompressionHint::Stored)
    }

    pub fn file_with_hint(path: EntryPath, payload: Vec<u8>, hint: CompressionHint) -> Self {
        Self {
            path,
            kind: EntryKind::File { payload, hint },
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, EntryKind::Directory)
    }

    /// File contents, `None` for directories.
    pub fn payload(&self) -> Option<&[u8]> {
        match &self.kind {
            EntryKind::Directory => None,
            EntryKind::File { payload, .. } => Some(payload),
        }
    }

    pub fn compression_hint(&self) -> Option<CompressionHint> {
        match &self.kind {
            EntryKind::Directory => None,
            EntryKind::File { hint, .. } => Some(*hint),
        }
    }
}

impl PartialEq for ArchiveEntry {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
            && self.is_directory() == other.is_directory()
            && self.payload() == other.payload()
    }
}

impl Eq for ArchiveEntry {}
