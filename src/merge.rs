//! Override-on-conflict merging of archive entry tables.
//!
//! A [`MergedArchive`] is an ordered map from [`EntryPath`] to
//! [`ArchiveEntry`]. Iteration order is first-seen order: replacing an
//! existing path keeps the position of the entry it replaces, new paths are
//! appended. Encoding walks the table in that order, which makes output bytes
//! reproducible for identical inputs.
//!
//! ## Conflict policy
//!
//! A later entry replaces an earlier one of the same path, with one
//! exception: a file is never replaced by a directory. When one input holds
//! `textures` as a file and the other as a directory, the file survives no
//! matter which input it came from, so the output never holds a path that is
//! both.

use log::debug;
use std::collections::HashMap;

use crate::entry::{ArchiveEntry, EntryPath};

/// What [`MergedArchive::insert`] did with an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// The path was new.
    Added,
    /// The path existed and the new entry replaced it.
    Replaced,
    /// The path held a file and the new entry, a directory, was dropped.
    Ignored,
}

/// Ordered, path-unique entry table.
#[derive(Debug, Clone, Default)]
pub struct MergedArchive {
    entries: Vec<ArchiveEntry>,
    index: HashMap<EntryPath, usize>,
}

impl MergedArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Insert `entry`, overriding any entry of the same path.
    pub fn insert(&mut self, entry: ArchiveEntry) -> Insertion {
        match self.index.get(&entry.path) {
            None => {
                self.index.insert(entry.path.clone(), self.entries.len());
                self.entries.push(entry);
                Insertion::Added
            }
            Some(&slot) => {
                let existing = &mut self.entries[slot];
                if entry.is_directory() && !existing.is_directory() {
                    return Insertion::Ignored;
                }
                *existing = entry;
                Insertion::Replaced
            }
        }
    }

    pub fn get(&self, path: &EntryPath) -> Option<&ArchiveEntry> {
        self.index.get(path).map(|&slot| &self.entries[slot])
    }

    pub fn contains(&self, path: &EntryPath) -> bool {
        self.index.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> std::slice::Iter<'_, ArchiveEntry> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> Vec<ArchiveEntry> {
        self.entries
    }

    /// Add a directory entry for every missing ancestor of every entry.
    ///
    /// Each synthesized directory is placed right before the first entry
    /// that needs it, so parents always precede their children. Returns the
    /// number of directories added.
    ///
    /// An ancestor that is present as a file stays a file.
    pub fn synthesize_parent_dirs(&mut self) -> usize {
        let mut rebuilt = MergedArchive::with_capacity(self.entries.len());
        let mut added = 0;

        for entry in std::mem::take(&mut self.entries) {
            for ancestor in entry.path.ancestors() {
                if rebuilt.contains(&ancestor) {
                    continue;
                }
                // Listed later in the table: hoist a placeholder here, the
                // real entry replaces it in place when it comes up.
                if !self.index.contains_key(&ancestor) {
                    debug!("synthesizing directory '{}'", ancestor);
                    added += 1;
                }
                rebuilt.insert(ArchiveEntry::directory(ancestor));
            }
            rebuilt.insert(entry);
        }

        *self = rebuilt;
        added
    }
}

impl FromIterator<ArchiveEntry> for MergedArchive {
    fn from_iter<I: IntoIterator<Item = ArchiveEntry>>(iter: I) -> Self {
        let mut table = MergedArchive::new();
        for entry in iter {
            table.insert(entry);
        }
        table
    }
}

impl<'a> IntoIterator for &'a MergedArchive {
    type Item = &'a ArchiveEntry;
    type IntoIter = std::slice::Iter<'a, ArchiveEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Merge two decoded archives; entries of `second` override those of `first`.
pub fn merge(first: Vec<ArchiveEntry>, second: Vec<ArchiveEntry>) -> MergedArchive {
    let mut table = MergedArchive::with_capacity(first.len() + second.len());

    for entry in first {
        table.insert(entry);
    }

    let mut overridden = 0usize;
    for entry in second {
        let path = entry.path.clone();
        match table.insert(entry) {
            Insertion::Added => {}
            Insertion::Replaced => overridden += 1,
            Insertion::Ignored => {
                debug!("keeping file '{}' over directory of the same path", path);
            }
        }
    }

    debug!(
        "merged table holds {} entries, {} overridden by the second archive",
        table.len(),
        overridden
    );
    table
}
