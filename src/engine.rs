//! End-to-end merge of two archives.

use log::info;
use tokio::task::JoinHandle;

use crate::error::{Error, InputSlot, Result};
use crate::merge::merge;
use crate::zip::{self, DEFAULT_COMPRESSION_LEVEL, DecodeOptions, EncodeOptions};

/// Settings for one merge.
#[derive(Debug, Clone, Copy)]
pub struct MergeOptions {
    /// DEFLATE level for the output, 0-9.
    pub compression_level: u32,
    /// Verify each input entry's CRC-32 while decoding.
    pub verify_crc: bool,
    /// Add explicit directory entries for every parent path in the output.
    pub synthesize_parent_dirs: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            verify_crc: true,
            synthesize_parent_dirs: false,
        }
    }
}

impl MergeOptions {
    fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            verify_crc: self.verify_crc,
        }
    }

    fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            compression_level: self.compression_level,
        }
    }
}

/// Merge two ZIP archives into a new one.
///
/// Every entry of `first` is taken, then every entry of `second`, which
/// overrides entries of `first` with the same path. The result is
/// re-compressed with DEFLATE at `options.compression_level`.
///
/// # Errors
///
/// Any decode or encode failure aborts the merge. Decode errors name the
/// input they came from (see [`Error::input`]).
///
/// # Example
///
/// ```no_run
/// use packmerge::{MergeOptions, merge_archives};
///
/// let base = std::fs::read("base.zip")?;
/// let overlay = std::fs::read("overlay.zip")?;
/// let merged = merge_archives(&base, &overlay, &MergeOptions::default())?;
/// std::fs::write("merged.zip", merged)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn merge_archives(first: &[u8], second: &[u8], options: &MergeOptions) -> Result<Vec<u8>> {
    let decode_options = options.decode_options();

    let first_entries = zip::decode_with(first, &decode_options)
        .map_err(|e| e.with_input(InputSlot::First))?;
    let second_entries = zip::decode_with(second, &decode_options)
        .map_err(|e| e.with_input(InputSlot::Second))?;
    let (first_count, second_count) = (first_entries.len(), second_entries.len());

    let mut table = merge(first_entries, second_entries);
    if options.synthesize_parent_dirs {
        table.synthesize_parent_dirs();
    }

    let output = zip::encode(&table, &options.encode_options())?;

    info!(
        "merged {} + {} entries into {} ({} bytes)",
        first_count,
        second_count,
        table.len(),
        output.len()
    );
    Ok(output)
}

/// Run [`merge_archives`] on tokio's blocking pool.
///
/// Inflating and deflating are CPU-bound; this keeps them off the async
/// worker threads. A panic inside the merge resumes on the caller; a task the
/// runtime drops unstarted yields [`Error::Cancelled`].
pub async fn merge_archives_blocking(
    first: Vec<u8>,
    second: Vec<u8>,
    options: MergeOptions,
) -> Result<Vec<u8>> {
    join_blocking(tokio::task::spawn_blocking(move || {
        merge_archives(&first, &second, &options)
    }))
    .await
}

async fn join_blocking<T>(handle: JoinHandle<Result<T>>) -> Result<T> {
    match handle.await {
        Ok(result) => result,
        Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
        Err(_) => Err(Error::Cancelled),
    }
}
