//! Archive sources.
//!
//! Inputs are named by a local path or an `http(s)://` URL. Either way the
//! whole archive is loaded into memory before it is decoded, subject to a
//! size ceiling.

mod http;
mod local;

pub use http::HttpRangeReader;
pub use local::LocalFileReader;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use log::debug;

/// Default ceiling for a single input archive (50 MiB).
pub const DEFAULT_MAX_INPUT_SIZE: u64 = 50 * 1024 * 1024;

/// Trait for random access reading from a data source
#[async_trait]
pub trait ReadAt: Send + Sync {
    /// Read data at the specified offset into the buffer
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize>;

    /// Get the total size of the data source
    fn size(&self) -> u64;

    /// Read the entire source into memory.
    ///
    /// Fails without reading anything if the source is larger than `limit`.
    async fn read_all(&self, limit: u64) -> Result<Vec<u8>> {
        let size = self.size();
        if size > limit {
            bail!("archive is {} bytes, larger than the {} byte limit", size, limit);
        }

        let mut buf = vec![0u8; size as usize];
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.read_at(filled as u64, &mut buf[filled..]).await?;
            if n == 0 {
                bail!("source ended after {} of {} bytes", filled, size);
            }
            filled += n;
        }
        Ok(buf)
    }
}

/// Whether `location` names a remote archive.
pub fn is_http_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Load the archive named by `location` (path or URL) into memory.
pub async fn load(location: &str, limit: u64) -> Result<Vec<u8>> {
    let data = if is_http_url(location) {
        let reader = HttpRangeReader::new(location.to_string()).await?;
        let data = reader.read_all(limit).await?;
        debug!(
            "fetched {} ({} bytes transferred)",
            location,
            reader.transferred_bytes()
        );
        data
    } else {
        let reader = LocalFileReader::new(std::path::Path::new(location))
            .with_context(|| format!("cannot open {}", location))?;
        reader.read_all(limit).await?
    };
    Ok(data)
}
