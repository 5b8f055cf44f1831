//! Publishing archives under a download URL.
//!
//! A published archive is written into a public directory that some web
//! server exposes at `base_url`; the returned link is `base_url/<file name>`.

use anyhow::{Context, Result};
use log::info;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Where published archives go and how they are addressed.
#[derive(Debug, Clone)]
pub struct PublishConfig {
    pub public_dir: PathBuf,
    /// URL prefix the public directory is served under, e.g. `/downloads`.
    pub base_url: String,
}

/// What is being published; decides the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Output of a merge, always a `.zip`.
    MergedPack,
    /// An archive supplied by the user, keeping its extension.
    ResourcePack,
}

/// A file written by [`publish`].
#[derive(Debug, Clone)]
pub struct Published {
    pub path: PathBuf,
    pub url: String,
}

/// Unique file name: `<prefix>_<unix millis>_<8 hex chars><ext>`.
fn file_name(kind: ArtifactKind, original: Option<&Path>) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let nonce = uuid::Uuid::new_v4().simple().to_string();
    let nonce = &nonce[..8];

    match kind {
        ArtifactKind::MergedPack => format!("merged_pack_{}_{}.zip", millis, nonce),
        ArtifactKind::ResourcePack => {
            let ext = original
                .and_then(|p| p.extension())
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_default();
            format!("resource_pack_{}_{}{}", millis, nonce, ext)
        }
    }
}

/// Write `data` into the public directory and return its link.
///
/// The directory is created if missing. An existing file is never
/// overwritten.
pub async fn publish(
    data: &[u8],
    config: &PublishConfig,
    kind: ArtifactKind,
    original: Option<&Path>,
) -> Result<Published> {
    fs::create_dir_all(&config.public_dir)
        .await
        .with_context(|| format!("cannot create {}", config.public_dir.display()))?;

    let name = file_name(kind, original);
    let path = config.public_dir.join(&name);

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .await
        .with_context(|| format!("cannot create {}", path.display()))?;
    file.write_all(data).await?;
    file.flush().await?;

    let url = format!("{}/{}", config.base_url.trim_end_matches('/'), name);
    info!("published {} bytes as {}", data.len(), url);
    Ok(Published { path, url })
}
