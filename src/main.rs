//! Main entry point for the packmerge CLI application.
//!
//! This binary merges, hashes, lists and publishes resource-pack archives
//! from both the local filesystem and HTTP URLs.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;

use packmerge::cli::{Command, MergeArgs, PublishArgs};
use packmerge::io::{self, is_http_url};
use packmerge::share::{self, ArtifactKind};
use packmerge::zip::ZipParser;
use packmerge::{Cli, hash, merge_archives_blocking};

/// Application entry point.
///
/// Sets up logging, parses command-line arguments and dispatches to the
/// subcommand handler.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.is_very_quiet() {
        "error"
    } else {
        cli.log_level.as_str()
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    match &cli.command {
        Command::Merge(args) => merge(&cli, args).await,
        Command::List { file, verbose } => list(&cli, file, *verbose).await,
        Command::Sha1 { file } => {
            let data = load(&cli, file).await?;
            println!("{}", hash::sha1_hex(&data));
            Ok(())
        }
        Command::Link { file, publish } => link(&cli, file, publish).await,
    }
}

/// Load one input archive, honouring the size ceiling.
async fn load(cli: &Cli, location: &str) -> Result<Vec<u8>> {
    io::load(location, cli.max_input_size)
        .await
        .with_context(|| format!("failed to read {}", location))
}

/// Merge two packs and write and/or publish the result.
///
/// Both inputs are loaded concurrently; the merge itself runs on the
/// blocking pool.
async fn merge(cli: &Cli, args: &MergeArgs) -> Result<()> {
    let (first, second) = tokio::try_join!(load(cli, &args.first), load(cli, &args.second))?;

    let merged = merge_archives_blocking(first, second, args.merge_options())
        .await
        .context("failed to merge resource packs")?;

    if let Some(output) = &args.output {
        tokio::fs::write(output, &merged)
            .await
            .with_context(|| format!("failed to write {}", output.display()))?;
        if !cli.is_quiet() {
            println!("  merged: {} ({})", output.display(), format_size(merged.len() as u64));
        }
    }

    if let Some(config) = args.publish_config() {
        let published = share::publish(&merged, &config, ArtifactKind::MergedPack, None)
            .await
            .context("failed to publish merged pack")?;
        println!("{}", published.url);
    }

    Ok(())
}

/// Copy a pack into the public directory and print its link.
async fn link(cli: &Cli, file: &str, publish: &PublishArgs) -> Result<()> {
    let data = load(cli, file).await?;
    // Keep the extension of local names; URLs may carry query strings.
    let original = (!is_http_url(file)).then(|| Path::new(file));

    let published = share::publish(
        &data,
        &publish.publish_config(),
        ArtifactKind::ResourcePack,
        original,
    )
    .await
    .context("failed to generate download link")?;

    println!("{}", published.url);
    Ok(())
}

/// List the entries of a pack.
///
/// Supports two output formats:
/// - Simple format: Just entry names, one per line
/// - Verbose format (`-v`): Detailed table with size, compression ratio and timestamps
async fn list(cli: &Cli, file: &str, verbose: bool) -> Result<()> {
    let data = load(cli, file).await?;
    let entries = ZipParser::new(&data)
        .list_files()
        .with_context(|| format!("failed to list {}", file))?;

    if verbose {
        println!(
            "{:>10}  {:>10}  {:>5}  {:>10}  {:>5}  Name",
            "Length", "Size", "Cmpr", "Date", "Time"
        );
        println!("{}", "-".repeat(70));
    }

    let mut total_uncompressed = 0u64;
    let mut total_compressed = 0u64;
    let mut file_count = 0usize;

    for entry in &entries {
        if !verbose {
            println!("{}", entry.file_name);
            continue;
        }

        let (year, month, day) = entry.mod_date();
        let (hour, minute, _second) = entry.mod_time();

        println!(
            "{:>10}  {:>10}  {}  {:04}-{:02}-{:02}  {:02}:{:02}  {}",
            entry.uncompressed_size,
            entry.compressed_size,
            ratio(entry.compressed_size, entry.uncompressed_size),
            year,
            month,
            day,
            hour,
            minute,
            entry.file_name
        );

        if !entry.is_directory {
            total_uncompressed += entry.uncompressed_size;
            total_compressed += entry.compressed_size;
            file_count += 1;
        }
    }

    if verbose {
        println!("{}", "-".repeat(70));
        println!(
            "{:>10}  {:>10}  {}  {:>21}  {} files",
            total_uncompressed,
            total_compressed,
            ratio(total_compressed, total_uncompressed),
            "",
            file_count
        );
    }

    Ok(())
}

/// Space saved by compression, as a right-aligned percentage.
fn ratio(compressed: u64, uncompressed: u64) -> String {
    if uncompressed > 0 && compressed <= uncompressed {
        format!("{:>4}%", 100 - (compressed * 100 / uncompressed))
    } else {
        "  0%".to_string()
    }
}

/// Format a byte size into a human-readable string.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(format_size(500), "500 bytes");
/// assert_eq!(format_size(1536), "1.50 KB");
/// assert_eq!(format_size(1048576), "1.00 MB");
/// ```
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
