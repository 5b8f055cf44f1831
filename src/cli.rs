use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::engine::MergeOptions;
use crate::io::DEFAULT_MAX_INPUT_SIZE;
use crate::share::PublishConfig;
use crate::zip::DEFAULT_COMPRESSION_LEVEL;

#[derive(Parser, Debug)]
#[command(name = "packmerge")]
#[command(version)]
#[command(about = "Merge, hash and share Minecraft resource packs", long_about = None)]
#[command(after_help = "Examples:\n  \
  packmerge merge base.zip overlay.zip -o merged.zip   overlay wins on conflicts\n  \
  packmerge sha1 merged.zip                           hash for server.properties\n  \
  packmerge link merged.zip --publish-dir public      copy into public/ and print its URL\n  \
  packmerge list -v https://example.com/pack.zip      list a remote pack")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Refuse input archives larger than this many bytes
    #[arg(
        long,
        global = true,
        value_name = "BYTES",
        env = "PACKMERGE_MAX_INPUT_SIZE",
        default_value_t = DEFAULT_MAX_INPUT_SIZE
    )]
    pub max_input_size: u64,

    /// Log filter when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', global = true, action = clap::ArgAction::Count)]
    pub quiet: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Merge two packs; entries of the second override the first
    Merge(MergeArgs),

    /// List the entries of a pack
    List {
        /// Pack file path or HTTP URL
        #[arg(value_name = "FILE")]
        file: String,

        /// Show sizes, compression ratio and timestamps
        #[arg(short = 'v')]
        verbose: bool,
    },

    /// Print the SHA-1 of a pack
    Sha1 {
        /// Pack file path or HTTP URL
        #[arg(value_name = "FILE")]
        file: String,
    },

    /// Publish a pack and print its download link
    Link {
        /// Pack file path or HTTP URL
        #[arg(value_name = "FILE")]
        file: String,

        #[command(flatten)]
        publish: PublishArgs,
    },
}

#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Base pack (path or HTTP URL)
    #[arg(value_name = "FIRST")]
    pub first: String,

    /// Overriding pack (path or HTTP URL)
    #[arg(value_name = "SECOND")]
    pub second: String,

    /// Write the merged pack here
    #[arg(short = 'o', long, value_name = "FILE", required_unless_present = "publish_dir")]
    pub output: Option<PathBuf>,

    /// DEFLATE level for the merged pack (0-9)
    #[arg(
        long,
        value_name = "N",
        env = "PACKMERGE_LEVEL",
        default_value_t = DEFAULT_COMPRESSION_LEVEL,
        value_parser = clap::value_parser!(u32).range(0..=9)
    )]
    pub level: u32,

    /// Add directory entries for every parent path
    #[arg(long)]
    pub synthesize_dirs: bool,

    /// Skip CRC-32 verification of input entries
    #[arg(long)]
    pub no_verify_crc: bool,

    /// Also publish the merged pack and print its download link
    #[arg(long, value_name = "DIR", env = "PACKMERGE_PUBLIC_DIR")]
    pub publish_dir: Option<PathBuf>,

    /// URL prefix the publish directory is served under
    #[arg(long, value_name = "URL", env = "PACKMERGE_BASE_URL", default_value = "/downloads")]
    pub base_url: String,
}

#[derive(Args, Debug)]
pub struct PublishArgs {
    /// Directory served to clients
    #[arg(long, value_name = "DIR", env = "PACKMERGE_PUBLIC_DIR")]
    pub publish_dir: PathBuf,

    /// URL prefix the publish directory is served under
    #[arg(long, value_name = "URL", env = "PACKMERGE_BASE_URL", default_value = "/downloads")]
    pub base_url: String,
}

impl Cli {
    pub fn is_quiet(&self) -> bool {
        self.quiet > 0
    }

    pub fn is_very_quiet(&self) -> bool {
        self.quiet > 1
    }
}

impl MergeArgs {
    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            compression_level: self.level,
            verify_crc: !self.no_verify_crc,
            synthesize_parent_dirs: self.synthesize_dirs,
        }
    }

    pub fn publish_config(&self) -> Option<PublishConfig> {
        self.publish_dir.as_ref().map(|dir| PublishConfig {
            public_dir: dir.clone(),
            base_url: self.base_url.clone(),
        })
    }
}

impl PublishArgs {
    pub fn publish_config(&self) -> PublishConfig {
        PublishConfig {
            public_dir: self.publish_dir.clone(),
            base_url: self.base_url.clone(),
        }
    }
}
