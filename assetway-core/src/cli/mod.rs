mod check;
mod dump;
mod init;
mod precompress;

pub use check::*;
pub use dump::*;
pub use init::*;
pub use precompress::*;

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum ConfigCmd {
    /// Validate configuration and exit
    Check {
        /// Path to config file
        #[arg(default_value = "config/assetway.toml")]
        path: PathBuf,
    },

    /// Print the resolved registration plan
    Dump {
        #[arg(default_value = "config/assetway.toml")]
        path: PathBuf,
    },

    /// Write a starter config file
    Init {
        #[arg(default_value = "config/assetway.toml")]
        path: PathBuf,
    },

    /// Generate .gz variants for compressible assets
    Precompress {
        #[arg(default_value = "config/assetway.toml")]
        path: PathBuf,

        /// Minimum file size worth a variant, in bytes
        #[arg(long, default_value_t = crate::precompress::DEFAULT_MIN_SIZE)]
        min_size: u64,
    },
}

pub fn run(cmd: ConfigCmd) -> anyhow::Result<()> {
    match cmd {
        ConfigCmd::Check { path } => check(path),
        ConfigCmd::Dump { path } => dump(path),
        ConfigCmd::Init { path } => init(path),
        ConfigCmd::Precompress { path, min_size } => precompress(path, min_size),
    }
}
