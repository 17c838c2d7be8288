//! CLI for the assetsync catalog image materializer.

mod commands;

use anyhow::{Context, Result};
use assetsync_core::config::{self, AssetSyncConfig};
use clap::Parser;
use std::path::PathBuf;

use commands::run_sync;

/// Download every product image once and point the catalog at the local files.
///
/// Runs with no arguments from the project root.
#[derive(Debug, Parser)]
#[command(name = "assetsync")]
#[command(
    about = "assetsync: materialize product catalog images as local files",
    long_about = None
)]
pub struct Cli {
    /// Project root that catalog and asset paths are relative to (default: current directory).
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Config file to use instead of ~/.config/assetsync/config.toml.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        Cli::parse().run()
    }

    pub fn run(self) -> Result<()> {
        let cfg = self.load_config()?;
        tracing::debug!("loaded config: {:?}", cfg);

        let root = match self.root {
            Some(root) => root,
            None => std::env::current_dir().context("resolve current directory")?,
        };
        run_sync(&cfg, &root)
    }

    fn load_config(&self) -> Result<AssetSyncConfig> {
        match &self.config {
            Some(path) => config::load_from_path(path),
            None => config::load_or_init(),
        }
    }
}
