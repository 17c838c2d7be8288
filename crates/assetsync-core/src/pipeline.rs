//! One materialization run: load catalog, resolve every record, write back.

use crate::asset_path::AssetLayout;
use crate::catalog::{self, CatalogTransformer, FetchFailure, TransformStats};
use crate::config::AssetSyncConfig;
use crate::fetcher::{CurlTransport, Fetcher, Transport};
use crate::retry::RetryPolicy;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Resolved inputs for a run (config paths joined onto the project root).
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub catalog_path: PathBuf,
    pub layout: AssetLayout,
    pub retry: RetryPolicy,
    pub skip_sentinel: String,
}

impl PipelineSettings {
    pub fn from_config(cfg: &AssetSyncConfig, root: &Path) -> Self {
        Self {
            catalog_path: root.join(&cfg.catalog_path),
            layout: AssetLayout::new(root.join(&cfg.assets_dir), cfg.asset_prefix.clone()),
            retry: cfg.retry_policy(),
            skip_sentinel: cfg.skip_sentinel.clone(),
        }
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub catalog_path: PathBuf,
    pub asset_root: PathBuf,
    /// Records written to the catalog.
    pub written: usize,
    pub stats: TransformStats,
    pub failures: Vec<FetchFailure>,
}

/// Runs the pipeline with libcurl as transport.
pub fn run_with_curl(cfg: &AssetSyncConfig, root: &Path) -> Result<RunReport> {
    let settings = PipelineSettings::from_config(cfg, root);
    let transport = CurlTransport::new(cfg.user_agent.clone(), cfg.timeout());
    run(&settings, transport)
}

/// Loads the catalog, transforms every record in order and writes the result once.
///
/// Missing or malformed catalogs are errors; individual image failures are not.
pub fn run<T: Transport>(settings: &PipelineSettings, transport: T) -> Result<RunReport> {
    let raw = catalog::load_catalog(&settings.catalog_path)?;
    tracing::info!(
        records = raw.len(),
        path = %settings.catalog_path.display(),
        "catalog loaded"
    );

    let asset_root = settings.layout.asset_root();
    std::fs::create_dir_all(&asset_root)
        .with_context(|| format!("create asset dir {}", asset_root.display()))?;

    let fetcher = Fetcher::new(transport, settings.retry);
    let mut transformer =
        CatalogTransformer::new(settings.layout.clone(), fetcher, settings.skip_sentinel.clone());
    let products: Vec<_> = raw
        .iter()
        .filter_map(|record| transformer.transform(record))
        .collect();

    catalog::save_catalog(&settings.catalog_path, &products)?;

    let (stats, failures) = transformer.finish();
    tracing::info!(
        written = products.len(),
        downloaded = stats.downloaded,
        reused = stats.reused,
        failed = stats.failed,
        skipped = stats.skipped,
        dropped = stats.dropped,
        "catalog written"
    );

    Ok(RunReport {
        catalog_path: settings.catalog_path.clone(),
        asset_root,
        written: products.len(),
        stats,
        failures,
    })
}
