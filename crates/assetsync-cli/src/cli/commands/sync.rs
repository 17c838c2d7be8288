//! `assetsync` – fetch catalog images and rewrite the catalog.

use anyhow::Result;
use assetsync_core::config::AssetSyncConfig;
use assetsync_core::pipeline::{self, RunReport};
use std::path::Path;

pub fn run_sync(cfg: &AssetSyncConfig, root: &Path) -> Result<()> {
    let report = pipeline::run_with_curl(cfg, root)?;
    for failure in &report.failures {
        eprintln!("  FAIL {}", failure);
    }
    for line in summary_lines(&report) {
        println!("{line}");
    }
    Ok(())
}

pub(crate) fn summary_lines(report: &RunReport) -> Vec<String> {
    let stats = &report.stats;
    let mut lines = vec![
        format!(
            "Wrote {} products to {}",
            report.written,
            report.catalog_path.display()
        ),
        format!(
            "Downloaded {} images, {} failed.",
            stats.downloaded, stats.failed
        ),
    ];
    if stats.reused > 0 {
        lines.push(format!("Reused {} images already on disk.", stats.reused));
    }
    lines.push(format!("Images under {}", report.asset_root.display()));
    lines
}
