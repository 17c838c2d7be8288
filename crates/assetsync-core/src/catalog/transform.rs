//! Per-record image resolution.
//!
//! Each record takes one of two paths, chosen once from its classified image
//! fields:
//!
//! - already-local: paths written by an earlier run are normalized and passed
//!   through without any network activity;
//! - remote: every distinct URL is resolved through the dedup table, the path
//!   deriver and the fetcher.

use super::image_ref::{strip_legacy_root, ImageRef};
use super::record::{CatalogProduct, RawProduct};
use crate::asset_path::{AssetLayout, ImageRole};
use crate::dedup::{DedupTable, Resolved};
use crate::fetcher::{FetchOutcome, Fetcher, Transport};
use crate::url_model::truncate_for_diagnostic;
use serde_json::Value;
use std::fmt;

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformStats {
    /// Images fetched over the network and written.
    pub downloaded: usize,
    /// Images whose destination file already existed.
    pub reused: usize,
    /// References served from the dedup table.
    pub deduplicated: usize,
    /// Distinct URLs whose fetch exhausted its retries.
    pub failed: usize,
    /// Records removed by the skip sentinel.
    pub skipped: usize,
    /// Records removed for lack of a usable id.
    pub dropped: usize,
}

/// One image that could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub url: String,
    pub attempts: u32,
    pub error: String,
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}... : {}", truncate_for_diagnostic(&self.url), self.error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Branch {
    AlreadyLocal,
    Remote,
}

impl Branch {
    fn choose(main: &ImageRef, gallery: &[ImageRef]) -> Self {
        match main {
            ImageRef::Local(_) => Branch::AlreadyLocal,
            ImageRef::Remote(_) => Branch::Remote,
            ImageRef::Empty if gallery.iter().any(ImageRef::is_remote) => Branch::Remote,
            ImageRef::Empty => Branch::AlreadyLocal,
        }
    }
}

/// Rewrites raw catalog records so they reference local image files.
///
/// Owns the dedup table, so one transformer covers exactly one run.
pub struct CatalogTransformer<T> {
    layout: AssetLayout,
    fetcher: Fetcher<T>,
    skip_sentinel: String,
    dedup: DedupTable,
    stats: TransformStats,
    failures: Vec<FetchFailure>,
}

impl<T: Transport> CatalogTransformer<T> {
    pub fn new(
        layout: AssetLayout,
        fetcher: Fetcher<T>,
        skip_sentinel: impl Into<String>,
    ) -> Self {
        Self {
            layout,
            fetcher,
            skip_sentinel: skip_sentinel.into(),
            dedup: DedupTable::new(),
            stats: TransformStats::default(),
            failures: Vec::new(),
        }
    }

    pub fn stats(&self) -> &TransformStats {
        &self.stats
    }

    pub fn failures(&self) -> &[FetchFailure] {
        &self.failures
    }

    /// Consumes the transformer, returning its counters and failures.
    pub fn finish(self) -> (TransformStats, Vec<FetchFailure>) {
        (self.stats, self.failures)
    }

    /// Transforms one raw record; `None` when the record is skipped or dropped.
    pub fn transform(&mut self, raw: &Value) -> Option<CatalogProduct> {
        let Some(obj) = raw.as_object() else {
            tracing::warn!("dropping catalog entry that is not an object");
            self.stats.dropped += 1;
            return None;
        };
        let product = RawProduct::new(obj);

        if product.matches_sentinel(&self.skip_sentinel) {
            tracing::debug!(id = ?obj.get("id"), "skipping sentinel product");
            self.stats.skipped += 1;
            return None;
        }

        let Some(id) = product.id() else {
            tracing::warn!(name = ?obj.get("name"), "dropping product without usable id");
            self.stats.dropped += 1;
            return None;
        };

        let identity = product.identity(id);
        let main = product.main_image();
        let gallery = product.gallery();

        let (image, images) = match Branch::choose(&main, &gallery) {
            Branch::AlreadyLocal => {
                tracing::debug!(id, %identity, "images already local");
                normalize_local(id, &main, &gallery)
            }
            Branch::Remote => self.resolve_remote(id, &identity, &main, &gallery),
        };

        Some(product.into_catalog_product(id, image, images))
    }

    fn resolve_remote(
        &mut self,
        id: i64,
        identity: &str,
        main: &ImageRef,
        gallery: &[ImageRef],
    ) -> (String, Vec<String>) {
        let mut images: Vec<String> = Vec::new();
        let mut image = String::new();

        let main_url = main.remote_url();
        if let Some(url) = main_url {
            if let Some(path) = self.resolve_one(url, identity, ImageRole::Main) {
                image = path.clone();
                images.push(path);
            }
        }

        for entry in gallery {
            if let ImageRef::Local(path) = entry {
                tracing::warn!(
                    id,
                    path = path.as_str(),
                    "dropping local gallery entry from remote product"
                );
            }
        }

        for (position, url) in distinct_gallery_urls(main_url, gallery)
            .into_iter()
            .enumerate()
        {
            let role = ImageRole::Gallery {
                product_id: id,
                position,
            };
            if let Some(path) = self.resolve_one(url, identity, role) {
                if !images.contains(&path) {
                    images.push(path);
                }
            }
        }

        if image.is_empty() {
            image = images.first().cloned().unwrap_or_default();
        }
        (image, images)
    }

    /// Dedup table first, then derive + fetch. `None` when the image is unavailable.
    fn resolve_one(&mut self, url: &str, identity: &str, role: ImageRole) -> Option<String> {
        match self.dedup.resolve(url).cloned() {
            Some(Resolved::Written(path)) => {
                self.stats.deduplicated += 1;
                return Some(path);
            }
            Some(Resolved::Failed) => return None,
            None => {}
        }

        let relative = self.layout.relative_path(identity, role, url);
        let destination = self.layout.on_disk(&relative);
        match self.fetcher.fetch(url, &destination) {
            Ok(outcome) => {
                match outcome {
                    FetchOutcome::AlreadyPresent => self.stats.reused += 1,
                    FetchOutcome::Downloaded { .. } => self.stats.downloaded += 1,
                }
                self.dedup.record(url, relative.clone());
                Some(relative)
            }
            Err(exhausted) => {
                tracing::warn!(
                    url = truncate_for_diagnostic(url),
                    attempts = exhausted.attempts,
                    error = %exhausted.last_error,
                    "image fetch failed"
                );
                self.stats.failed += 1;
                self.dedup.record_failure(url);
                self.failures.push(FetchFailure {
                    url: url.to_string(),
                    attempts: exhausted.attempts,
                    error: exhausted.last_error.to_string(),
                });
                None
            }
        }
    }
}

/// Remote gallery URLs minus the main URL and repeats, first-seen order.
/// Their index in the result is the gallery position.
fn distinct_gallery_urls<'g>(main_url: Option<&str>, gallery: &'g [ImageRef]) -> Vec<&'g str> {
    let mut out: Vec<&str> = Vec::new();
    for url in gallery.iter().filter_map(ImageRef::remote_url) {
        if Some(url) == main_url || out.contains(&url) {
            continue;
        }
        out.push(url);
    }
    out
}

/// Re-run path: strip the legacy root, dedupe, force main to the front.
fn normalize_local(id: i64, main: &ImageRef, gallery: &[ImageRef]) -> (String, Vec<String>) {
    let main_path = match main {
        ImageRef::Local(p) => strip_legacy_root(p).to_string(),
        _ => String::new(),
    };

    let mut images: Vec<String> = Vec::new();
    if !main_path.is_empty() {
        images.push(main_path.clone());
    }
    for entry in gallery {
        match entry {
            ImageRef::Local(p) => {
                let p = strip_legacy_root(p).to_string();
                if !images.contains(&p) {
                    images.push(p);
                }
            }
            ImageRef::Remote(url) => tracing::warn!(
                id,
                url = truncate_for_diagnostic(url),
                "dropping remote gallery entry from already-local product"
            ),
            ImageRef::Empty => {}
        }
    }

    let image = if main_path.is_empty() {
        images.first().cloned().unwrap_or_default()
    } else {
        main_path
    };
    (image, images)
}
