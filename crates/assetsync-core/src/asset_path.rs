//! Deterministic local paths for product images.
//!
//! Catalog paths are relative to the assets directory and always start with
//! the asset prefix, e.g. `products/ABC-1/image_main_ABC-1.png`.

use crate::url_model::extension_from_url;
use std::path::{Path, PathBuf};

/// Which slot of a product an image fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRole {
    /// The product's main image.
    Main,
    /// A gallery image; `position` is dense over the product's distinct gallery URLs.
    Gallery { product_id: i64, position: usize },
}

/// Derives the catalog-relative path for an image.
///
/// Pure: the same inputs always give the same path.
pub fn derive(prefix: &str, identity: &str, role: ImageRole, url: &str) -> String {
    let ext = extension_from_url(url);
    match role {
        ImageRole::Main => format!("{prefix}/{identity}/image_main_{identity}.{ext}"),
        ImageRole::Gallery {
            product_id,
            position,
        } => format!(
            "{prefix}/{identity}/gallery/image_gallery-{product_id}-{identity}-{position}.{ext}"
        ),
    }
}

/// Where image files live on disk and how catalog paths map onto them.
#[derive(Debug, Clone)]
pub struct AssetLayout {
    assets_dir: PathBuf,
    prefix: String,
}

impl AssetLayout {
    pub fn new(assets_dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        let prefix: String = prefix.into();
        Self {
            assets_dir: assets_dir.into(),
            prefix: prefix.trim_matches('/').to_string(),
        }
    }

    pub fn assets_dir(&self) -> &Path {
        &self.assets_dir
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Directory holding every product folder (`<assets_dir>/<prefix>`).
    pub fn asset_root(&self) -> PathBuf {
        self.assets_dir.join(&self.prefix)
    }

    /// Catalog-relative path for an image (see [`derive`]).
    pub fn relative_path(&self, identity: &str, role: ImageRole, url: &str) -> String {
        derive(&self.prefix, identity, role, url)
    }

    /// Filesystem location of a catalog-relative path.
    pub fn on_disk(&self, relative: &str) -> PathBuf {
        relative
            .split('/')
            .filter(|s| !s.is_empty())
            .fold(self.assets_dir.clone(), |acc, seg| acc.join(seg))
    }
}
