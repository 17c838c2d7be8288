//! Catalog file load and save.

use super::record::CatalogProduct;
use crate::storage;
use serde_json::Value;
use std::io;
use std::path::{Path, PathBuf};

/// Fatal catalog problems; any of these aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog not found: {}", .0.display())]
    Missing(PathBuf),
    #[error("failed to read catalog {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("catalog {} is not valid JSON", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("catalog {} is not a list", .0.display())]
    NotAList(PathBuf),
    #[error("failed to serialize catalog")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write catalog {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Reads the catalog as a list of raw records.
pub fn load_catalog(path: &Path) -> Result<Vec<Value>, CatalogError> {
    if !path.exists() {
        return Err(CatalogError::Missing(path.to_path_buf()));
    }
    let data = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&data).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(CatalogError::NotAList(path.to_path_buf())),
    }
}

/// Serializes products as pretty JSON (2-space indent, UTF-8 kept as-is).
pub fn render_catalog(products: &[CatalogProduct]) -> Result<String, CatalogError> {
    let mut out = serde_json::to_string_pretty(products).map_err(CatalogError::Serialize)?;
    out.push('\n');
    Ok(out)
}

/// Replaces the catalog file in one rename.
pub fn save_catalog(path: &Path, products: &[CatalogProduct]) -> Result<(), CatalogError> {
    let rendered = render_catalog(products)?;
    storage::write_atomic(path, rendered.as_bytes()).map_err(|source| CatalogError::Write {
        path: path.to_path_buf(),
        source,
    })
}
