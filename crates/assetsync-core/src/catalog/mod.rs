//! Product catalog: record model, image classification, transformation and
//! file I/O.

mod image_ref;
mod record;
mod store;
mod transform;

pub use image_ref::{strip_legacy_root, ImageRef, LEGACY_ROOT_SEGMENT};
pub use record::{CatalogProduct, RawProduct};
pub use store::{load_catalog, render_catalog, save_catalog, CatalogError};
pub use transform::{CatalogTransformer, FetchFailure, TransformStats};
