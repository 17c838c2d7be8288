//! Integration test: full pipeline against a local HTTP image server.
//!
//! Runs the catalog pipeline with the libcurl transport, checks the rewritten
//! catalog and asset files, then re-runs it to check idempotence.

mod common;

use assetsync_core::catalog::CatalogError;
use assetsync_core::config::AssetSyncConfig;
use assetsync_core::fetcher::CurlTransport;
use assetsync_core::pipeline::{self, PipelineSettings};
use common::image_server::{self, ImageServerOptions};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;

fn write_catalog(settings: &PipelineSettings, catalog: &Value) {
    fs::create_dir_all(settings.catalog_path.parent().unwrap()).unwrap();
    fs::write(
        &settings.catalog_path,
        serde_json::to_string_pretty(catalog).unwrap(),
    )
    .unwrap();
}

fn read_catalog(settings: &PipelineSettings) -> Vec<Value> {
    let text = fs::read_to_string(&settings.catalog_path).unwrap();
    serde_json::from_str(&text).unwrap()
}

fn transport() -> CurlTransport {
    CurlTransport::new("assetsync-test", Duration::from_secs(5))
}

fn settings(root: &Path) -> PipelineSettings {
    PipelineSettings::from_config(&AssetSyncConfig::default(), root)
}

#[test]
fn second_run_is_byte_identical_and_fetches_nothing() {
    let server = image_server::start(
        ImageServerOptions::default()
            .image("/img/chair.PNG?v=2", b"png-bytes")
            .image("/img/side.jpg", b"jpg-bytes")
            .image("/img/shared.webp", b"webp-bytes"),
    );
    let root = tempdir().unwrap();
    let s = settings(root.path());
    write_catalog(
        &s,
        &json!([
            {
                "id": 101, "sku": "ABC-1", "name": "Chaise Élise", "price": "59.90",
                "categories": [{ "id": 3, "name": "Outdoor Furniture" }],
                "image": server.url("/img/chair.PNG?v=2"),
                "images": [
                    { "src": server.url("/img/chair.PNG?v=2") },
                    { "src": server.url("/img/side.jpg") },
                    { "src": server.url("/img/side.jpg") },
                    { "src": server.url("/img/shared.webp") }
                ]
            },
            {
                "id": 102, "sku": "", "name": "Stool",
                "image": server.url("/img/shared.webp"),
                "images": [server.url("/img/shared.webp")]
            },
            { "id": 103, "name": "Test", "image": server.url("/img/side.jpg") }
        ]),
    );

    let first = pipeline::run(&s, transport()).unwrap();
    assert_eq!(first.written, 2);
    assert_eq!(first.stats.downloaded, 3);
    assert_eq!(first.stats.failed, 0);
    assert_eq!(first.stats.skipped, 1);
    assert_eq!(server.hits("/img/chair.PNG?v=2"), 1);
    assert_eq!(server.hits("/img/side.jpg"), 1);
    assert_eq!(server.hits("/img/shared.webp"), 1);

    let products = read_catalog(&s);
    assert_eq!(products[0]["image"], "products/ABC-1/image_main_ABC-1.png");
    assert_eq!(
        products[0]["images"],
        json!([
            "products/ABC-1/image_main_ABC-1.png",
            "products/ABC-1/gallery/image_gallery-101-ABC-1-0.jpg",
            "products/ABC-1/gallery/image_gallery-101-ABC-1-1.webp"
        ])
    );
    assert_eq!(products[0]["price"], json!(59.9));
    assert_eq!(products[0]["category"], "Outdoor Furniture");
    // Shared URL resolves to the path written for the first product.
    assert_eq!(
        products[1]["image"],
        "products/ABC-1/gallery/image_gallery-101-ABC-1-1.webp"
    );
    assert_eq!(products[1]["sku"], "102");

    let main_file = root
        .path()
        .join("assets/products/ABC-1/image_main_ABC-1.png");
    assert_eq!(fs::read(&main_file).unwrap(), b"png-bytes");

    let before = fs::read(&s.catalog_path).unwrap();
    assert!(String::from_utf8(before.clone()).unwrap().contains("Chaise Élise"));
    let hits_before = server.total_hits();

    let second = pipeline::run(&s, transport()).unwrap();
    assert_eq!(second.written, 2);
    assert_eq!(second.stats.downloaded, 0);
    assert_eq!(server.total_hits(), hits_before);
    assert_eq!(fs::read(&s.catalog_path).unwrap(), before);
}

#[test]
fn refetched_urls_reuse_files_already_on_disk() {
    let server = image_server::start(ImageServerOptions::default().image("/a.gif", b"gif"));
    let root = tempdir().unwrap();
    let s = settings(root.path());
    let catalog = json!([{ "id": 7, "sku": "G-7", "image": server.url("/a.gif") }]);

    write_catalog(&s, &catalog);
    pipeline::run(&s, transport()).unwrap();
    assert_eq!(server.hits("/a.gif"), 1);

    // A fresh mirror of the remote catalog brings the URLs back.
    write_catalog(&s, &catalog);
    let report = pipeline::run(&s, transport()).unwrap();
    assert_eq!(server.hits("/a.gif"), 1);
    assert_eq!(report.stats.reused, 1);
    assert_eq!(read_catalog(&s)[0]["image"], "products/G-7/image_main_G-7.gif");
}

#[test]
fn failing_image_is_retried_then_omitted() {
    let server = image_server::start(
        ImageServerOptions::default()
            .failing("/down.jpg")
            .image("/ok.jpg", b"ok"),
    );
    let root = tempdir().unwrap();
    let s = settings(root.path());
    write_catalog(
        &s,
        &json!([
            { "id": 1, "image": server.url("/down.jpg") },
            { "id": 2, "image": server.url("/ok.jpg"), "images": [server.url("/down.jpg")] }
        ]),
    );

    let report = pipeline::run(&s, transport()).unwrap();
    assert_eq!(server.hits("/down.jpg"), 3);
    assert_eq!(report.stats.failed, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].error, "HTTP 500");

    let products = read_catalog(&s);
    assert_eq!(products[0]["image"], "");
    assert_eq!(products[0]["images"], json!([]));
    assert_eq!(products[1]["images"], json!(["products/2/image_main_2.jpg"]));
    assert!(!root.path().join("assets/products/1/image_main_1.jpg").exists());
}

#[test]
fn malformed_catalog_leaves_file_untouched() {
    let root = tempdir().unwrap();
    let s = settings(root.path());
    fs::create_dir_all(s.catalog_path.parent().unwrap()).unwrap();
    fs::write(&s.catalog_path, r#"{"id": 1}"#).unwrap();

    let err = pipeline::run(&s, transport()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CatalogError>(),
        Some(CatalogError::NotAList(_))
    ));
    assert_eq!(fs::read_to_string(&s.catalog_path).unwrap(), r#"{"id": 1}"#);
}
