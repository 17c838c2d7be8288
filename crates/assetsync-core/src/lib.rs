pub mod config;
pub mod logging;

pub mod asset_path;
pub mod catalog;
pub mod dedup;
pub mod fetcher;
pub mod pipeline;
pub mod retry;
pub mod storage;
pub mod url_model;
