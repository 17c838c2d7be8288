//! Disk writes for fetched images and the catalog.
//!
//! Bodies are written to a `.part` sibling, synced, then renamed over the
//! final name, so a present final file is always a complete one.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `a.jpg` → `a.jpg.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// True when `path` holds a non-empty regular file from an earlier write.
pub fn is_complete(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| m.is_file() && m.len() > 0)
        .unwrap_or(false)
}

/// Writes `data` to `final_path` via a synced temp file and rename.
/// Creates parent directories as needed.
pub fn write_atomic(final_path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = final_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = temp_path(final_path);
    let written = File::create(&tmp).and_then(|mut f| {
        f.write_all(data)?;
        f.sync_all()
    });
    if let Err(e) = written.and_then(|()| fs::rename(&tmp, final_path)) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(())
}
