//! Snapshot persistence
//!
//! Whole-file overwrite with no observable partial writes: serialize to a
//! sibling temp file, then rename over the target.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use chaos_core::Snapshot;

pub fn write_snapshot(snapshot: &Snapshot, path: &Path) -> io::Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    let tmp = tmp_path(path);
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    debug!("Snapshot written to {}", path.display());
    Ok(())
}

/// `data.json` -> `data.json.tmp`, in the same directory so the rename
/// stays on one filesystem
fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("snapshot.json"));
    name.push(".tmp");
    path.with_file_name(name)
}
