use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;

/// List the capture files directly inside `folder` whose extension is `extension`.
///
/// Files come back in directory listing order, which is then the batch
/// order of the session they feed. `sort` orders them by path instead.
pub fn discover_captures<P: AsRef<Path>>(folder: P, extension: &str, sort: bool) -> Result<Vec<PathBuf>> {
    let folder = folder.as_ref();
    let extension = extension.trim_start_matches('.');

    let entries = fs::read_dir(folder)
        .with_context(|| format!("Cannot list capture folder '{}'", folder.display()))?;

    let mut captures = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Cannot read entry in '{}'", folder.display()))?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            captures.push(path);
        }
    }

    if sort {
        captures.sort();
    }

    debug!("{}: found {} capture files", folder.display(), captures.len());
    Ok(captures)
}
