use crate::error::{AuditError, Result};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

fn is_excluded(entry: &DirEntry, exclusions: &[String]) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && exclusions
            .iter()
            .any(|excl| entry.file_name().to_string_lossy() == excl.as_str())
}

fn has_extension(path: &Path, include_extensions: &[String]) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy();
            include_extensions.iter().any(|inc| inc.as_str() == ext)
        })
        .unwrap_or(false)
}

/// Recursively list files under `root` with one of `include_extensions`,
/// pruning directories named in `exclusions`. Sorted for deterministic output.
///
/// A directory that cannot be read aborts the walk.
pub fn collect_source_files(
    root: &Path,
    include_extensions: &[String],
    exclusions: &[String],
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !is_excluded(e, exclusions));

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            AuditError::file_read(path, e.into())
        })?;
        if entry.file_type().is_file() && has_extension(entry.path(), include_extensions) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

/// `file` relative to `root`, or `file` itself when it lies outside
pub fn relative_to(root: &Path, file: &Path) -> PathBuf {
    file.strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| file.to_path_buf())
}
