use crate::error::{CompressionError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Fails with `RootNotFound` unless `root` is an existing directory.
pub fn ensure_root_dir(root: &Path) -> Result<()> {
    if !root.is_dir() {
        return Err(CompressionError::RootNotFound(root.to_path_buf()));
    }
    Ok(())
}

/// Collects every regular file below `root`, recursively.
///
/// Directories are not returned and symlinks are not followed. Entries are
/// sorted by file name within each directory, so two walks over an unchanged
/// tree yield the same order.
///
/// # Returns
/// * `Ok(files)` - Paths rooted at `root` (absolute when `root` is)
/// * `Err(CompressionError::RootNotFound)` - If `root` is missing or not a directory
pub fn collect_source_files(root: &Path) -> Result<Vec<PathBuf>> {
    ensure_root_dir(root)?;

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}
