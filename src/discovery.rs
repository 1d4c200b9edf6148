//! File system discovery of feature documents.
//!
//! Recursively walks directories to find `.feature` files. Used by the
//! `check` command so it can take directories as well as single files.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Extension a feature document carries.
pub const FEATURE_EXTENSION: &str = "feature";

/// Collect feature files under each given path.
///
/// A path that is itself a file is taken as-is, whatever its extension, so
/// `fable check odd-name.txt` still works. Directories are walked
/// recursively and contribute their `.feature` files in sorted order.
/// Paths that do not exist are skipped; callers notice via the empty result.
pub fn discover_features(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            files.extend(scan_directory(path));
        } else if path.is_file() {
            files.push(path.clone());
        }
    }

    files
}

fn scan_directory(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .is_some_and(|ext| ext == FEATURE_EXTENSION)
        })
        .map(|e| e.into_path())
        .collect();

    files.sort();
    files
}
