use crate::error::{MergeError, Result};
use log::debug;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Spec file scanner for a spec root directory.
///
/// The `SpecScanner` recursively walks the root directory and collects every file beneath
/// it. No extension filtering happens here: anything that is not an OpenAPI document is
/// expected to fail in the loader and be skipped there.
///
/// Entries are visited in file-name order, so the discovery order is stable between runs.
///
/// # Example
///
/// ```no_run
/// use openapi_merge::scanner::SpecScanner;
/// use std::path::PathBuf;
///
/// let scanner = SpecScanner::new(PathBuf::from("./specs"));
/// let result = scanner.scan().unwrap();
/// println!("Found {} files", result.spec_files.len());
/// ```
pub struct SpecScanner {
    root_path: PathBuf,
}

/// Result of a directory scan.
pub struct ScanResult {
    /// Every discovered file, relative to the root and rendered with `/` separators
    pub spec_files: Vec<String>,
}

impl SpecScanner {
    /// Creates a new `SpecScanner` for the specified root directory.
    ///
    /// # Arguments
    ///
    /// * `root_path` - The spec root directory to walk
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Scans the directory tree and collects all non-directory entries.
    ///
    /// Directories are descended into but never reported themselves. A symlink that
    /// points at a directory is treated as a directory.
    ///
    /// # Returns
    ///
    /// Returns a `ScanResult` with every discovered file in file-name order, relative to
    /// the root. An empty result is not an error here; the caller decides what to do.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::Discovery`] if the root directory, or anything beneath it,
    /// cannot be read. Discovery stops at the first unreadable entry.
    pub fn scan(&self) -> Result<ScanResult> {
        let mut spec_files = Vec::new();

        for entry in WalkDir::new(&self.root_path).sort_by_file_name() {
            let entry = entry.map_err(|source| MergeError::Discovery {
                root: self.root_path.clone(),
                source,
            })?;

            // `is_dir` follows symlinks, so a link to a directory is skipped as well
            if entry.path().is_dir() {
                continue;
            }

            if let Ok(relative) = entry.path().strip_prefix(&self.root_path) {
                debug!("Discovered file: {}", relative.display());
                spec_files.push(to_reference_path(relative));
            }
        }

        Ok(ScanResult { spec_files })
    }
}

/// Joins path components with `/`, the separator `$ref` URIs expect.
fn to_reference_path(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
