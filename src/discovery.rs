//! File Discovery
//!
//! Lists candidate container files in a directory. The dataset applies the
//! name filter and per-directory cap on top of the order returned here.

use std::fs;
use std::path::Path;

use crate::error::{DatasetError, Result};

/// Directory listing collaborator
pub trait FileDiscovery {
    /// Entry names in `dir`, in discovery order
    fn list(&self, dir: &Path) -> Result<Vec<String>>;
}

/// Lists regular files on the local filesystem, sorted by name
///
/// `read_dir` order is platform dependent; sorting keeps file ids stable
/// across runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDiscovery;

impl FileDiscovery for FsDiscovery {
    fn list(&self, dir: &Path) -> Result<Vec<String>> {
        let entries = fs::read_dir(dir).map_err(|e| DatasetError::from_open(dir, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.path().is_file() {
                continue;
            }
            // Non UTF-8 names cannot match a name filter; skip them
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }

        names.sort();
        Ok(names)
    }
}
