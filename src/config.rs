//! Configuration for eventset
//!
//! Centralized dataset configuration with sensible defaults.

use std::ops::Range;
use std::path::PathBuf;

use crate::error::{DatasetError, Result};

/// Default name of the per-file payload array
pub const DEFAULT_PAYLOAD_ARRAY: &str = "event_data";

/// Default name of the per-file label array
pub const DEFAULT_LABEL_ARRAY: &str = "labels";

/// Main configuration for an EventDataset
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    // -------------------------------------------------------------------------
    // Discovery Configuration
    // -------------------------------------------------------------------------
    /// Directories searched for container files, in order
    pub directories: Vec<PathBuf>,

    /// Substring a file name must contain to be selected (None selects all)
    pub name_filter: Option<String>,

    /// Keep only the first N files per directory (None or 0 keeps all)
    pub max_files_per_directory: Option<usize>,

    // -------------------------------------------------------------------------
    // Selection Window Configuration
    // -------------------------------------------------------------------------
    /// Fraction of each file's records skipped before the window starts
    pub start_fraction: f64,

    /// Fraction of each file's records included in the window
    pub use_fraction: f64,

    // -------------------------------------------------------------------------
    // Record Stream Configuration
    // -------------------------------------------------------------------------
    /// Named array holding event payloads
    pub payload_array: String,

    /// Named array holding labels
    pub label_array: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            directories: Vec::new(),
            name_filter: None,
            max_files_per_directory: None,
            start_fraction: 0.0,
            use_fraction: 1.0,
            payload_array: DEFAULT_PAYLOAD_ARRAY.to_string(),
            label_array: DEFAULT_LABEL_ARRAY.to_string(),
        }
    }
}

impl DatasetConfig {
    /// Create a new config builder
    pub fn builder() -> DatasetConfigBuilder {
        DatasetConfigBuilder::default()
    }

    /// Validate the selection fractions and return the window they describe
    pub fn selection_window(&self) -> Result<SelectionWindow> {
        SelectionWindow::new(self.start_fraction, self.use_fraction)
    }

    /// Effective per-directory cap (`Some(0)` means no cap)
    pub fn file_cap(&self) -> Option<usize> {
        self.max_files_per_directory.filter(|&n| n > 0)
    }

    /// Whether a file name passes the name filter
    pub fn accepts_name(&self, name: &str) -> bool {
        match &self.name_filter {
            Some(filter) => name.contains(filter.as_str()),
            None => true,
        }
    }
}

/// Builder for DatasetConfig
#[derive(Default)]
pub struct DatasetConfigBuilder {
    config: DatasetConfig,
}

impl DatasetConfigBuilder {
    /// Add one directory to search
    pub fn directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.directories.push(path.into());
        self
    }

    /// Replace the list of directories to search
    pub fn directories<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.config.directories = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Only select files whose name contains `filter`
    pub fn name_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.name_filter = Some(filter.into());
        self
    }

    /// Cap the number of files taken from each directory
    pub fn max_files_per_directory(mut self, count: usize) -> Self {
        self.config.max_files_per_directory = Some(count);
        self
    }

    /// Set the window start fraction
    pub fn start_fraction(mut self, fraction: f64) -> Self {
        self.config.start_fraction = fraction;
        self
    }

    /// Set the window size fraction
    pub fn use_fraction(mut self, fraction: f64) -> Self {
        self.config.use_fraction = fraction;
        self
    }

    /// Set the payload array name
    pub fn payload_array(mut self, name: impl Into<String>) -> Self {
        self.config.payload_array = name.into();
        self
    }

    /// Set the label array name
    pub fn label_array(mut self, name: impl Into<String>) -> Self {
        self.config.label_array = name.into();
        self
    }

    pub fn build(self) -> DatasetConfig {
        self.config
    }
}

// =============================================================================
// Selection Window
// =============================================================================

/// Validated pair of selection fractions, applied identically to every file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionWindow {
    start_fraction: f64,
    use_fraction: f64,
}

impl SelectionWindow {
    /// The whole file
    pub const FULL: SelectionWindow = SelectionWindow {
        start_fraction: 0.0,
        use_fraction: 1.0,
    };

    /// Validate fractions: `0 <= start < 1`, `0 < use <= 1`, `start + use <= 1`
    pub fn new(start_fraction: f64, use_fraction: f64) -> Result<Self> {
        if !start_fraction.is_finite() || !use_fraction.is_finite() {
            return Err(DatasetError::Validation(format!(
                "selection fractions must be finite (start={}, use={})",
                start_fraction, use_fraction
            )));
        }
        if !(0.0..1.0).contains(&start_fraction) {
            return Err(DatasetError::Validation(format!(
                "start_fraction must be in [0, 1), got {}",
                start_fraction
            )));
        }
        if !(use_fraction > 0.0 && use_fraction <= 1.0) {
            return Err(DatasetError::Validation(format!(
                "use_fraction must be in (0, 1], got {}",
                use_fraction
            )));
        }
        if start_fraction + use_fraction > 1.0 {
            return Err(DatasetError::Validation(format!(
                "start_fraction + use_fraction must not exceed 1, got {} + {}",
                start_fraction, use_fraction
            )));
        }

        Ok(Self {
            start_fraction,
            use_fraction,
        })
    }

    pub fn start_fraction(&self) -> f64 {
        self.start_fraction
    }

    pub fn use_fraction(&self) -> f64 {
        self.use_fraction
    }

    /// Offsets selected from a file holding `total` records
    ///
    /// `start = floor(start_fraction * total)`, `count = floor(use_fraction * total)`.
    pub fn apply(&self, total: u64) -> Range<u64> {
        let start = (self.start_fraction * total as f64).floor() as u64;
        let count = (self.use_fraction * total as f64).floor() as u64;
        // floor(a) + floor(b) <= floor(a + b) <= total
        let end = (start + count).min(total);
        start..end
    }
}
