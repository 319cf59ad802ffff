//! Dataset Module
//!
//! Addresses records spread over many container files as one logical,
//! randomly indexable sequence.
//!
//! ## Responsibilities
//! - Discover member files across directories (filter + per-directory cap)
//! - Probe each file's record count and apply the selection window
//! - Map logical indices to (file, offset) in O(1)
//! - Open each file lazily, once, on first access
//!
//! ## Layout
//! ```text
//!  logical index:  0 1 2 ... 99 | 100 101 ... 149
//!  file id:        0 0 0 ...  0 |   1   1 ...   1
//!  offset:         0 1 2 ... 99 |   0   1 ...  49
//! ```

mod event_dataset;
mod index;

use std::ops::Range;
use std::path::PathBuf;

use crate::container::Record;
use crate::error::Result;

pub use event_dataset::{EventDataset, SampleIter};
pub use index::IndexMap;

/// A map-style dataset: known length, random access by index
pub trait Dataset {
    type Item;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, index: usize) -> Result<Self::Item>;
}

/// A member file, fixed at construction
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    /// Position in the combined file list
    pub file_id: usize,
    pub path: PathBuf,
    /// Total records in the payload array
    pub record_count: u64,
    /// Offsets selected by the window
    pub selected: Range<u64>,
}

impl SourceFile {
    pub fn selected_count(&self) -> u64 {
        self.selected.end - self.selected.start
    }
}

/// One record pair plus the logical index it was fetched for
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub payload: Record,
    pub label: Record,
    pub index: usize,
}
