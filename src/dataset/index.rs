//! Index Map
//!
//! Two parallel sequences mapping a logical index to (file id, record offset).

use std::ops::Range;

/// Logical index → (file id, intra-file offset)
#[derive(Debug, Default, Clone)]
pub struct IndexMap {
    index_to_file: Vec<usize>,
    index_to_offset: Vec<u64>,
}

impl IndexMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every offset of `window` for `file_id`
    pub fn extend(&mut self, file_id: usize, window: Range<u64>) {
        let count = (window.end - window.start) as usize;
        self.index_to_file.reserve(count);
        self.index_to_offset.reserve(count);

        self.index_to_file
            .extend(std::iter::repeat(file_id).take(count));
        self.index_to_offset.extend(window);
    }

    pub fn len(&self) -> usize {
        self.index_to_file.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_to_file.is_empty()
    }

    /// Resolve a logical index; None when out of range
    pub fn resolve(&self, index: usize) -> Option<(usize, u64)> {
        let file_id = *self.index_to_file.get(index)?;
        let offset = *self.index_to_offset.get(index)?;
        Some((file_id, offset))
    }
}
