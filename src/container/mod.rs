//! Container Module
//!
//! Immutable on-disk store of named, fixed-shape typed arrays. Each file
//! holds a handful of arrays (`event_data`, `labels`, ...) whose records can
//! be counted without reading them and fetched one at a time by offset.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Header (10 bytes)                                       │
//! │   Magic: "EVDC" (4) | Version: u16 (2) | Arrays: u32 (4)│
//! ├─────────────────────────────────────────────────────────┤
//! │ Data Block (variable)                                   │
//! │   array 0: record_count * record_size bytes (LE)        │
//! │   array 1: ...                                          │
//! ├─────────────────────────────────────────────────────────┤
//! │ Directory Block (variable)                              │
//! │   bincode Vec<ArrayDescriptor>                          │
//! ├─────────────────────────────────────────────────────────┤
//! │ Footer (16 bytes)                                       │
//! │   DirOffset: u64 (8) | DirCRC: u32 (4) | Padding (4)    │
//! └─────────────────────────────────────────────────────────┘
//! ```

mod builder;
mod reader;
mod record;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use builder::ContainerBuilder;
pub use reader::ContainerReader;
pub use record::{DType, Element, Record};

// =============================================================================
// Shared Constants (used by builder and reader)
// =============================================================================

/// Magic bytes identifying an eventset container file
pub(crate) const MAGIC: &[u8; 4] = b"EVDC";

/// Current container format version
pub(crate) const VERSION: u16 = 1;

/// Header size: Magic (4) + Version (2) + ArrayCount (4) = 10 bytes
pub(crate) const HEADER_SIZE: u64 = 10;

/// Footer size: DirOffset (8) + DirCRC (4) + Padding (4) = 16 bytes
pub(crate) const FOOTER_SIZE: u64 = 16;

// =============================================================================
// Array Descriptor
// =============================================================================

/// Directory entry describing one named array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayDescriptor {
    pub name: String,
    pub dtype: DType,
    /// Shape of a single record; empty for scalars
    pub record_shape: Vec<usize>,
    pub record_count: u64,
    /// Absolute file offset of record 0
    pub data_offset: u64,
}

impl ArrayDescriptor {
    /// Elements per record
    pub fn record_len(&self) -> usize {
        self.record_shape.iter().product()
    }

    /// Bytes per record
    pub fn record_size(&self) -> u64 {
        (self.record_len() * self.dtype.size()) as u64
    }

    /// Bytes per record, or None when the shape overflows or is empty
    pub fn checked_record_size(&self) -> Option<u64> {
        let len = self
            .record_shape
            .iter()
            .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))?;
        match len.checked_mul(self.dtype.size())? {
            0 => None,
            size => u64::try_from(size).ok(),
        }
    }
}

// =============================================================================
// Container Metadata
// =============================================================================

/// Summary of a finished container file, returned by the builder
#[derive(Debug, Clone)]
pub struct ContainerMetadata {
    pub path: PathBuf,
    pub arrays: Vec<ArrayDescriptor>,
    pub file_size: u64,
}

impl ContainerMetadata {
    pub fn array(&self, name: &str) -> Option<&ArrayDescriptor> {
        self.arrays.iter().find(|a| a.name == name)
    }
}
