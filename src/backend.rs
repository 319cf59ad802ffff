//! Container Backend
//!
//! The seam between the dataset and whatever stores the records. A backend
//! opens files read-only; the handle it returns answers record counts and
//! single-record reads for named arrays.

use std::path::Path;

use crate::container::{ContainerReader, Record};
use crate::error::Result;

/// An open, read-only container
pub trait RecordSource {
    /// Number of records in a named array, without materializing it
    fn record_count(&mut self, array: &str) -> Result<u64>;

    /// Read one record of a named array into memory
    fn read_record(&mut self, array: &str, offset: u64) -> Result<Record>;
}

/// Opens container files
pub trait ContainerBackend {
    type Handle: RecordSource;

    fn open(&self, path: &Path) -> Result<Self::Handle>;
}

impl RecordSource for ContainerReader {
    fn record_count(&mut self, array: &str) -> Result<u64> {
        ContainerReader::record_count(self, array)
    }

    fn read_record(&mut self, array: &str, offset: u64) -> Result<Record> {
        ContainerReader::read_record(self, array, offset)
    }
}

/// Backend for the native container format
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeBackend;

impl ContainerBackend for NativeBackend {
    type Handle = ContainerReader;

    fn open(&self, path: &Path) -> Result<ContainerReader> {
        ContainerReader::open(path)
    }
}
