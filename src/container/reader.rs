//! Container Reader
//!
//! Opens container files and serves single records by offset. Only the
//! header, footer and directory are read on open; record data stays on disk.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::error::{DatasetError, Result};

use super::{ArrayDescriptor, Record, FOOTER_SIZE, HEADER_SIZE, MAGIC, VERSION};

/// Read-only handle on one container file
#[derive(Debug)]
pub struct ContainerReader {
    path: PathBuf,
    /// File handle for reading records
    file: BufReader<File>,
    /// Directory loaded at open time
    arrays: Vec<ArrayDescriptor>,
}

impl ContainerReader {
    /// Open a container for reading
    ///
    /// Validates header, footer and directory checksum.
    pub fn open(path: &Path) -> Result<Self> {
        let mut file = File::open(path).map_err(|e| DatasetError::from_open(path, e))?;
        let file_size = file.metadata()?.len();

        if file_size < HEADER_SIZE + FOOTER_SIZE {
            return Err(DatasetError::format(
                path,
                format!("file too small for a container ({} bytes)", file_size),
            ));
        }

        // Read and validate header
        let mut header = [0u8; HEADER_SIZE as usize];
        file.read_exact(&mut header)?;

        if &header[0..4] != MAGIC {
            return Err(DatasetError::format(
                path,
                format!("invalid magic: expected EVDC, got {:?}", &header[0..4]),
            ));
        }

        let version = u16::from_le_bytes([header[4], header[5]]);
        if version != VERSION {
            return Err(DatasetError::format(
                path,
                format!("unsupported container version: {}", version),
            ));
        }

        let array_count = u32::from_le_bytes([header[6], header[7], header[8], header[9]]);

        // Read footer to locate the directory
        file.seek(SeekFrom::End(-(FOOTER_SIZE as i64)))?;
        let mut footer = [0u8; FOOTER_SIZE as usize];
        file.read_exact(&mut footer)?;

        let mut offset_bytes = [0u8; 8];
        offset_bytes.copy_from_slice(&footer[0..8]);
        let directory_offset = u64::from_le_bytes(offset_bytes);
        let directory_crc = u32::from_le_bytes([footer[8], footer[9], footer[10], footer[11]]);

        let directory_end = file_size - FOOTER_SIZE;
        if directory_offset < HEADER_SIZE || directory_offset > directory_end {
            return Err(DatasetError::format(
                path,
                format!("directory offset {} out of bounds", directory_offset),
            ));
        }

        // Load directory into memory
        file.seek(SeekFrom::Start(directory_offset))?;
        let mut directory = vec![0u8; (directory_end - directory_offset) as usize];
        file.read_exact(&mut directory)?;

        if crc32fast::hash(&directory) != directory_crc {
            return Err(DatasetError::format(path, "directory checksum mismatch"));
        }

        let arrays: Vec<ArrayDescriptor> = bincode::deserialize(&directory)
            .map_err(|e| DatasetError::format(path, format!("undecodable directory: {}", e)))?;

        if arrays.len() != array_count as usize {
            return Err(DatasetError::format(
                path,
                format!(
                    "header declares {} arrays, directory holds {}",
                    array_count,
                    arrays.len()
                ),
            ));
        }

        for array in &arrays {
            let record_size = array.checked_record_size().ok_or_else(|| {
                DatasetError::format(
                    path,
                    format!(
                        "array '{}' has malformed record shape {:?}",
                        array.name, array.record_shape
                    ),
                )
            })?;
            let end = record_size
                .checked_mul(array.record_count)
                .and_then(|len| len.checked_add(array.data_offset));
            match end {
                Some(end) if array.data_offset >= HEADER_SIZE && end <= directory_offset => {}
                _ => {
                    return Err(DatasetError::format(
                        path,
                        format!("array '{}' extends outside the data block", array.name),
                    ))
                }
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            file: BufReader::new(file),
            arrays,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All arrays in this container
    pub fn arrays(&self) -> &[ArrayDescriptor] {
        &self.arrays
    }

    /// Look up an array by name
    pub fn array(&self, name: &str) -> Result<&ArrayDescriptor> {
        self.arrays
            .iter()
            .find(|a| a.name == name)
            .ok_or_else(|| DatasetError::format(&self.path, format!("missing array '{}'", name)))
    }

    /// Number of records in a named array (no data is read)
    pub fn record_count(&self, name: &str) -> Result<u64> {
        Ok(self.array(name)?.record_count)
    }

    /// Read one record of a named array
    pub fn read_record(&mut self, name: &str, offset: u64) -> Result<Record> {
        let array = self.array(name)?.clone();

        if offset >= array.record_count {
            return Err(DatasetError::format(
                &self.path,
                format!(
                    "offset {} beyond array '{}' with {} records",
                    offset, name, array.record_count
                ),
            ));
        }

        let record_size = array.record_size();
        self.file
            .seek(SeekFrom::Start(array.data_offset + offset * record_size))?;

        let mut data = vec![0u8; record_size as usize];
        self.file.read_exact(&mut data).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => {
                DatasetError::format(&self.path, format!("truncated array '{}'", name))
            }
            _ => DatasetError::Io(e),
        })?;

        Ok(Record::new(array.dtype, array.record_shape, Bytes::from(data)))
    }
}
