//! Container Builder
//!
//! Writes named typed arrays to a new container file.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{DatasetError, Result};

use super::{ArrayDescriptor, ContainerMetadata, Element, HEADER_SIZE, MAGIC, VERSION};

/// Builder for creating new container files
pub struct ContainerBuilder {
    /// Output file path
    path: PathBuf,
    /// Buffered writer for performance
    writer: BufWriter<File>,
    /// Current write position (start of the next array)
    current_offset: u64,
    /// Directory entries for arrays written so far
    arrays: Vec<ArrayDescriptor>,
}

impl ContainerBuilder {
    /// Create a new container builder
    ///
    /// Writes the header immediately; call `add_array()` for each array,
    /// then `finish()` to write the directory and footer.
    pub fn new(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .map_err(|e| DatasetError::from_open(path, e))?;

        let mut writer = BufWriter::new(file);

        // Array count placeholder, patched in finish
        writer.write_all(MAGIC)?;
        writer.write_all(&VERSION.to_le_bytes())?;
        writer.write_all(&0u32.to_le_bytes())?;

        Ok(Self {
            path: path.to_path_buf(),
            writer,
            current_offset: HEADER_SIZE,
            arrays: Vec::new(),
        })
    }

    /// Append an array of records
    ///
    /// `values` holds all records back to back; its length must be a
    /// multiple of the element count of `record_shape` (empty = scalar).
    pub fn add_array<T: Element>(
        &mut self,
        name: &str,
        record_shape: &[usize],
        values: &[T],
    ) -> Result<&ArrayDescriptor> {
        if self.arrays.iter().any(|a| a.name == name) {
            return Err(DatasetError::Validation(format!(
                "array '{}' already written to {}",
                name,
                self.path.display()
            )));
        }

        let record_len: usize = record_shape.iter().product();
        if record_len == 0 {
            return Err(DatasetError::Validation(format!(
                "array '{}' has a zero-sized record shape {:?}",
                name, record_shape
            )));
        }
        if values.len() % record_len != 0 {
            return Err(DatasetError::Validation(format!(
                "array '{}': {} values is not a multiple of record length {}",
                name,
                values.len(),
                record_len
            )));
        }

        let mut buf = Vec::with_capacity(values.len() * T::DTYPE.size());
        for value in values {
            value.write_le(&mut buf);
        }
        self.writer.write_all(&buf)?;

        let descriptor = ArrayDescriptor {
            name: name.to_string(),
            dtype: T::DTYPE,
            record_shape: record_shape.to_vec(),
            record_count: (values.len() / record_len) as u64,
            data_offset: self.current_offset,
        };
        self.current_offset += buf.len() as u64;
        self.arrays.push(descriptor);

        Ok(&self.arrays[self.arrays.len() - 1])
    }

    /// Finish building: write directory block, footer, and return metadata
    pub fn finish(mut self) -> Result<ContainerMetadata> {
        let directory_offset = self.current_offset;

        let directory = bincode::serialize(&self.arrays)
            .map_err(|e| DatasetError::Serialization(e.to_string()))?;
        let directory_crc = crc32fast::hash(&directory);

        self.writer.write_all(&directory)?;

        // Footer: directory_offset (8) + directory_crc (4) + padding (4)
        self.writer.write_all(&directory_offset.to_le_bytes())?;
        self.writer.write_all(&directory_crc.to_le_bytes())?;
        self.writer.write_all(&[0u8; 4])?;

        self.writer.flush()?;

        // Seek back and patch the array count in the header
        let mut file = self
            .writer
            .into_inner()
            .map_err(|e| DatasetError::Io(e.into_error()))?;
        file.seek(SeekFrom::Start(6))?; // After magic + version
        file.write_all(&(self.arrays.len() as u32).to_le_bytes())?;
        file.sync_all()?;

        let file_size = file.metadata()?.len();

        tracing::debug!(
            "Wrote container {} ({} arrays, {} bytes)",
            self.path.display(),
            self.arrays.len(),
            file_size
        );

        Ok(ContainerMetadata {
            path: self.path,
            arrays: self.arrays,
            file_size,
        })
    }
}
