//! Event Dataset
//!
//! Builds the index map at construction and serves samples through lazily
//! opened, cached per-file handles.

use std::path::PathBuf;

use parking_lot::Mutex;

use crate::backend::{ContainerBackend, NativeBackend, RecordSource};
use crate::config::{DatasetConfig, SelectionWindow};
use crate::discovery::{FileDiscovery, FsDiscovery};
use crate::error::{DatasetError, Result};

use super::{Dataset, IndexMap, Sample, SourceFile};

/// Index-addressable dataset over many container files
///
/// ## Concurrency:
/// - `files` and `index`: immutable after construction, read without locks
/// - `handles`: one slot per file id. The slot lock is held while the file
///   is opened and read, so a file is opened at most once even under
///   concurrent `get` calls, and reads of different files never contend.
/// - All query methods use `&self`
pub struct EventDataset<B: ContainerBackend = NativeBackend> {
    config: DatasetConfig,
    backend: B,
    files: Vec<SourceFile>,
    index: IndexMap,
    handles: Vec<Mutex<Option<B::Handle>>>,
}

impl EventDataset<NativeBackend> {
    /// Build a dataset over native container files on the local filesystem
    pub fn open(config: DatasetConfig) -> Result<Self> {
        Self::with_collaborators(config, &FsDiscovery, NativeBackend)
    }
}

impl<B: ContainerBackend> EventDataset<B> {
    /// Build a dataset with explicit discovery and backend collaborators
    ///
    /// On construction:
    /// 1. Validate the selection window (fail fast, nothing built)
    /// 2. Discover files per directory, filter, cap
    /// 3. Probe each file's record count and extend the index map
    pub fn with_collaborators<D>(config: DatasetConfig, discovery: &D, backend: B) -> Result<Self>
    where
        D: FileDiscovery + ?Sized,
    {
        let window = config.selection_window()?;

        let paths = Self::discover(&config, discovery)?;

        let mut files = Vec::with_capacity(paths.len());
        let mut index = IndexMap::new();

        for (file_id, path) in paths.into_iter().enumerate() {
            let file = Self::probe(&backend, &config, &window, file_id, path)?;
            index.extend(file_id, file.selected.clone());
            files.push(file);
        }

        tracing::info!(
            "Indexed {} records from {} files (start_fraction={}, use_fraction={})",
            index.len(),
            files.len(),
            window.start_fraction(),
            window.use_fraction()
        );

        let handles = files.iter().map(|_| Mutex::new(None)).collect();

        Ok(Self {
            config,
            backend,
            files,
            index,
            handles,
        })
    }

    /// Total number of selected records
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Fetch the payload and label at a logical index
    ///
    /// Opens the owning file on first use; later calls for the same file
    /// reuse the cached handle.
    pub fn get(&self, index: usize) -> Result<Sample> {
        let (file_id, offset) = self
            .locate(index)
            .ok_or_else(|| DatasetError::IndexOutOfRange {
                index: i64::try_from(index).unwrap_or(i64::MAX),
                len: self.len(),
            })?;

        let mut slot = self.handles[file_id].lock();
        let handle = match &mut *slot {
            Some(handle) => handle,
            empty => {
                let file = &self.files[file_id];
                tracing::trace!("Opening {} (file {})", file.path.display(), file_id);
                empty.insert(self.backend.open(&file.path)?)
            }
        };

        let payload = handle.read_record(&self.config.payload_array, offset)?;
        let label = handle.read_record(&self.config.label_array, offset)?;

        Ok(Sample {
            payload,
            label,
            index,
        })
    }

    /// `get` for a signed index; negative indices are out of range
    pub fn get_signed(&self, index: i64) -> Result<Sample> {
        match usize::try_from(index) {
            Ok(index) => self.get(index),
            Err(_) => Err(DatasetError::IndexOutOfRange {
                index,
                len: self.len(),
            }),
        }
    }

    /// Resolve a logical index to (file id, record offset)
    pub fn locate(&self, index: usize) -> Option<(usize, u64)> {
        self.index.resolve(index)
    }

    /// Iterate over all samples in index order
    pub fn iter(&self) -> SampleIter<'_, B> {
        SampleIter {
            dataset: self,
            next: 0,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Member files in file id order
    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn source_file(&self, file_id: usize) -> Option<&SourceFile> {
        self.files.get(file_id)
    }

    /// Number of files with a cached handle
    pub fn open_handle_count(&self) -> usize {
        self.handles.iter().filter(|slot| slot.lock().is_some()).count()
    }

    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Combined file list: directories in order, per-directory discovery order
    fn discover<D>(config: &DatasetConfig, discovery: &D) -> Result<Vec<PathBuf>>
    where
        D: FileDiscovery + ?Sized,
    {
        let cap = config.file_cap();
        let mut paths = Vec::new();

        for dir in &config.directories {
            let selected: Vec<String> = discovery
                .list(dir)?
                .into_iter()
                .filter(|name| config.accepts_name(name))
                .take(cap.unwrap_or(usize::MAX))
                .collect();

            tracing::debug!("Selected {} files from {}", selected.len(), dir.display());

            paths.extend(selected.into_iter().map(|name| dir.join(name)));
        }

        Ok(paths)
    }

    /// Read a file's record count through a short-lived handle
    fn probe(
        backend: &B,
        config: &DatasetConfig,
        window: &SelectionWindow,
        file_id: usize,
        path: PathBuf,
    ) -> Result<SourceFile> {
        let record_count = {
            let mut handle = backend.open(&path)?;
            handle.record_count(&config.payload_array)?
        };

        let selected = window.apply(record_count);

        tracing::debug!(
            "Probed {} (file {}): {} records, selected {}..{}",
            path.display(),
            file_id,
            record_count,
            selected.start,
            selected.end
        );

        Ok(SourceFile {
            file_id,
            path,
            record_count,
            selected,
        })
    }
}

impl<B: ContainerBackend> Dataset for EventDataset<B> {
    type Item = Sample;

    fn len(&self) -> usize {
        EventDataset::len(self)
    }

    fn get(&self, index: usize) -> Result<Sample> {
        EventDataset::get(self, index)
    }
}

impl<'a, B: ContainerBackend> IntoIterator for &'a EventDataset<B> {
    type Item = Result<Sample>;
    type IntoIter = SampleIter<'a, B>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Sequential iterator over a dataset's samples
pub struct SampleIter<'a, B: ContainerBackend> {
    dataset: &'a EventDataset<B>,
    next: usize,
}

impl<'a, B: ContainerBackend> Iterator for SampleIter<'a, B> {
    type Item = Result<Sample>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.dataset.len() {
            return None;
        }
        let sample = self.dataset.get(self.next);
        self.next += 1;
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.dataset.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl<'a, B: ContainerBackend> ExactSizeIterator for SampleIter<'a, B> {}
