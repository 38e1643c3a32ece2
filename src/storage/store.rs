#![forbid(unsafe_code)]

use std::cell::Cell;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, trace};

use super::metrics::{StoreMetrics, StoreMetricsSnapshot};
use super::options::StoreOptions;
use super::record::{Record, StoreConfig};
use crate::primitives::io::{FileIo, StdFileIo};
use crate::types::{RecordId, Result, StoreError};

/// Append-only store of fixed-width records described by `C`.
///
/// One mutex guards the file handle, so every read and write runs as a
/// single critical section: appends never interleave and a returned
/// [`RecordId`] is readable as soon as `write` returns. The store is `Sync`
/// and is meant to be shared (e.g. behind an `Arc`) by caller threads.
pub struct RecordStore<C: StoreConfig> {
    path: PathBuf,
    options: StoreOptions,
    file: Mutex<Option<Box<dyn FileIo>>>,
    metrics: StoreMetrics,
    _config: PhantomData<fn() -> C>,
}

impl<C: StoreConfig> RecordStore<C> {
    /// Width in bytes of one record.
    pub const RECORD_SIZE: usize = C::LAYOUT.size();

    /// Creates a closed store for the directory in `options`.
    pub fn new(options: StoreOptions) -> Self {
        Self {
            path: options.dir.join(C::FILE_NAME),
            options,
            file: Mutex::new(None),
            metrics: StoreMetrics::default(),
            _config: PhantomData,
        }
    }

    /// Creates a closed store in `dir` with default options.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(StoreOptions::new(dir))
    }

    /// Width in bytes of one record.
    pub fn record_size(&self) -> usize {
        Self::RECORD_SIZE
    }

    /// Full path of the backing file.
    pub fn store_file(&self) -> &Path {
        &self.path
    }

    /// Options the store was created with.
    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Opens the backing file, creating it if absent.
    ///
    /// Existing records are kept and later writes append after them. Fails
    /// with [`StoreError::AlreadyOpen`] if the store is already open.
    pub fn open(&self) -> Result<()> {
        let mut slot = self.file.lock();
        if slot.is_some() {
            return Err(StoreError::AlreadyOpen);
        }
        if self.options.create_dir {
            fs::create_dir_all(&self.options.dir)?;
        }
        let io = StdFileIo::open(&self.path)?;
        debug!(
            path = %self.path.display(),
            len = io.len()?,
            record_size = Self::RECORD_SIZE,
            "store.open"
        );
        *slot = Some(Box::new(io));
        Ok(())
    }

    /// Opens the store over a caller-supplied file handle.
    pub fn open_with(&self, io: Box<dyn FileIo>) -> Result<()> {
        let mut slot = self.file.lock();
        if slot.is_some() {
            return Err(StoreError::AlreadyOpen);
        }
        debug!(path = %self.path.display(), "store.open_with");
        *slot = Some(io);
        Ok(())
    }

    /// Releases the file handle. A no-op if the store is not open.
    pub fn close(&self) {
        if self.file.lock().take().is_some() {
            debug!(path = %self.path.display(), "store.close");
        }
    }

    /// Returns true while the store holds an open file handle.
    pub fn is_open(&self) -> bool {
        self.file.lock().is_some()
    }

    /// Appends `record` and returns the offset it was written at.
    pub fn write(&self, record: &C::Record) -> Result<RecordId> {
        self.with_locked(|locked| locked.append_record(record))
    }

    /// Appends several records under one lock acquisition.
    ///
    /// The returned ids are contiguous and in input order. Records are packed
    /// up front, so a layout error writes nothing.
    pub fn write_batch(&self, records: &[C::Record]) -> Result<Vec<RecordId>> {
        let mut buf = Vec::with_capacity(records.len() * Self::RECORD_SIZE);
        for record in records {
            C::LAYOUT.pack(&record.to_fields(), &mut buf)?;
        }
        self.with_locked(|locked| {
            let start = locked.append_raw(&buf)?;
            for _ in records {
                self.metrics.record_written();
            }
            Ok((0..records.len() as u64)
                .map(|idx| RecordId(start.0 + idx * Self::RECORD_SIZE as u64))
                .collect())
        })
    }

    /// Reads the record that starts at `id`.
    pub fn read(&self, id: RecordId) -> Result<C::Record> {
        self.with_locked(|locked| locked.read_record(id))
    }

    /// Reads every whole record in file order, paired with its id.
    pub fn read_all(&self) -> Result<Vec<(RecordId, C::Record)>> {
        self.with_locked(|locked| {
            let size = Self::RECORD_SIZE as u64;
            let count = locked.len()? / size;
            (0..count)
                .map(|idx| {
                    let id = RecordId(idx * size);
                    locked.read_record(id).map(|record| (id, record))
                })
                .collect()
        })
    }

    /// Current length of the backing file in bytes.
    pub fn len(&self) -> Result<u64> {
        self.with_locked(|locked| locked.len())
    }

    /// Returns true if the backing file holds no bytes.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Number of whole records in the backing file.
    pub fn record_count(&self) -> Result<u64> {
        Ok(self.len()? / Self::RECORD_SIZE as u64)
    }

    /// Flushes file data and metadata to disk.
    pub fn sync(&self) -> Result<()> {
        self.with_locked(|locked| locked.io.sync_all())
    }

    /// Returns I/O counters for this store.
    pub fn metrics_snapshot(&self) -> StoreMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Runs `f` inside the store's critical section.
    ///
    /// Everything `f` does through the [`LockedStore`] happens without any
    /// other operation on this store in between, which is what lets a
    /// caller append a record and a trailing payload as one unit.
    pub(crate) fn with_locked<R>(
        &self,
        f: impl FnOnce(&LockedStore<'_, C>) -> Result<R>,
    ) -> Result<R> {
        let slot = self.file.lock();
        let io = slot.as_deref().ok_or(StoreError::Closed)?;
        let locked = LockedStore {
            io,
            store: self,
            wrote: Cell::new(false),
        };
        let out = f(&locked)?;
        if locked.wrote.get() && self.options.sync_on_write {
            io.sync_all()?;
        }
        Ok(out)
    }
}

/// View of an open store while its lock is held.
pub(crate) struct LockedStore<'a, C: StoreConfig> {
    io: &'a dyn FileIo,
    store: &'a RecordStore<C>,
    wrote: Cell<bool>,
}

impl<C: StoreConfig> LockedStore<'_, C> {
    /// Packs and appends `record`, returning its id.
    pub(crate) fn append_record(&self, record: &C::Record) -> Result<RecordId> {
        let mut buf = Vec::with_capacity(RecordStore::<C>::RECORD_SIZE);
        C::LAYOUT.pack(&record.to_fields(), &mut buf)?;
        let id = self.append_raw(&buf)?;
        self.store.metrics.record_written();
        Ok(id)
    }

    /// Appends raw bytes at the end of the file, returning their offset.
    ///
    /// Counts toward byte metrics only; the bytes are not a record of `C`.
    pub(crate) fn append_raw(&self, bytes: &[u8]) -> Result<RecordId> {
        let off = self.io.append(bytes)?;
        self.wrote.set(true);
        self.store.metrics.add_bytes_written(bytes.len() as u64);
        trace!(
            file = C::FILE_NAME,
            record_id = off,
            len = bytes.len(),
            "store.append"
        );
        Ok(RecordId(off))
    }

    /// Reads and reconstructs the record at `id`.
    pub(crate) fn read_record(&self, id: RecordId) -> Result<C::Record> {
        let bytes = self.read_raw(id.0, RecordStore::<C>::RECORD_SIZE)?;
        let fields = C::LAYOUT.unpack(&bytes)?;
        let record = (C::RECONSTRUCT)(fields)?;
        self.store.metrics.record_read();
        Ok(record)
    }

    /// Reads exactly `len` bytes at `off`.
    ///
    /// Fails with [`StoreError::Truncated`] when the file ends first; the
    /// bounds check runs before any buffer is allocated.
    pub(crate) fn read_raw(&self, off: u64, len: usize) -> Result<Vec<u8>> {
        let file_len = self.io.len()?;
        let available = file_len.saturating_sub(off);
        if available < len as u64 {
            return Err(StoreError::Truncated {
                offset: off,
                need: len as u64,
                available,
            });
        }
        let mut buf = vec![0u8; len];
        self.io.read_at(off, &mut buf)?;
        self.store.metrics.add_bytes_read(len as u64);
        trace!(file = C::FILE_NAME, off, len, "store.read");
        Ok(buf)
    }

    /// Current length of the backing file in bytes.
    pub(crate) fn len(&self) -> Result<u64> {
        self.io.len()
    }
}
