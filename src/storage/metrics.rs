use std::sync::atomic::{AtomicU64, Ordering};

/// Counters tracking I/O performed by a single store.
///
/// All counters use relaxed ordering; they are observational only and never
/// influence store behaviour.
#[derive(Default, Debug)]
pub struct StoreMetrics {
    records_written: AtomicU64,
    records_read: AtomicU64,
    bytes_written: AtomicU64,
    bytes_read: AtomicU64,
}

/// Snapshot of [`StoreMetrics`] at a point in time.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct StoreMetricsSnapshot {
    /// Records appended, counting a property header and its payload as one.
    pub records_written: u64,
    /// Records read back.
    pub records_read: u64,
    /// Bytes appended to the store file.
    pub bytes_written: u64,
    /// Bytes read from the store file.
    pub bytes_read: u64,
}

impl StoreMetrics {
    /// Captures the current counter values.
    pub fn snapshot(&self) -> StoreMetricsSnapshot {
        StoreMetricsSnapshot {
            records_written: self.records_written.load(Ordering::Relaxed),
            records_read: self.records_read.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn record_written(&self) {
        self.records_written.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_read(&self) {
        self.records_read.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_bytes_written(&self, delta: u64) {
        if delta != 0 {
            self.bytes_written.fetch_add(delta, Ordering::Relaxed);
        }
    }

    pub(crate) fn add_bytes_read(&self, delta: u64) {
        if delta != 0 {
            self.bytes_read.fetch_add(delta, Ordering::Relaxed);
        }
    }
}
