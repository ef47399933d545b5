//! Bounded cross-request frame cache.
//!
//! Keys are the exact bit patterns of the observer coordinates plus the
//! instant in nanoseconds, so a hit is only possible for identical inputs.

use chrono::NaiveDateTime;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::models::{GeographicLocation, ObservationFrame};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct FrameKey {
    latitude: u64,
    longitude: u64,
    elevation: u64,
    seconds: i64,
    nanos: u32,
}

impl FrameKey {
    fn new(location: &GeographicLocation, datetime: &NaiveDateTime) -> Self {
        let utc = datetime.and_utc();
        Self {
            latitude: location.latitude.to_bits(),
            longitude: location.longitude.to_bits(),
            elevation: location.elevation.to_bits(),
            seconds: utc.timestamp(),
            nanos: utc.timestamp_subsec_nanos(),
        }
    }
}

/// Snapshot of cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

pub struct FrameCache {
    capacity: usize,
    entries: RwLock<HashMap<FrameKey, ObservationFrame>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl FrameCache {
    /// A cache holding at most `capacity` frames. When full, the whole
    /// cache is cleared before the next insert.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: RwLock::new(HashMap::with_capacity(capacity.min(1024))),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn get(
        &self,
        location: &GeographicLocation,
        datetime: &NaiveDateTime,
    ) -> Option<ObservationFrame> {
        let key = FrameKey::new(location, datetime);
        let found = self.entries.read().get(&key).cloned();
        match found {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        found
    }

    pub fn insert(&self, location: &GeographicLocation, frame: &ObservationFrame) {
        if self.capacity == 0 {
            return;
        }
        let key = FrameKey::new(location, &frame.datetime);
        let mut entries = self.entries.write();
        if entries.len() >= self.capacity && !entries.contains_key(&key) {
            log::debug!("frame cache full ({} entries), clearing", entries.len());
            entries.clear();
        }
        entries.insert(key, frame.clone());
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
