//! The shared rolling-window store.
//!
//! One process-wide map from metric name to its bounded sample history. Every
//! read and write goes through the same mutex, so concurrent lifecycle scopes
//! (decorated calls, nested monitors) all observe one consistent history per
//! metric. The lock is never held across rendering or log emission.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;

use crate::types::Sample;

/// Maximum number of samples retained per metric.
pub const WINDOW_CAPACITY: usize = 30;

static GLOBAL_STORE: Lazy<Arc<WindowStore>> = Lazy::new(|| Arc::new(WindowStore::new()));

/// Bounded sample histories for all metrics, guarded by a single lock.
///
/// Windows are created lazily on first request, pre-filled with
/// `WINDOW_CAPACITY - 1` absent samples so a freshly registered metric can be
/// reported with partial history immediately. Entries are never removed for
/// the lifetime of the store.
#[derive(Debug, Default)]
pub struct WindowStore {
    windows: Mutex<HashMap<String, VecDeque<Sample>>>,
}

fn new_window() -> VecDeque<Sample> {
    std::iter::repeat(None).take(WINDOW_CAPACITY - 1).collect()
}

impl WindowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide store shared by all engines and lifecycle wrappers.
    pub fn global() -> Arc<WindowStore> {
        GLOBAL_STORE.clone()
    }

    /// Creates any missing windows. Idempotent: an already-populated window
    /// is left untouched, so concurrent creators of the same key cannot
    /// reset each other's history.
    pub fn ensure<'a, I>(&self, names: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut windows = self.windows.lock().unwrap();
        for name in names {
            windows.entry(name.to_string()).or_insert_with(new_window);
        }
    }

    /// Appends one sample and enforces the capacity bound (FIFO eviction).
    pub fn append(&self, name: &str, sample: Sample) {
        let mut windows = self.windows.lock().unwrap();
        let window = windows.entry(name.to_string()).or_insert_with(new_window);
        window.push_back(sample);
        while window.len() > WINDOW_CAPACITY {
            window.pop_front();
        }
    }

    /// A copy of the current window contents, oldest first, for read-only
    /// use outside the lock. `None` if the metric was never registered.
    pub fn snapshot(&self, name: &str) -> Option<Vec<Sample>> {
        let windows = self.windows.lock().unwrap();
        windows.get(name).map(|w| w.iter().copied().collect())
    }

    /// Re-trims every window to the capacity bound. Idempotent; a guard
    /// against any window that grew past the cap through a missed trim.
    pub fn trim_all(&self) {
        let mut windows = self.windows.lock().unwrap();
        for window in windows.values_mut() {
            while window.len() > WINDOW_CAPACITY {
                window.pop_front();
            }
        }
    }

    /// Names of all metrics registered so far.
    pub fn tracked_names(&self) -> Vec<String> {
        let windows = self.windows.lock().unwrap();
        windows.keys().cloned().collect()
    }
}
