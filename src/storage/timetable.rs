//! Lock-Guarded Flight Timetable
//!
//! This module implements the shared store for Flightboard: an ordered list of
//! flight records protected by a single exclusive lock.
//!
//! ## Design Decisions
//!
//! 1. **One Lock**: Every request runs its lookup, mutation and outcome check
//!    inside one critical section, so the whole table sits behind one `Mutex`.
//! 2. **Linear Scan**: Records are found by scanning in insertion order. There
//!    is no index keyed by code.
//! 3. **Duplicates Allowed**: `insert` never checks for an existing code. Lookups
//!    and deletes act on the first match.
//!
//! ## Concurrency Model
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │                FlightStore                │
//! │  ┌─────────────────────────────────────┐  │
//! │  │          Mutex<Timetable>           │  │
//! │  │  [0] ah123 boarding 17.30           │  │
//! │  │  [1] bh456 delayed  18.00           │  │
//! │  │  ...                                │  │
//! │  └─────────────────────────────────────┘  │
//! └───────────────────────────────────────────┘
//! ```
//!
//! `Timetable` has no interior locking of its own. The only way to reach one
//! that is shared between connections is `FlightStore::lock()`, which makes
//! "hold the lock for the whole operation" the path of least resistance.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

/// One flight: its code, current state and scheduled time.
///
/// All three fields are opaque strings and keep the exact formatting the
/// client sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Flight code, the lookup key. Never changes after creation.
    pub code: String,
    /// Free-form status label, e.g. `boarding`
    pub state: String,
    /// Free-form schedule label, e.g. `17.30`
    pub time: String,
}

impl Record {
    /// Creates a new record.
    pub fn new(code: impl Into<String>, state: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            state: state.into(),
            time: time.into(),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.code, self.state, self.time)
    }
}

/// The ordered collection of flight records.
#[derive(Debug, Default, Clone)]
pub struct Timetable {
    records: Vec<Record>,
}

impl Timetable {
    /// Creates an empty timetable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index of the first record whose code equals `code`.
    ///
    /// The comparison is exact and case-sensitive.
    pub fn find(&self, code: &str) -> Option<usize> {
        self.records.iter().position(|record| record.code == code)
    }

    /// Appends a record at the end of the table.
    pub fn insert(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Removes the record at `index`, shifting later records down.
    ///
    /// Returns `None` if `index` is out of bounds.
    pub fn remove_at(&mut self, index: usize) -> Option<Record> {
        if index < self.records.len() {
            Some(self.records.remove(index))
        } else {
            None
        }
    }

    /// Sets the state and time of the record at `index`.
    ///
    /// The code is left untouched. Returns the updated record, or `None` if
    /// `index` is out of bounds.
    pub fn update(
        &mut self,
        index: usize,
        state: impl Into<String>,
        time: impl Into<String>,
    ) -> Option<&Record> {
        let record = self.records.get_mut(index)?;
        record.state = state.into();
        record.time = time.into();
        Some(record)
    }

    /// Returns the record at `index`.
    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over the records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }
}

/// Snapshot of store statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub records: usize,
    pub reads: u64,
    pub writes: u64,
    pub deletes: u64,
    pub changes: u64,
}

/// The shared flight store.
///
/// Wrap it in an `Arc` and hand a clone to every connection. All access goes
/// through [`FlightStore::lock`].
///
/// # Example
///
/// ```
/// use flightboard::storage::{FlightStore, Record};
///
/// let store = FlightStore::with_seed(Record::new("ah123", "boarding", "17.30"));
///
/// let mut table = store.lock();
/// let index = table.find("ah123").unwrap();
/// let updated = table.update(index, "departed", "17.45").unwrap();
/// assert_eq!(updated.code, "ah123");
/// assert_eq!(updated.state, "departed");
/// ```
#[derive(Default)]
pub struct FlightStore {
    table: Mutex<Timetable>,

    reads: AtomicU64,
    writes: AtomicU64,
    deletes: AtomicU64,
    changes: AtomicU64,
}

impl fmt::Debug for FlightStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlightStore")
            .field("records", &self.table.try_lock().map(|t| t.len()).ok())
            .field("reads", &self.reads.load(Ordering::Relaxed))
            .field("writes", &self.writes.load(Ordering::Relaxed))
            .field("deletes", &self.deletes.load(Ordering::Relaxed))
            .field("changes", &self.changes.load(Ordering::Relaxed))
            .finish()
    }
}

impl FlightStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with one record.
    pub fn with_seed(seed: Record) -> Self {
        let store = Self::new();
        store.lock().insert(seed);
        store
    }

    /// Acquires the exclusive lock on the timetable.
    ///
    /// A poisoned lock is recovered: every mutation is a single `Vec`
    /// operation, so a panicking holder cannot leave a half-written record.
    pub fn lock(&self) -> MutexGuard<'_, Timetable> {
        self.table
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn record_read(&self) {
        self.reads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_delete(&self) {
        self.deletes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_change(&self) {
        self.changes.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns a snapshot of the store statistics.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            records: self.lock().len(),
            reads: self.reads.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            changes: self.changes.load(Ordering::Relaxed),
        }
    }
}
