//! Storage Module
//!
//! This module provides the shared flight store for Flightboard: an ordered,
//! in-memory timetable guarded by one process-wide exclusive lock.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        FlightStore                          │
//! │   ┌─────────────────────────────────────────────────────┐   │
//! │   │  Mutex<Timetable>                                   │   │
//! │   │  Vec<Record>  (insertion order, linear scan)        │   │
//! │   └─────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────┘
//!        ▲                    ▲                    ▲
//!        │ lock()             │ lock()             │ lock()
//!   connection 1         connection 2         connection N
//! ```
//!
//! Nothing is persisted: the timetable lives as long as the process.
//!
//! ## Example
//!
//! ```
//! use flightboard::storage::{FlightStore, Record};
//! use std::sync::Arc;
//!
//! let store = Arc::new(FlightStore::new());
//!
//! let mut table = store.lock();
//! let before = table.len();
//! table.insert(Record::new("bh456", "delayed", "18.00"));
//! assert!(table.len() > before);
//! assert_eq!(table.find("bh456"), Some(0));
//! ```

pub mod timetable;

// Re-export commonly used types
pub use timetable::{FlightStore, Record, StoreStats, Timetable};
