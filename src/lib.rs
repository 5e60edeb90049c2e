//! # Flightboard - A Concurrent In-Memory Flight Timetable
//!
//! Flightboard keeps a shared, ordered list of flight records in memory and
//! serves it over a plain-text TCP protocol. Many clients can connect at once;
//! every request runs against the timetable under one exclusive lock.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                             Flightboard                                 │
//! │                                                                         │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐                  │
//! │  │ TCP Server  │───>│ Connection  │───>│  Command    │                  │
//! │  │ (Listener)  │    │  Handler    │    │  Handler    │                  │
//! │  └─────────────┘    └──────┬──────┘    └──────┬──────┘                  │
//! │                            │                  │                         │
//! │                            ▼                  ▼                         │
//! │                     ┌─────────────┐    ┌──────────────────────────┐     │
//! │                     │  Request    │    │       FlightStore        │     │
//! │                     │  Parser     │    │  Mutex<Timetable>        │     │
//! │                     └─────────────┘    │  [ah123 boarding 17.30]  │     │
//! │                                        └──────────────────────────┘     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use flightboard::commands::CommandHandler;
//! use flightboard::connection::{handle_connection, ConnectionStats, Framing};
//! use flightboard::storage::FlightStore;
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = Arc::new(FlightStore::with_seed(flightboard::seed_record()));
//!     let stats = Arc::new(ConnectionStats::new());
//!
//!     let listener = TcpListener::bind("127.0.0.1:1236").await.unwrap();
//!
//!     loop {
//!         let (stream, addr) = listener.accept().await.unwrap();
//!         let handler = CommandHandler::new(Arc::clone(&store));
//!         let stats = Arc::clone(&stats);
//!
//!         tokio::spawn(handle_connection(stream, addr, handler, Framing::SingleRead, stats));
//!     }
//! }
//! ```
//!
//! ## Protocol
//!
//! | Request                  | Replies                          |
//! |--------------------------|----------------------------------|
//! | `READ code`              | `ROK code state time` / `RERR`   |
//! | `WRITE code state time`  | `WOK` / `WERR`                   |
//! | `DEL code`               | `DOK` / `DERR`                   |
//! | `CHANGE code state time` | `CHOK` / `CHERR`                 |
//! | anything else            | `ERR <reason>`                   |
//!
//! ## Module Overview
//!
//! - [`protocol`]: Request decoding and reply encoding
//! - [`storage`]: The lock-guarded timetable
//! - [`commands`]: Executes requests and decides replies
//! - [`connection`]: Client connection management

pub mod commands;
pub mod connection;
pub mod protocol;
pub mod storage;

// Re-export commonly used types for convenience
pub use commands::CommandHandler;
pub use connection::{handle_connection, ConnectionStats, Framing};
pub use protocol::{parse_request, ParseError, Reply, Request};
pub use storage::{FlightStore, Record, Timetable};

/// The default port Flightboard listens on
pub const DEFAULT_PORT: u16 = 1236;

/// The default host Flightboard binds to
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// The default listen backlog
pub const DEFAULT_BACKLOG: u32 = 10;

/// Code of the record the store is seeded with at startup
pub const SEED_CODE: &str = "ah123";

/// State of the seed record
pub const SEED_STATE: &str = "boarding";

/// Time of the seed record
pub const SEED_TIME: &str = "17.30";

/// Version of Flightboard
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the record the store is seeded with at startup.
pub fn seed_record() -> Record {
    Record::new(SEED_CODE, SEED_STATE, SEED_TIME)
}
