//! Timetable Protocol Implementation
//!
//! This module implements the plain-text request/reply protocol Flightboard
//! speaks on its TCP socket.
//!
//! ## Overview
//!
//! Requests and replies are single lines of space-separated ASCII tokens.
//! The first token of a request is the verb (`READ`, `WRITE`, `DEL`,
//! `CHANGE`); the first token of a reply is its status (`ROK`, `WERR`, ...).
//!
//! ## Modules
//!
//! - `types`: Defines the `Request` and `Reply` enums and reply serialization
//! - `parser`: Decodes the bytes of one request into a `Request`
//!
//! ## Example
//!
//! ```
//! use flightboard::protocol::{parse_request, Reply, Request};
//! use flightboard::storage::Record;
//!
//! // Parsing incoming data
//! let request = parse_request(b"READ ah123").unwrap();
//! assert_eq!(request, Request::Read { code: "ah123".to_string() });
//!
//! // Creating replies
//! let reply = Reply::ReadOk(Record::new("ah123", "boarding", "17.30"));
//! assert_eq!(reply.serialize(), b"ROK ah123 boarding 17.30");
//! ```

pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use parser::{find_lf, parse_request, ParseError, ParseResult};
pub use types::{Reply, Request};
