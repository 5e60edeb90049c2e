//! Command Handler Module
//!
//! This module implements the command processing layer for Flightboard.
//! It receives decoded requests, executes them against the flight store,
//! and returns the matching replies.
//!
//! ## Architecture
//!
//! ```text
//! Client Request
//!       │
//!       ▼
//! ┌─────────────────┐
//! │ Request Parser  │  (protocol module)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ CommandHandler  │  (this module)
//! │                 │
//! │  - Lock         │
//! │  - Execute      │
//! │  - Decide reply │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  FlightStore    │  (storage module)
//! └─────────────────┘
//! ```
//!
//! ## Supported Commands
//!
//! - `READ code`
//! - `WRITE code state time`
//! - `DEL code`
//! - `CHANGE code state time`

pub mod handler;

// Re-export the main command handler
pub use handler::CommandHandler;
