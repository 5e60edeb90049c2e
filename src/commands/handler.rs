//! Command Handler
//!
//! This module executes decoded requests against the flight store and decides
//! the reply for each one.
//!
//! ## Outcome Rules
//!
//! - `READ`: `ROK` with the first matching record, `RERR` if none
//! - `WRITE`: `WOK` if the table grew, `WERR` otherwise
//! - `DEL`: `DOK` if the table shrank, `DERR` otherwise
//! - `CHANGE`: `CHOK` if the record now holds the requested state and time,
//!   `CHERR` otherwise (including an unknown code)
//!
//! Every rule is evaluated with the store lock held: the length before, the
//! mutation and the length after are one critical section, so another
//! connection cannot change the table between the operation and the check.
//! The guard is released before `execute` returns; no socket I/O ever happens
//! under it.

use crate::protocol::{Reply, Request};
use crate::storage::{FlightStore, Record};
use std::sync::Arc;
use tracing::debug;

/// Executes requests against the shared flight store.
#[derive(Clone)]
pub struct CommandHandler {
    /// The shared store
    store: Arc<FlightStore>,
}

impl CommandHandler {
    /// Creates a new command handler over the given store.
    pub fn new(store: Arc<FlightStore>) -> Self {
        Self { store }
    }

    /// Executes a request and returns the reply to send.
    pub fn execute(&self, request: Request) -> Reply {
        let reply = match request {
            Request::Read { code } => self.cmd_read(&code),
            Request::Write(record) => self.cmd_write(record),
            Request::Delete { code } => self.cmd_delete(&code),
            Request::Change { code, state, time } => self.cmd_change(&code, state, time),
        };
        debug!(reply = %reply, "Executed request");
        reply
    }

    /// READ code
    fn cmd_read(&self, code: &str) -> Reply {
        self.store.record_read();
        let table = self.store.lock();

        match table.find(code).and_then(|index| table.get(index)) {
            Some(record) => Reply::ReadOk(record.clone()),
            None => Reply::ReadErr,
        }
    }

    /// WRITE code state time
    fn cmd_write(&self, record: Record) -> Reply {
        self.store.record_write();
        let mut table = self.store.lock();

        let before = table.len();
        table.insert(record);
        let after = table.len();

        if after > before {
            Reply::WriteOk
        } else {
            Reply::WriteErr
        }
    }

    /// DEL code
    fn cmd_delete(&self, code: &str) -> Reply {
        self.store.record_delete();
        let mut table = self.store.lock();

        let before = table.len();
        if let Some(index) = table.find(code) {
            table.remove_at(index);
        }
        let after = table.len();

        if after < before {
            Reply::DeleteOk
        } else {
            Reply::DeleteErr
        }
    }

    /// CHANGE code state time
    fn cmd_change(&self, code: &str, state: String, time: String) -> Reply {
        self.store.record_change();
        let mut table = self.store.lock();

        let Some(index) = table.find(code) else {
            return Reply::ChangeErr;
        };

        match table.update(index, state.clone(), time.clone()) {
            Some(updated) if updated.state == state && updated.time == time => Reply::ChangeOk,
            _ => Reply::ChangeErr,
        }
    }
}
