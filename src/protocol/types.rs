//! Timetable Protocol Types
//!
//! This module defines the requests a client can send and the replies the
//! server sends back.
//!
//! ## Protocol Format
//!
//! A request is one line of ASCII tokens separated by single spaces. The first
//! token is the verb:
//!
//! ```text
//! READ   <code>
//! WRITE  <code> <state> <time>
//! DEL    <code>
//! CHANGE <code> <state> <time>
//! ```
//!
//! A reply is also a space-separated token line:
//!
//! ```text
//! ROK <code> <state> <time>   RERR
//! WOK                         WERR
//! DOK                         DERR
//! CHOK                        CHERR
//! ERR <reason>
//! ```

use crate::storage::Record;
use std::fmt;

/// Request verbs
pub mod verb {
    pub const READ: &str = "READ";
    pub const WRITE: &str = "WRITE";
    pub const DELETE: &str = "DEL";
    pub const CHANGE: &str = "CHANGE";
}

/// Token separator used by both requests and replies
pub const SEPARATOR: char = ' ';

/// Line terminator used by line framing
pub const LF: u8 = b'\n';

/// A decoded client request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// `READ code`
    Read { code: String },

    /// `WRITE code state time`
    Write(Record),

    /// `DEL code`
    Delete { code: String },

    /// `CHANGE code state time`
    Change {
        code: String,
        state: String,
        time: String,
    },
}

impl Request {
    /// Returns the verb this request was sent with.
    pub fn verb(&self) -> &'static str {
        match self {
            Request::Read { .. } => verb::READ,
            Request::Write(_) => verb::WRITE,
            Request::Delete { .. } => verb::DELETE,
            Request::Change { .. } => verb::CHANGE,
        }
    }

    /// Returns the flight code the request targets.
    pub fn code(&self) -> &str {
        match self {
            Request::Read { code } | Request::Delete { code } => code,
            Request::Write(record) => &record.code,
            Request::Change { code, .. } => code,
        }
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Request::Read { code } => write!(f, "{} {}", verb::READ, code),
            Request::Write(record) => write!(f, "{} {}", verb::WRITE, record),
            Request::Delete { code } => write!(f, "{} {}", verb::DELETE, code),
            Request::Change { code, state, time } => {
                write!(f, "{} {} {} {}", verb::CHANGE, code, state, time)
            }
        }
    }
}

/// A reply to send back to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// `ROK code state time`
    ReadOk(Record),
    /// `RERR`
    ReadErr,
    /// `WOK`
    WriteOk,
    /// `WERR`
    WriteErr,
    /// `DOK`
    DeleteOk,
    /// `DERR`
    DeleteErr,
    /// `CHOK`
    ChangeOk,
    /// `CHERR`
    ChangeErr,
    /// `ERR <reason>`, sent for requests that could not be decoded
    Error(String),
}

impl Reply {
    /// Creates an error reply.
    pub fn error(reason: impl Into<String>) -> Self {
        Reply::Error(reason.into())
    }

    /// Returns the status token that starts the reply.
    pub fn status(&self) -> &'static str {
        match self {
            Reply::ReadOk(_) => "ROK",
            Reply::ReadErr => "RERR",
            Reply::WriteOk => "WOK",
            Reply::WriteErr => "WERR",
            Reply::DeleteOk => "DOK",
            Reply::DeleteErr => "DERR",
            Reply::ChangeOk => "CHOK",
            Reply::ChangeErr => "CHERR",
            Reply::Error(_) => "ERR",
        }
    }

    /// Returns true for every reply that reports a failure.
    pub fn is_error(&self) -> bool {
        !matches!(
            self,
            Reply::ReadOk(_) | Reply::WriteOk | Reply::DeleteOk | Reply::ChangeOk
        )
    }

    /// Serializes the reply without a terminator.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.serialize_into(&mut buf);
        buf
    }

    /// Serializes the reply into an existing buffer.
    pub fn serialize_into(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self.status().as_bytes());
        match self {
            Reply::ReadOk(record) => {
                for field in [&record.code, &record.state, &record.time] {
                    buf.push(SEPARATOR as u8);
                    buf.extend_from_slice(field.as_bytes());
                }
            }
            Reply::Error(reason) => {
                buf.push(SEPARATOR as u8);
                buf.extend_from_slice(reason.as_bytes());
            }
            _ => {}
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::ReadOk(record) => write!(f, "{} {}", self.status(), record),
            Reply::Error(reason) => write!(f, "{} {}", self.status(), reason),
            _ => f.write_str(self.status()),
        }
    }
}
