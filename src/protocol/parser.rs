//! Request Parser
//!
//! This module turns the raw bytes of one request into a typed [`Request`].
//!
//! ## How the Parser Works
//!
//! 1. Strip one trailing `\n` (and a `\r` before it) if present
//! 2. Check the bytes are valid UTF-8
//! 3. Split on single spaces; the first token is the verb
//! 4. Check the token count for that verb and build the request
//!
//! Framing is not the parser's job: the connection layer decides which bytes
//! make up one request (a whole read, or one `\n`-terminated line) and hands
//! them over. [`find_lf`] is provided for the line-framed case.

use crate::protocol::types::{verb, Request, LF, SEPARATOR};
use crate::storage::Record;
use thiserror::Error;

/// Errors that can occur while decoding a request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Nothing left once the terminator is stripped
    #[error("empty request")]
    EmptyRequest,

    /// Request bytes are not UTF-8
    #[error("invalid UTF-8: {0}")]
    InvalidUtf8(String),

    /// First token is not a known verb
    #[error("unknown verb '{0}'")]
    UnknownVerb(String),

    /// Known verb with the wrong number of tokens
    #[error("wrong number of arguments for '{verb}': expected {expected}, got {got}")]
    WrongArity {
        verb: &'static str,
        expected: usize,
        got: usize,
    },

    /// Two consecutive separators, or a leading/trailing one
    #[error("empty token at position {0}")]
    EmptyToken(usize),
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Decodes one request.
///
/// # Example
///
/// ```
/// use flightboard::protocol::{parse_request, Request};
///
/// let request = parse_request(b"DEL ah123\n").unwrap();
/// assert_eq!(request, Request::Delete { code: "ah123".to_string() });
/// ```
pub fn parse_request(raw: &[u8]) -> ParseResult<Request> {
    let line = strip_terminator(raw);
    if line.is_empty() {
        return Err(ParseError::EmptyRequest);
    }

    let line = std::str::from_utf8(line).map_err(|e| ParseError::InvalidUtf8(e.to_string()))?;

    let tokens: Vec<&str> = line.split(SEPARATOR).collect();
    if let Some(position) = tokens.iter().position(|t| t.is_empty()) {
        return Err(ParseError::EmptyToken(position));
    }

    let (name, args) = match tokens.split_first() {
        Some(split) => split,
        None => return Err(ParseError::EmptyRequest),
    };

    match *name {
        verb::READ => {
            let [code] = expect_args::<1>(verb::READ, args)?;
            Ok(Request::Read { code })
        }
        verb::WRITE => {
            let [code, state, time] = expect_args::<3>(verb::WRITE, args)?;
            Ok(Request::Write(Record { code, state, time }))
        }
        verb::DELETE => {
            let [code] = expect_args::<1>(verb::DELETE, args)?;
            Ok(Request::Delete { code })
        }
        verb::CHANGE => {
            let [code, state, time] = expect_args::<3>(verb::CHANGE, args)?;
            Ok(Request::Change { code, state, time })
        }
        other => Err(ParseError::UnknownVerb(other.to_string())),
    }
}

/// Returns the position of the first `\n` in the buffer.
pub fn find_lf(buf: &[u8]) -> Option<usize> {
    buf.iter().position(|&b| b == LF)
}

/// Removes one trailing `\n` or `\r\n`.
fn strip_terminator(raw: &[u8]) -> &[u8] {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    raw.strip_suffix(b"\r").unwrap_or(raw)
}

/// Checks the argument count and copies the arguments out.
fn expect_args<const N: usize>(verb: &'static str, args: &[&str]) -> ParseResult<[String; N]> {
    if args.len() != N {
        return Err(ParseError::WrongArity {
            verb,
            expected: N,
            got: args.len(),
        });
    }
    Ok(std::array::from_fn(|i| args[i].to_string()))
}
