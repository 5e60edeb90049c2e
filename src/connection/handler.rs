//! Connection Handler Module
//!
//! This module handles individual client connections to Flightboard.
//! Each client gets its own handler task that runs in a loop,
//! reading requests and sending replies.
//!
//! ## Connection Lifecycle
//!
//! ```text
//! 1. Client connects (TCP handshake)
//!        │
//!        ▼
//! 2. ConnectionHandler spawned
//!        │
//!        ▼
//! 3. ┌──────────────────────────────┐
//!    │      Main Loop               │
//!    │                              │
//!    │  AWAITING_REQUEST            │
//!    │  ┌─────────────────────────┐ │
//!    │  │ Read bytes from socket  │ │
//!    │  └───────────┬─────────────┘ │
//!    │              ▼               │
//!    │  PROCESSING                  │
//!    │  ┌─────────────────────────┐ │
//!    │  │ Decode request          │ │
//!    │  │ Execute (lock held)     │ │
//!    │  │ Send exactly one reply  │ │
//!    │  └───────────┬─────────────┘ │
//!    │              ▼               │
//!    │         [Loop back]          │
//!    └──────────────────────────────┘
//!        │
//!        ▼
//! 4. Zero-length read / I/O error
//!        │
//!        ▼
//! 5. CLOSED: handler task ends, stream dropped
//! ```
//!
//! ## Framing
//!
//! Two framing modes are supported (see [`Framing`]):
//!
//! - **SingleRead**: every read is one request and replies carry no
//!   terminator. Bytes are never carried over from one read to the next, and
//!   each read takes at most [`MAX_REQUEST_SIZE`] bytes.
//! - **Line**: requests end with `\n` and are buffered across reads; one read
//!   may carry several requests, each answered in order. Replies end with `\n`.

use crate::commands::CommandHandler;
use crate::protocol::types::LF;
use crate::protocol::{find_lf, parse_request, Reply};
use bytes::{BufMut, BytesMut};
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;
use tracing::{debug, info, trace, warn};

/// Maximum size of a buffered, unterminated request in line framing (64 KB)
pub const MAX_BUFFER_SIZE: usize = 64 * 1024;

/// Largest request a single read can carry in single-read framing (4 KB).
/// Longer requests arrive split across reads and each part is answered.
pub const MAX_REQUEST_SIZE: usize = 4 * 1024;

/// Initial buffer capacity
const INITIAL_BUFFER_SIZE: usize = 4096;

/// How request boundaries are found in the byte stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Framing {
    /// One read is one request; replies have no terminator.
    #[default]
    SingleRead,
    /// Requests and replies are `\n`-terminated lines.
    Line,
}

impl FromStr for Framing {
    type Err = UnknownFraming;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" | "single-read" => Ok(Framing::SingleRead),
            "line" => Ok(Framing::Line),
            other => Err(UnknownFraming(other.to_string())),
        }
    }
}

impl fmt::Display for Framing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Framing::SingleRead => f.write_str("single"),
            Framing::Line => f.write_str("line"),
        }
    }
}

/// Returned when a framing mode name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown framing mode '{0}' (expected 'single' or 'line')")]
pub struct UnknownFraming(pub String);

/// Statistics for connection handling
#[derive(Debug, Default)]
pub struct ConnectionStats {
    /// Total number of connections accepted
    pub connections_accepted: AtomicU64,
    /// Currently active connections
    pub active_connections: AtomicU64,
    /// Total requests answered (malformed ones included)
    pub requests_processed: AtomicU64,
    /// Requests answered with `ERR`
    pub malformed_requests: AtomicU64,
    /// Total bytes read
    pub bytes_read: AtomicU64,
    /// Total bytes written
    pub bytes_written: AtomicU64,
}

impl ConnectionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connection_opened(&self) {
        self.connections_accepted.fetch_add(1, Ordering::Relaxed);
        self.active_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn connection_closed(&self) {
        self.active_connections.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn request_processed(&self) {
        self.requests_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn malformed_request(&self) {
        self.malformed_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn bytes_read(&self, count: usize) {
        self.bytes_read.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn bytes_written(&self, count: usize) {
        self.bytes_written
            .fetch_add(count as u64, Ordering::Relaxed);
    }
}

/// Handles a single client connection.
///
/// This struct manages the read buffer, decoding, and reply sending
/// for one connected client. It works over any async byte stream; in
/// production that is a `TcpStream`.
pub struct ConnectionHandler<S> {
    /// The byte stream for this connection
    stream: BufWriter<S>,

    /// Client's address (for logging)
    addr: SocketAddr,

    /// Buffer for incoming data
    buffer: BytesMut,

    /// Request boundary mode
    framing: Framing,

    /// The command handler (shared store inside)
    command_handler: CommandHandler,

    /// Connection statistics (shared)
    stats: Arc<ConnectionStats>,
}

impl<S> ConnectionHandler<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Creates a new connection handler.
    ///
    /// # Arguments
    ///
    /// * `stream` - The byte stream for this connection
    /// * `addr` - The client's socket address
    /// * `command_handler` - The command handler for executing requests
    /// * `framing` - How request boundaries are found
    /// * `stats` - Shared connection statistics
    pub fn new(
        stream: S,
        addr: SocketAddr,
        command_handler: CommandHandler,
        framing: Framing,
        stats: Arc<ConnectionStats>,
    ) -> Self {
        stats.connection_opened();

        Self {
            stream: BufWriter::new(stream),
            addr,
            buffer: BytesMut::with_capacity(INITIAL_BUFFER_SIZE),
            framing,
            command_handler,
            stats,
        }
    }

    /// Runs the main connection loop.
    ///
    /// This method reads requests from the client, executes them,
    /// and sends back replies until the client disconnects or an error occurs.
    /// A normal disconnect is reported as [`ConnectionError::ClientDisconnected`].
    pub async fn run(mut self) -> Result<(), ConnectionError> {
        info!(client = %self.addr, framing = %self.framing, "Client connected");

        let result = self.main_loop().await;

        match &result {
            Ok(()) => info!(client = %self.addr, "Client disconnected gracefully"),
            Err(e) => match e {
                ConnectionError::ClientDisconnected => {
                    info!(client = %self.addr, "Client disconnected")
                }
                ConnectionError::IoError(io_err)
                    if io_err.kind() == std::io::ErrorKind::ConnectionReset =>
                {
                    debug!(client = %self.addr, "Connection reset by client")
                }
                _ => warn!(client = %self.addr, error = %e, "Connection error"),
            },
        }

        self.stats.connection_closed();
        result
    }

    /// The main read-execute-reply loop.
    async fn main_loop(&mut self) -> Result<(), ConnectionError> {
        loop {
            while let Some(frame) = self.next_request() {
                let reply = self.process(&frame);
                self.send_reply(&reply).await?;
            }

            self.read_more_data().await?;
        }
    }

    /// Takes the bytes of the next complete request out of the buffer.
    fn next_request(&mut self) -> Option<BytesMut> {
        if self.buffer.is_empty() {
            return None;
        }

        match self.framing {
            Framing::SingleRead => Some(self.buffer.split()),
            Framing::Line => {
                let pos = find_lf(&self.buffer)?;
                let frame = self.buffer.split_to(pos + 1);
                trace!(
                    client = %self.addr,
                    consumed = frame.len(),
                    remaining = self.buffer.len(),
                    "Split request line"
                );
                Some(frame)
            }
        }
    }

    /// Decodes and executes one request.
    ///
    /// A request that cannot be decoded gets an `ERR` reply; the connection
    /// stays open.
    fn process(&self, frame: &[u8]) -> Reply {
        self.stats.request_processed();

        match parse_request(frame) {
            Ok(request) => {
                debug!(
                    client = %self.addr,
                    verb = request.verb(),
                    code = request.code(),
                    "Received request"
                );
                let reply = self.command_handler.execute(request);
                if reply.is_error() {
                    debug!(client = %self.addr, reply = %reply, "Request not applied");
                }
                reply
            }
            Err(e) => {
                self.stats.malformed_request();
                warn!(client = %self.addr, error = %e, "Malformed request");
                Reply::error(e.to_string())
            }
        }
    }

    /// Reads more data from the stream into the buffer.
    async fn read_more_data(&mut self) -> Result<(), ConnectionError> {
        if self.buffer.len() >= MAX_BUFFER_SIZE {
            warn!(
                client = %self.addr,
                size = self.buffer.len(),
                "Buffer size limit exceeded"
            );
            return Err(ConnectionError::BufferFull);
        }

        let n = match self.framing {
            Framing::SingleRead => {
                // Every read gets the same window, whatever came before
                self.buffer.reserve(MAX_REQUEST_SIZE);
                let mut window = (&mut self.buffer).limit(MAX_REQUEST_SIZE);
                self.stream.get_mut().read_buf(&mut window).await?
            }
            Framing::Line => {
                if self.buffer.capacity() - self.buffer.len() < 1024 {
                    self.buffer.reserve(INITIAL_BUFFER_SIZE);
                }
                self.stream.get_mut().read_buf(&mut self.buffer).await?
            }
        };

        if n == 0 {
            if self.buffer.is_empty() {
                return Err(ConnectionError::ClientDisconnected);
            } else {
                // Partial line in buffer
                return Err(ConnectionError::UnexpectedEof);
            }
        }

        self.stats.bytes_read(n);
        trace!(client = %self.addr, bytes = n, "Read data");

        Ok(())
    }

    /// Sends one reply to the client.
    async fn send_reply(&mut self, reply: &Reply) -> Result<(), ConnectionError> {
        let mut bytes = reply.serialize();
        if self.framing == Framing::Line {
            bytes.push(LF);
        }

        self.stream.write_all(&bytes).await?;
        self.stream.flush().await?;
        self.stats.bytes_written(bytes.len());
        trace!(
            client = %self.addr,
            bytes = bytes.len(),
            "Sent reply"
        );
        Ok(())
    }
}

/// Errors that can occur while handling a connection.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// I/O error (network issue)
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Client disconnected normally
    #[error("Client disconnected")]
    ClientDisconnected,

    /// Stream ended in the middle of a line
    #[error("Unexpected end of stream")]
    UnexpectedEof,

    /// Unterminated request exceeded the buffer limit
    #[error("Buffer size limit exceeded")]
    BufferFull,
}

/// Handles a client connection.
///
/// This is a convenience function that creates a ConnectionHandler
/// and runs it to completion.
///
/// # Arguments
///
/// * `stream` - The TCP stream for this connection
/// * `addr` - The client's socket address
/// * `command_handler` - The command handler for executing requests
/// * `framing` - How request boundaries are found
/// * `stats` - Shared connection statistics
pub async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    command_handler: CommandHandler,
    framing: Framing,
    stats: Arc<ConnectionStats>,
) {
    let handler = ConnectionHandler::new(stream, addr, command_handler, framing, stats);
    if let Err(e) = handler.run().await {
        match e {
            ConnectionError::ClientDisconnected => {}
            ConnectionError::IoError(ref io_err)
                if io_err.kind() == std::io::ErrorKind::ConnectionReset => {}
            _ => {
                debug!(client = %addr, error = %e, "Connection ended with error");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FlightStore, Record};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio_test::io::Builder;

    fn seeded_store() -> Arc<FlightStore> {
        Arc::new(FlightStore::with_seed(Record::new(
            "ah123", "boarding", "17.30",
        )))
    }

    fn test_addr() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    async fn create_test_server(
        framing: Framing,
    ) -> (SocketAddr, Arc<FlightStore>, Arc<ConnectionStats>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let store = seeded_store();
        let stats = Arc::new(ConnectionStats::new());

        let store_clone = Arc::clone(&store);
        let stats_clone = Arc::clone(&stats);

        tokio::spawn(async move {
            while let Ok((stream, client_addr)) = listener.accept().await {
                let handler = CommandHandler::new(Arc::clone(&store_clone));
                let stats = Arc::clone(&stats_clone);
                tokio::spawn(handle_connection(
                    stream,
                    client_addr,
                    handler,
                    framing,
                    stats,
                ));
            }
        });

        (addr, store, stats)
    }

    async fn request(client: &mut TcpStream, line: &str) -> String {
        client.write_all(line.as_bytes()).await.unwrap();

        let mut buf = [0u8; 256];
        let n = client.read(&mut buf).await.unwrap();
        String::from_utf8_lossy(&buf[..n]).into_owned()
    }

    #[test]
    fn test_framing_from_str() {
        assert_eq!("single".parse::<Framing>(), Ok(Framing::SingleRead));
        assert_eq!("line".parse::<Framing>(), Ok(Framing::Line));
        assert_eq!(
            "crlf".parse::<Framing>(),
            Err(UnknownFraming("crlf".to_string()))
        );
    }

    #[tokio::test]
    async fn test_single_read_session() {
        let stream = Builder::new()
            .read(b"READ ah123")
            .write(b"ROK ah123 boarding 17.30")
            .read(b"WRITE bh456 delayed 18.00")
            .write(b"WOK")
            .read(b"DEL nosuch")
            .write(b"DERR")
            .build();

        let stats = Arc::new(ConnectionStats::new());
        let handler = ConnectionHandler::new(
            stream,
            test_addr(),
            CommandHandler::new(seeded_store()),
            Framing::SingleRead,
            Arc::clone(&stats),
        );

        let result = handler.run().await;
        assert!(matches!(result, Err(ConnectionError::ClientDisconnected)));
        assert_eq!(stats.requests_processed.load(Ordering::Relaxed), 3);
        assert_eq!(stats.active_connections.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn test_single_read_window_does_not_shrink() {
        let first = format!("WRITE aa {} 1", "s".repeat(2000));
        let second = format!("WRITE zz {} 1", "s".repeat(3000));

        let stream = Builder::new()
            .read(first.as_bytes())
            .write(b"WOK")
            .read(second.as_bytes())
            .write(b"WOK")
            .build();

        let store = seeded_store();
        let stats = Arc::new(ConnectionStats::new());
        let handler = ConnectionHandler::new(
            stream,
            test_addr(),
            CommandHandler::new(Arc::clone(&store)),
            Framing::SingleRead,
            Arc::clone(&stats),
        );

        let result = handler.run().await;
        assert!(matches!(result, Err(ConnectionError::ClientDisconnected)));
        assert_eq!(stats.requests_processed.load(Ordering::Relaxed), 2);
        assert_eq!(stats.malformed_requests.load(Ordering::Relaxed), 0);
        assert_eq!(store.lock().find("zz"), Some(2));
    }

    #[tokio::test]
    async fn test_single_read_accepts_request_at_size_limit() {
        // "WRITE big " + fill + " 1" is exactly MAX_REQUEST_SIZE bytes
        let request = format!("WRITE big {} 1", "s".repeat(MAX_REQUEST_SIZE - 12));
        assert_eq!(request.len(), MAX_REQUEST_SIZE);

        let stream = Builder::new()
            .read(b"READ ah123")
            .write(b"ROK ah123 boarding 17.30")
            .read(request.as_bytes())
            .write(b"WOK")
            .build();

        let stats = Arc::new(ConnectionStats::new());
        let handler = ConnectionHandler::new(
            stream,
            test_addr(),
            CommandHandler::new(seeded_store()),
            Framing::SingleRead,
            Arc::clone(&stats),
        );

        let _ = handler.run().await;
        assert_eq!(stats.requests_processed.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn test_single_read_coalesced_requests_get_one_reply() {
        let stream = Builder::new()
            .read(b"READ ah123\nREAD ah123")
            .write(b"ERR wrong number of arguments for 'READ': expected 1, got 2")
            .build();

        let stats = Arc::new(ConnectionStats::new());
        let handler = ConnectionHandler::new(
            stream,
            test_addr(),
            CommandHandler::new(seeded_store()),
            Framing::SingleRead,
            Arc::clone(&stats),
        );

        let result = handler.run().await;
        assert!(matches!(result, Err(ConnectionError::ClientDisconnected)));
        assert_eq!(stats.requests_processed.load(Ordering::Relaxed), 1);
        assert_eq!(stats.malformed_requests.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_malformed_request_keeps_connection_open() {
        let stream = Builder::new()
            .read(b"FLY ah123")
            .write(b"ERR unknown verb 'FLY'")
            .read(b"READ")
            .write(b"ERR wrong number of arguments for 'READ': expected 1, got 0")
            .read(b"READ ah123")
            .write(b"ROK ah123 boarding 17.30")
            .build();

        let stats = Arc::new(ConnectionStats::new());
        let handler = ConnectionHandler::new(
            stream,
            test_addr(),
            CommandHandler::new(seeded_store()),
            Framing::SingleRead,
            Arc::clone(&stats),
        );

        let result = handler.run().await;
        assert!(matches!(result, Err(ConnectionError::ClientDisconnected)));
        assert_eq!(stats.malformed_requests.load(Ordering::Relaxed), 2);
        assert_eq!(stats.requests_processed.load(Ordering::Relaxed), 3);
    }

    #[tokio::test]
    async fn test_line_framing_pipelined_requests() {
        let stream = Builder::new()
            .read(b"READ ah123\nWRITE bh456 delayed 18.00\n")
            .write(b"ROK ah123 boarding 17.30\n")
            .write(b"WOK\n")
            .build();

        let handler = ConnectionHandler::new(
            stream,
            test_addr(),
            CommandHandler::new(seeded_store()),
            Framing::Line,
            Arc::new(ConnectionStats::new()),
        );

        let result = handler.run().await;
        assert!(matches!(result, Err(ConnectionError::ClientDisconnected)));
    }

    #[tokio::test]
    async fn test_line_framing_split_request() {
        let stream = Builder::new()
            .read(b"CHANGE ah123 ")
            .read(b"departed 17.45\r\n")
            .write(b"CHOK\n")
            .build();

        let store = seeded_store();
        let handler = ConnectionHandler::new(
            stream,
            test_addr(),
            CommandHandler::new(Arc::clone(&store)),
            Framing::Line,
            Arc::new(ConnectionStats::new()),
        );

        let _ = handler.run().await;
        assert_eq!(
            store.lock().get(0),
            Some(&Record::new("ah123", "departed", "17.45"))
        );
    }

    #[tokio::test]
    async fn test_line_framing_partial_line_at_eof() {
        let stream = Builder::new().read(b"READ ah123").build();

        let handler = ConnectionHandler::new(
            stream,
            test_addr(),
            CommandHandler::new(seeded_store()),
            Framing::Line,
            Arc::new(ConnectionStats::new()),
        );

        let result = handler.run().await;
        assert!(matches!(result, Err(ConnectionError::UnexpectedEof)));
    }

    #[tokio::test]
    async fn test_line_framing_buffer_limit() {
        let oversized = vec![b'a'; MAX_BUFFER_SIZE];
        let stream = Builder::new().read(&oversized).build();

        let handler = ConnectionHandler::new(
            stream,
            test_addr(),
            CommandHandler::new(seeded_store()),
            Framing::Line,
            Arc::new(ConnectionStats::new()),
        );

        let result = handler.run().await;
        assert!(matches!(result, Err(ConnectionError::BufferFull)));
    }

    #[tokio::test]
    async fn test_read_error_closes_connection() {
        let stream = Builder::new()
            .read_error(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "broken pipe",
            ))
            .build();

        let store = seeded_store();
        let stats = Arc::new(ConnectionStats::new());
        let handler = ConnectionHandler::new(
            stream,
            test_addr(),
            CommandHandler::new(Arc::clone(&store)),
            Framing::SingleRead,
            Arc::clone(&stats),
        );

        let result = handler.run().await;
        assert!(matches!(result, Err(ConnectionError::IoError(_))));
        assert_eq!(stats.active_connections.load(Ordering::Relaxed), 0);
        assert_eq!(store.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_end_to_end_scenario() {
        let (addr, _, _) = create_test_server(Framing::SingleRead).await;

        let mut client = TcpStream::connect(addr).await.unwrap();

        assert_eq!(
            request(&mut client, "READ ah123").await,
            "ROK ah123 boarding 17.30"
        );
        assert_eq!(request(&mut client, "WRITE bh456 delayed 18.00").await, "WOK");
        assert_eq!(
            request(&mut client, "READ bh456").await,
            "ROK bh456 delayed 18.00"
        );
        assert_eq!(
            request(&mut client, "CHANGE bh456 boarding 18.15").await,
            "CHOK"
        );
        assert_eq!(request(&mut client, "DEL ah123").await, "DOK");
        assert_eq!(request(&mut client, "READ ah123").await, "RERR");
    }

    #[tokio::test]
    async fn test_line_framing_over_tcp() {
        let (addr, _, _) = create_test_server(Framing::Line).await;

        let mut client = TcpStream::connect(addr).await.unwrap();

        assert_eq!(
            request(&mut client, "READ ah123\n").await,
            "ROK ah123 boarding 17.30\n"
        );
        assert_eq!(request(&mut client, "READ nosuch\n").await, "RERR\n");
    }

    #[tokio::test]
    async fn test_writes_from_many_clients() {
        let (addr, store, _) = create_test_server(Framing::SingleRead).await;

        let mut clients = vec![];
        for i in 0..10 {
            clients.push(tokio::spawn(async move {
                let mut client = TcpStream::connect(addr).await.unwrap();
                for j in 0..20 {
                    let line = format!("WRITE c{}-{} scheduled 09.00", i, j);
                    assert_eq!(request(&mut client, &line).await, "WOK");
                }
            }));
        }

        for client in clients {
            client.await.unwrap();
        }

        assert_eq!(store.lock().len(), 1 + 10 * 20);
    }

    #[tokio::test]
    async fn test_one_client_closing_does_not_affect_others() {
        let (addr, _, _) = create_test_server(Framing::SingleRead).await;

        let mut first = TcpStream::connect(addr).await.unwrap();
        let mut second = TcpStream::connect(addr).await.unwrap();

        assert_eq!(request(&mut first, "WRITE zz900 cancelled 23.55").await, "WOK");
        drop(first);

        assert_eq!(
            request(&mut second, "READ zz900").await,
            "ROK zz900 cancelled 23.55"
        );
    }

    #[tokio::test]
    async fn test_connection_stats() {
        let (addr, _, stats) = create_test_server(Framing::SingleRead).await;

        assert_eq!(stats.active_connections.load(Ordering::Relaxed), 0);

        let mut client = TcpStream::connect(addr).await.unwrap();

        // Give the server time to accept the connection
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        assert_eq!(stats.connections_accepted.load(Ordering::Relaxed), 1);
        assert_eq!(stats.active_connections.load(Ordering::Relaxed), 1);

        let _ = request(&mut client, "READ ah123").await;

        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        assert_eq!(stats.requests_processed.load(Ordering::Relaxed), 1);
        assert!(stats.bytes_read.load(Ordering::Relaxed) > 0);
        assert!(stats.bytes_written.load(Ordering::Relaxed) > 0);

        drop(client);

        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        assert_eq!(stats.active_connections.load(Ordering::Relaxed), 0);
    }
}
