//! Flightboard - A Concurrent In-Memory Flight Timetable
//!
//! This is the main entry point for the Flightboard server.
//! It sets up the TCP listener and the seeded flight store, and hands every
//! incoming connection to its own task.

use anyhow::{anyhow, bail, Context};
use flightboard::commands::CommandHandler;
use flightboard::connection::{handle_connection, ConnectionStats, Framing};
use flightboard::storage::FlightStore;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpSocket};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
struct Config {
    /// Host to bind to
    host: String,
    /// Port to listen on
    port: u16,
    /// Listen backlog
    backlog: u32,
    /// Request framing mode
    framing: Framing,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: flightboard::DEFAULT_HOST.to_string(),
            port: flightboard::DEFAULT_PORT,
            backlog: flightboard::DEFAULT_BACKLOG,
            framing: Framing::default(),
        }
    }
}

/// What the command line asked for
#[derive(Debug, PartialEq, Eq)]
enum CliAction {
    Run(Config),
    Help,
    Version,
}

impl Config {
    /// Parse configuration from command-line arguments, exiting on
    /// `--help`, `--version` or a bad flag.
    fn from_args() -> Self {
        match Self::parse(std::env::args().skip(1)) {
            Ok(CliAction::Run(config)) => config,
            Ok(CliAction::Help) => {
                print_help();
                std::process::exit(0);
            }
            Ok(CliAction::Version) => {
                println!("Flightboard version {}", flightboard::VERSION);
                std::process::exit(0);
            }
            Err(e) => {
                eprintln!("Error: {:#}", e);
                print_help();
                std::process::exit(1);
            }
        }
    }

    /// Parses the arguments that follow the program name.
    fn parse<I>(args: I) -> anyhow::Result<CliAction>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Config::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--host" | "-h" => {
                    config.host = next_value(&mut args, &arg)?;
                }
                "--port" | "-p" => {
                    config.port = next_value(&mut args, &arg)?
                        .parse()
                        .context("invalid port number")?;
                }
                "--backlog" | "-b" => {
                    config.backlog = next_value(&mut args, &arg)?
                        .parse()
                        .context("invalid backlog")?;
                }
                "--framing" => {
                    config.framing = next_value(&mut args, &arg)?.parse()?;
                }
                "--help" => return Ok(CliAction::Help),
                "--version" | "-v" => return Ok(CliAction::Version),
                other => bail!("unknown argument: {}", other),
            }
        }

        Ok(CliAction::Run(config))
    }

    /// Returns the bind address as a string
    fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn next_value(args: &mut impl Iterator<Item = String>, flag: &str) -> anyhow::Result<String> {
    args.next()
        .ok_or_else(|| anyhow!("{} requires a value", flag))
}

fn print_help() {
    println!(
        r#"
Flightboard - A Concurrent In-Memory Flight Timetable

USAGE:
    flightboard [OPTIONS]

OPTIONS:
    -h, --host <HOST>        Host to bind to (default: 127.0.0.1)
    -p, --port <PORT>        Port to listen on (default: 1236)
    -b, --backlog <N>        Listen backlog (default: 10)
        --framing <MODE>     'single' (one read = one request) or 'line' (default: single)
    -v, --version            Print version information
        --help               Print this help message

ENVIRONMENT:
    RUST_LOG                 Log filter (default: info)

PROTOCOL:
    READ <code>                   -> ROK <code> <state> <time> | RERR
    WRITE <code> <state> <time>   -> WOK | WERR
    DEL <code>                    -> DOK | DERR
    CHANGE <code> <state> <time>  -> CHOK | CHERR
"#
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let config = Config::from_args();

    // Set up logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Create the flight store (shared across all connections)
    let store = Arc::new(FlightStore::with_seed(flightboard::seed_record()));
    info!(seed = %flightboard::seed_record(), "Flight store initialized");

    // Create connection statistics
    let stats = Arc::new(ConnectionStats::new());

    // Bind the TCP listener
    let listener = bind(&config).await?;
    info!(
        address = %config.bind_address(),
        backlog = config.backlog,
        framing = %config.framing,
        "Flightboard v{} listening",
        flightboard::VERSION
    );

    // Set up graceful shutdown
    let shutdown = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received, stopping server...");
    };

    // Main accept loop
    tokio::select! {
        _ = accept_loop(listener, Arc::clone(&store), Arc::clone(&stats), config.framing) => {}
        _ = shutdown => {}
    }

    let store_stats = store.stats();
    info!(
        connections = stats.connections_accepted.load(Ordering::Relaxed),
        requests = stats.requests_processed.load(Ordering::Relaxed),
        malformed = stats.malformed_requests.load(Ordering::Relaxed),
        records = store_stats.records,
        reads = store_stats.reads,
        writes = store_stats.writes,
        deletes = store_stats.deletes,
        changes = store_stats.changes,
        "Server shutdown complete"
    );
    Ok(())
}

/// Binds the listening socket with the configured backlog.
async fn bind(config: &Config) -> anyhow::Result<TcpListener> {
    let addr: SocketAddr = tokio::net::lookup_host(config.bind_address())
        .await
        .with_context(|| format!("failed to resolve {}", config.bind_address()))?
        .next()
        .ok_or_else(|| anyhow!("no address found for {}", config.bind_address()))?;

    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()?
    } else {
        TcpSocket::new_v6()?
    };
    socket.set_reuseaddr(true)?;
    socket
        .bind(addr)
        .with_context(|| format!("failed to bind {}", addr))?;

    Ok(socket.listen(config.backlog)?)
}

/// Main loop that accepts incoming connections
async fn accept_loop(
    listener: TcpListener,
    store: Arc<FlightStore>,
    stats: Arc<ConnectionStats>,
    framing: Framing,
) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                // Create a command handler for this connection
                let handler = CommandHandler::new(Arc::clone(&store));
                let stats = Arc::clone(&stats);

                // Spawn a task to handle this connection
                tokio::spawn(async move {
                    handle_connection(stream, addr, handler, framing, stats).await;
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}
