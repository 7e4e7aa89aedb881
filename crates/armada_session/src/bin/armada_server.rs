//! # ARMADA Server
//!
//! Hosts exactly one two-player match: accepts two connections in order,
//! runs the session to completion, reports the winner, exits.
//!
//! ## Usage
//!
//! ```bash
//! armada_server --port 12345
//! ```

use armada_engine::GridBoard;
use armada_session::{PlayerSlot, Session, SessionConfig, SessionError, DEFAULT_PORT};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    // Simple flag parsing, no external deps.
    let args: Vec<String> = std::env::args().collect();
    let mut port = DEFAULT_PORT;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" | "-p" => {
                if i + 1 < args.len() {
                    port = args[i + 1].parse().unwrap_or(DEFAULT_PORT);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Usage: armada_server [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -p, --port <PORT>   TCP port to listen on (default: {DEFAULT_PORT})");
                println!("  -h, --help          Show this help");
                return;
            }
            _ => {}
        }
        i += 1;
    }

    match host_match(port).await {
        Ok(winner) => {
            tracing::info!(%winner, "match finished");
        }
        Err(err) => {
            // A dead connection abandons the match; the process still
            // shuts down in an orderly way.
            tracing::error!(%err, "match abandoned");
            std::process::exit(1);
        }
    }
}

/// Accepts two players and runs one session.
async fn host_match(port: u16) -> Result<PlayerSlot, SessionError> {
    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port, "server started, waiting for players");

    let (first, first_addr) = listener.accept().await?;
    tracing::info!(addr = %first_addr, "player 1 connected");
    let (second, second_addr) = listener.accept().await?;
    tracing::info!(addr = %second_addr, "player 2 connected");

    let mut session = Session::new(
        first,
        second,
        (GridBoard::new(), GridBoard::new()),
        SessionConfig::default(),
    );
    session.run().await
}
