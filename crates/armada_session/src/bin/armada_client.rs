//! # ARMADA Client
//!
//! A terminal client: prints everything the server says and forwards each
//! line you type as a command. The server validates all input, so the
//! client stays deliberately dumb.
//!
//! ## Usage
//!
//! ```bash
//! armada_client --host localhost --port 12345
//! ```

use armada_session::{ClientMessage, ServerMessage, DEFAULT_PORT};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().collect();
    let mut host = "localhost".to_string();
    let mut port = DEFAULT_PORT;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--host" => {
                if i + 1 < args.len() {
                    host = args[i + 1].clone();
                    i += 1;
                }
            }
            "--port" | "-p" => {
                if i + 1 < args.len() {
                    port = args[i + 1].parse().unwrap_or(DEFAULT_PORT);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Usage: armada_client [OPTIONS]");
                println!();
                println!("Options:");
                println!("      --host <HOST>   Server host (default: localhost)");
                println!("  -p, --port <PORT>   Server port (default: {DEFAULT_PORT})");
                println!("  -h, --help          Show this help");
                return;
            }
            _ => {}
        }
        i += 1;
    }

    let stream = match TcpStream::connect((host.as_str(), port)).await {
        Ok(stream) => stream,
        Err(err) => {
            eprintln!("Error: unable to connect to {host}:{port} ({err})");
            std::process::exit(1);
        }
    };
    println!("Connected to {host}:{port}.");

    let (read_half, write_half) = stream.into_split();
    tokio::spawn(forward_input(write_half));

    // The reader drives the program: when the match ends or the server
    // goes away, we are done.
    render_server_messages(read_half).await;
}

/// Forwards stdin lines to the server as commands.
async fn forward_input(mut write_half: OwnedWriteHalf) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let Ok(frame) = serde_json::to_string(&ClientMessage::command(line)) else {
            continue;
        };
        if write_half.write_all(frame.as_bytes()).await.is_err() {
            return;
        }
        if write_half.write_all(b"\n").await.is_err() {
            return;
        }
    }
}

/// Prints server messages until the match ends or the connection drops.
async fn render_server_messages(read_half: OwnedReadHalf) {
    let mut lines = BufReader::new(read_half).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                match serde_json::from_str::<ServerMessage>(&line) {
                    Ok(message) => {
                        let game_over = matches!(message, ServerMessage::GameOver { .. });
                        print_message(&message);
                        if game_over {
                            return;
                        }
                    }
                    Err(err) => eprintln!("Unreadable server message: {err}"),
                }
            }
            Ok(None) => {
                println!("Server closed the connection.");
                return;
            }
            Err(err) => {
                eprintln!("Connection error: {err}");
                return;
            }
        }
    }
}

/// Renders one server message for the terminal.
fn print_message(message: &ServerMessage) {
    match message {
        ServerMessage::RoleAssignment { slot } => println!("You are {slot}."),
        ServerMessage::WelcomeText { body } => println!("{body}"),
        ServerMessage::PlacementAccepted { grid } => {
            println!("Ship placed successfully. Your updated self grid:\n{grid}");
        }
        ServerMessage::InvalidFormat => {
            println!("Invalid format. Provide: type startX startY orientation.");
        }
        ServerMessage::InvalidPlacement => println!("Invalid placement. Try again."),
        ServerMessage::PlacementComplete => {
            println!("Ships placed successfully. Game starts now!");
        }
        ServerMessage::TurnPrompt => {
            println!("Your turn to attack! Enter attack coordinates (row column):");
        }
        ServerMessage::OpponentWaiting { slot } => {
            println!("Waiting for {slot} to attack...");
        }
        ServerMessage::InvalidInput => println!("Invalid input. Skipping your turn."),
        ServerMessage::AttackOutOfBounds => println!("Error: Coordinates out of bounds."),
        ServerMessage::AlreadyAttacked => {
            println!("Error: Cannot attack this cell <Already attacked>");
        }
        ServerMessage::AttackNotice { x, y } => {
            println!("Attack performed at ({x}, {y}).");
        }
        ServerMessage::SelfGridUpdate { grid, narrative } => {
            println!("{narrative} Your self grid:\n{grid}");
        }
        ServerMessage::TargetGridUpdate { grid, narrative } => {
            println!("{narrative} Your target grid:\n{grid}");
        }
        ServerMessage::GameOver { winner, narrative } => {
            println!("Game Over! {winner} wins.\n{narrative}");
        }
    }
}
