//! Terminal client for the Duet random chat server.
//!
//! Connects to the server, finds a random partner with `/enter` and relays
//! typed lines as chat messages. Reconnects on connection loss (max 5 attempts
//! with 5 second interval), keeping the same participant ID.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin duet-client
//! cargo run --bin duet-client -- --participant-id alice
//! ```

use clap::Parser;

use duet_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "duet-client")]
#[command(about = "Terminal client for Duet random chat", long_about = None)]
struct Args {
    /// Participant ID to connect as (generated by the server when omitted)
    #[arg(short = 'i', long)]
    participant_id: Option<String>,

    /// WebSocket server URL
    #[arg(short = 'u', long, env = "DUET_URL", default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &["duet_client"], "warn");

    let args = Args::parse();

    // Run the client
    if let Err(e) = duet_client::run_client(args.url, args.participant_id).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
