//! Random one-on-one chat server.
//!
//! Pairs anonymous participants into rooms and relays their messages over WebSocket.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin duet-server
//! cargo run --bin duet-server -- --host 0.0.0.0 --port 3000
//! DUET_LOG=debug cargo run --bin duet-server
//! ```

use std::sync::Arc;

use clap::Parser;
use duet_server::{
    config::{DEFAULT_HOST, DEFAULT_PORT, ServerConfig},
    domain::factory::MIN_IDENTITY_LEN,
    infrastructure::repository::InMemoryStore,
    ui::{AppState, Server},
    usecase::{MatchmakingConfig, matchmaking::DEFAULT_MAX_ATTEMPTS},
};
use duet_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "duet-server")]
#[command(about = "Random one-on-one chat server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "DUET_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "DUET_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Claim/settle rounds before a participant settles for waiting
    #[arg(long, env = "DUET_MAX_MATCH_ATTEMPTS", default_value_t = DEFAULT_MAX_ATTEMPTS)]
    max_match_attempts: usize,

    /// Length of the random part of generated participant IDs (clamped to 8..=62)
    #[arg(long, env = "DUET_IDENTITY_LENGTH", default_value_t = MIN_IDENTITY_LEN)]
    identity_length: usize,

    /// Default log level when DUET_LOG / RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            matchmaking: MatchmakingConfig {
                max_attempts: args.max_match_attempts,
            },
            identity_length: args.identity_length,
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &["duet_shared"], &args.log_level);

    let config = ServerConfig::from(args);

    // Initialize dependencies in order:
    // 1. Store
    // 2. UseCases (AppState)
    // 3. Server

    // 1. Create Store (in-memory document store)
    let store = Arc::new(InMemoryStore::new());

    // 2. Create UseCases
    let state = AppState::with_store(store, &config);
    tracing::info!(
        "Matchmaking up to {} attempts per participant",
        config.matchmaking.max_attempts
    );

    // 3. Create and run the server
    let server = Server::new(state);
    if let Err(e) = server.run(&config.bind_addr()).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
