//! Tsudoi messaging relay server.
//!
//! Clients join a named room over `/ws` and exchange messages with everyone
//! else in that room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tsudoi-server
//! cargo run --bin tsudoi-server -- --host 0.0.0.0 --port 3000 --require-sender-match
//! ```

use std::sync::Arc;

use clap::Parser;
use tsudoi_server::{
    config::{
        DEFAULT_HISTORY_LIMIT, DEFAULT_MAX_FILE_BYTES, DEFAULT_MAX_FRAME_BYTES,
        DEFAULT_MAX_TEXT_CHARS, MessageLimits, PersistenceFailurePolicy, RelayConfig,
    },
    infrastructure::{
        message_pusher::WebSocketMessagePusher, registry::InMemoryConnectionRegistry,
        repository::InMemoryMessageRepository,
    },
    ui::{AppState, Server},
};
use tsudoi_shared::{
    logger::setup_logger,
    time::{Clock, MonotonicClock, SystemClock},
};

#[derive(Parser, Debug)]
#[command(name = "tsudoi-server")]
#[command(about = "Room-based real-time messaging relay", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "TSUDOI_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Number of messages replayed to a joining connection
    #[arg(long, env = "TSUDOI_HISTORY_LIMIT", default_value_t = DEFAULT_HISTORY_LIMIT)]
    history_limit: usize,

    /// Only the original sender connection may edit or delete a message
    #[arg(long, env = "TSUDOI_REQUIRE_SENDER_MATCH")]
    require_sender_match: bool,

    /// What to do with a new message when the message store rejects it
    #[arg(
        long,
        env = "TSUDOI_PERSISTENCE_FAILURE",
        value_enum,
        default_value_t = PersistenceFailurePolicy::Broadcast
    )]
    persistence_failure: PersistenceFailurePolicy,

    /// Maximum characters in a message text
    #[arg(long, env = "TSUDOI_MAX_TEXT_CHARS", default_value_t = DEFAULT_MAX_TEXT_CHARS)]
    max_text_chars: usize,

    /// Maximum size of an encoded file payload in bytes
    #[arg(long, env = "TSUDOI_MAX_FILE_BYTES", default_value_t = DEFAULT_MAX_FILE_BYTES)]
    max_file_bytes: usize,

    /// Allowed file MIME type prefixes, comma separated (empty allows every type)
    #[arg(
        long,
        env = "TSUDOI_ALLOWED_FILE_TYPES",
        value_delimiter = ',',
        default_value = "image/,video/,audio/,application/pdf,text/plain"
    )]
    allowed_file_types: Vec<String>,

    /// Largest WebSocket frame accepted from a client in bytes
    #[arg(long, env = "TSUDOI_MAX_FRAME_BYTES", default_value_t = DEFAULT_MAX_FRAME_BYTES)]
    max_frame_bytes: usize,
}

impl Args {
    fn relay_config(&self) -> RelayConfig {
        RelayConfig {
            history_limit: self.history_limit,
            require_sender_match: self.require_sender_match,
            persistence_failure: self.persistence_failure,
            limits: MessageLimits {
                max_text_chars: self.max_text_chars,
                max_file_bytes: self.max_file_bytes,
                allowed_file_types: self
                    .allowed_file_types
                    .iter()
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect(),
            },
            max_frame_bytes: self.max_frame_bytes,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(&[env!("CARGO_BIN_NAME"), "tsudoi-shared", "tower_http"], "debug");

    let args = Args::parse();
    let config = args.relay_config();
    tracing::debug!("Relay config: {:?}", config);

    // Initialize dependencies in order:
    // 1. Registry / Repository / MessagePusher
    // 2. Clock
    // 3. UseCases (AppState)
    // 4. Server
    let registry = Arc::new(InMemoryConnectionRegistry::new());
    let repository = Arc::new(InMemoryMessageRepository::new());
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    let clock: Arc<dyn Clock> = Arc::new(MonotonicClock::new(SystemClock));

    let state = AppState::new(registry, repository, message_pusher, clock, config);

    let server = Server::new(state);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
