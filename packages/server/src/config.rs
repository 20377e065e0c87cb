//! Relay configuration.
//!
//! The binary parses command line flags / environment variables with `clap`
//! and turns them into a [`RelayConfig`]. Library users and tests build it
//! directly, usually starting from `RelayConfig::default()`.

use clap::ValueEnum;

/// Number of messages replayed to a joining connection
pub const DEFAULT_HISTORY_LIMIT: usize = 200;
pub const DEFAULT_MAX_TEXT_CHARS: usize = 4_000;
/// Measured on the encoded (base64 / data URL) payload
pub const DEFAULT_MAX_FILE_BYTES: usize = 5 * 1024 * 1024;
pub const DEFAULT_MAX_FRAME_BYTES: usize = 8 * 1024 * 1024;
pub const DEFAULT_ALLOWED_FILE_TYPES: &[&str] =
    &["image/", "video/", "audio/", "application/pdf", "text/plain"];

/// What to do with a new message when the message store rejects it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PersistenceFailurePolicy {
    /// Log a degraded-durability warning and broadcast anyway
    #[default]
    Broadcast,
    /// Log and drop the message without broadcasting
    Suppress,
}

/// Bounds applied to incoming messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageLimits {
    pub max_text_chars: usize,
    pub max_file_bytes: usize,
    /// MIME type prefixes; empty allows every type
    pub allowed_file_types: Vec<String>,
}

impl Default for MessageLimits {
    fn default() -> Self {
        Self {
            max_text_chars: DEFAULT_MAX_TEXT_CHARS,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            allowed_file_types: DEFAULT_ALLOWED_FILE_TYPES
                .iter()
                .map(|t| t.to_string())
                .collect(),
        }
    }
}

impl MessageLimits {
    pub fn is_file_type_allowed(&self, mime_type: &str) -> bool {
        let mime_type = mime_type.trim().to_ascii_lowercase();
        self.allowed_file_types.is_empty()
            || self
                .allowed_file_types
                .iter()
                .any(|allowed| mime_type.starts_with(&allowed.to_ascii_lowercase()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub history_limit: usize,
    /// Only the original sender connection may edit or delete a message
    pub require_sender_match: bool,
    pub persistence_failure: PersistenceFailurePolicy,
    pub limits: MessageLimits,
    /// Largest WebSocket frame accepted from a client
    pub max_frame_bytes: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            require_sender_match: false,
            persistence_failure: PersistenceFailurePolicy::default(),
            limits: MessageLimits::default(),
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
        }
    }
}
