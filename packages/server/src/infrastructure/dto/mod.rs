//! Data Transfer Objects (DTOs) for the messaging relay.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket event DTOs (inbound and outbound)
//! - `http`: HTTP API response DTOs
//! - `conversion`: conversion between DTOs and domain types

pub mod conversion;
pub mod http;
pub mod websocket;
