//! Tsudoi server library.
//!
//! A room-based real-time messaging relay: clients join named rooms over a
//! WebSocket and exchange messages, typing indicators, read receipts, edits,
//! deletions and reactions with everyone else in the same room.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

#[cfg(test)]
pub(crate) mod test_support;
