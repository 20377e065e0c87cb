//! Message Repository の実装
//!
//! - `inmemory`: HashMap による実装
//! - 将来的に: `postgres`, `mongodb` など

pub mod inmemory;

pub use inmemory::InMemoryMessageRepository;
