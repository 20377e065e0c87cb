//! Connection Registry の実装
//!
//! - `inmemory`: プロセス内の HashMap による実装（再起動で消える一時的な状態）

pub mod inmemory;

pub use inmemory::InMemoryConnectionRegistry;
