//! ドメイン層のエラー型

use thiserror::Error;

/// 値オブジェクト生成時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("connection id must not be empty")]
    ConnectionIdEmpty,

    #[error("message id must not be empty")]
    MessageIdEmpty,

    #[error("message id is too long (max {max} bytes, got {actual})")]
    MessageIdTooLong { max: usize, actual: usize },

    #[error("emoji must not be empty")]
    EmojiEmpty,

    #[error("emoji is too long (max {max} bytes, got {actual})")]
    EmojiTooLong { max: usize, actual: usize },
}

/// メッセージストア（Repository）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("message '{0}' not found")]
    MessageNotFound(String),

    #[error("message '{0}' is deleted")]
    MessageDeleted(String),

    #[error("message '{0}' already exists")]
    MessageAlreadyExists(String),

    #[error("message store unavailable: {0}")]
    Unavailable(String),
}

/// メッセージ送信（MessagePusher）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' not found")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),

    #[error("failed to serialize event: {0}")]
    Serialization(String),
}
