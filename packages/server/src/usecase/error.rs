//! UseCase 層のエラー型
//!
//! トランスポート層はこれらのエラーをログに残すだけで、クライアントには何も返さない。

use thiserror::Error;

use crate::domain::{RepositoryError, ValueObjectError};

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    #[error("connection '{0}' is not registered")]
    NotRegistered(String),

    #[error("invalid message: {0}")]
    InvalidMessage(String),

    #[error("failed to persist message: {0}")]
    PersistenceFailed(RepositoryError),
}

/// 既存メッセージに対する操作（既読・編集・削除・リアクション）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageActionError {
    #[error("connection '{0}' is not registered")]
    NotRegistered(String),

    #[error("message '{0}' not found in the requester's room")]
    MessageNotFound(String),

    #[error("connection '{requester}' is not the sender of message '{message_id}'")]
    NotSender {
        requester: String,
        message_id: String,
    },

    #[error("connection '{0}' is not in the requester's room")]
    RecipientUnavailable(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("message store error: {0}")]
    Persistence(RepositoryError),
}

impl From<RepositoryError> for MessageActionError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::MessageNotFound(id) | RepositoryError::MessageDeleted(id) => {
                Self::MessageNotFound(id)
            }
            other => Self::Persistence(other),
        }
    }
}

impl From<ValueObjectError> for MessageActionError {
    fn from(e: ValueObjectError) -> Self {
        Self::InvalidInput(e.to_string())
    }
}

/// タイピング通知のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypingError {
    #[error("connection '{0}' is not registered")]
    NotRegistered(String),
}

/// ルーム詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("room not found")]
    RoomNotFound,
}
