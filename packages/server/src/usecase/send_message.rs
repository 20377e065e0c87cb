//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 入力検証（本文の長さ・添付ファイルのサイズと種別・テキストへの添付・クライアントが送れない種別）
//!
//! ### なぜこのテストが必要か
//! - 送信者の名前・ルーム・時刻はサーバーが刻印することを保証
//! - メッセージが同じルームの全員（送信者を含む）にだけ届くことを保証
//! - 保存失敗時の挙動が設定（PersistenceFailurePolicy）に従うことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：テキスト・ファイル・返信付きメッセージ
//! - 異常系：未登録の接続、検証エラー、ID の重複、ストア障害

use std::sync::Arc;

use tsudoi_shared::time::Clock;

use crate::{
    config::{MessageLimits, PersistenceFailurePolicy},
    domain::{
        ChatMessage, ConnectionId, ConnectionRegistry, MessageDraft, MessageKind,
        MessageRepository, RepositoryError, RoomBroadcaster, ServerEvent, Timestamp,
    },
};

use super::error::SendMessageError;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn MessageRepository>,
    broadcaster: Arc<RoomBroadcaster>,
    clock: Arc<dyn Clock>,
    limits: MessageLimits,
    persistence_failure: PersistenceFailurePolicy,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        repository: Arc<dyn MessageRepository>,
        broadcaster: Arc<RoomBroadcaster>,
        clock: Arc<dyn Clock>,
        limits: MessageLimits,
        persistence_failure: PersistenceFailurePolicy,
    ) -> Self {
        Self {
            registry,
            repository,
            broadcaster,
            clock,
            limits,
            persistence_failure,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `sender` - 送信者の接続 ID
    /// * `draft` - クライアントから受け取った未確定のメッセージ
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ConnectionId>)` - メッセージを届けた接続の一覧
    /// * `Err(SendMessageError)` - 送信しなかった理由
    pub async fn execute(
        &self,
        sender: ConnectionId,
        draft: MessageDraft,
    ) -> Result<Vec<ConnectionId>, SendMessageError> {
        // 1. 送信者の解決（未登録なら破棄）
        let participant = self
            .registry
            .lookup(&sender)
            .await
            .ok_or_else(|| SendMessageError::NotRegistered(sender.as_str().to_string()))?;

        // 2. 入力検証
        validate_draft(&draft, &self.limits)?;

        // 3. サーバー側で刻印
        let message = ChatMessage::stamp(
            draft,
            &participant,
            Timestamp::new(self.clock.now_millis()),
        );

        // 4. 保存（ID の重複はポリシーに関わらず拒否）
        if let Err(e) = self.repository.append(message.clone()).await {
            match (&e, self.persistence_failure) {
                (RepositoryError::MessageAlreadyExists(_), _)
                | (_, PersistenceFailurePolicy::Suppress) => {
                    tracing::warn!(
                        "Dropped message '{}' from '{}': {}",
                        message.id.as_str(),
                        sender.as_str(),
                        e
                    );
                    return Err(SendMessageError::PersistenceFailed(e));
                }
                (_, PersistenceFailurePolicy::Broadcast) => {
                    tracing::warn!(
                        "Message '{}' could not be stored, broadcasting without durability: {}",
                        message.id.as_str(),
                        e
                    );
                }
            }
        }

        // 5. ルームの全員（送信者を含む）にブロードキャスト
        let room_id = message.room_id.clone();
        let targets = self
            .broadcaster
            .broadcast_to_room(&room_id, &ServerEvent::Message(message))
            .await;

        Ok(targets)
    }
}

/// クライアントから受け取ったメッセージを検証する
pub fn validate_draft(draft: &MessageDraft, limits: &MessageLimits) -> Result<(), SendMessageError> {
    let invalid = |reason: String| Err(SendMessageError::InvalidMessage(reason));

    if let Some(text) = &draft.text {
        let chars = text.chars().count();
        if chars > limits.max_text_chars {
            return invalid(format!(
                "text has {} characters (max {})",
                chars, limits.max_text_chars
            ));
        }
    }

    match draft.kind {
        MessageKind::Text => {
            let has_text = draft.text.as_deref().is_some_and(|t| !t.trim().is_empty());
            if !has_text {
                return invalid("text message without text".to_string());
            }
            if draft.file.is_some() {
                return invalid("text message with file data".to_string());
            }
        }
        MessageKind::File => {
            let Some(file) = &draft.file else {
                return invalid("file message without file data".to_string());
            };
            if file.data.len() > limits.max_file_bytes {
                return invalid(format!(
                    "file payload is {} bytes (max {})",
                    file.data.len(),
                    limits.max_file_bytes
                ));
            }
            if !limits.is_file_type_allowed(&file.mime_type) {
                return invalid(format!("file type '{}' is not allowed", file.mime_type));
            }
        }
        MessageKind::System | MessageKind::Deleted => {
            return invalid(format!("clients cannot submit {:?} messages", draft.kind));
        }
    }

    Ok(())
}
