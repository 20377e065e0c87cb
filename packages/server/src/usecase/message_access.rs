//! 既存メッセージに対する操作の共通チェック

use crate::domain::{
    ChatMessage, ConnectionId, ConnectionRegistry, MessageId, MessageRepository, Participant,
};

use super::error::MessageActionError;

/// 操作対象のメッセージを解決する
///
/// 要求者が登録済みで、メッセージが要求者の今いるルームに存在し、
/// 削除済みでない場合だけ `Ok` を返す。
pub(crate) async fn load_target(
    registry: &dyn ConnectionRegistry,
    repository: &dyn MessageRepository,
    requester: &ConnectionId,
    message_id: &MessageId,
) -> Result<(Participant, ChatMessage), MessageActionError> {
    let participant = registry
        .lookup(requester)
        .await
        .ok_or_else(|| MessageActionError::NotRegistered(requester.as_str().to_string()))?;

    let message = repository
        .find_by_id(message_id)
        .await?
        .filter(|m| m.room_id == participant.room_id && !m.is_deleted())
        .ok_or_else(|| MessageActionError::MessageNotFound(message_id.as_str().to_string()))?;

    Ok((participant, message))
}

/// `require_sender_match` が有効なとき、要求者が元の送信者かを確かめる
pub(crate) fn ensure_sender(
    require_sender_match: bool,
    requester: &ConnectionId,
    message: &ChatMessage,
) -> Result<(), MessageActionError> {
    if require_sender_match && &message.sender_id != requester {
        return Err(MessageActionError::NotSender {
            requester: requester.as_str().to_string(),
            message_id: message.id.as_str().to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Fixture, conn, message_id};

    #[tokio::test]
    async fn test_load_target_from_other_room_is_not_found() {
        // テスト項目: 別ルームのメッセージは存在しないものとして扱う
        // given (前提条件):
        let fixture = Fixture::new();
        fixture.join("alice", "Alice", "General").await;
        fixture.join("carol", "Carol", "Random").await;
        fixture.seed_message("alice", "m1", "hello").await;

        // when (操作):
        let result = load_target(
            fixture.registry.as_ref(),
            fixture.repository.as_ref(),
            &conn("carol"),
            &message_id("m1"),
        )
        .await;

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            MessageActionError::MessageNotFound("m1".to_string())
        );
    }

    #[tokio::test]
    async fn test_load_target_tombstone_is_not_found() {
        // テスト項目: 削除済みのメッセージは存在しないものとして扱う
        // given (前提条件):
        let fixture = Fixture::new();
        fixture.join("alice", "Alice", "General").await;
        fixture.seed_message("alice", "m1", "hello").await;
        fixture
            .repository
            .mark_deleted(&message_id("m1"))
            .await
            .unwrap();

        // when (操作):
        let result = load_target(
            fixture.registry.as_ref(),
            fixture.repository.as_ref(),
            &conn("alice"),
            &message_id("m1"),
        )
        .await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessageActionError::MessageNotFound(_))));
    }

    #[tokio::test]
    async fn test_ensure_sender_only_when_required() {
        // テスト項目: 所有者チェックは設定が有効なときだけ行われる
        // given (前提条件):
        let fixture = Fixture::new();
        fixture.join("alice", "Alice", "General").await;
        let message = fixture.seed_message("alice", "m1", "hello").await;

        // then (期待する結果):
        assert!(ensure_sender(false, &conn("bob"), &message).is_ok());
        assert!(ensure_sender(true, &conn("alice"), &message).is_ok());
        assert!(matches!(
            ensure_sender(true, &conn("bob"), &message),
            Err(MessageActionError::NotSender { .. })
        ));
    }
}
