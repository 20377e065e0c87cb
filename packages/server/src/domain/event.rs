//! サーバーからクライアントへ届けるイベント
//!
//! UseCase はこの型でイベントを組み立て、ワイヤーフォーマットへの変換は
//! Infrastructure 層（`MessagePusher` 実装）が担当します。

use super::{
    entity::{ChatMessage, Participant, Reactions, SystemNotice},
    value_object::{DisplayName, MessageId},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// 確定したチャットメッセージ
    Message(ChatMessage),
    /// 参加・退出のシステム通知
    System(SystemNotice),
    /// 参加直後に本人だけへ送る履歴
    ChatHistory(Vec<ChatMessage>),
    /// ルームの参加者一覧
    RoomUsers(Vec<Participant>),
    Typing {
        user: DisplayName,
        is_typing: bool,
    },
    /// 既読通知（元の送信者だけに届く）
    MessageSeen { message_id: MessageId },
    MessageEdited { id: MessageId, new_text: String },
    MessageDeleted { id: MessageId },
    /// 「自分だけ削除」の確認（本人だけに届く）
    MessageDeletedForMe { id: MessageId },
    MessageReacted { id: MessageId, reactions: Reactions },
}

impl ServerEvent {
    /// ログ出力用のイベント名
    pub fn name(&self) -> &'static str {
        match self {
            Self::Message(_) | Self::System(_) => "message",
            Self::ChatHistory(_) => "chat-history",
            Self::RoomUsers(_) => "room-users",
            Self::Typing { .. } => "typing",
            Self::MessageSeen { .. } => "message-seen",
            Self::MessageEdited { .. } => "message-edited",
            Self::MessageDeleted { .. } => "message-deleted",
            Self::MessageDeletedForMe { .. } => "message-deleted-me",
            Self::MessageReacted { .. } => "message-reacted",
        }
    }
}
