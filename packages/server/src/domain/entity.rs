//! エンティティ定義
//!
//! - `Participant`: 接続とルーム・表示名の対応（Connection Registry が所有）
//! - `Room`: 同じルームに属する参加者の集合（保存されず、Registry から導出される）
//! - `ChatMessage`: 永続化されるメッセージ
//! - `SystemNotice`: 参加・退出時にサーバーが合成する通知（永続化されない）

use std::collections::BTreeMap;

use serde::Serialize;

use super::value_object::{ConnectionId, DisplayName, Emoji, MessageId, RoomId, Timestamp};

/// Registry に登録された参加者
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Participant {
    pub id: ConnectionId,
    pub name: DisplayName,
    pub room_id: RoomId,
    pub joined_at: Timestamp,
}

impl Participant {
    pub fn new(id: ConnectionId, name: DisplayName, room_id: RoomId, joined_at: Timestamp) -> Self {
        Self {
            id,
            name,
            room_id,
            joined_at,
        }
    }
}

/// ルーム（Registry のスナップショットから導出される読み取りモデル）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Room {
    pub id: RoomId,
    pub participants: Vec<Participant>,
}

impl Room {
    pub fn new(id: RoomId, participants: Vec<Participant>) -> Self {
        Self { id, participants }
    }
}

/// メッセージの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    File,
    System,
    /// 削除済み（tombstone）
    Deleted,
}

/// 添付ファイル（エンコード済みのデータをそのまま保持する）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileAttachment {
    pub name: String,
    pub mime_type: String,
    pub data: String,
}

/// 返信元メッセージのスナップショット（返信時点の内容で、以後追従しない）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplySnapshot {
    pub id: String,
    pub text: Option<String>,
    pub user: Option<String>,
}

/// リアクション（リアクションした人の表示名 → 絵文字）
pub type Reactions = BTreeMap<DisplayName, Emoji>;

/// クライアントから送られてきた未確定のメッセージ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    pub id: MessageId,
    pub kind: MessageKind,
    pub text: Option<String>,
    pub file: Option<FileAttachment>,
    pub reply_to: Option<ReplySnapshot>,
}

/// 永続化されるチャットメッセージ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub room_id: RoomId,
    pub sender_name: DisplayName,
    pub sender_id: ConnectionId,
    pub kind: MessageKind,
    pub text: Option<String>,
    pub file: Option<FileAttachment>,
    pub created_at: Timestamp,
    pub reply_to: Option<ReplySnapshot>,
    pub reactions: Reactions,
    pub edited: bool,
}

impl ChatMessage {
    /// 送信者の情報とサーバー時刻を刻印して確定させる
    pub fn stamp(draft: MessageDraft, sender: &Participant, created_at: Timestamp) -> Self {
        Self {
            id: draft.id,
            room_id: sender.room_id.clone(),
            sender_name: sender.name.clone(),
            sender_id: sender.id.clone(),
            kind: draft.kind,
            text: draft.text,
            file: draft.file,
            created_at,
            reply_to: draft.reply_to,
            reactions: Reactions::new(),
            edited: false,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.kind == MessageKind::Deleted
    }

    /// 本文を置き換え、編集済みにする（ID は変わらない）
    pub fn edit_text(&mut self, new_text: String) {
        self.text = Some(new_text);
        self.edited = true;
    }

    /// 内容を消去して tombstone にする
    pub fn tombstone(&mut self) {
        self.kind = MessageKind::Deleted;
        self.text = None;
        self.file = None;
        self.reply_to = None;
        self.reactions.clear();
    }

    /// 同じ人のリアクションは上書きされる（1 人 1 つまで）
    pub fn set_reaction(&mut self, reactor: DisplayName, emoji: Emoji) {
        self.reactions.insert(reactor, emoji);
    }
}

/// サーバーが合成するシステム通知
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemNotice {
    pub id: MessageId,
    pub room_id: RoomId,
    pub text: String,
    pub created_at: Timestamp,
}

impl SystemNotice {
    pub fn joined(name: &DisplayName, room_id: RoomId, created_at: Timestamp) -> Self {
        Self {
            id: MessageId::generate(),
            room_id,
            text: format!("{} joined the conversation", name.as_str()),
            created_at,
        }
    }

    pub fn left(name: &DisplayName, room_id: RoomId, created_at: Timestamp) -> Self {
        Self {
            id: MessageId::generate(),
            room_id,
            text: format!("{} left the chat", name.as_str()),
            created_at,
        }
    }
}
