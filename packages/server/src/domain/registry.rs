//! Connection Registry trait 定義
//!
//! 「誰が・どのルームにいるか」の唯一の情報源。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{ConnectionId, DisplayName, Participant, Room, RoomId, Timestamp};

/// `register` の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// 未登録だった接続がルームに参加した
    Joined,
    /// 同じルームへの再参加（表示名の更新を含む）
    Rejoined,
    /// 別のルームから移動した
    Switched { from: RoomId },
}

/// Connection Registry trait
///
/// 全ての変更は 1 回のロック内で完結し、途中状態が他から観測されることはない。
/// 読み取りは常にスナップショット（コピー）を返す。
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// 参加者を登録（upsert）する
    ///
    /// 既に別のルームにいる場合は、旧ルームから外してから新ルームに入れる。
    async fn register(
        &self,
        connection_id: ConnectionId,
        name: DisplayName,
        room_id: RoomId,
        joined_at: Timestamp,
    ) -> Registration;

    /// 接続 ID から参加者を引く
    async fn lookup(&self, connection_id: &ConnectionId) -> Option<Participant>;

    /// 参加者を削除する（存在しなければ何もしない）
    async fn remove(&self, connection_id: &ConnectionId) -> Option<Participant>;

    /// ルームの参加者一覧（スナップショット）
    async fn members_of(&self, room_id: &RoomId) -> Vec<Participant>;

    /// 参加者のいる全ルーム（スナップショット）
    async fn rooms(&self) -> Vec<Room>;
}
