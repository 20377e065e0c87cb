//! UseCase: ルーム詳細取得処理

use std::sync::Arc;

use crate::domain::{ConnectionRegistry, Room, RoomId};

use super::error::GetRoomDetailError;

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    registry: Arc<dyn ConnectionRegistry>,
}

impl GetRoomDetailUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// ルーム詳細を取得
    ///
    /// 参加者のいないルームは存在しないものとして扱う。
    pub async fn execute(&self, room_id: String) -> Result<Room, GetRoomDetailError> {
        let room_id = RoomId::from_raw(Some(&room_id));
        let participants = self.registry.members_of(&room_id).await;
        if participants.is_empty() {
            return Err(GetRoomDetailError::RoomNotFound);
        }
        Ok(Room::new(room_id, participants))
    }
}
