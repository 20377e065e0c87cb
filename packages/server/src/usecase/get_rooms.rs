//! UseCase: ルーム一覧取得処理

use std::sync::Arc;

use crate::domain::{ConnectionRegistry, Room};

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    registry: Arc<dyn ConnectionRegistry>,
}

impl GetRoomsUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// 参加者のいるルームをルーム名順に返す
    pub async fn execute(&self) -> Vec<Room> {
        self.registry.rooms().await
    }
}
