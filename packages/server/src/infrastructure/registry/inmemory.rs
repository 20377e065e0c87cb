//! InMemory Connection Registry 実装
//!
//! ドメイン層が定義する ConnectionRegistry trait の具体的な実装。
//!
//! ## データ構造
//!
//! - `participants`: connection_id → Participant（主テーブル）
//! - `rooms`: room_id → connection_id の集合（副インデックス）
//!
//! 両者は同じ書き込みロックの中で更新されるため、常に整合している。
//! 空になったルームはインデックスから取り除かれる。

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    ConnectionId, ConnectionRegistry, DisplayName, Participant, Registration, Room, RoomId,
    Timestamp,
};

#[derive(Debug, Default)]
struct RegistryState {
    participants: HashMap<ConnectionId, Participant>,
    rooms: HashMap<RoomId, BTreeSet<ConnectionId>>,
}

impl RegistryState {
    fn detach_from_room(&mut self, connection_id: &ConnectionId, room_id: &RoomId) {
        if let Some(members) = self.rooms.get_mut(room_id) {
            members.remove(connection_id);
            if members.is_empty() {
                self.rooms.remove(room_id);
            }
        }
    }

    fn snapshot_room(&self, room_id: &RoomId) -> Vec<Participant> {
        let mut members: Vec<Participant> = self
            .rooms
            .get(room_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.participants.get(id).cloned())
            .collect();

        // Sort by join time, then connection id for a stable member list
        members.sort_by(|a, b| {
            a.joined_at
                .cmp(&b.joined_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        members
    }
}

/// インメモリ Connection Registry 実装
#[derive(Debug, Default)]
pub struct InMemoryConnectionRegistry {
    state: RwLock<RegistryState>,
}

impl InMemoryConnectionRegistry {
    /// 新しい InMemoryConnectionRegistry を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn register(
        &self,
        connection_id: ConnectionId,
        name: DisplayName,
        room_id: RoomId,
        joined_at: Timestamp,
    ) -> Registration {
        let mut state = self.state.write().await;

        let current = state
            .participants
            .get(&connection_id)
            .map(|p| (p.room_id.clone(), p.joined_at));

        let (registration, joined_at) = match current {
            Some((current_room, first_joined_at)) if current_room == room_id => {
                (Registration::Rejoined, first_joined_at)
            }
            Some((from, _)) => {
                state.detach_from_room(&connection_id, &from);
                (Registration::Switched { from }, joined_at)
            }
            None => (Registration::Joined, joined_at),
        };

        state
            .rooms
            .entry(room_id.clone())
            .or_default()
            .insert(connection_id.clone());
        state.participants.insert(
            connection_id.clone(),
            Participant::new(connection_id, name, room_id, joined_at),
        );

        registration
    }

    async fn lookup(&self, connection_id: &ConnectionId) -> Option<Participant> {
        let state = self.state.read().await;
        state.participants.get(connection_id).cloned()
    }

    async fn remove(&self, connection_id: &ConnectionId) -> Option<Participant> {
        let mut state = self.state.write().await;
        let participant = state.participants.remove(connection_id)?;
        state.detach_from_room(connection_id, &participant.room_id);
        Some(participant)
    }

    async fn members_of(&self, room_id: &RoomId) -> Vec<Participant> {
        let state = self.state.read().await;
        state.snapshot_room(room_id)
    }

    async fn rooms(&self) -> Vec<Room> {
        let state = self.state.read().await;
        let mut room_ids: Vec<&RoomId> = state.rooms.keys().collect();
        room_ids.sort();

        room_ids
            .into_iter()
            .map(|room_id| Room::new(room_id.clone(), state.snapshot_room(room_id)))
            .collect()
    }
}
