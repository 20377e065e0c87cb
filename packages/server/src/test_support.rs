//! Test doubles and fixtures shared by the unit tests.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tsudoi_shared::time::{Clock, FixedClock, MonotonicClock};

use crate::{
    domain::{
        ChatMessage, ConnectionId, ConnectionRegistry, DisplayName, Emoji, MessageDraft,
        MessageId, MessageKind, MessagePushError, MessagePusher, MessageRepository,
        PusherChannel, Reactions, RepositoryError, RoomBroadcaster, RoomId, ServerEvent,
        SortOrder, Timestamp,
    },
    infrastructure::{registry::InMemoryConnectionRegistry, repository::InMemoryMessageRepository},
};

/// MessagePusher that records every pushed event per connection
#[derive(Default)]
pub struct RecordingPusher {
    events: Mutex<HashMap<String, Vec<ServerEvent>>>,
}

impl RecordingPusher {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn events_for(&self, connection_id: &str) -> Vec<ServerEvent> {
        let events = self.events.lock().await;
        events.get(connection_id).cloned().unwrap_or_default()
    }

    pub async fn clear(&self) {
        self.events.lock().await.clear();
    }
}

#[async_trait]
impl MessagePusher for RecordingPusher {
    async fn register_client(&self, _connection_id: ConnectionId, _sender: PusherChannel) {}

    async fn unregister_client(&self, _connection_id: &ConnectionId) {}

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError> {
        let mut events = self.events.lock().await;
        events
            .entry(connection_id.as_str().to_string())
            .or_default()
            .push(event.clone());
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError> {
        for target in targets {
            self.push_to(&target, event).await?;
        }
        Ok(())
    }
}

/// Store that tombstones a message right after it is read by id.
///
/// Reproduces a delete from another connection landing between the
/// access check of an edit or reaction and its write.
pub struct DeleteAfterReadRepository {
    inner: Arc<InMemoryMessageRepository>,
}

impl DeleteAfterReadRepository {
    pub fn new(inner: Arc<InMemoryMessageRepository>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl MessageRepository for DeleteAfterReadRepository {
    async fn append(&self, message: ChatMessage) -> Result<(), RepositoryError> {
        self.inner.append(message).await
    }

    async fn find_by_room(
        &self,
        room_id: &RoomId,
        order: SortOrder,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        self.inner.find_by_room(room_id, order, limit).await
    }

    async fn find_by_id(&self, id: &MessageId) -> Result<Option<ChatMessage>, RepositoryError> {
        let found = self.inner.find_by_id(id).await?;
        if found.is_some() {
            self.inner.mark_deleted(id).await?;
        }
        Ok(found)
    }

    async fn update_text(&self, id: &MessageId, new_text: String) -> Result<(), RepositoryError> {
        self.inner.update_text(id, new_text).await
    }

    async fn mark_deleted(&self, id: &MessageId) -> Result<(), RepositoryError> {
        self.inner.mark_deleted(id).await
    }

    async fn set_reaction(
        &self,
        id: &MessageId,
        reactor: DisplayName,
        emoji: Emoji,
    ) -> Result<Reactions, RepositoryError> {
        self.inner.set_reaction(id, reactor, emoji).await
    }
}

/// In-memory wiring of the relay core for use case tests
pub struct Fixture {
    pub registry: Arc<InMemoryConnectionRegistry>,
    pub repository: Arc<InMemoryMessageRepository>,
    pub pusher: Arc<RecordingPusher>,
    pub broadcaster: Arc<RoomBroadcaster>,
    pub clock: Arc<dyn Clock>,
}

impl Fixture {
    pub fn new() -> Self {
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let repository = Arc::new(InMemoryMessageRepository::new());
        let pusher = Arc::new(RecordingPusher::new());
        let broadcaster = Arc::new(RoomBroadcaster::new(registry.clone(), pusher.clone()));
        let clock: Arc<dyn Clock> = Arc::new(MonotonicClock::new(FixedClock::new(1_000)));

        Self {
            registry,
            repository,
            pusher,
            broadcaster,
            clock,
        }
    }

    /// Register a participant directly in the registry
    pub async fn join(&self, id: &str, name: &str, room: &str) -> ConnectionId {
        let connection_id = conn(id);
        self.registry
            .register(
                connection_id.clone(),
                DisplayName::from_raw(Some(name)),
                RoomId::from_raw(Some(room)),
                Timestamp::new(self.clock.now_millis()),
            )
            .await;
        connection_id
    }

    /// Store a text message sent by a registered participant
    pub async fn seed_message(&self, sender: &str, id: &str, text: &str) -> ChatMessage {
        let participant = self
            .registry
            .lookup(&conn(sender))
            .await
            .expect("sender must be registered");
        let message = ChatMessage::stamp(
            text_draft(id, text),
            &participant,
            Timestamp::new(self.clock.now_millis()),
        );
        self.repository
            .append(message.clone())
            .await
            .expect("seed message must be stored");
        message
    }
}

pub fn conn(id: &str) -> ConnectionId {
    ConnectionId::new(id.to_string()).unwrap()
}

pub fn message_id(id: &str) -> MessageId {
    MessageId::new(id.to_string()).unwrap()
}

pub fn text_draft(id: &str, text: &str) -> MessageDraft {
    MessageDraft {
        id: message_id(id),
        kind: MessageKind::Text,
        text: Some(text.to_string()),
        file: None,
        reply_to: None,
    }
}
