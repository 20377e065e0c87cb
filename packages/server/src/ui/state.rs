//! Shared application state.

use std::sync::Arc;

use tsudoi_shared::time::Clock;

use crate::{
    config::RelayConfig,
    domain::{ConnectionRegistry, MessagePusher, MessageRepository, RoomBroadcaster},
    usecase::{
        ConnectParticipantUseCase, DeleteMessageUseCase, DisconnectParticipantUseCase,
        EditMessageUseCase, GetRoomDetailUseCase, GetRoomsUseCase, JoinRoomUseCase,
        MarkSeenUseCase, ReactMessageUseCase, SendMessageUseCase, SetTypingUseCase,
    },
};

/// Shared application state
///
/// Holds one instance of every use case; handlers only talk to these.
pub struct AppState {
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    pub send_message_usecase: Arc<SendMessageUseCase>,
    pub set_typing_usecase: Arc<SetTypingUseCase>,
    pub mark_seen_usecase: Arc<MarkSeenUseCase>,
    pub edit_message_usecase: Arc<EditMessageUseCase>,
    pub delete_message_usecase: Arc<DeleteMessageUseCase>,
    pub react_message_usecase: Arc<ReactMessageUseCase>,
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    /// Largest WebSocket frame accepted from a client
    pub max_frame_bytes: usize,
}

impl AppState {
    /// Wire every use case onto the given registry, store, pusher and clock
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        repository: Arc<dyn MessageRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        config: RelayConfig,
    ) -> Self {
        let broadcaster = Arc::new(RoomBroadcaster::new(
            registry.clone(),
            message_pusher.clone(),
        ));

        Self {
            connect_participant_usecase: Arc::new(ConnectParticipantUseCase::new(
                message_pusher.clone(),
            )),
            disconnect_participant_usecase: Arc::new(DisconnectParticipantUseCase::new(
                registry.clone(),
                message_pusher,
                broadcaster.clone(),
                clock.clone(),
            )),
            join_room_usecase: Arc::new(JoinRoomUseCase::new(
                registry.clone(),
                repository.clone(),
                broadcaster.clone(),
                clock.clone(),
                config.history_limit,
            )),
            send_message_usecase: Arc::new(SendMessageUseCase::new(
                registry.clone(),
                repository.clone(),
                broadcaster.clone(),
                clock,
                config.limits.clone(),
                config.persistence_failure,
            )),
            set_typing_usecase: Arc::new(SetTypingUseCase::new(
                registry.clone(),
                broadcaster.clone(),
            )),
            mark_seen_usecase: Arc::new(MarkSeenUseCase::new(
                registry.clone(),
                broadcaster.clone(),
            )),
            edit_message_usecase: Arc::new(EditMessageUseCase::new(
                registry.clone(),
                repository.clone(),
                broadcaster.clone(),
                config.require_sender_match,
                config.limits.max_text_chars,
            )),
            delete_message_usecase: Arc::new(DeleteMessageUseCase::new(
                registry.clone(),
                repository.clone(),
                broadcaster.clone(),
                config.require_sender_match,
            )),
            react_message_usecase: Arc::new(ReactMessageUseCase::new(
                registry.clone(),
                repository,
                broadcaster,
            )),
            get_rooms_usecase: Arc::new(GetRoomsUseCase::new(registry.clone())),
            get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(registry)),
            max_frame_bytes: config.max_frame_bytes,
        }
    }
}
