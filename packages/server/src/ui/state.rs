//! Shared application state.

use std::sync::Arc;

use crate::{
    config::ServerConfig,
    domain::{
        IdentityGenerator, MessageStore, ModerationSink, ParticipantId, RandomIdentityGenerator,
        RoomStore,
    },
    session::SessionController,
    usecase::{
        GetRoomDetailUseCase, GetRoomsUseCase, MatchmakingService, MessageRelay,
        ModerationService,
    },
};

/// Shared application state
pub struct AppState {
    /// MatchmakingService（マッチングのユースケース）
    pub matchmaking: Arc<MatchmakingService>,
    /// MessageRelay（メッセージ中継のユースケース）
    pub relay: Arc<MessageRelay>,
    /// ModerationService（通報・問い合わせのユースケース）
    pub moderation: Arc<ModerationService>,
    /// GetRoomsUseCase（Room 一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（Room 詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    /// IdentityGenerator（参加者 ID の生成）
    pub identity: Arc<dyn IdentityGenerator>,
}

impl AppState {
    /// 1 つのストアから全てのユースケースを組み立てる
    pub fn with_store<S>(store: Arc<S>, config: &ServerConfig) -> Self
    where
        S: RoomStore + MessageStore + ModerationSink + 'static,
    {
        Self {
            matchmaking: Arc::new(MatchmakingService::new(store.clone(), config.matchmaking)),
            relay: Arc::new(MessageRelay::new(store.clone(), store.clone())),
            moderation: Arc::new(ModerationService::new(store.clone())),
            get_rooms_usecase: Arc::new(GetRoomsUseCase::new(store.clone())),
            get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(store.clone(), store)),
            identity: Arc::new(RandomIdentityGenerator::new(config.identity_length)),
        }
    }

    /// 接続 1 つ分のセッションを作成
    pub fn new_session(&self, participant: ParticipantId) -> SessionController {
        SessionController::new(
            participant,
            self.matchmaking.clone(),
            self.relay.clone(),
            self.moderation.clone(),
        )
    }
}
