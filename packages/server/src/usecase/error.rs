//! UseCase errors.

use thiserror::Error;

use crate::domain::{StoreError, ValueObjectError};

/// マッチングのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchmakingError {
    /// ストアの障害（一時的なもの。「もう一度お試しください」として表示する）
    #[error(transparent)]
    Store(#[from] StoreError),

    /// 対象の Room が存在しない
    #[error("room '{0}' not found")]
    RoomNotFound(String),

    /// 条件付き更新が競合し続けた
    #[error("room '{room_id}' kept changing after {attempts} attempts")]
    Contention { room_id: String, attempts: usize },
}

impl MatchmakingError {
    pub fn is_transient(&self) -> bool {
        match self {
            MatchmakingError::Store(e) => e.is_transient(),
            MatchmakingError::Contention { .. } => true,
            MatchmakingError::RoomNotFound(_) => false,
        }
    }
}

/// メッセージ送信・購読のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    #[error(transparent)]
    Validation(#[from] ValueObjectError),

    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error("room '{0}' is closed")]
    RoomClosed(String),

    #[error("'{participant}' is not a participant of room '{room_id}'")]
    NotAParticipant {
        room_id: String,
        participant: String,
    },

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for RelayError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::RoomNotFound(room_id) => RelayError::RoomNotFound(room_id),
            StoreError::RoomClosed(room_id) => RelayError::RoomClosed(room_id),
            other => RelayError::Store(other),
        }
    }
}

/// 通報・問い合わせのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModerationError {
    #[error(transparent)]
    Validation(#[from] ValueObjectError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Room 詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error(transparent)]
    InvalidRoomId(#[from] ValueObjectError),

    #[error("room not found")]
    RoomNotFound,

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for GetRoomDetailError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::RoomNotFound(_) => GetRoomDetailError::RoomNotFound,
            other => GetRoomDetailError::Store(other),
        }
    }
}
