//! Session errors.

use thiserror::Error;

use crate::usecase::{MatchmakingError, ModerationError, RelayError};

use super::state::SessionStatus;

/// セッション操作のエラー（状態は変更されない）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("cannot {action} while {status}")]
    InvalidState {
        action: &'static str,
        status: SessionStatus,
    },

    #[error(transparent)]
    Matchmaking(#[from] MatchmakingError),

    #[error(transparent)]
    Relay(#[from] RelayError),

    #[error(transparent)]
    Moderation(#[from] ModerationError),
}

const TRY_AGAIN: &str = "Something went wrong. Please try again.";

impl SessionError {
    /// エラーの種類（クライアントへ送るエラーイベントの `kind`）
    pub fn kind(&self) -> &'static str {
        match self {
            SessionError::InvalidState { .. } => "invalid_state",
            SessionError::Matchmaking(e) if e.is_transient() => "unavailable",
            SessionError::Matchmaking(_) => "not_found",
            SessionError::Relay(RelayError::Validation(_))
            | SessionError::Moderation(ModerationError::Validation(_)) => "validation",
            SessionError::Relay(RelayError::RoomClosed(_)) => "room_closed",
            SessionError::Relay(RelayError::RoomNotFound(_)) => "not_found",
            SessionError::Relay(RelayError::NotAParticipant { .. }) => "forbidden",
            SessionError::Relay(RelayError::Store(_))
            | SessionError::Moderation(ModerationError::Store(_)) => "unavailable",
        }
    }

    /// ユーザーに表示するメッセージ
    pub fn user_message(&self) -> String {
        match self {
            SessionError::InvalidState { status, .. } => match status {
                SessionStatus::Idle => "You are not in a chat.".to_string(),
                SessionStatus::Waiting => "Still waiting for a partner.".to_string(),
                SessionStatus::Connected => "You are already in a chat.".to_string(),
                SessionStatus::Closed => "The chat has ended.".to_string(),
            },
            SessionError::Relay(RelayError::Validation(e))
            | SessionError::Moderation(ModerationError::Validation(e)) => e.to_string(),
            SessionError::Relay(RelayError::RoomClosed(_)) => "The chat has ended.".to_string(),
            _ => TRY_AGAIN.to_string(),
        }
    }
}
