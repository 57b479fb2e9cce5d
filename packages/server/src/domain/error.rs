//! Domain errors.

use thiserror::Error;

use super::value_object::RoomStatus;

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    /// The value is empty (or whitespace only for free text)
    #[error("{0} must not be empty")]
    Empty(&'static str),

    /// The value exceeds the maximum length
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// The value contains a character outside the allowed set
    #[error("{field} contains invalid character {character:?}")]
    InvalidCharacter {
        field: &'static str,
        character: char,
    },

    /// The value cannot be parsed into the expected format
    #[error("{field} has an invalid format: '{value}'")]
    InvalidFormat { field: &'static str, value: String },
}

/// Room ライフサイクルの遷移エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomTransitionError {
    /// 許可されていない状態遷移（逆方向、または closed からの遷移）
    #[error("room cannot move from {from} to {to}")]
    InvalidTransition { from: RoomStatus, to: RoomStatus },

    /// participant2 は一度しか設定できない
    #[error("room already has a second participant")]
    ParticipantAlreadySet,

    /// 自分が作成した Room には参加できない
    #[error("participant '{0}' cannot join their own room")]
    SelfPairing(String),
}

/// Store errors
///
/// `Unavailable` is the transient failure surfaced to users as "try again".
/// It is never turned into an empty result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error("room '{0}' is closed")]
    RoomClosed(String),
}

impl StoreError {
    /// Whether the caller may retry the same operation later
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}
