//! Session states.

use std::fmt;

use crate::domain::{Message, ParticipantId, Room, RoomId, Subscription};

/// UI に表示するセッションの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Waiting,
    Connected,
    Closed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Waiting => "waiting",
            SessionStatus::Connected => "connected",
            SessionStatus::Closed => "closed",
        }
    }

    /// 接続状態インジケーターの表示文言
    pub fn label(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "Not connected",
            SessionStatus::Waiting => "Waiting for another person to join...",
            SessionStatus::Connected => "Connected",
            SessionStatus::Closed => "Chat ended",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// セッションが closed になった理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// 自分が退出した
    Left,
    /// 相手が Room を閉じた
    PartnerLeft,
    /// 自分が通報して退出した
    Reported,
    /// 購読が途切れた
    Lost,
}

impl CloseReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            CloseReason::Left => "left",
            CloseReason::PartnerLeft => "partner_left",
            CloseReason::Reported => "reported",
            CloseReason::Lost => "lost",
        }
    }
}

/// セッションの状態と、その状態で保持している購読
///
/// 購読は状態と一緒に保持されるため、状態を置き換えると解放される。
pub(crate) enum SessionState {
    Idle,
    Waiting {
        room_id: RoomId,
        room: Subscription<Room>,
    },
    Connected {
        room_id: RoomId,
        partner: ParticipantId,
        room: Subscription<Room>,
        messages: Subscription<Vec<Message>>,
    },
    Closed {
        room_id: RoomId,
        reason: CloseReason,
    },
}

impl SessionState {
    pub(crate) fn status(&self) -> SessionStatus {
        match self {
            SessionState::Idle => SessionStatus::Idle,
            SessionState::Waiting { .. } => SessionStatus::Waiting,
            SessionState::Connected { .. } => SessionStatus::Connected,
            SessionState::Closed { .. } => SessionStatus::Closed,
        }
    }

    /// 参加中（waiting / connected）の Room
    pub(crate) fn open_room(&self) -> Option<RoomId> {
        match self {
            SessionState::Waiting { room_id, .. } | SessionState::Connected { room_id, .. } => {
                Some(*room_id)
            }
            SessionState::Idle | SessionState::Closed { .. } => None,
        }
    }

    pub(crate) fn room_id(&self) -> Option<RoomId> {
        match self {
            SessionState::Closed { room_id, .. } => Some(*room_id),
            other => other.open_room(),
        }
    }

    pub(crate) fn close_reason(&self) -> Option<CloseReason> {
        match self {
            SessionState::Closed { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    pub(crate) fn partner(&self) -> Option<&ParticipantId> {
        match self {
            SessionState::Connected { partner, .. } => Some(partner),
            _ => None,
        }
    }
}
