//! Conversion logic between DTOs and domain entities.

use duet_shared::time::timestamp_to_rfc3339;

use crate::{
    domain::{Message, ParticipantId, Room, RoomId},
    infrastructure::dto::{http, websocket as dto},
    session::{SessionController, SessionError},
    usecase::RoomDetail,
};

// ========================================
// Domain Entity → DTO
// ========================================

impl dto::MessageDto {
    /// `viewer` から見たメッセージ DTO を作成
    pub fn from_message(message: Message, viewer: &ParticipantId) -> Self {
        Self {
            id: message.id.to_string(),
            mine: &message.sender == viewer,
            sender: message.sender.into_string(),
            text: message.text.into_string(),
            sent_at: message.sent_at.value(),
        }
    }
}

impl dto::ServerEvent {
    /// セッションの現在の状態
    pub fn status(session: &SessionController) -> Self {
        let status = session.status();
        Self::Status {
            status: status.as_str().to_string(),
            label: status.label().to_string(),
            room_id: session.room_id().map(|id| id.to_string()),
            partner: session.partner().map(|p| p.as_str().to_string()),
            reason: session.close_reason().map(|r| r.as_str().to_string()),
        }
    }

    /// `viewer` 宛てのメッセージ一覧
    pub fn messages(room_id: RoomId, messages: Vec<Message>, viewer: &ParticipantId) -> Self {
        Self::Messages {
            room_id: room_id.to_string(),
            messages: messages
                .into_iter()
                .map(|message| dto::MessageDto::from_message(message, viewer))
                .collect(),
        }
    }
}

impl From<&SessionError> for dto::ServerEvent {
    fn from(error: &SessionError) -> Self {
        Self::Error {
            kind: error.kind().to_string(),
            message: error.user_message(),
        }
    }
}

impl From<Room> for http::RoomSummaryDto {
    fn from(room: Room) -> Self {
        Self {
            id: room.id.to_string(),
            status: room.status.as_str().to_string(),
            participants: std::iter::once(room.participant1)
                .chain(room.participant2)
                .map(ParticipantId::into_string)
                .collect(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

impl From<RoomDetail> for http::RoomDetailDto {
    fn from(detail: RoomDetail) -> Self {
        let room = detail.room;
        Self {
            id: room.id.to_string(),
            status: room.status.as_str().to_string(),
            participant1: room.participant1.into_string(),
            participant2: room.participant2.map(ParticipantId::into_string),
            message_count: detail.message_count,
            created_at: timestamp_to_rfc3339(room.created_at.value()),
            updated_at: timestamp_to_rfc3339(room.updated_at.value()),
        }
    }
}
