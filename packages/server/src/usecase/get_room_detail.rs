//! UseCase: Room 詳細の取得

use std::sync::Arc;

use crate::domain::{MessageStore, Room, RoomId, RoomStore};

use super::error::GetRoomDetailError;

/// Room とメッセージ件数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomDetail {
    pub room: Room,
    pub message_count: usize,
}

/// Room 詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    rooms: Arc<dyn RoomStore>,
    messages: Arc<dyn MessageStore>,
}

impl GetRoomDetailUseCase {
    pub fn new(rooms: Arc<dyn RoomStore>, messages: Arc<dyn MessageStore>) -> Self {
        Self { rooms, messages }
    }

    /// Room 詳細を取得
    ///
    /// # Arguments
    ///
    /// * `room_id` - パスパラメータで受け取った Room ID（文字列）
    pub async fn execute(&self, room_id: String) -> Result<RoomDetail, GetRoomDetailError> {
        let room_id = RoomId::parse(&room_id)?;
        let room = self
            .rooms
            .find_room(&room_id)
            .await?
            .ok_or(GetRoomDetailError::RoomNotFound)?;
        let message_count = self.messages.list_messages(&room_id).await?.len();

        Ok(RoomDetail {
            room,
            message_count,
        })
    }
}
