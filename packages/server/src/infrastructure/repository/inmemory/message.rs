//! `MessageStore` for the in-memory store.

use async_trait::async_trait;

use crate::domain::{
    Message, MessageIdFactory, MessageStore, MessageText, ParticipantId, RoomId, StoreError,
    Subscription,
};

use super::InMemoryStore;

#[async_trait]
impl MessageStore for InMemoryStore {
    async fn append_message(
        &self,
        room_id: &RoomId,
        sender: ParticipantId,
        text: MessageText,
    ) -> Result<Message, StoreError> {
        let now = self.now();
        let tables = self.tables.lock().await;

        let room = tables
            .rooms
            .get(room_id)
            .map(|record| &record.room)
            .ok_or_else(|| StoreError::RoomNotFound(room_id.to_string()))?;
        if !room.is_open() {
            return Err(StoreError::RoomClosed(room_id.to_string()));
        }

        let log = tables
            .messages
            .get(room_id)
            .ok_or_else(|| StoreError::RoomNotFound(room_id.to_string()))?;

        // sent_at は Room 内で単調非減少
        let sent_at = log.last_sent_at().map_or(now, |last| last.max(now));
        let message = Message {
            id: MessageIdFactory::generate(),
            room_id: *room_id,
            sender,
            text,
            sent_at,
        };

        let len = log.push(message.clone());

        tracing::debug!(
            "Message '{}' appended to room '{}' by '{}' ({} in log)",
            message.id,
            room_id,
            message.sender,
            len
        );
        Ok(message)
    }

    async fn list_messages(&self, room_id: &RoomId) -> Result<Vec<Message>, StoreError> {
        let tables = self.tables.lock().await;
        tables
            .messages
            .get(room_id)
            .map(|log| log.snapshot())
            .ok_or_else(|| StoreError::RoomNotFound(room_id.to_string()))
    }

    async fn subscribe_messages(
        &self,
        room_id: &RoomId,
    ) -> Result<Subscription<Vec<Message>>, StoreError> {
        let tables = self.tables.lock().await;
        tables
            .messages
            .get(room_id)
            .map(|log| Subscription::new(log.watcher.subscribe()))
            .ok_or_else(|| StoreError::RoomNotFound(room_id.to_string()))
    }
}
