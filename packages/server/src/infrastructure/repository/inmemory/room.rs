//! `RoomStore` for the in-memory store.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::domain::{
    ParticipantId, Room, RoomId, RoomIdFactory, RoomQuery, RoomStatus, RoomStore, RoomUpdate,
    StoreError, Subscription, UpdateOutcome,
};

use super::{InMemoryStore, MessageLog, RoomRecord};

#[async_trait]
impl RoomStore for InMemoryStore {
    async fn insert_room(&self, participant1: ParticipantId) -> Result<Room, StoreError> {
        let now = self.now();
        let room = Room::new(RoomIdFactory::generate(), participant1, now);

        let mut tables = self.tables.lock().await;
        let sequence = tables.next_sequence;
        tables.next_sequence += 1;

        let (watcher, _) = watch::channel(room.clone());
        tables.rooms.insert(
            room.id,
            RoomRecord {
                sequence,
                room: room.clone(),
                watcher,
            },
        );
        tables.messages.insert(room.id, MessageLog::new());

        tracing::debug!(
            "Room '{}' created by '{}' (sequence {})",
            room.id,
            room.participant1,
            sequence
        );
        Ok(room)
    }

    async fn find_room(&self, room_id: &RoomId) -> Result<Option<Room>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.rooms.get(room_id).map(|record| record.room.clone()))
    }

    async fn query_rooms(&self, query: RoomQuery) -> Result<Vec<Room>, StoreError> {
        let tables = self.tables.lock().await;

        let before = match &query.created_before {
            Some(room_id) => Some(
                tables
                    .rooms
                    .get(room_id)
                    .map(|record| record.sequence)
                    .ok_or_else(|| StoreError::RoomNotFound(room_id.to_string()))?,
            ),
            None => None,
        };

        let mut records: Vec<&RoomRecord> = tables
            .rooms
            .values()
            .filter(|record| before.is_none_or(|sequence| record.sequence < sequence))
            .filter(|record| query.matches(&record.room))
            .collect();
        records.sort_by_key(|record| record.sequence);

        Ok(records
            .into_iter()
            .take(query.limit.unwrap_or(usize::MAX))
            .map(|record| record.room.clone())
            .collect())
    }

    async fn conditional_update(
        &self,
        room_id: &RoomId,
        update: RoomUpdate,
        expected: RoomStatus,
    ) -> Result<UpdateOutcome, StoreError> {
        let now = self.now();
        let mut tables = self.tables.lock().await;
        let record = tables
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| StoreError::RoomNotFound(room_id.to_string()))?;

        let current = record.room.status;
        if current != expected {
            tracing::debug!(
                "Conditional update on room '{}' rejected: expected {}, found {}",
                room_id,
                expected,
                current
            );
            return Ok(UpdateOutcome::Conflict { current });
        }

        let mut next = record.room.clone();
        if let Err(e) = next.apply(update, now) {
            tracing::debug!("Conditional update on room '{}' refused: {}", room_id, e);
            return Ok(UpdateOutcome::Conflict { current });
        }

        record.room = next.clone();
        record.watcher.send_replace(next.clone());
        tracing::debug!("Room '{}' is now {}", room_id, next.status);

        Ok(UpdateOutcome::Applied(next))
    }

    async fn subscribe_room(&self, room_id: &RoomId) -> Result<Subscription<Room>, StoreError> {
        let tables = self.tables.lock().await;
        tables
            .rooms
            .get(room_id)
            .map(|record| Subscription::new(record.watcher.subscribe()))
            .ok_or_else(|| StoreError::RoomNotFound(room_id.to_string()))
    }
}
