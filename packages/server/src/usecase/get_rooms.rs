//! UseCase: Room 一覧の取得

use std::sync::Arc;

use crate::domain::{Room, RoomQuery, RoomStatus, RoomStore, StoreError};

/// Room 一覧取得のユースケース
pub struct GetRoomsUseCase {
    store: Arc<dyn RoomStore>,
}

impl GetRoomsUseCase {
    pub fn new(store: Arc<dyn RoomStore>) -> Self {
        Self { store }
    }

    /// Room を作成順に取得（`status` を指定すればその状態の Room のみ）
    pub async fn execute(&self, status: Option<RoomStatus>) -> Result<Vec<Room>, StoreError> {
        let query = match status {
            Some(status) => RoomQuery::with_status(status),
            None => RoomQuery::all(),
        };
        self.store.query_rooms(query).await
    }
}
