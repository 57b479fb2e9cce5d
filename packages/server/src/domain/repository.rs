//! Store trait 定義
//!
//! ドメイン層が必要とするドキュメントストアのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! ## ストアに求める性質
//!
//! - `conditional_update` は status に対する compare-and-swap として働くこと
//! - `subscribe_*` は購読時点の完全なスナップショットを最初に配信すること
//! - タイムスタンプ（created_at, updated_at, sent_at）はストア側で割り当てること

use async_trait::async_trait;

use super::{
    ContactMessage, ContactText, Message, MessageText, ParticipantId, Report, ReportReason, Room,
    RoomId, RoomStatus, RoomUpdate, StoreError, Subscription,
};

/// Filter for one-shot room queries
///
/// Results come back in the store's default ordering: creation order,
/// oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomQuery {
    pub status: Option<RoomStatus>,
    /// Only rooms created strictly before this one
    pub created_before: Option<RoomId>,
    /// Skip rooms created by this participant
    pub exclude_creator: Option<ParticipantId>,
    pub limit: Option<usize>,
}

impl RoomQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_status(status: RoomStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn waiting() -> Self {
        Self::with_status(RoomStatus::Waiting)
    }

    pub fn created_before(mut self, room_id: RoomId) -> Self {
        self.created_before = Some(room_id);
        self
    }

    pub fn excluding_creator(mut self, participant: ParticipantId) -> Self {
        self.exclude_creator = Some(participant);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether `room` passes the status and creator filters
    pub fn matches(&self, room: &Room) -> bool {
        self.status.is_none_or(|status| room.status == status)
            && self
                .exclude_creator
                .as_ref()
                .is_none_or(|creator| &room.participant1 != creator)
    }
}

/// Result of a conditional update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The precondition held and the update was applied
    Applied(Room),
    /// The precondition no longer held (another writer won the race),
    /// or the room refused the update because it is frozen
    Conflict { current: RoomStatus },
}

/// Room Store trait
///
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// waiting 状態の Room を作成（participant2 は未設定）
    async fn insert_room(&self, participant1: ParticipantId) -> Result<Room, StoreError>;

    /// Room を ID で取得
    async fn find_room(&self, room_id: &RoomId) -> Result<Option<Room>, StoreError>;

    /// 条件に一致する Room を作成順に取得
    async fn query_rooms(&self, query: RoomQuery) -> Result<Vec<Room>, StoreError>;

    /// 現在の status が `expected` の場合に限り、アトミックに更新を適用する
    async fn conditional_update(
        &self,
        room_id: &RoomId,
        update: RoomUpdate,
        expected: RoomStatus,
    ) -> Result<UpdateOutcome, StoreError>;

    /// Room の変更を購読
    async fn subscribe_room(&self, room_id: &RoomId) -> Result<Subscription<Room>, StoreError>;
}

/// Message Store trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// メッセージを Room のログに追記（closed / 存在しない Room にはエラー）
    async fn append_message(
        &self,
        room_id: &RoomId,
        sender: ParticipantId,
        text: MessageText,
    ) -> Result<Message, StoreError>;

    /// Room のメッセージを送信順に取得
    async fn list_messages(&self, room_id: &RoomId) -> Result<Vec<Message>, StoreError>;

    /// Room のメッセージログを購読（毎回、送信順に並んだ全件のスナップショット）
    async fn subscribe_messages(
        &self,
        room_id: &RoomId,
    ) -> Result<Subscription<Vec<Message>>, StoreError>;
}

/// 通報と問い合わせの記録先
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModerationSink: Send + Sync {
    async fn record_report(
        &self,
        room_id: Option<RoomId>,
        reporter: ParticipantId,
        reason: ReportReason,
    ) -> Result<Report, StoreError>;

    async fn record_contact(&self, message: ContactText) -> Result<ContactMessage, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RoomIdFactory, Timestamp};

    fn participant(id: &str) -> ParticipantId {
        ParticipantId::new(id.to_string()).unwrap()
    }

    #[test]
    fn test_room_query_matches_status_and_creator() {
        // テスト項目: status と作成者の条件で Room を絞り込める
        // given (前提条件):
        let room = Room::new(RoomIdFactory::generate(), participant("alice"), Timestamp::new(0));

        // when (操作) / then (期待する結果):
        assert!(RoomQuery::all().matches(&room));
        assert!(RoomQuery::waiting().matches(&room));
        assert!(!RoomQuery::with_status(RoomStatus::Active).matches(&room));
        assert!(
            !RoomQuery::waiting()
                .excluding_creator(participant("alice"))
                .matches(&room)
        );
        assert!(
            RoomQuery::waiting()
                .excluding_creator(participant("bob"))
                .matches(&room)
        );
    }
}
