//! UseCase: マッチング（Room の確保・作成）と Room のクローズ
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - MatchmakingService::enter() / close_room() メソッド
//! - waiting Room の確保（条件付き更新）と、確保できない場合の Room 作成
//!
//! ### なぜこのテストが必要か
//! - 1 つの waiting Room を 2 人が同時に確保する二重ペアリングを防ぐ
//! - 同時に Room を作成した 2 人が、どちらも waiting のまま取り残されないことを保証
//! - ストア障害を「空き Room なし」と取り違えないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：最初の参加者は Room を作成し、次の参加者はその Room に参加する
//! - 競合：条件付き更新の失敗は次の候補への再試行として扱う
//! - 異常系：ストアが利用できない場合はエラーを返す

use std::sync::Arc;

use crate::domain::{
    ParticipantId, Room, RoomId, RoomQuery, RoomStatus, RoomStore, RoomUpdate, StoreError,
    Subscription, UpdateOutcome,
};

use super::error::MatchmakingError;

/// デフォルトの最大試行回数
pub const DEFAULT_MAX_ATTEMPTS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchmakingConfig {
    /// Claim/settle rounds in `enter`, and update rounds in `close_room`
    pub max_attempts: usize,
}

impl Default for MatchmakingConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Room における役割
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Room を作成して相手を待つ側
    Initiator,
    /// 既存の waiting Room に参加した側
    Joiner,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Initiator => "initiator",
            Role::Joiner => "joiner",
        }
    }
}

/// `enter` の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    pub room_id: RoomId,
    pub role: Role,
    /// 既にペアが成立していれば相手の ID
    pub partner: Option<ParticipantId>,
}

impl MatchOutcome {
    fn initiator(room_id: RoomId, partner: Option<ParticipantId>) -> Self {
        Self {
            room_id,
            role: Role::Initiator,
            partner,
        }
    }

    fn joiner(room: Room) -> Self {
        Self {
            room_id: room.id,
            role: Role::Joiner,
            partner: Some(room.participant1),
        }
    }
}

/// マッチングのユースケース
pub struct MatchmakingService {
    /// Store（データアクセス層の抽象化）
    store: Arc<dyn RoomStore>,
    config: MatchmakingConfig,
}

impl MatchmakingService {
    /// 新しい MatchmakingService を作成
    pub fn new(store: Arc<dyn RoomStore>, config: MatchmakingConfig) -> Self {
        Self { store, config }
    }

    fn max_attempts(&self) -> usize {
        self.config.max_attempts.max(1)
    }

    /// 参加者をマッチングする
    ///
    /// 1. waiting Room を検索し、作成順に条件付き更新で確保を試みる
    /// 2. 確保できなければ自分の waiting Room を作成する
    /// 3. 自分より先に作成された waiting Room が残っていれば、
    ///    自分の Room を取り下げてそちらへの参加を試みる
    ///
    /// 条件付き更新の競合はエラーではなく再試行の契機として扱う。
    ///
    /// # Returns
    ///
    /// * `Ok(MatchOutcome)` - 確保または作成した Room と役割
    /// * `Err(MatchmakingError)` - ストア障害（一時的なもの）
    pub async fn enter(&self, participant: &ParticipantId) -> Result<MatchOutcome, MatchmakingError> {
        let max_attempts = self.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;

            // 1. 既存の waiting Room の確保
            let candidates = self
                .store
                .query_rooms(RoomQuery::waiting().excluding_creator(participant.clone()))
                .await?;
            if let Some(outcome) = self.claim_first(&candidates, participant).await? {
                return Ok(outcome);
            }

            // 2. 自分の waiting Room を作成
            let own = self.store.insert_room(participant.clone()).await?;

            // 3. 同時に作成された、より古い waiting Room の確認
            let older = self
                .store
                .query_rooms(
                    RoomQuery::waiting()
                        .created_before(own.id)
                        .excluding_creator(participant.clone()),
                )
                .await?;
            if older.is_empty() || attempt >= max_attempts {
                tracing::info!("'{}' is waiting in room '{}'", participant, own.id);
                return Ok(MatchOutcome::initiator(own.id, None));
            }

            match self
                .store
                .conditional_update(&own.id, RoomUpdate::Close, RoomStatus::Waiting)
                .await?
            {
                UpdateOutcome::Applied(_) => {
                    tracing::debug!(
                        "'{}' withdrew room '{}' in favour of {} older room(s)",
                        participant,
                        own.id,
                        older.len()
                    );
                }
                UpdateOutcome::Conflict { .. } => {
                    // 取り下げる前に誰かが参加した
                    let partner = self
                        .store
                        .find_room(&own.id)
                        .await?
                        .and_then(|room| room.participant2);
                    tracing::info!(
                        "'{}' was joined in room '{}' while settling",
                        participant,
                        own.id
                    );
                    return Ok(MatchOutcome::initiator(own.id, partner));
                }
            }

            if let Some(outcome) = self.claim_first(&older, participant).await? {
                return Ok(outcome);
            }

            tracing::debug!(
                "'{}' lost every race in attempt {}/{}, retrying",
                participant,
                attempt,
                max_attempts
            );
        }
    }

    /// 候補を順に確保し、最初に成功したものを返す
    async fn claim_first(
        &self,
        candidates: &[Room],
        participant: &ParticipantId,
    ) -> Result<Option<MatchOutcome>, MatchmakingError> {
        for candidate in candidates {
            let result = self
                .store
                .conditional_update(
                    &candidate.id,
                    RoomUpdate::Activate {
                        participant2: participant.clone(),
                    },
                    RoomStatus::Waiting,
                )
                .await;

            match result {
                Ok(UpdateOutcome::Applied(room)) => {
                    tracing::info!(
                        "'{}' joined room '{}' with '{}'",
                        participant,
                        room.id,
                        room.participant1
                    );
                    return Ok(Some(MatchOutcome::joiner(room)));
                }
                Ok(UpdateOutcome::Conflict { current }) => {
                    tracing::debug!(
                        "'{}' lost room '{}' (now {})",
                        participant,
                        candidate.id,
                        current
                    );
                }
                Err(StoreError::RoomNotFound(room_id)) => {
                    tracing::debug!("Candidate room '{}' disappeared", room_id);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(None)
    }

    /// Room を closed にする
    ///
    /// 現在の status を期待値とした条件付き更新を繰り返す。
    /// 既に closed の場合は成功として扱う。
    pub async fn close_room(&self, room_id: &RoomId) -> Result<Room, MatchmakingError> {
        let max_attempts = self.max_attempts();

        for _ in 0..max_attempts {
            let room = self
                .store
                .find_room(room_id)
                .await?
                .ok_or_else(|| MatchmakingError::RoomNotFound(room_id.to_string()))?;
            if room.status == RoomStatus::Closed {
                return Ok(room);
            }

            match self
                .store
                .conditional_update(room_id, RoomUpdate::Close, room.status)
                .await?
            {
                UpdateOutcome::Applied(room) => {
                    tracing::info!("Room '{}' closed", room_id);
                    return Ok(room);
                }
                UpdateOutcome::Conflict { current } => {
                    tracing::debug!("Room '{}' changed to {} while closing", room_id, current);
                }
            }
        }

        Err(MatchmakingError::Contention {
            room_id: room_id.to_string(),
            attempts: max_attempts,
        })
    }

    /// Room の変更を購読
    pub async fn watch_room(&self, room_id: &RoomId) -> Result<Subscription<Room>, MatchmakingError> {
        Ok(self.store.subscribe_room(room_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{RoomIdFactory, Timestamp, repository::MockRoomStore},
        infrastructure::repository::InMemoryStore,
    };

    fn participant(id: &str) -> ParticipantId {
        ParticipantId::new(id.to_string()).unwrap()
    }

    fn create_test_service() -> (MatchmakingService, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        let service = MatchmakingService::new(store.clone(), MatchmakingConfig::default());
        (service, store)
    }

    fn waiting_room(creator: &str) -> Room {
        Room::new(RoomIdFactory::generate(), participant(creator), Timestamp::new(0))
    }

    fn activated(mut room: Room, joiner: &str) -> Room {
        room.activate(participant(joiner), Timestamp::new(1)).unwrap();
        room
    }

    #[tokio::test]
    async fn test_first_participant_creates_waiting_room() {
        // テスト項目: waiting Room がなければ Room を作成して initiator になる
        // given (前提条件):
        let (service, store) = create_test_service();

        // when (操作):
        let outcome = service.enter(&participant("alice")).await.unwrap();

        // then (期待する結果):
        assert_eq!(outcome.role, Role::Initiator);
        assert_eq!(outcome.partner, None);
        let room = store.find_room(&outcome.room_id).await.unwrap().unwrap();
        assert_eq!(room.status, RoomStatus::Waiting);
        assert_eq!(room.participant1, participant("alice"));
    }

    #[tokio::test]
    async fn test_second_participant_joins_that_exact_room() {
        // テスト項目: 2 人目は 1 人目の Room に参加し、Room が active になる
        // given (前提条件):
        let (service, store) = create_test_service();
        let alice = service.enter(&participant("alice")).await.unwrap();

        // when (操作):
        let bob = service.enter(&participant("bob")).await.unwrap();

        // then (期待する結果):
        assert_eq!(bob.role, Role::Joiner);
        assert_eq!(bob.room_id, alice.room_id);
        assert_eq!(bob.partner, Some(participant("alice")));

        let rooms = store.query_rooms(RoomQuery::all()).await.unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].status, RoomStatus::Active);
        assert_eq!(rooms[0].participant1, participant("alice"));
        assert_eq!(rooms[0].participant2, Some(participant("bob")));
    }

    #[tokio::test]
    async fn test_third_participant_waits_in_new_room() {
        // テスト項目: ペア成立後の 3 人目は新しい Room で待つ
        // given (前提条件):
        let (service, store) = create_test_service();
        let alice = service.enter(&participant("alice")).await.unwrap();
        service.enter(&participant("bob")).await.unwrap();

        // when (操作):
        let carol = service.enter(&participant("carol")).await.unwrap();

        // then (期待する結果):
        assert_eq!(carol.role, Role::Initiator);
        assert_ne!(carol.room_id, alice.room_id);
        let waiting = store.query_rooms(RoomQuery::waiting()).await.unwrap();
        assert_eq!(waiting.len(), 1);
        assert_eq!(waiting[0].participant1, participant("carol"));
    }

    #[tokio::test]
    async fn test_conflict_moves_on_to_next_candidate() {
        // テスト項目: 条件付き更新が競合したら次の候補を試す
        // given (前提条件):
        let lost = waiting_room("alice");
        let won = waiting_room("carol");
        let lost_id = lost.id;
        let won_id = won.id;
        let won_active = activated(won.clone(), "bob");

        let mut store = MockRoomStore::new();
        let candidates = vec![lost, won];
        store
            .expect_query_rooms()
            .times(1)
            .returning(move |_| Ok(candidates.clone()));
        store
            .expect_conditional_update()
            .withf(move |id, _, expected| *id == lost_id && *expected == RoomStatus::Waiting)
            .times(1)
            .returning(|_, _, _| {
                Ok(UpdateOutcome::Conflict {
                    current: RoomStatus::Active,
                })
            });
        store
            .expect_conditional_update()
            .withf(move |id, _, _| *id == won_id)
            .times(1)
            .returning(move |_, _, _| Ok(UpdateOutcome::Applied(won_active.clone())));
        store.expect_insert_room().times(0);

        let service = MatchmakingService::new(Arc::new(store), MatchmakingConfig::default());

        // when (操作):
        let outcome = service.enter(&participant("bob")).await.unwrap();

        // then (期待する結果):
        assert_eq!(outcome.room_id, won_id);
        assert_eq!(outcome.role, Role::Joiner);
        assert_eq!(outcome.partner, Some(participant("carol")));
    }

    #[tokio::test]
    async fn test_store_unavailable_is_not_treated_as_empty() {
        // テスト項目: ストア障害は「空き Room なし」ではなく一時的なエラーとして返る
        // given (前提条件):
        let mut store = MockRoomStore::new();
        store
            .expect_query_rooms()
            .returning(|_| Err(StoreError::Unavailable("connection reset".to_string())));
        store.expect_insert_room().times(0);
        let service = MatchmakingService::new(Arc::new(store), MatchmakingConfig::default());

        // when (操作):
        let result = service.enter(&participant("alice")).await;

        // then (期待する結果):
        let error = result.unwrap_err();
        assert_eq!(
            error,
            MatchmakingError::Store(StoreError::Unavailable("connection reset".to_string()))
        );
        assert!(error.is_transient());
    }

    #[tokio::test]
    async fn test_simultaneous_creator_joins_older_room() {
        // テスト項目: 同時に Room を作成した場合、新しい側が自分の Room を取り下げて古い Room に参加する
        // given (前提条件):
        let older = waiting_room("alice");
        let older_id = older.id;
        let older_active = activated(older.clone(), "bob");
        let own = waiting_room("bob");
        let own_id = own.id;
        let mut own_closed = own.clone();
        own_closed.close(Timestamp::new(1)).unwrap();

        let mut store = MockRoomStore::new();
        store
            .expect_query_rooms()
            .withf(|query| query.created_before.is_none())
            .times(1)
            .returning(|_| Ok(vec![]));
        store
            .expect_insert_room()
            .times(1)
            .returning(move |_| Ok(own.clone()));
        store
            .expect_query_rooms()
            .withf(move |query| query.created_before == Some(own_id))
            .times(1)
            .returning(move |_| Ok(vec![older.clone()]));
        store
            .expect_conditional_update()
            .withf(move |id, update, expected| {
                *id == own_id && *update == RoomUpdate::Close && *expected == RoomStatus::Waiting
            })
            .times(1)
            .returning(move |_, _, _| Ok(UpdateOutcome::Applied(own_closed.clone())));
        store
            .expect_conditional_update()
            .withf(move |id, _, _| *id == older_id)
            .times(1)
            .returning(move |_, _, _| Ok(UpdateOutcome::Applied(older_active.clone())));
        let service = MatchmakingService::new(Arc::new(store), MatchmakingConfig::default());

        // when (操作):
        let outcome = service.enter(&participant("bob")).await.unwrap();

        // then (期待する結果):
        assert_eq!(outcome.room_id, older_id);
        assert_eq!(outcome.role, Role::Joiner);
        assert_eq!(outcome.partner, Some(participant("alice")));
    }

    #[tokio::test]
    async fn test_joined_while_settling_stays_initiator() {
        // テスト項目: 取り下げ前に自分の Room へ誰かが参加していれば initiator として返る
        // given (前提条件):
        let older = waiting_room("alice");
        let own = waiting_room("bob");
        let own_id = own.id;
        let own_active = activated(own.clone(), "carol");

        let mut store = MockRoomStore::new();
        store
            .expect_query_rooms()
            .withf(|query| query.created_before.is_none())
            .times(1)
            .returning(|_| Ok(vec![]));
        store
            .expect_insert_room()
            .times(1)
            .returning(move |_| Ok(own.clone()));
        store
            .expect_query_rooms()
            .withf(|query| query.created_before.is_some())
            .times(1)
            .returning(move |_| Ok(vec![older.clone()]));
        store
            .expect_conditional_update()
            .times(1)
            .returning(|_, _, _| {
                Ok(UpdateOutcome::Conflict {
                    current: RoomStatus::Active,
                })
            });
        store
            .expect_find_room()
            .times(1)
            .returning(move |_| Ok(Some(own_active.clone())));
        let service = MatchmakingService::new(Arc::new(store), MatchmakingConfig::default());

        // when (操作):
        let outcome = service.enter(&participant("bob")).await.unwrap();

        // then (期待する結果):
        assert_eq!(outcome.room_id, own_id);
        assert_eq!(outcome.role, Role::Initiator);
        assert_eq!(outcome.partner, Some(participant("carol")));
    }

    #[tokio::test]
    async fn test_exhausted_attempts_keep_own_room() {
        // テスト項目: 試行回数を使い切った場合は自分の Room で待つ
        // given (前提条件):
        let own = waiting_room("bob");
        let own_id = own.id;
        let older = waiting_room("alice");

        let mut store = MockRoomStore::new();
        store
            .expect_query_rooms()
            .withf(|query| query.created_before.is_none())
            .returning(|_| Ok(vec![]));
        store
            .expect_insert_room()
            .times(1)
            .returning(move |_| Ok(own.clone()));
        store
            .expect_query_rooms()
            .withf(|query| query.created_before.is_some())
            .returning(move |_| Ok(vec![older.clone()]));
        store.expect_conditional_update().times(0);
        let service =
            MatchmakingService::new(Arc::new(store), MatchmakingConfig { max_attempts: 1 });

        // when (操作):
        let outcome = service.enter(&participant("bob")).await.unwrap();

        // then (期待する結果):
        assert_eq!(outcome.room_id, own_id);
        assert_eq!(outcome.role, Role::Initiator);
    }

    #[tokio::test]
    async fn test_close_room_from_waiting_and_active() {
        // テスト項目: waiting / active のどちらの Room も close できる
        // given (前提条件):
        let (service, store) = create_test_service();
        let waiting = service.enter(&participant("alice")).await.unwrap();
        let other = store.insert_room(participant("carol")).await.unwrap();
        service.close_room(&waiting.room_id).await.unwrap();
        let joined = service.enter(&participant("dave")).await.unwrap();
        assert_eq!(joined.room_id, other.id);

        // when (操作):
        let closed = service.close_room(&other.id).await.unwrap();

        // then (期待する結果):
        assert_eq!(closed.status, RoomStatus::Closed);
        assert_eq!(closed.participant2, Some(participant("dave")));
        let stored = store.find_room(&waiting.room_id).await.unwrap().unwrap();
        assert_eq!(stored.status, RoomStatus::Closed);
    }

    #[tokio::test]
    async fn test_close_room_is_idempotent() {
        // テスト項目: 既に closed の Room を close しても成功する
        // given (前提条件):
        let (service, _store) = create_test_service();
        let outcome = service.enter(&participant("alice")).await.unwrap();
        let first = service.close_room(&outcome.room_id).await.unwrap();

        // when (操作):
        let second = service.close_room(&outcome.room_id).await.unwrap();

        // then (期待する結果):
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_close_unknown_room_is_error() {
        // テスト項目: 存在しない Room の close はエラー
        // given (前提条件):
        let (service, _store) = create_test_service();
        let unknown = RoomIdFactory::generate();

        // when (操作):
        let result = service.close_room(&unknown).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(MatchmakingError::RoomNotFound(unknown.to_string()))
        );
    }

    #[tokio::test]
    async fn test_closed_room_is_not_joined() {
        // テスト項目: closed の Room には参加しない
        // given (前提条件):
        let (service, _store) = create_test_service();
        let alice = service.enter(&participant("alice")).await.unwrap();
        service.close_room(&alice.room_id).await.unwrap();

        // when (操作):
        let bob = service.enter(&participant("bob")).await.unwrap();

        // then (期待する結果):
        assert_eq!(bob.role, Role::Initiator);
        assert_ne!(bob.room_id, alice.room_id);
    }
}
