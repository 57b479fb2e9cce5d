//! Per-client session state machine.
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SessionController の状態遷移（Idle → Waiting → Connected → Closed → Idle）
//! - ストアの変更通知から生成される SessionEvent
//!
//! ### なぜこのテストが必要か
//! - waiting 中の参加者が相手の参加を検知して connected になることを保証
//! - どちらの参加者も、相手が Room を閉じたことを検知できることを保証
//! - 失敗した操作が状態を変更しないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：2 人のペアリング、メッセージのやり取り、退出、通報
//! - 異常系：状態に合わない操作、ストア障害
//! - エッジケース：待機中の退出、空白のみのメッセージ

use std::sync::Arc;

use crate::{
    domain::{Message, ParticipantId, Room, RoomId, RoomStatus, Subscription},
    usecase::{MatchmakingService, MessageRelay, ModerationService},
};

use super::{
    error::SessionError,
    state::{CloseReason, SessionState, SessionStatus},
};

/// ストアの変更通知から生成されるイベント
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// 待機中の Room に相手が参加した
    Paired {
        room_id: RoomId,
        partner: ParticipantId,
    },
    /// Room のメッセージ一覧（送信順の全件。表示を置き換える）
    Messages {
        room_id: RoomId,
        messages: Vec<Message>,
    },
    /// 相手の退出などで Room が閉じられた
    Closed {
        room_id: RoomId,
        reason: CloseReason,
    },
}

/// 購読から受け取った通知
enum Notification {
    Room(RoomId, Option<Room>),
    Messages(RoomId, Option<Vec<Message>>),
}

/// クライアント 1 人分のセッション
///
/// 操作は `&mut self` で直列化されるため、1 つのセッションで
/// ストア操作が同時に走ることはない。
pub struct SessionController {
    participant: ParticipantId,
    matchmaking: Arc<MatchmakingService>,
    relay: Arc<MessageRelay>,
    moderation: Arc<ModerationService>,
    state: SessionState,
}

impl SessionController {
    pub fn new(
        participant: ParticipantId,
        matchmaking: Arc<MatchmakingService>,
        relay: Arc<MessageRelay>,
        moderation: Arc<ModerationService>,
    ) -> Self {
        Self {
            participant,
            matchmaking,
            relay,
            moderation,
            state: SessionState::Idle,
        }
    }

    pub fn participant(&self) -> &ParticipantId {
        &self.participant
    }

    pub fn status(&self) -> SessionStatus {
        self.state.status()
    }

    pub fn room_id(&self) -> Option<RoomId> {
        self.state.room_id()
    }

    pub fn partner(&self) -> Option<&ParticipantId> {
        self.state.partner()
    }

    /// closed になった理由（Closed のときのみ）
    pub fn close_reason(&self) -> Option<CloseReason> {
        self.state.close_reason()
    }

    /// 購読中（waiting / connected）かどうか
    pub fn is_live(&self) -> bool {
        self.state.open_room().is_some()
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidState {
            action,
            status: self.status(),
        }
    }

    /// マッチングを開始する（Idle のときのみ）
    ///
    /// 相手が既に決まっていれば Connected、そうでなければ Waiting に遷移する。
    pub async fn enter(&mut self) -> Result<SessionStatus, SessionError> {
        if !matches!(self.state, SessionState::Idle) {
            return Err(self.invalid("enter"));
        }

        let outcome = self.matchmaking.enter(&self.participant).await?;
        let room = match self.matchmaking.watch_room(&outcome.room_id).await {
            Ok(room) => room,
            Err(e) => {
                self.abandon(&outcome.room_id).await;
                return Err(e.into());
            }
        };

        match outcome.partner {
            Some(partner) => self.connect(outcome.room_id, partner, room).await?,
            None => {
                self.state = SessionState::Waiting {
                    room_id: outcome.room_id,
                    room,
                };
            }
        }

        tracing::info!(
            "'{}' entered room '{}' as {} ({})",
            self.participant,
            outcome.room_id,
            outcome.role.as_str(),
            self.status()
        );
        Ok(self.status())
    }

    /// メッセージの購読を開いて Connected に遷移する
    async fn connect(
        &mut self,
        room_id: RoomId,
        partner: ParticipantId,
        room: Subscription<Room>,
    ) -> Result<(), SessionError> {
        let messages = match self.relay.subscribe(&room_id).await {
            Ok(messages) => messages,
            Err(e) => {
                self.abandon(&room_id).await;
                return Err(e.into());
            }
        };

        self.state = SessionState::Connected {
            room_id,
            partner,
            room,
            messages,
        };
        Ok(())
    }

    /// 状態遷移に失敗した Room を閉じる（best-effort）
    async fn abandon(&self, room_id: &RoomId) {
        if let Err(e) = self.matchmaking.close_room(room_id).await {
            tracing::warn!("Failed to close abandoned room '{}': {}", room_id, e);
        }
    }

    /// メッセージを送信する（Connected のときのみ）
    ///
    /// 空白のみのテキストは何もせず `Ok(None)` を返す。
    pub async fn send(&self, text: &str) -> Result<Option<Message>, SessionError> {
        let SessionState::Connected { room_id, .. } = &self.state else {
            return Err(self.invalid("send"));
        };

        Ok(self.relay.send(room_id, &self.participant, text).await?)
    }

    /// 退出する（Waiting / Connected のときのみ）
    pub async fn leave(&mut self) -> Result<SessionStatus, SessionError> {
        let Some(room_id) = self.state.open_room() else {
            return Err(self.invalid("leave"));
        };

        self.close(room_id, CloseReason::Left).await;
        Ok(self.status())
    }

    /// 通報を記録し、参加中の Room があれば退出する
    ///
    /// # Returns
    ///
    /// * `Ok(Option<RoomId>)` - 通報に紐付けた Room
    pub async fn report(&mut self, reason: &str) -> Result<Option<RoomId>, SessionError> {
        let room_id = self.state.open_room();
        self.moderation
            .report(room_id, &self.participant, reason)
            .await?;

        if let Some(room_id) = room_id {
            self.close(room_id, CloseReason::Reported).await;
        }
        Ok(room_id)
    }

    /// Closed を確認して Idle に戻る
    pub fn acknowledge(&mut self) -> Result<SessionStatus, SessionError> {
        if !matches!(self.state, SessionState::Closed { .. }) {
            return Err(self.invalid("acknowledge"));
        }

        self.state = SessionState::Idle;
        Ok(self.status())
    }

    /// 接続終了時の後始末（参加中の Room があれば閉じる）
    pub async fn shutdown(&mut self) {
        if let Some(room_id) = self.state.open_room() {
            self.close(room_id, CloseReason::Left).await;
        }
        self.state = SessionState::Idle;
    }

    /// 購読を解放して Closed に遷移し、Room を閉じる（best-effort）
    async fn close(&mut self, room_id: RoomId, reason: CloseReason) {
        self.state = SessionState::Closed { room_id, reason };

        match self.matchmaking.close_room(&room_id).await {
            Ok(_) => tracing::info!(
                "'{}' closed room '{}' ({})",
                self.participant,
                room_id,
                reason.as_str()
            ),
            Err(e) => tracing::warn!("Failed to close room '{}': {}", room_id, e),
        }
    }

    /// 次のイベントを待つ
    ///
    /// Waiting / Connected 以外の状態では購読を持たないため `None` を返す。
    /// キャンセルしても通知は失われない。
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        loop {
            let notification = match &mut self.state {
                SessionState::Waiting { room_id, room } => {
                    // 取りこぼした遷移は待たずに処理する
                    let current = room.current();
                    if current.status == RoomStatus::Waiting {
                        Notification::Room(*room_id, room.next().await)
                    } else {
                        Notification::Room(*room_id, Some(current))
                    }
                }
                SessionState::Connected {
                    room_id,
                    room,
                    messages,
                    ..
                } => {
                    let room_id = *room_id;
                    tokio::select! {
                        snapshot = room.next() => Notification::Room(room_id, snapshot),
                        snapshot = messages.next() => Notification::Messages(room_id, snapshot),
                    }
                }
                SessionState::Idle | SessionState::Closed { .. } => return None,
            };

            if let Some(event) = self.handle(notification).await {
                return Some(event);
            }
        }
    }

    async fn handle(&mut self, notification: Notification) -> Option<SessionEvent> {
        match notification {
            Notification::Room(room_id, None) | Notification::Messages(room_id, None) => {
                tracing::warn!("Subscription to room '{}' ended", room_id);
                Some(self.lose(room_id))
            }
            Notification::Messages(room_id, Some(messages)) => {
                Some(SessionEvent::Messages { room_id, messages })
            }
            Notification::Room(room_id, Some(room)) => match room.status {
                RoomStatus::Waiting => None,
                RoomStatus::Active => self.on_room_active(room_id, &room).await,
                RoomStatus::Closed => {
                    // 待機中でも participant2 がいれば、相手が参加してすぐ退出したということ
                    let reason = match self.state {
                        SessionState::Connected { .. } => CloseReason::PartnerLeft,
                        SessionState::Waiting { .. } if room.participant2.is_some() => {
                            CloseReason::PartnerLeft
                        }
                        _ => CloseReason::Lost,
                    };
                    tracing::info!("'{}' observed room '{}' closed", self.participant, room_id);
                    self.state = SessionState::Closed { room_id, reason };
                    Some(SessionEvent::Closed { room_id, reason })
                }
            },
        }
    }

    async fn on_room_active(&mut self, room_id: RoomId, room: &Room) -> Option<SessionEvent> {
        if !matches!(self.state, SessionState::Waiting { .. }) {
            return None;
        }
        let partner = room.partner_of(&self.participant).cloned()?;

        let messages = match self.relay.subscribe(&room_id).await {
            Ok(messages) => messages,
            Err(e) => {
                tracing::warn!("Failed to open messages for room '{}': {}", room_id, e);
                self.abandon(&room_id).await;
                return Some(self.lose(room_id));
            }
        };

        // 購読を移し替える間に await を挟まない
        let watcher = match std::mem::replace(&mut self.state, SessionState::Idle) {
            SessionState::Waiting { room, .. } => room,
            other => {
                self.state = other;
                return None;
            }
        };
        self.state = SessionState::Connected {
            room_id,
            partner: partner.clone(),
            room: watcher,
            messages,
        };

        tracing::info!("'{}' paired with '{}' in room '{}'", self.participant, partner, room_id);
        Some(SessionEvent::Paired { room_id, partner })
    }

    fn lose(&mut self, room_id: RoomId) -> SessionEvent {
        self.state = SessionState::Closed {
            room_id,
            reason: CloseReason::Lost,
        };
        SessionEvent::Closed {
            room_id,
            reason: CloseReason::Lost,
        }
    }
}
