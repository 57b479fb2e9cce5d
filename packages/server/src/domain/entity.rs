//! Domain entities.

use super::{
    error::RoomTransitionError,
    value_object::{
        ContactText, MessageId, MessageText, ParticipantId, ReportReason, RoomId, RoomStatus,
        Timestamp,
    },
};

// ========================================
// Room
// ========================================

/// 2 人の参加者を結びつけるセッションのレコード
///
/// 不変条件:
/// - `status == Active` ⇔ participant1 と participant2 の両方が設定されている
/// - `status == Waiting` ⇔ participant2 が未設定
/// - `Closed` になった Room はどのフィールドも変更されない
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    pub participant1: ParticipantId,
    pub participant2: Option<ParticipantId>,
    pub status: RoomStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Field changes applied to a room by a conditional update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomUpdate {
    /// `status = active`, `participant2 = participant`
    Activate { participant2: ParticipantId },
    /// `status = closed`
    Close,
}

impl Room {
    /// 新しい waiting 状態の Room を作成
    pub fn new(id: RoomId, participant1: ParticipantId, now: Timestamp) -> Self {
        Self {
            id,
            participant1,
            participant2: None,
            status: RoomStatus::Waiting,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status != RoomStatus::Closed
    }

    pub fn has_participant(&self, participant: &ParticipantId) -> bool {
        &self.participant1 == participant || self.participant2.as_ref() == Some(participant)
    }

    /// The other participant of the room, as seen by `participant`
    pub fn partner_of(&self, participant: &ParticipantId) -> Option<&ParticipantId> {
        if &self.participant1 == participant {
            self.participant2.as_ref()
        } else if self.participant2.as_ref() == Some(participant) {
            Some(&self.participant1)
        } else {
            None
        }
    }

    /// 2 人目の参加者を設定し、active に遷移する
    pub fn activate(
        &mut self,
        participant2: ParticipantId,
        now: Timestamp,
    ) -> Result<(), RoomTransitionError> {
        self.ensure_transition(RoomStatus::Active)?;
        if self.participant2.is_some() {
            return Err(RoomTransitionError::ParticipantAlreadySet);
        }
        if participant2 == self.participant1 {
            return Err(RoomTransitionError::SelfPairing(participant2.into_string()));
        }

        self.participant2 = Some(participant2);
        self.status = RoomStatus::Active;
        self.updated_at = now;
        Ok(())
    }

    /// closed に遷移する（waiting / active のどちらからでも可）
    pub fn close(&mut self, now: Timestamp) -> Result<(), RoomTransitionError> {
        self.ensure_transition(RoomStatus::Closed)?;
        self.status = RoomStatus::Closed;
        self.updated_at = now;
        Ok(())
    }

    pub fn apply(&mut self, update: RoomUpdate, now: Timestamp) -> Result<(), RoomTransitionError> {
        match update {
            RoomUpdate::Activate { participant2 } => self.activate(participant2, now),
            RoomUpdate::Close => self.close(now),
        }
    }

    fn ensure_transition(&self, next: RoomStatus) -> Result<(), RoomTransitionError> {
        if self.status.can_transition_to(next) {
            Ok(())
        } else {
            Err(RoomTransitionError::InvalidTransition {
                from: self.status,
                to: next,
            })
        }
    }
}

// ========================================
// Message
// ========================================

/// Room 内のチャットメッセージ（作成後は変更・削除されない）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub room_id: RoomId,
    pub sender: ParticipantId,
    pub text: MessageText,
    /// ストアが割り当てる送信時刻（ソートキー）
    pub sent_at: Timestamp,
}

// ========================================
// Report / ContactMessage
// ========================================

/// 通報（追記のみ）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// 通報時に参加していた Room（参加していなければ None）
    pub room_id: Option<RoomId>,
    pub reporter: ParticipantId,
    pub reason: ReportReason,
    pub created_at: Timestamp,
}

/// 問い合わせ（追記のみ、Room とは無関係）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub message: ContactText,
    pub created_at: Timestamp,
}
