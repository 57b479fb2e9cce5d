//! Identifier factories.

use rand::{Rng, distr::Alphanumeric};
use uuid::Uuid;

use super::value_object::{MessageId, PARTICIPANT_ID_MAX_LEN, ParticipantId, RoomId};

/// 生成される ParticipantId の接頭辞
pub const PARTICIPANT_ID_PREFIX: &str = "u_";

/// ランダム部分の最小文字数
pub const MIN_IDENTITY_LEN: usize = 8;

/// ランダム部分の最大文字数（接頭辞込みで ParticipantId の上限に収まる長さ）
pub const MAX_IDENTITY_LEN: usize = PARTICIPANT_ID_MAX_LEN - PARTICIPANT_ID_PREFIX.len();

/// Produces anonymous participant identities
pub trait IdentityGenerator: Send + Sync {
    fn new_identity(&self) -> ParticipantId;
}

/// `u_` + uniformly random alphanumerics (62 symbols)
///
/// Collisions are possible in principle and are not detected.
#[derive(Debug, Clone, Copy)]
pub struct RandomIdentityGenerator {
    length: usize,
}

impl RandomIdentityGenerator {
    /// `length` is clamped to [`MIN_IDENTITY_LEN`]..=[`MAX_IDENTITY_LEN`]
    pub fn new(length: usize) -> Self {
        Self {
            length: length.clamp(MIN_IDENTITY_LEN, MAX_IDENTITY_LEN),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for RandomIdentityGenerator {
    fn default() -> Self {
        Self::new(MIN_IDENTITY_LEN)
    }
}

impl IdentityGenerator for RandomIdentityGenerator {
    fn new_identity(&self) -> ParticipantId {
        let suffix: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(self.length)
            .map(char::from)
            .collect();
        ParticipantId::generated(format!("{PARTICIPANT_ID_PREFIX}{suffix}"))
    }
}

/// RoomId の生成
pub struct RoomIdFactory;

impl RoomIdFactory {
    pub fn generate() -> RoomId {
        RoomId::new(Uuid::new_v4())
    }
}

/// MessageId の生成
pub struct MessageIdFactory;

impl MessageIdFactory {
    pub fn generate() -> MessageId {
        MessageId::new(Uuid::new_v4())
    }
}
