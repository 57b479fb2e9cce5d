//! Domain layer
//!
//! ランダムチャットのドメインモデル（Room, Message, Report）と、
//! ドメイン層が必要とするストアのインターフェースを定義します。
//! 具体的なストア実装は Infrastructure 層が提供します（依存性の逆転）。

pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod subscription;
pub mod value_object;

pub use entity::{ContactMessage, Message, Report, Room, RoomUpdate};
pub use error::{RoomTransitionError, StoreError, ValueObjectError};
pub use factory::{IdentityGenerator, MessageIdFactory, RandomIdentityGenerator, RoomIdFactory};
pub use repository::{MessageStore, ModerationSink, RoomQuery, RoomStore, UpdateOutcome};
pub use subscription::Subscription;
pub use value_object::{
    ContactText, MessageId, MessageText, ParticipantId, ReportReason, RoomId, RoomStatus,
    Timestamp,
};
