//! UseCase layer
//!
//! ドメイン層の Store trait にのみ依存するアプリケーションロジック。

pub mod error;
pub mod get_room_detail;
pub mod get_rooms;
pub mod matchmaking;
pub mod message_relay;
pub mod moderation;

pub use error::{GetRoomDetailError, MatchmakingError, ModerationError, RelayError};
pub use get_room_detail::{GetRoomDetailUseCase, RoomDetail};
pub use get_rooms::GetRoomsUseCase;
pub use matchmaking::{MatchOutcome, MatchmakingConfig, MatchmakingService, Role};
pub use message_relay::MessageRelay;
pub use moderation::ModerationService;
