//! UseCase: Room 内のメッセージ送信と購読
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - MessageRelay::send() / subscribe() / history() メソッド
//!
//! ### なぜこのテストが必要か
//! - 空白のみのメッセージが記録されないことを保証
//! - Room の参加者以外、closed の Room への送信が拒否されることを保証
//! - 購読者が送信順に並んだ全件スナップショットを受け取ることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：active な Room での送信と購読
//! - 異常系：参加者以外の送信、closed / 存在しない Room への送信
//! - エッジケース：空白のみ、前後の空白、上限ちょうどの長さ

use std::sync::Arc;

use crate::domain::{
    Message, MessageStore, MessageText, ParticipantId, RoomId, RoomStore, Subscription,
};

use super::error::RelayError;

/// メッセージ中継のユースケース
pub struct MessageRelay {
    rooms: Arc<dyn RoomStore>,
    messages: Arc<dyn MessageStore>,
}

impl MessageRelay {
    /// 新しい MessageRelay を作成
    pub fn new(rooms: Arc<dyn RoomStore>, messages: Arc<dyn MessageStore>) -> Self {
        Self { rooms, messages }
    }

    /// メッセージを送信する
    ///
    /// # Arguments
    ///
    /// * `room_id` - 送信先の Room
    /// * `sender` - 送信者（Room の参加者であること）
    /// * `raw_text` - 入力されたテキスト（前後の空白は取り除かれる）
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Message))` - 記録されたメッセージ
    /// * `Ok(None)` - 空白のみのため何もしなかった
    /// * `Err(RelayError)` - 検証エラー、または Room が送信を受け付けない
    pub async fn send(
        &self,
        room_id: &RoomId,
        sender: &ParticipantId,
        raw_text: &str,
    ) -> Result<Option<Message>, RelayError> {
        // 1. テキストの検証（空白のみなら何もしない）
        let Some(text) = MessageText::parse(raw_text)? else {
            return Ok(None);
        };

        // 2. 送信者が Room の参加者であることを確認
        let room = self
            .rooms
            .find_room(room_id)
            .await?
            .ok_or_else(|| RelayError::RoomNotFound(room_id.to_string()))?;
        if !room.has_participant(sender) {
            return Err(RelayError::NotAParticipant {
                room_id: room_id.to_string(),
                participant: sender.to_string(),
            });
        }
        if !room.is_open() {
            return Err(RelayError::RoomClosed(room_id.to_string()));
        }

        // 3. 追記（closed への遷移と競合した場合はストアが拒否する）
        let message = self
            .messages
            .append_message(room_id, sender.clone(), text)
            .await?;
        tracing::debug!("'{}' sent a message to room '{}'", sender, room_id);

        Ok(Some(message))
    }

    /// Room のメッセージログを購読
    pub async fn subscribe(&self, room_id: &RoomId) -> Result<Subscription<Vec<Message>>, RelayError> {
        Ok(self.messages.subscribe_messages(room_id).await?)
    }

    /// Room のメッセージを送信順に取得
    pub async fn history(&self, room_id: &RoomId) -> Result<Vec<Message>, RelayError> {
        Ok(self.messages.list_messages(room_id).await?)
    }
}
