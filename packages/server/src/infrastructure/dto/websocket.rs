//! WebSocket DTOs.
//!
//! Every frame is a JSON object tagged by `type`.

use serde::{Deserialize, Serialize};

/// クライアントから送られるコマンド
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientCommand {
    /// マッチングを開始
    Enter,
    /// メッセージを送信
    Send { text: String },
    /// 退出
    Leave,
    /// 通報して退出
    Report { reason: String },
    /// チャット終了を確認して未接続に戻る
    Acknowledge,
}

/// サーバーから送られるイベント
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// 接続直後に割り当てられた参加者 ID
    Identity { participant_id: String },
    /// セッションの状態
    Status {
        status: String,
        label: String,
        room_id: Option<String>,
        partner: Option<String>,
        /// closed になった理由（closed のときのみ）
        reason: Option<String>,
    },
    /// Room のメッセージ一覧（送信順の全件。表示を置き換える）
    Messages {
        room_id: String,
        messages: Vec<MessageDto>,
    },
    /// 通報を受け付けた
    ReportRecorded { room_id: Option<String> },
    /// 操作の失敗（セッションの状態は変わらない）
    Error { kind: String, message: String },
}

/// メッセージ 1 件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDto {
    pub id: String,
    pub sender: String,
    pub text: String,
    /// Unix 時間（ミリ秒）
    pub sent_at: i64,
    /// 受信者自身が送ったメッセージか
    pub mine: bool,
}
