//! InMemory Store 実装
//!
//! ドメイン層が定義する `RoomStore` / `MessageStore` / `ModerationSink` の
//! 具体的な実装。全テーブルを 1 つの Mutex で保護し、
//! 条件付き更新（compare-and-swap）を臨界区間の中で判定・適用します。
//!
//! 変更通知は各レコードと一緒に保持している `watch` チャンネルで行います。
//! 購読者がいなくても送信側はレコードと同じ寿命を持つため、
//! 後から購読しても常に最新の完全なスナップショットが得られます。

mod message;
mod moderation;
mod room;

use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, watch};

use duet_shared::time::{Clock, SystemClock};

use crate::domain::{ContactMessage, Message, Report, Room, RoomId, Timestamp};

/// インメモリのドキュメントストア
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    clock: Arc<dyn Clock>,
}

#[derive(Default)]
struct Tables {
    rooms: HashMap<RoomId, RoomRecord>,
    /// 次に割り当てる挿入順序（デフォルトの並び順に使う）
    next_sequence: u64,
    messages: HashMap<RoomId, MessageLog>,
    reports: Vec<Report>,
    contacts: Vec<ContactMessage>,
}

struct RoomRecord {
    sequence: u64,
    room: Room,
    watcher: watch::Sender<Room>,
}

/// Room のメッセージログ（ログ本体は watch チャンネルの値として 1 つだけ保持する）
struct MessageLog {
    watcher: watch::Sender<Vec<Message>>,
}

impl MessageLog {
    fn new() -> Self {
        let (watcher, _) = watch::channel(Vec::new());
        Self { watcher }
    }

    fn last_sent_at(&self) -> Option<Timestamp> {
        self.watcher.borrow().last().map(|last| last.sent_at)
    }

    /// 追記して購読者に通知し、追記後の件数を返す
    fn push(&self, message: Message) -> usize {
        let mut len = 0;
        self.watcher.send_modify(|messages| {
            messages.push(message);
            len = messages.len();
        });
        len
    }

    fn snapshot(&self) -> Vec<Message> {
        self.watcher.borrow().clone()
    }
}

impl InMemoryStore {
    /// システム時計を使う InMemoryStore を作成
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// 任意の Clock を使う InMemoryStore を作成（テスト用）
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            clock,
        }
    }

    fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }

    /// 記録済みの通報（記録順）
    pub async fn reports(&self) -> Vec<Report> {
        self.tables.lock().await.reports.clone()
    }

    /// 記録済みの問い合わせ（記録順）
    pub async fn contacts(&self) -> Vec<ContactMessage> {
        self.tables.lock().await.contacts.clone()
    }

    /// 保持している Room の数
    pub async fn room_count(&self) -> usize {
        self.tables.lock().await.rooms.len()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}
