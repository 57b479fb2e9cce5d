//! Session layer
//!
//! 接続中のクライアント 1 人につき 1 つの `SessionController` を持ち、
//! ユーザー操作とストアからの変更通知をもとにセッションの状態を遷移させます。

pub mod controller;
pub mod error;
pub mod state;

pub use controller::{SessionController, SessionEvent};
pub use error::SessionError;
pub use state::{CloseReason, SessionStatus};
