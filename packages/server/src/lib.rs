//! Duet: random one-on-one chat server.
//!
//! - `domain`: Room / Message のモデルとストアのインターフェース
//! - `infrastructure`: インメモリのストア実装と DTO
//! - `usecase`: マッチング、メッセージ中継、通報・問い合わせ
//! - `session`: クライアント 1 人分のセッション状態機械
//! - `ui`: Axum による WebSocket / HTTP サーバー

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod session;
pub mod ui;
pub mod usecase;
