//! Infrastructure layer
//!
//! - `repository`: ドメイン層の Store trait の実装
//! - `dto`: WebSocket / HTTP の Data Transfer Objects

pub mod dto;
pub mod repository;
