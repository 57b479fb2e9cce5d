//! HTTP API DTOs.

use serde::{Deserialize, Serialize};

/// Room 一覧の要素
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub id: String,
    pub status: String,
    pub participants: Vec<String>,
    /// RFC 3339 (UTC)
    pub created_at: String,
}

/// Room 詳細
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub id: String,
    pub status: String,
    pub participant1: String,
    pub participant2: Option<String>,
    pub message_count: usize,
    pub created_at: String,
    pub updated_at: String,
}

/// `GET /api/rooms` のクエリパラメータ
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoomsQuery {
    pub status: Option<String>,
}

/// `POST /api/contact` のリクエスト
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContactRequest {
    pub message: String,
}

/// `POST /api/reports` のリクエスト
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportRequest {
    pub reporter: String,
    pub room_id: Option<String>,
    pub reason: String,
}

/// 受け付けた旨のレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptedResponse {
    pub status: String,
    pub message: String,
}

impl AcceptedResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "accepted".to_string(),
            message: message.into(),
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
