//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    domain::{ParticipantId, RoomId, RoomStatus},
    infrastructure::dto::http::{
        AcceptedResponse, ContactRequest, ErrorResponse, ReportRequest, RoomDetailDto,
        RoomSummaryDto, RoomsQuery,
    },
    ui::state::AppState,
    usecase::{GetRoomDetailError, ModerationError},
};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse::new(message)))
}

fn unavailable(error: impl std::fmt::Display) -> ApiError {
    tracing::error!("Store unavailable: {}", error);
    api_error(
        StatusCode::SERVICE_UNAVAILABLE,
        "Something went wrong. Please try again.",
    )
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms (`?status=waiting|active|closed`)
pub async fn get_rooms(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RoomsQuery>,
) -> Result<Json<Vec<RoomSummaryDto>>, ApiError> {
    let status = query
        .status
        .map(|raw| raw.parse::<RoomStatus>())
        .transpose()
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;

    let rooms = state
        .get_rooms_usecase
        .execute(status)
        .await
        .map_err(unavailable)?;

    // Domain Model から DTO への変換
    Ok(Json(rooms.into_iter().map(RoomSummaryDto::from).collect()))
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, ApiError> {
    match state.get_room_detail_usecase.execute(room_id).await {
        Ok(detail) => Ok(Json(detail.into())),
        Err(GetRoomDetailError::InvalidRoomId(e)) => {
            Err(api_error(StatusCode::BAD_REQUEST, e.to_string()))
        }
        Err(GetRoomDetailError::RoomNotFound) => {
            Err(api_error(StatusCode::NOT_FOUND, "room not found"))
        }
        Err(GetRoomDetailError::Store(e)) => Err(unavailable(e)),
    }
}

/// Record a contact-form message
pub async fn post_contact(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ContactRequest>,
) -> Result<(StatusCode, Json<AcceptedResponse>), ApiError> {
    match state.moderation.contact(&request.message).await {
        Ok(()) => Ok((
            StatusCode::ACCEPTED,
            Json(AcceptedResponse::new("Thanks, message sent.")),
        )),
        Err(ModerationError::Validation(_)) => Err(api_error(
            StatusCode::BAD_REQUEST,
            "Please enter a message.",
        )),
        Err(ModerationError::Store(e)) => {
            tracing::error!("Failed to record contact message: {}", e);
            Err(api_error(
                StatusCode::SERVICE_UNAVAILABLE,
                "Error sending message.",
            ))
        }
    }
}

/// Record a report outside of a WebSocket session
pub async fn post_report(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ReportRequest>,
) -> Result<(StatusCode, Json<AcceptedResponse>), ApiError> {
    let reporter = ParticipantId::try_from(request.reporter)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;
    let room_id = request
        .room_id
        .as_deref()
        .map(RoomId::parse)
        .transpose()
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;

    match state
        .moderation
        .report(room_id, &reporter, &request.reason)
        .await
    {
        Ok(()) => Ok((
            StatusCode::ACCEPTED,
            Json(AcceptedResponse::new(
                "Report sent. Thank you, we will review it.",
            )),
        )),
        Err(ModerationError::Validation(e)) => {
            Err(api_error(StatusCode::BAD_REQUEST, e.to_string()))
        }
        Err(ModerationError::Store(e)) => Err(unavailable(e)),
    }
}
