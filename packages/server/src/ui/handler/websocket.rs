//! WebSocket connection handlers.
//!
//! 1 つの接続が 1 つの `SessionController` を持ち、
//! クライアントのコマンドとセッションのイベントを 1 つのループで交互に処理する。

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::ParticipantId,
    infrastructure::dto::websocket::{ClientCommand, ServerEvent},
    session::{SessionController, SessionEvent},
    ui::state::AppState,
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    /// 省略するとサーバーが ID を生成する
    pub participant_id: Option<String>,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    // Convert String -> ParticipantId (Domain Model)
    let participant = match query.participant_id {
        Some(raw) => ParticipantId::try_from(raw.clone()).map_err(|e| {
            tracing::warn!("Invalid participant_id '{}': {}", raw, e);
            StatusCode::BAD_REQUEST
        })?,
        None => state.identity.new_identity(),
    };

    tracing::info!("Participant '{}' connecting", participant);
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, participant)))
}

/// Spawns a task that receives events from the rx channel and pushes them to the WebSocket sender.
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

/// イベントを JSON にして送信キューに積む
fn push(tx: &mpsc::UnboundedSender<String>, event: &ServerEvent) {
    match serde_json::to_string(event) {
        Ok(json) => {
            // 受信側が終了していれば接続ループも終了する
            let _ = tx.send(json);
        }
        Err(e) => tracing::error!("Failed to serialize event: {}", e),
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, participant: ParticipantId) {
    let (sender, mut receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();
    let mut send_task = pusher_loop(rx, sender);

    let mut session = state.new_session(participant.clone());
    push(
        &tx,
        &ServerEvent::Identity {
            participant_id: participant.as_str().to_string(),
        },
    );
    push(&tx, &ServerEvent::status(&session));

    loop {
        tokio::select! {
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    handle_command(&mut session, text.as_str(), &tx).await;
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("Participant '{}' closed the connection", participant);
                    break;
                }
                Some(Ok(_)) => {
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Some(Err(e)) => {
                    tracing::error!("WebSocket error from '{}': {}", participant, e);
                    break;
                }
            },
            Some(event) = session.next_event(), if session.is_live() => {
                forward_event(&session, event, &tx);
            }
            _ = &mut send_task => break,
        }
    }

    // 参加中の Room を閉じる（best-effort）
    session.shutdown().await;
    send_task.abort();
    tracing::info!("Participant '{}' disconnected", participant);
}

async fn handle_command(
    session: &mut SessionController,
    text: &str,
    tx: &mpsc::UnboundedSender<String>,
) {
    let command = match serde_json::from_str::<ClientCommand>(text) {
        Ok(command) => command,
        Err(e) => {
            tracing::warn!("Failed to parse command from '{}': {}", session.participant(), e);
            push(
                tx,
                &ServerEvent::Error {
                    kind: "bad_request".to_string(),
                    message: "Unrecognized command.".to_string(),
                },
            );
            return;
        }
    };

    // send の結果は購読経由で messages イベントとして届く
    let reports_status = !matches!(command, ClientCommand::Send { .. });
    let result = match command {
        ClientCommand::Enter => session.enter().await.map(|_| None),
        ClientCommand::Send { text } => session.send(&text).await.map(|_| None),
        ClientCommand::Leave => session.leave().await.map(|_| None),
        ClientCommand::Report { reason } => session.report(&reason).await.map(|room_id| {
            Some(ServerEvent::ReportRecorded {
                room_id: room_id.map(|id| id.to_string()),
            })
        }),
        ClientCommand::Acknowledge => session.acknowledge().map(|_| None),
    };

    match result {
        Ok(extra) => {
            if let Some(event) = extra {
                push(tx, &event);
            }
            if reports_status {
                push(tx, &ServerEvent::status(session));
            }
        }
        Err(e) => {
            tracing::warn!("Command from '{}' failed: {}", session.participant(), e);
            push(tx, &ServerEvent::from(&e));
        }
    }
}

/// セッションのイベントをクライアント向けのイベントに変換して送る
fn forward_event(session: &SessionController, event: SessionEvent, tx: &mpsc::UnboundedSender<String>) {
    match event {
        SessionEvent::Paired { .. } | SessionEvent::Closed { .. } => {
            push(tx, &ServerEvent::status(session));
        }
        SessionEvent::Messages { room_id, messages } => {
            push(
                tx,
                &ServerEvent::messages(room_id, messages, session.participant()),
            );
        }
    }
}
