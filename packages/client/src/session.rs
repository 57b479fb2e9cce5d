//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{self, protocol::Message},
};

use duet_server::infrastructure::dto::websocket::{ClientCommand, ServerEvent};

use super::{
    command::InputCommand,
    domain::{ClientStatus, plan_commands},
    error::ClientError,
    formatter::MessageFormatter,
    ui::redisplay_prompt,
};

fn print_and_prompt(output: &str) {
    print!("{}", output);
    redisplay_prompt();
}

fn connect_error(error: tungstenite::Error, participant_id: Option<&str>) -> ClientError {
    match error {
        tungstenite::Error::Http(response) if response.status().as_u16() == 400 => {
            ClientError::InvalidParticipantId(participant_id.unwrap_or_default().to_string())
        }
        other => ClientError::ConnectionError(other.to_string()),
    }
}

/// Run one WebSocket connection until the user quits or the connection drops
///
/// Returns `Ok(())` when the user quits.
///
/// # Arguments
///
/// * `url` - WebSocket endpoint
/// * `identity` - Participant ID to connect as. Filled in from the server's
///   identity event so that a reconnect keeps the same ID.
/// * `input_rx` - Lines typed at the prompt
pub async fn run_client_session(
    url: &str,
    identity: &mut Option<String>,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    // Construct URL with participant_id as query parameter
    let url = match identity.as_deref() {
        Some(id) => format!("{}?participant_id={}", url, id),
        None => url.to_string(),
    };

    let (ws_stream, _response) = connect_async(&url)
        .await
        .map_err(|e| connect_error(e, identity.as_deref()))?;
    tracing::info!("Connected to chat server!");

    let (mut write, mut read) = ws_stream.split();
    let mut status = ClientStatus::default();

    loop {
        tokio::select! {
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<ServerEvent>(text.as_str()) {
                        Ok(event) => render_event(event, identity, &mut status),
                        Err(_) => print_and_prompt(&MessageFormatter::format_raw_message(&text)),
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("Server closed the connection");
                    return Err(ClientError::ConnectionError("Connection lost".to_string()));
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    return Err(ClientError::ConnectionError(e.to_string()));
                }
            },
            line = input_rx.recv() => {
                // readline thread ended (Ctrl+C / Ctrl+D)
                let Some(line) = line else {
                    let _ = write.close().await;
                    return Ok(());
                };

                let input = InputCommand::parse(&line);
                match &input {
                    InputCommand::Quit => {
                        let _ = write.close().await;
                        return Ok(());
                    }
                    InputCommand::Help => {
                        print_and_prompt(&MessageFormatter::format_help());
                        continue;
                    }
                    InputCommand::Unknown(name) => {
                        print_and_prompt(&MessageFormatter::format_error(&format!(
                            "Unknown command '/{}'. Type /help.",
                            name
                        )));
                        continue;
                    }
                    _ => {}
                }

                for command in plan_commands(input, status) {
                    send_command(&mut write, &command).await?;
                }
            }
        }
    }
}

async fn send_command<S>(write: &mut S, command: &ClientCommand) -> Result<(), ClientError>
where
    S: SinkExt<Message, Error = tungstenite::Error> + Unpin,
{
    let json = serde_json::to_string(command)
        .map_err(|e| ClientError::ConnectionError(format!("Failed to serialize command: {}", e)))?;

    write.send(Message::Text(json.into())).await.map_err(|e| {
        tracing::warn!("Failed to send command: {}", e);
        ClientError::ConnectionError(e.to_string())
    })
}

fn render_event(event: ServerEvent, identity: &mut Option<String>, status: &mut ClientStatus) {
    let output = match event {
        ServerEvent::Identity { participant_id } => {
            let output = MessageFormatter::format_identity(&participant_id);
            *identity = Some(participant_id);
            output
        }
        ServerEvent::Status {
            status: wire_status,
            label,
            partner,
            reason,
            ..
        } => {
            if let Some(parsed) = ClientStatus::from_wire(&wire_status) {
                *status = parsed;
            }
            MessageFormatter::format_status(&label, partner.as_deref(), reason.as_deref())
        }
        ServerEvent::Messages { messages, .. } => MessageFormatter::format_messages(&messages),
        ServerEvent::ReportRecorded { .. } => MessageFormatter::format_report_recorded(),
        ServerEvent::Error { message, .. } => MessageFormatter::format_error(&message),
    };
    print_and_prompt(&output);
}
