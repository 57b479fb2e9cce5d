//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement business logic
//! without side effects, making them easy to test.

use duet_server::infrastructure::dto::websocket::ClientCommand;

use crate::{command::InputCommand, error::ClientError};

/// Session status as last reported by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClientStatus {
    #[default]
    Idle,
    Waiting,
    Connected,
    Closed,
}

impl ClientStatus {
    /// Parse the `status` field of a status event
    pub fn from_wire(status: &str) -> Option<Self> {
        match status {
            "idle" => Some(ClientStatus::Idle),
            "waiting" => Some(ClientStatus::Waiting),
            "connected" => Some(ClientStatus::Connected),
            "closed" => Some(ClientStatus::Closed),
            _ => None,
        }
    }
}

/// Check if the client should exit immediately based on the error type.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::InvalidParticipantId(_))
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}

/// Commands to send for `input`, given the current session status
///
/// `/enter` and `/next` first bring a finished or running session back to idle.
pub fn plan_commands(input: InputCommand, status: ClientStatus) -> Vec<ClientCommand> {
    let reset: &[ClientCommand] = match status {
        ClientStatus::Idle => &[],
        ClientStatus::Closed => &[ClientCommand::Acknowledge],
        ClientStatus::Waiting | ClientStatus::Connected => {
            &[ClientCommand::Leave, ClientCommand::Acknowledge]
        }
    };

    match input {
        InputCommand::Enter if status == ClientStatus::Closed => {
            vec![ClientCommand::Acknowledge, ClientCommand::Enter]
        }
        InputCommand::Enter => vec![ClientCommand::Enter],
        InputCommand::Next => reset
            .iter()
            .cloned()
            .chain(std::iter::once(ClientCommand::Enter))
            .collect(),
        InputCommand::Leave => vec![ClientCommand::Leave],
        InputCommand::Report(reason) => vec![ClientCommand::Report { reason }],
        InputCommand::Acknowledge => vec![ClientCommand::Acknowledge],
        InputCommand::Say(text) => vec![ClientCommand::Send { text }],
        InputCommand::Quit | InputCommand::Help | InputCommand::Unknown(_) => Vec::new(),
    }
}
