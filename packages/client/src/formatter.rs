//! Message formatting utilities for client display.

use duet_server::infrastructure::dto::websocket::MessageDto;
use duet_shared::time::timestamp_to_clock_time;

const RULE: &str = "============================================================";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the identity assigned by the server
    pub fn format_identity(participant_id: &str) -> String {
        format!(
            "\nYou are '{}'. Type /enter to find a partner, /help for commands.\n",
            participant_id
        )
    }

    /// Format a status change
    ///
    /// # Arguments
    ///
    /// * `label` - Human-readable status from the server
    /// * `partner` - The partner's ID while connected
    /// * `reason` - Why the chat ended, when it did
    pub fn format_status(label: &str, partner: Option<&str>, reason: Option<&str>) -> String {
        let detail = match (partner, reason) {
            (Some(partner), _) => format!(" (with {})", partner),
            (None, Some("partner_left")) => " (your partner left, /ok or /next)".to_string(),
            (None, Some("reported")) => " (report sent, /ok or /next)".to_string(),
            (None, Some(_)) => " (/ok or /next)".to_string(),
            (None, None) => String::new(),
        };
        format!("\n* {}{}\n", label, detail)
    }

    /// Format the full conversation, replacing whatever was shown before
    pub fn format_messages(messages: &[MessageDto]) -> String {
        let mut output = String::new();
        output.push('\n');
        output.push_str(RULE);
        output.push('\n');

        if messages.is_empty() {
            output.push_str("(No messages yet. Say hi!)\n");
        } else {
            for message in messages {
                let who = if message.mine { "me" } else { "stranger" };
                output.push_str(&format!(
                    "[{}] {}: {}\n",
                    timestamp_to_clock_time(message.sent_at),
                    who,
                    message.text
                ));
            }
        }

        output.push_str(RULE);
        output.push('\n');
        output
    }

    /// Format the acknowledgement of a report
    pub fn format_report_recorded() -> String {
        "\n* Report sent. Thank you, we will review it.\n".to_string()
    }

    /// Format an error reported by the server
    pub fn format_error(message: &str) -> String {
        format!("\n! {}\n", message)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }

    /// Format the command list
    pub fn format_help() -> String {
        [
            "",
            "/enter           find a partner",
            "/next            leave and find a new partner",
            "/leave           end the current chat",
            "/report <reason> report the chat and leave",
            "/ok              acknowledge that the chat ended",
            "/quit            exit",
            "anything else is sent as a message",
            "",
        ]
        .join("\n")
    }
}
