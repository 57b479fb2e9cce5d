//! Parsing of lines typed at the prompt.

/// A line typed by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    /// `/enter`
    Enter,
    /// `/leave`
    Leave,
    /// `/next`: leave and find a new partner
    Next,
    /// `/report <reason>`
    Report(String),
    /// `/ok`: acknowledge the end of a chat
    Acknowledge,
    /// `/quit`
    Quit,
    /// `/help`
    Help,
    /// Unknown slash command
    Unknown(String),
    /// Anything else is a chat message
    Say(String),
}

impl InputCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(rest) = line.strip_prefix('/') else {
            return InputCommand::Say(line.to_string());
        };

        let (name, argument) = match rest.split_once(char::is_whitespace) {
            Some((name, argument)) => (name, argument.trim()),
            None => (rest, ""),
        };

        match name {
            "enter" | "start" => InputCommand::Enter,
            "leave" | "end" => InputCommand::Leave,
            "next" => InputCommand::Next,
            "report" => InputCommand::Report(argument.to_string()),
            "ok" => InputCommand::Acknowledge,
            "quit" | "exit" => InputCommand::Quit,
            "help" => InputCommand::Help,
            _ => InputCommand::Unknown(name.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_slash_commands() {
        // テスト項目: スラッシュコマンドが解釈される
        // given (前提条件) / when (操作) / then (期待する結果):
        assert_eq!(InputCommand::parse("/enter"), InputCommand::Enter);
        assert_eq!(InputCommand::parse(" /leave "), InputCommand::Leave);
        assert_eq!(InputCommand::parse("/next"), InputCommand::Next);
        assert_eq!(InputCommand::parse("/ok"), InputCommand::Acknowledge);
        assert_eq!(InputCommand::parse("/quit"), InputCommand::Quit);
    }

    #[test]
    fn test_parse_report_reason() {
        // テスト項目: /report の後ろが理由として扱われる
        // given (前提条件):
        let line = "/report   spam and abuse ";

        // when (操作):
        let command = InputCommand::parse(line);

        // then (期待する結果):
        assert_eq!(
            command,
            InputCommand::Report("spam and abuse".to_string())
        );
        assert_eq!(
            InputCommand::parse("/report"),
            InputCommand::Report(String::new())
        );
    }

    #[test]
    fn test_parse_plain_text_and_unknown() {
        // テスト項目: スラッシュで始まらない行はメッセージ、未知のコマンドは Unknown
        // given (前提条件) / when (操作) / then (期待する結果):
        assert_eq!(
            InputCommand::parse("hello there"),
            InputCommand::Say("hello there".to_string())
        );
        assert_eq!(
            InputCommand::parse("/dance"),
            InputCommand::Unknown("dance".to_string())
        );
    }
}
