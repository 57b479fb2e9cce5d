//! Value objects for the chat domain.

use std::{fmt, str::FromStr};

use uuid::Uuid;

use super::error::ValueObjectError;

/// ParticipantId の最大長
pub const PARTICIPANT_ID_MAX_LEN: usize = 64;

/// メッセージ・通報・問い合わせ本文の最大文字数
pub const TEXT_MAX_CHARS: usize = 2000;

// ========================================
// ParticipantId
// ========================================

/// 匿名参加者の識別子
///
/// 自己申告の ID も受け付けるが、ASCII 英数字と `_` `-` のみ許可する。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        const FIELD: &str = "participant id";

        if value.is_empty() {
            return Err(ValueObjectError::Empty(FIELD));
        }
        if value.chars().count() > PARTICIPANT_ID_MAX_LEN {
            return Err(ValueObjectError::TooLong {
                field: FIELD,
                max: PARTICIPANT_ID_MAX_LEN,
            });
        }
        if let Some(character) = value
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        {
            return Err(ValueObjectError::InvalidCharacter {
                field: FIELD,
                character,
            });
        }

        Ok(Self(value))
    }

    /// Generated identities are built from a known-valid alphabet.
    pub(super) fn generated(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ParticipantId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ========================================
// RoomId / MessageId
// ========================================

/// Room の識別子（作成時に割り当てられ、以後不変）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(Uuid);

impl RoomId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn parse(value: &str) -> Result<Self, ValueObjectError> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| ValueObjectError::InvalidFormat {
                field: "room id",
                value: value.to_string(),
            })
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ========================================
// Timestamp
// ========================================

/// Unix timestamp in UTC (milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

// ========================================
// RoomStatus
// ========================================

/// Room の状態
///
/// `Waiting → Active → Closed` の順にのみ進む。
/// `Waiting → Closed` は相手が来る前に退出した場合の遷移。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomStatus {
    Waiting,
    Active,
    Closed,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Waiting => "waiting",
            RoomStatus::Active => "active",
            RoomStatus::Closed => "closed",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            RoomStatus::Waiting => 0,
            RoomStatus::Active => 1,
            RoomStatus::Closed => 2,
        }
    }

    /// Whether `self → next` respects the monotonic order
    pub fn can_transition_to(&self, next: RoomStatus) -> bool {
        self.rank() < next.rank()
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomStatus {
    type Err = ValueObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waiting" => Ok(RoomStatus::Waiting),
            "active" => Ok(RoomStatus::Active),
            "closed" => Ok(RoomStatus::Closed),
            other => Err(ValueObjectError::InvalidFormat {
                field: "room status",
                value: other.to_string(),
            }),
        }
    }
}

// ========================================
// Free text
// ========================================

fn normalize_text(field: &'static str, raw: &str) -> Result<Option<String>, ValueObjectError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > TEXT_MAX_CHARS {
        return Err(ValueObjectError::TooLong {
            field,
            max: TEXT_MAX_CHARS,
        });
    }
    Ok(Some(trimmed.to_string()))
}

/// チャットメッセージ本文（前後の空白を除去済み、空文字不可）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageText(String);

impl MessageText {
    const FIELD: &'static str = "message text";

    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        Self::parse(&value)?.ok_or(ValueObjectError::Empty(Self::FIELD))
    }

    /// Blank input yields `Ok(None)` so that sending it is a no-op.
    pub fn parse(raw: &str) -> Result<Option<Self>, ValueObjectError> {
        Ok(normalize_text(Self::FIELD, raw)?.map(Self))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageText {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// 通報理由
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportReason(String);

impl ReportReason {
    pub fn new(raw: &str) -> Result<Self, ValueObjectError> {
        normalize_text("report reason", raw)?
            .map(Self)
            .ok_or(ValueObjectError::Empty("report reason"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 問い合わせフォームの本文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactText(String);

impl ContactText {
    pub fn new(raw: &str) -> Result<Self, ValueObjectError> {
        normalize_text("contact message", raw)?
            .map(Self)
            .ok_or(ValueObjectError::Empty("contact message"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_id_accepts_generated_shape() {
        // テスト項目: 英数字と `_` からなる ID は受け付けられる
        // given (前提条件):
        let raw = "u_aZ09bQ7x".to_string();

        // when (操作):
        let result = ParticipantId::new(raw);

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "u_aZ09bQ7x");
    }

    #[test]
    fn test_participant_id_rejects_empty_and_invalid() {
        // テスト項目: 空文字・不正文字・長すぎる ID は拒否される
        // given (前提条件):
        let too_long = "a".repeat(PARTICIPANT_ID_MAX_LEN + 1);

        // when (操作) / then (期待する結果):
        assert_eq!(
            ParticipantId::new(String::new()),
            Err(ValueObjectError::Empty("participant id"))
        );
        assert_eq!(
            ParticipantId::new("alice bob".to_string()),
            Err(ValueObjectError::InvalidCharacter {
                field: "participant id",
                character: ' ',
            })
        );
        assert!(matches!(
            ParticipantId::new(too_long),
            Err(ValueObjectError::TooLong { .. })
        ));
    }

    #[test]
    fn test_room_status_transitions_are_monotonic() {
        // テスト項目: 状態は waiting → active → closed の順にのみ進む
        // given (前提条件):
        use RoomStatus::*;

        // when (操作) / then (期待する結果):
        assert!(Waiting.can_transition_to(Active));
        assert!(Active.can_transition_to(Closed));
        assert!(Waiting.can_transition_to(Closed));
        assert!(!Active.can_transition_to(Waiting));
        assert!(!Closed.can_transition_to(Active));
        assert!(!Closed.can_transition_to(Waiting));
        assert!(!Closed.can_transition_to(Closed));
    }

    #[test]
    fn test_room_status_from_str() {
        // テスト項目: 文字列から RoomStatus に変換できる
        // given (前提条件):

        // when (操作) / then (期待する結果):
        assert_eq!("waiting".parse::<RoomStatus>(), Ok(RoomStatus::Waiting));
        assert_eq!("closed".parse::<RoomStatus>(), Ok(RoomStatus::Closed));
        assert!("open".parse::<RoomStatus>().is_err());
    }

    #[test]
    fn test_message_text_parse_blank_is_none() {
        // テスト項目: 空白のみの本文は None（送信しない）として扱われる
        // given (前提条件):
        let inputs = ["", "   ", "\n\t "];

        // when (操作) / then (期待する結果):
        for input in inputs {
            assert_eq!(MessageText::parse(input), Ok(None));
        }
    }

    #[test]
    fn test_message_text_is_trimmed() {
        // テスト項目: 本文の前後の空白が除去される
        // given (前提条件):
        let raw = "  hello there \n";

        // when (操作):
        let text = MessageText::parse(raw).unwrap().unwrap();

        // then (期待する結果):
        assert_eq!(text.as_str(), "hello there");
    }

    #[test]
    fn test_message_text_too_long() {
        // テスト項目: 最大文字数を超える本文はエラーになる
        // given (前提条件):
        let raw = "あ".repeat(TEXT_MAX_CHARS + 1);

        // when (操作):
        let result = MessageText::parse(&raw);

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ValueObjectError::TooLong {
                field: "message text",
                max: TEXT_MAX_CHARS,
            })
        );
    }

    #[test]
    fn test_report_reason_and_contact_text_reject_blank() {
        // テスト項目: 通報理由と問い合わせ本文は空白のみを拒否する
        // given (前提条件):

        // when (操作) / then (期待する結果):
        assert_eq!(
            ReportReason::new("  "),
            Err(ValueObjectError::Empty("report reason"))
        );
        assert_eq!(
            ContactText::new(""),
            Err(ValueObjectError::Empty("contact message"))
        );
        assert_eq!(ReportReason::new(" spam ").unwrap().as_str(), "spam");
    }

    #[test]
    fn test_room_id_parse() {
        // テスト項目: UUID 文字列から RoomId を生成でき、不正な文字列は拒否される
        // given (前提条件):
        let id = RoomId::new(Uuid::new_v4());

        // when (操作):
        let parsed = RoomId::parse(&id.to_string());

        // then (期待する結果):
        assert_eq!(parsed, Ok(id));
        assert!(RoomId::parse("not-a-uuid").is_err());
    }
}
