//! 値オブジェクト定義
//!
//! 不変条件はコンストラクタで検証し、生成後は常に妥当な値であることを保証します。
//! 表示名とルーム名は「拒否」ではなく「既定値への置き換え」を行います。

use serde::Serialize;
use uuid::Uuid;

use super::error::ValueObjectError;

/// 表示名が空の場合に使われる既定値
pub const DEFAULT_DISPLAY_NAME: &str = "Anonymous";
/// ルーム名が空の場合に使われる既定値
pub const DEFAULT_ROOM_ID: &str = "General";

const DISPLAY_NAME_MAX_CHARS: usize = 32;
const ROOM_ID_MAX_CHARS: usize = 64;
const MESSAGE_ID_MAX_BYTES: usize = 128;
const EMOJI_MAX_BYTES: usize = 32;

fn truncate_chars(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}

/// 接続 ID（トランスポート接続ごとに一意）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::ConnectionIdEmpty);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// ConnectionId の生成器
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// UUID v4 で新しい接続 ID を払い出す
    pub fn generate() -> ConnectionId {
        ConnectionId(Uuid::new_v4().to_string())
    }
}

/// 参加者の表示名
///
/// 空（または空白のみ）の入力は `Anonymous` に置き換えられ、
/// 長すぎる入力は切り詰められる。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(name) if !name.is_empty() => {
                Self(truncate_chars(name, DISPLAY_NAME_MAX_CHARS))
            }
            _ => Self(DEFAULT_DISPLAY_NAME.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// ルーム ID（ルーム名そのもの）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(room) if !room.is_empty() => Self(truncate_chars(room, ROOM_ID_MAX_CHARS)),
            _ => Self(DEFAULT_ROOM_ID.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// メッセージ ID（クライアントが生成する）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::MessageIdEmpty);
        }
        if value.len() > MESSAGE_ID_MAX_BYTES {
            return Err(ValueObjectError::MessageIdTooLong {
                max: MESSAGE_ID_MAX_BYTES,
                actual: value.len(),
            });
        }
        Ok(Self(value))
    }

    /// システム通知用の ID を払い出す
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// リアクション用の絵文字
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Emoji(String);

impl Emoji {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::EmojiEmpty);
        }
        if trimmed.len() > EMOJI_MAX_BYTES {
            return Err(ValueObjectError::EmojiTooLong {
                max: EMOJI_MAX_BYTES,
                actual: trimmed.len(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Unix タイムスタンプ（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
