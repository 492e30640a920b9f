use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn as_str(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Normal,
    Reasoning,
}

impl DisplayMode {
    pub fn for_reasoning(enabled: bool) -> Self {
        if enabled {
            DisplayMode::Reasoning
        } else {
            DisplayMode::Normal
        }
    }
}

/// A rendered chat line. Never mutated once it is on screen.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub text: String,
    pub sender: Sender,
    pub display_mode: DisplayMode,
    pub created_at: OffsetDateTime,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
            display_mode: DisplayMode::Normal,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    pub fn bot(text: impl Into<String>, display_mode: DisplayMode) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Bot,
            display_mode,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    pub fn timestamp_label(&self) -> Option<String> {
        format_message_timestamp(self.created_at)
    }
}

const MESSAGE_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour repr:12 padding:zero]:[minute padding:zero] [period case:upper]");

fn format_message_timestamp(timestamp: OffsetDateTime) -> Option<String> {
    let mut datetime = timestamp;
    if let Ok(offset) = UtcOffset::current_local_offset() {
        datetime = datetime.to_offset(offset);
    }
    datetime.format(MESSAGE_TIME_FORMAT).ok()
}

/// Client-side flags owned by the controller for one page session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UiState {
    pub loading: bool,
    pub reasoning_mode_enabled: bool,
}
