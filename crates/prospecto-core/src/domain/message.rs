use crate::domain::ids::MessageId;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageSender {
    Executive,
    Prospect,
}

impl MessageSender {
    pub const fn as_str(self) -> &'static str {
        match self {
            MessageSender::Executive => "executive",
            MessageSender::Prospect => "prospect",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "executive" => Ok(MessageSender::Executive),
            "prospect" => Ok(MessageSender::Prospect),
            other => Err(CoreError::InvalidSender(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub sender: MessageSender,
    pub content: String,
    pub sent_at: i64,
}
