use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageKind {
    User,
    AiSuggestion,
}

impl Default for MessageKind {
    fn default() -> Self {
        MessageKind::User
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageRecord {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub body: String,
    pub kind: MessageKind,
    pub sent_at: Option<DateTime<Utc>>,
}
