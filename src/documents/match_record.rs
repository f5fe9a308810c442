use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored match suggestion linking two users. Scores arrive as plain
/// integers and are clamped when building the feed view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchRecord {
    pub id: String,
    pub user_id: String,
    pub matched_user_id: String,
    pub compatibility: i64,
    pub reason: Option<String>,
    pub common_skills: Option<Vec<String>>,
    pub created_at: Option<DateTime<Utc>>,
}
