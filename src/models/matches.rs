use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::user::Profile;

/// A suggested collaborator joined with their normalized profile, ready
/// for display in the match feed.
#[derive(Debug, Clone, Serialize)]
pub struct MatchView {
    pub user: Profile,
    /// Compatibility score clamped to 0..=100.
    pub compatibility: u8,
    pub reason: String,
    pub common_skills: Vec<String>,
    pub matched_at: DateTime<Utc>,
}
