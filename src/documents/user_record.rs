use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw user document as stored on the platform. Every field except the
/// id may be missing; the normalizer in `crate::profile` turns this into
/// a fully-populated [`crate::models::user::Profile`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserRecord {
    pub id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    pub interests: Option<Vec<String>>,
    pub experience: Option<String>,
    pub location: Option<LocationRecord>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub portfolio: Option<String>,
    pub preferences: Option<PreferencesRecord>,
    pub profile_strength: Option<i64>,
    pub is_profile_complete: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub last_active: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationRecord {
    pub city: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferencesRecord {
    pub availability: Option<String>,
    pub timezone: Option<String>,
    pub roles: Option<Vec<String>>,
    pub communication: Option<String>,
    pub hackathon_preference: Option<String>,
    pub remote_work: Option<bool>,
    pub max_distance_km: Option<u32>,
    pub work_style: Option<Vec<String>>,
    pub personality_tags: Option<Vec<String>>,
    pub coding_hours: Option<String>,
    pub collaboration_style: Option<String>,
    pub project_pace: Option<String>,
}

/// Partial update for a user document. Only fields set to `Some` are
/// written; everything else is left untouched by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences: Option<PreferencesRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_strength: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_profile_complete: Option<bool>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self == &UserPatch::default()
    }
}
