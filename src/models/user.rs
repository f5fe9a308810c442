use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Self-reported experience level. Free-form store values are parsed
/// leniently; anything unrecognized falls back to the crate default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Experience {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Experience {
    pub fn as_str(&self) -> &'static str {
        match self {
            Experience::Beginner => "Beginner",
            Experience::Intermediate => "Intermediate",
            Experience::Advanced => "Advanced",
            Experience::Expert => "Expert",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "beginner" => Some(Experience::Beginner),
            "intermediate" => Some(Experience::Intermediate),
            "advanced" => Some(Experience::Advanced),
            "expert" => Some(Experience::Expert),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub country: String,
}

/// External links shown on a profile. Absent links are empty strings so
/// view code never branches on `Option`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalLinks {
    pub github: String,
    pub linkedin: String,
    pub portfolio: String,
}

impl ExternalLinks {
    pub fn any_present(&self) -> bool {
        !self.github.is_empty() || !self.linkedin.is_empty() || !self.portfolio.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub availability: String,
    pub timezone: String,
    pub roles: Vec<String>,
    pub communication: String,
    pub hackathon_preference: String,
    pub remote_work: bool,
    pub max_distance_km: u32,
    pub work_style: Vec<String>,
    pub personality_tags: Vec<String>,
    pub coding_hours: String,
    pub collaboration_style: String,
    pub project_pace: String,
}

/// Fully-populated profile handed to view code. Every field holds a
/// concrete value; the normalizer guarantees it regardless of how sparse
/// the stored record was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub photo_url: String,
    pub title: String,
    pub bio: String,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    pub experience: Experience,
    pub location: Location,
    pub links: ExternalLinks,
    pub preferences: Preferences,
    pub profile_strength: u8,
    pub is_profile_complete: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}
