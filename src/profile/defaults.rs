//! Fallback values applied by the normalizer when a stored record (or the
//! identity it belongs to) is missing a field. These are product copy as
//! much as code: changing them changes what brand-new users look like to
//! everyone else on the platform.

use crate::models::user::{Experience, Location, Preferences};

/// Display name used when neither the record nor the auth identity has one.
pub const FALLBACK_DISPLAY_NAME: &str = "User";

/// Display name seeded into a brand-new record at first sign-in.
pub const NEW_USER_DISPLAY_NAME: &str = "New User";

pub const DEFAULT_TITLE: &str = "Software Developer";

pub const DEFAULT_BIO: &str =
    "Passionate about building innovative solutions and collaborating with talented teams.";

pub const DEFAULT_SKILLS: [&str; 3] = ["JavaScript", "React", "Node.js"];

pub const DEFAULT_INTERESTS: [&str; 2] = ["Web Development", "Open Source"];

pub const DEFAULT_EXPERIENCE: Experience = Experience::Intermediate;

pub const DEFAULT_CITY: &str = "San Francisco";
pub const DEFAULT_COUNTRY: &str = "United States";

pub const DEFAULT_AVAILABILITY: &str = "Part-time";
pub const DEFAULT_TIMEZONE: &str = "UTC-8";
pub const DEFAULT_ROLES: [&str; 1] = ["Frontend Developer"];
pub const DEFAULT_COMMUNICATION: &str = "Slack";
pub const DEFAULT_HACKATHON_PREFERENCE: &str = "Virtual";
pub const DEFAULT_REMOTE_WORK: bool = true;
pub const DEFAULT_MAX_DISTANCE_KM: u32 = 50;
pub const DEFAULT_WORK_STYLE: [&str; 1] = ["Agile/Scrum"];
pub const DEFAULT_PERSONALITY_TAGS: [&str; 2] = ["🤖 Tech Geek", "☕ Coffee Addict"];
pub const DEFAULT_CODING_HOURS: &str = "🌆 Evening (5-9 PM)";
pub const DEFAULT_COLLABORATION_STYLE: &str = "🤝 Highly Collaborative";
pub const DEFAULT_PROJECT_PACE: &str = "⚡ Quick Sprints";

pub fn default_location() -> Location {
    Location {
        city: DEFAULT_CITY.to_string(),
        country: DEFAULT_COUNTRY.to_string(),
    }
}

pub fn default_preferences() -> Preferences {
    Preferences {
        availability: DEFAULT_AVAILABILITY.to_string(),
        timezone: DEFAULT_TIMEZONE.to_string(),
        roles: DEFAULT_ROLES.iter().map(|s| s.to_string()).collect(),
        communication: DEFAULT_COMMUNICATION.to_string(),
        hackathon_preference: DEFAULT_HACKATHON_PREFERENCE.to_string(),
        remote_work: DEFAULT_REMOTE_WORK,
        max_distance_km: DEFAULT_MAX_DISTANCE_KM,
        work_style: DEFAULT_WORK_STYLE.iter().map(|s| s.to_string()).collect(),
        personality_tags: DEFAULT_PERSONALITY_TAGS
            .iter()
            .map(|s| s.to_string())
            .collect(),
        coding_hours: DEFAULT_CODING_HOURS.to_string(),
        collaboration_style: DEFAULT_COLLABORATION_STYLE.to_string(),
        project_pace: DEFAULT_PROJECT_PACE.to_string(),
    }
}

pub fn default_skills() -> Vec<String> {
    DEFAULT_SKILLS.iter().map(|s| s.to_string()).collect()
}

pub fn default_interests() -> Vec<String> {
    DEFAULT_INTERESTS.iter().map(|s| s.to_string()).collect()
}
