//! Profile completeness scoring.
//!
//! The strength score drives "finish your profile" prompts in the UI. It
//! is advisory only: always recomputed locally from normalized content,
//! never fetched, and never trusted from the stored record (stored values
//! go stale the moment the scoring weights change).

use crate::models::user::{Preferences, Profile};
use crate::profile::defaults::{
    DEFAULT_BIO, default_interests, default_location, default_preferences, default_skills,
};

/// Every account starts here: id, email, and an assigned avatar are
/// always present after normalization.
pub const BASE_SCORE: u8 = 20;

/// Bio differs from the fallback copy.
pub const BIO_WEIGHT: u8 = 20;

/// Skill list is nonempty and not the seeded default list.
pub const SKILLS_WEIGHT: u8 = 15;

/// Interest list is nonempty and not the seeded default list.
pub const INTERESTS_WEIGHT: u8 = 10;

/// At least one external link (code hosting, professional network, or
/// portfolio).
pub const LINKS_WEIGHT: u8 = 15;

/// Location differs from the placeholder city/country.
pub const LOCATION_WEIGHT: u8 = 10;

/// Per customized preference subfield, up to [`PREFERENCES_CAP`].
pub const PREFERENCE_FIELD_WEIGHT: u8 = 2;
pub const PREFERENCES_CAP: u8 = 10;

/// Profiles scoring at or above this are flagged complete.
pub const PROFILE_COMPLETE_THRESHOLD: u8 = 80;

const MAX_SCORE: usize = BASE_SCORE as usize
    + BIO_WEIGHT as usize
    + SKILLS_WEIGHT as usize
    + INTERESTS_WEIGHT as usize
    + LINKS_WEIGHT as usize
    + LOCATION_WEIGHT as usize
    + PREFERENCES_CAP as usize;

const _: [(); 100 - MAX_SCORE] = [(); 100 - MAX_SCORE];
const _: [(); MAX_SCORE - 100] = [(); MAX_SCORE - 100];

/// Weighted completeness score in [0, 100]. Deterministic, pure, and
/// monotone: filling in a previously-default field never lowers it.
pub fn score(profile: &Profile) -> u8 {
    let mut total = BASE_SCORE as u16;

    if !profile.bio.trim().is_empty() && profile.bio != DEFAULT_BIO {
        total += BIO_WEIGHT as u16;
    }
    if !profile.skills.is_empty() && profile.skills != default_skills() {
        total += SKILLS_WEIGHT as u16;
    }
    if !profile.interests.is_empty() && profile.interests != default_interests() {
        total += INTERESTS_WEIGHT as u16;
    }
    if profile.links.any_present() {
        total += LINKS_WEIGHT as u16;
    }
    let has_location = !profile.location.city.is_empty() || !profile.location.country.is_empty();
    if has_location && profile.location != default_location() {
        total += LOCATION_WEIGHT as u16;
    }

    let customized = customized_preference_fields(&profile.preferences) as u16;
    total += (customized * PREFERENCE_FIELD_WEIGHT as u16).min(PREFERENCES_CAP as u16);

    total.min(100) as u8
}

pub fn is_complete(score: u8) -> bool {
    score >= PROFILE_COMPLETE_THRESHOLD
}

/// Counts preference subfields that differ from the seeded defaults.
fn customized_preference_fields(preferences: &Preferences) -> u8 {
    let defaults = default_preferences();
    let mut customized = 0u8;

    if preferences.availability != defaults.availability {
        customized += 1;
    }
    if preferences.timezone != defaults.timezone {
        customized += 1;
    }
    if preferences.roles != defaults.roles {
        customized += 1;
    }
    if preferences.communication != defaults.communication {
        customized += 1;
    }
    if preferences.hackathon_preference != defaults.hackathon_preference {
        customized += 1;
    }
    if preferences.remote_work != defaults.remote_work {
        customized += 1;
    }
    if preferences.max_distance_km != defaults.max_distance_km {
        customized += 1;
    }
    if preferences.work_style != defaults.work_style {
        customized += 1;
    }
    if preferences.personality_tags != defaults.personality_tags {
        customized += 1;
    }
    if preferences.coding_hours != defaults.coding_hours {
        customized += 1;
    }
    if preferences.collaboration_style != defaults.collaboration_style {
        customized += 1;
    }
    if preferences.project_pace != defaults.project_pace {
        customized += 1;
    }

    customized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::{ExternalLinks, Profile};
    use crate::profile::defaults::{DEFAULT_EXPERIENCE, DEFAULT_TITLE};
    use chrono::Utc;

    fn baseline_profile() -> Profile {
        let now = Utc::now();
        Profile {
            id: "user-1".to_string(),
            email: "ada@example.com".to_string(),
            display_name: "Ada".to_string(),
            photo_url: "https://static.crewmatch.app/avatars/placeholder-01.jpg".to_string(),
            title: DEFAULT_TITLE.to_string(),
            bio: DEFAULT_BIO.to_string(),
            skills: default_skills(),
            interests: default_interests(),
            experience: DEFAULT_EXPERIENCE,
            location: default_location(),
            links: ExternalLinks::default(),
            preferences: default_preferences(),
            profile_strength: 0,
            is_profile_complete: false,
            created_at: now,
            updated_at: now,
            last_active: now,
        }
    }

    #[test]
    fn all_default_profile_scores_base() {
        assert_eq!(score(&baseline_profile()), BASE_SCORE);
    }

    #[test]
    fn fully_customized_profile_scores_one_hundred() {
        let mut profile = baseline_profile();
        profile.bio = "Compilers by day, synthesizers by night.".to_string();
        profile.skills = vec!["Rust".to_string(), "WebAssembly".to_string()];
        profile.interests = vec!["Distributed Systems".to_string()];
        profile.links.github = "https://github.com/ada".to_string();
        profile.location.city = "Berlin".to_string();
        profile.location.country = "Germany".to_string();
        profile.preferences.availability = "Full-time".to_string();
        profile.preferences.timezone = "UTC+1".to_string();
        profile.preferences.roles = vec!["Backend Developer".to_string()];
        profile.preferences.communication = "Email".to_string();
        profile.preferences.coding_hours = "Morning".to_string();
        profile.preferences.project_pace = "Steady".to_string();

        assert_eq!(score(&profile), 100);
    }

    #[test]
    fn score_never_exceeds_one_hundred() {
        let mut profile = baseline_profile();
        profile.bio = "b".to_string();
        profile.skills = vec!["Rust".to_string()];
        profile.interests = vec!["Compilers".to_string()];
        profile.links.github = "g".to_string();
        profile.links.linkedin = "l".to_string();
        profile.links.portfolio = "p".to_string();
        profile.location.city = "Oslo".to_string();
        profile.preferences.availability = "Weekends".to_string();
        profile.preferences.timezone = "UTC+2".to_string();
        profile.preferences.roles = vec!["DevOps".to_string()];
        profile.preferences.communication = "Discord".to_string();
        profile.preferences.hackathon_preference = "In-person".to_string();
        profile.preferences.remote_work = false;
        profile.preferences.max_distance_km = 10;
        profile.preferences.work_style = vec!["Kanban".to_string()];
        profile.preferences.personality_tags = vec!["Night Owl".to_string()];
        profile.preferences.coding_hours = "Late".to_string();
        profile.preferences.collaboration_style = "Async".to_string();
        profile.preferences.project_pace = "Marathon".to_string();

        assert!(score(&profile) <= 100);
    }

    #[test]
    fn filling_a_field_never_lowers_the_score() {
        let before = score(&baseline_profile());

        let mut with_bio = baseline_profile();
        with_bio.bio = "Actual bio text.".to_string();
        assert!(score(&with_bio) >= before);

        let mut with_link = with_bio.clone();
        with_link.links.portfolio = "https://ada.dev".to_string();
        assert!(score(&with_link) >= score(&with_bio));

        let mut with_skills = with_link.clone();
        with_skills.skills = vec!["Rust".to_string()];
        assert!(score(&with_skills) >= score(&with_link));
    }

    #[test]
    fn preference_customization_is_capped() {
        let mut three_fields = baseline_profile();
        three_fields.preferences.availability = "Full-time".to_string();
        three_fields.preferences.timezone = "UTC+9".to_string();
        three_fields.preferences.communication = "Email".to_string();
        assert_eq!(
            score(&three_fields),
            BASE_SCORE + 3 * PREFERENCE_FIELD_WEIGHT
        );

        let mut many_fields = three_fields.clone();
        many_fields.preferences.roles = vec!["Designer".to_string()];
        many_fields.preferences.hackathon_preference = "Hybrid".to_string();
        many_fields.preferences.remote_work = false;
        many_fields.preferences.max_distance_km = 5;
        many_fields.preferences.coding_hours = "Dawn".to_string();
        assert_eq!(score(&many_fields), BASE_SCORE + PREFERENCES_CAP);
    }

    #[test]
    fn stored_strength_does_not_influence_the_score() {
        let mut claims_full = baseline_profile();
        claims_full.profile_strength = 99;
        claims_full.is_profile_complete = true;
        assert_eq!(score(&claims_full), score(&baseline_profile()));
    }

    #[test]
    fn completeness_threshold() {
        assert!(!is_complete(PROFILE_COMPLETE_THRESHOLD - 1));
        assert!(is_complete(PROFILE_COMPLETE_THRESHOLD));
        assert!(is_complete(100));
    }
}
