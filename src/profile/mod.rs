//! Turns sparse stored user documents into fully-populated profiles.
//!
//! The contract consumers rely on: once a [`Profile`] exists, every field
//! holds a concrete value. Missing, blank, or malformed stored data is
//! absorbed here, never surfaced as an error.

pub mod avatar;
pub mod defaults;
pub mod strength;

use chrono::{DateTime, Utc};

use crate::auth::Identity;
use crate::documents::{LocationRecord, PreferencesRecord, UserRecord};
use crate::models::user::{Experience, ExternalLinks, Location, Preferences, Profile};

use defaults::{
    DEFAULT_BIO, DEFAULT_CITY, DEFAULT_COUNTRY, DEFAULT_EXPERIENCE, DEFAULT_TITLE,
    FALLBACK_DISPLAY_NAME, NEW_USER_DISPLAY_NAME, default_interests, default_preferences,
    default_skills,
};

pub const MAX_DISPLAY_NAME_LEN: usize = 64;
pub const MAX_BIO_LEN: usize = 500;
pub const MAX_LIST_ITEMS: usize = 32;

/// Normalizes a stored record (possibly absent) against the signed-in
/// identity. Pure and total: any input produces a fully-populated
/// profile. Field resolution order is stored value, then identity-derived
/// value, then static fallback; first non-blank wins.
pub fn normalize(record: Option<&UserRecord>, identity: &Identity, now: DateTime<Utc>) -> Profile {
    build(record, identity, FALLBACK_DISPLAY_NAME, now)
}

/// Builds the profile seeded into the store the first time an identity
/// signs in and no record exists yet. Identity-derived fields and static
/// fallbacks only.
pub fn initial_profile(identity: &Identity, now: DateTime<Utc>) -> Profile {
    build(None, identity, NEW_USER_DISPLAY_NAME, now)
}

/// Normalizes another user's record for feed display. Peers carry no auth
/// identity of their own, so identity-derived values come from the record
/// itself.
pub fn normalize_peer(record: &UserRecord, now: DateTime<Utc>) -> Profile {
    let identity = Identity {
        id: record.id.clone(),
        email: record.email.clone().unwrap_or_default(),
        display_name: None,
        photo_url: None,
    };
    build(Some(record), &identity, FALLBACK_DISPLAY_NAME, now)
}

/// Expands a profile back into the full stored-document shape, for the
/// initial seed write. Blank links are omitted rather than stored empty.
pub fn to_record(profile: &Profile) -> UserRecord {
    UserRecord {
        id: profile.id.clone(),
        email: non_blank(Some(&profile.email)),
        display_name: Some(profile.display_name.clone()),
        photo_url: Some(profile.photo_url.clone()),
        title: Some(profile.title.clone()),
        bio: Some(profile.bio.clone()),
        skills: Some(profile.skills.clone()),
        interests: Some(profile.interests.clone()),
        experience: Some(profile.experience.as_str().to_string()),
        location: Some(LocationRecord {
            city: Some(profile.location.city.clone()),
            country: Some(profile.location.country.clone()),
        }),
        github: non_blank(Some(&profile.links.github)),
        linkedin: non_blank(Some(&profile.links.linkedin)),
        portfolio: non_blank(Some(&profile.links.portfolio)),
        preferences: Some(PreferencesRecord {
            availability: Some(profile.preferences.availability.clone()),
            timezone: Some(profile.preferences.timezone.clone()),
            roles: Some(profile.preferences.roles.clone()),
            communication: Some(profile.preferences.communication.clone()),
            hackathon_preference: Some(profile.preferences.hackathon_preference.clone()),
            remote_work: Some(profile.preferences.remote_work),
            max_distance_km: Some(profile.preferences.max_distance_km),
            work_style: Some(profile.preferences.work_style.clone()),
            personality_tags: Some(profile.preferences.personality_tags.clone()),
            coding_hours: Some(profile.preferences.coding_hours.clone()),
            collaboration_style: Some(profile.preferences.collaboration_style.clone()),
            project_pace: Some(profile.preferences.project_pace.clone()),
        }),
        profile_strength: Some(profile.profile_strength as i64),
        is_profile_complete: Some(profile.is_profile_complete),
        created_at: Some(profile.created_at),
        updated_at: Some(profile.updated_at),
        last_active: Some(profile.last_active),
    }
}

fn build(
    record: Option<&UserRecord>,
    identity: &Identity,
    name_fallback: &str,
    now: DateTime<Utc>,
) -> Profile {
    assert!(
        !identity.id.trim().is_empty(),
        "Identity id cannot be empty"
    );

    let empty = UserRecord::default();
    let record = record.unwrap_or(&empty);

    let id = identity.id.trim().to_string();
    let email = non_blank(record.email.as_deref())
        .or_else(|| non_blank(Some(&identity.email)))
        .unwrap_or_default();

    let display_name = clean_text(record.display_name.as_deref(), MAX_DISPLAY_NAME_LEN)
        .or_else(|| clean_text(identity.display_name.as_deref(), MAX_DISPLAY_NAME_LEN))
        .unwrap_or_else(|| name_fallback.to_string());

    let avatar_seed = if email.is_empty() { &id } else { &email };
    let photo_url = non_blank(record.photo_url.as_deref())
        .or_else(|| non_blank(identity.photo_url.as_deref()))
        .unwrap_or_else(|| avatar::avatar_for(avatar_seed).to_string());

    let location = record.location.as_ref();
    let mut profile = Profile {
        id,
        email,
        display_name,
        photo_url,
        title: non_blank(record.title.as_deref()).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        bio: clean_text(record.bio.as_deref(), MAX_BIO_LEN)
            .unwrap_or_else(|| DEFAULT_BIO.to_string()),
        skills: clean_list(record.skills.as_deref()).unwrap_or_else(default_skills),
        interests: clean_list(record.interests.as_deref()).unwrap_or_else(default_interests),
        experience: record
            .experience
            .as_deref()
            .and_then(Experience::parse)
            .unwrap_or(DEFAULT_EXPERIENCE),
        location: Location {
            city: location
                .and_then(|l| non_blank(l.city.as_deref()))
                .unwrap_or_else(|| DEFAULT_CITY.to_string()),
            country: location
                .and_then(|l| non_blank(l.country.as_deref()))
                .unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
        },
        links: ExternalLinks {
            github: non_blank(record.github.as_deref()).unwrap_or_default(),
            linkedin: non_blank(record.linkedin.as_deref()).unwrap_or_default(),
            portfolio: non_blank(record.portfolio.as_deref()).unwrap_or_default(),
        },
        preferences: merge_preferences(record.preferences.as_ref()),
        profile_strength: 0,
        is_profile_complete: false,
        created_at: record.created_at.unwrap_or(now),
        updated_at: record.updated_at.unwrap_or(now),
        last_active: record.last_active.unwrap_or(now),
    };

    // Stored scores may be stale; the local scorer is authoritative.
    profile.profile_strength = strength::score(&profile);
    profile.is_profile_complete = strength::is_complete(profile.profile_strength);
    profile
}

/// Deep merge: each subfield falls back independently, so a stored bag
/// with only `availability` set still gets defaults for everything else.
fn merge_preferences(stored: Option<&PreferencesRecord>) -> Preferences {
    let defaults = default_preferences();
    let Some(stored) = stored else {
        return defaults;
    };

    Preferences {
        availability: non_blank(stored.availability.as_deref()).unwrap_or(defaults.availability),
        timezone: non_blank(stored.timezone.as_deref()).unwrap_or(defaults.timezone),
        roles: clean_list(stored.roles.as_deref()).unwrap_or(defaults.roles),
        communication: non_blank(stored.communication.as_deref())
            .unwrap_or(defaults.communication),
        hackathon_preference: non_blank(stored.hackathon_preference.as_deref())
            .unwrap_or(defaults.hackathon_preference),
        remote_work: stored.remote_work.unwrap_or(defaults.remote_work),
        max_distance_km: stored.max_distance_km.unwrap_or(defaults.max_distance_km),
        work_style: clean_list(stored.work_style.as_deref()).unwrap_or(defaults.work_style),
        personality_tags: clean_list(stored.personality_tags.as_deref())
            .unwrap_or(defaults.personality_tags),
        coding_hours: non_blank(stored.coding_hours.as_deref()).unwrap_or(defaults.coding_hours),
        collaboration_style: non_blank(stored.collaboration_style.as_deref())
            .unwrap_or(defaults.collaboration_style),
        project_pace: non_blank(stored.project_pace.as_deref()).unwrap_or(defaults.project_pace),
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

fn clean_text(value: Option<&str>, max_len: usize) -> Option<String> {
    assert!(max_len > 0, "Text cap must be > 0");
    let cleaned = non_blank(value)?;
    if cleaned.chars().count() > max_len {
        return Some(cleaned.chars().take(max_len).collect());
    }
    Some(cleaned)
}

fn clean_list(values: Option<&[String]>) -> Option<Vec<String>> {
    let cleaned: Vec<String> = values?
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .take(MAX_LIST_ITEMS)
        .map(str::to_string)
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Some(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn identity(id: &str, email: &str) -> Identity {
        Identity {
            id: id.to_string(),
            email: email.to_string(),
            display_name: None,
            photo_url: None,
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn absent_record_yields_fully_populated_profile() {
        let profile = initial_profile(&identity("user-1", "ada@example.com"), fixed_now());

        assert_eq!(profile.id, "user-1");
        assert_eq!(profile.email, "ada@example.com");
        assert_eq!(profile.display_name, NEW_USER_DISPLAY_NAME);
        assert_eq!(profile.title, DEFAULT_TITLE);
        assert_eq!(profile.bio, DEFAULT_BIO);
        assert_eq!(profile.skills, default_skills());
        assert_eq!(profile.interests, default_interests());
        assert_eq!(profile.experience, DEFAULT_EXPERIENCE);
        assert_eq!(profile.location.city, DEFAULT_CITY);
        assert!(!profile.photo_url.is_empty());
        assert_eq!(profile.preferences, default_preferences());
        assert_eq!(profile.profile_strength, strength::BASE_SCORE);
        assert!(!profile.is_profile_complete);
        assert_eq!(profile.created_at, fixed_now());
        assert_eq!(profile.last_active, fixed_now());
    }

    #[test]
    fn record_values_win_over_identity_and_fallbacks() {
        let mut author = identity("user-2", "grace@example.com");
        author.display_name = Some("Grace from Auth".to_string());
        author.photo_url = Some("https://auth.example.com/grace.png".to_string());

        let record = UserRecord {
            id: "user-2".to_string(),
            display_name: Some("Grace".to_string()),
            photo_url: Some("https://cdn.example.com/grace.jpg".to_string()),
            bio: Some("Ships compilers.".to_string()),
            ..UserRecord::default()
        };

        let profile = normalize(Some(&record), &author, fixed_now());
        assert_eq!(profile.display_name, "Grace");
        assert_eq!(profile.photo_url, "https://cdn.example.com/grace.jpg");
        assert_eq!(profile.bio, "Ships compilers.");
    }

    #[test]
    fn identity_values_win_over_static_fallbacks() {
        let mut author = identity("user-3", "lin@example.com");
        author.display_name = Some("Lin".to_string());
        author.photo_url = Some("https://auth.example.com/lin.png".to_string());

        let profile = normalize(None, &author, fixed_now());
        assert_eq!(profile.display_name, "Lin");
        assert_eq!(profile.photo_url, "https://auth.example.com/lin.png");
    }

    #[test]
    fn preferences_merge_per_subfield() {
        let record = UserRecord {
            id: "user-4".to_string(),
            preferences: Some(PreferencesRecord {
                availability: Some("Weekends only".to_string()),
                ..PreferencesRecord::default()
            }),
            ..UserRecord::default()
        };

        let profile = normalize(Some(&record), &identity("user-4", ""), fixed_now());
        assert_eq!(profile.preferences.availability, "Weekends only");
        assert_eq!(profile.preferences.timezone, defaults::DEFAULT_TIMEZONE);
        assert_eq!(
            profile.preferences.communication,
            defaults::DEFAULT_COMMUNICATION
        );
        assert_eq!(profile.preferences.remote_work, defaults::DEFAULT_REMOTE_WORK);
    }

    #[test]
    fn blank_and_oversized_values_are_absorbed() {
        let record = UserRecord {
            id: "user-5".to_string(),
            display_name: Some("   ".to_string()),
            bio: Some("b".repeat(MAX_BIO_LEN * 2)),
            skills: Some(vec!["  ".to_string(), String::new()]),
            ..UserRecord::default()
        };

        let profile = normalize(Some(&record), &identity("user-5", ""), fixed_now());
        assert_eq!(profile.display_name, FALLBACK_DISPLAY_NAME);
        assert_eq!(profile.bio.chars().count(), MAX_BIO_LEN);
        assert_eq!(profile.skills, default_skills());
    }

    #[test]
    fn avatar_is_seeded_by_email_then_id() {
        let by_email = normalize(None, &identity("user-6", "ada@example.com"), fixed_now());
        assert_eq!(by_email.photo_url, avatar::avatar_for("ada@example.com"));

        let by_id = normalize(None, &identity("user-6", ""), fixed_now());
        assert_eq!(by_id.photo_url, avatar::avatar_for("user-6"));
    }

    #[test]
    fn stored_strength_is_recomputed_not_copied() {
        let record = UserRecord {
            id: "user-7".to_string(),
            profile_strength: Some(99),
            is_profile_complete: Some(true),
            ..UserRecord::default()
        };

        let profile = normalize(Some(&record), &identity("user-7", ""), fixed_now());
        assert_eq!(profile.profile_strength, strength::BASE_SCORE);
        assert!(!profile.is_profile_complete);
    }

    #[test]
    fn stored_timestamps_are_preserved() {
        let created = Utc
            .with_ymd_and_hms(2024, 1, 15, 8, 30, 0)
            .single()
            .expect("valid timestamp");
        let record = UserRecord {
            id: "user-8".to_string(),
            created_at: Some(created),
            ..UserRecord::default()
        };

        let profile = normalize(Some(&record), &identity("user-8", ""), fixed_now());
        assert_eq!(profile.created_at, created);
        assert_eq!(profile.updated_at, fixed_now());
    }

    #[test]
    fn normalization_is_idempotent() {
        let record = UserRecord {
            id: "user-9".to_string(),
            display_name: Some("Niko".to_string()),
            bio: Some("Builds storage engines.".to_string()),
            skills: Some(vec!["Rust".to_string(), "RocksDB".to_string()]),
            github: Some("https://github.com/niko".to_string()),
            ..UserRecord::default()
        };
        let author = identity("user-9", "niko@example.com");

        let first = normalize(Some(&record), &author, fixed_now());
        let second = normalize(Some(&to_record(&first)), &author, fixed_now());
        assert_eq!(first, second);
    }

    #[test]
    fn experience_parses_leniently() {
        let record = UserRecord {
            id: "user-10".to_string(),
            experience: Some("  ADVANCED ".to_string()),
            ..UserRecord::default()
        };
        let profile = normalize(Some(&record), &identity("user-10", ""), fixed_now());
        assert_eq!(profile.experience, Experience::Advanced);

        let garbled = UserRecord {
            id: "user-10".to_string(),
            experience: Some("wizard".to_string()),
            ..UserRecord::default()
        };
        let profile = normalize(Some(&garbled), &identity("user-10", ""), fixed_now());
        assert_eq!(profile.experience, DEFAULT_EXPERIENCE);
    }

    #[test]
    fn peer_records_normalize_without_an_identity() {
        let record = UserRecord {
            id: "peer-1".to_string(),
            email: Some("peer@example.com".to_string()),
            ..UserRecord::default()
        };
        let profile = normalize_peer(&record, fixed_now());
        assert_eq!(profile.id, "peer-1");
        assert_eq!(profile.display_name, FALLBACK_DISPLAY_NAME);
        assert_eq!(profile.photo_url, avatar::avatar_for("peer@example.com"));
    }
}
