//! In-process store for tests and offline runs.
//!
//! Emulates the platform's server-assigned fields: write times and
//! message ids come from the store, never from the caller, so code under
//! test sees the same shape of data the REST store would return.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::documents::{MatchRecord, MessageRecord, UserPatch, UserRecord};

use super::{PlatformStore, StoreError};

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, UserRecord>>,
    matches: RwLock<Vec<MatchRecord>>,
    messages: RwLock<Vec<MessageRecord>>,
    next_message_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test helper: inserts a user document verbatim, without touching
    /// write times.
    pub async fn seed_user(&self, record: UserRecord) {
        assert!(!record.id.trim().is_empty(), "Seeded user needs an id");
        self.users.write().await.insert(record.id.clone(), record);
    }

    /// Test helper: inserts a match suggestion verbatim.
    pub async fn seed_match(&self, record: MatchRecord) {
        self.matches.write().await.push(record);
    }
}

#[async_trait]
impl PlatformStore for MemoryStore {
    async fn fetch_user(&self, id: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn put_user(&self, record: &UserRecord) -> Result<(), StoreError> {
        assert!(!record.id.trim().is_empty(), "User record id cannot be empty");
        let now = Utc::now();
        let mut stored = record.clone();
        if stored.created_at.is_none() {
            stored.created_at = Some(now);
        }
        stored.updated_at = Some(now);
        stored.last_active = Some(now);
        self.users.write().await.insert(stored.id.clone(), stored);
        Ok(())
    }

    async fn update_user(&self, id: &str, patch: &UserPatch) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let Some(existing) = users.get_mut(id) else {
            return Err(StoreError::Missing(id.to_string()));
        };

        if let Some(display_name) = &patch.display_name {
            existing.display_name = Some(display_name.clone());
        }
        if let Some(photo_url) = &patch.photo_url {
            existing.photo_url = Some(photo_url.clone());
        }
        if let Some(title) = &patch.title {
            existing.title = Some(title.clone());
        }
        if let Some(bio) = &patch.bio {
            existing.bio = Some(bio.clone());
        }
        if let Some(skills) = &patch.skills {
            existing.skills = Some(skills.clone());
        }
        if let Some(interests) = &patch.interests {
            existing.interests = Some(interests.clone());
        }
        if let Some(experience) = &patch.experience {
            existing.experience = Some(experience.clone());
        }
        if let Some(location) = &patch.location {
            existing.location = Some(location.clone());
        }
        if let Some(github) = &patch.github {
            existing.github = Some(github.clone());
        }
        if let Some(linkedin) = &patch.linkedin {
            existing.linkedin = Some(linkedin.clone());
        }
        if let Some(portfolio) = &patch.portfolio {
            existing.portfolio = Some(portfolio.clone());
        }
        if let Some(preferences) = &patch.preferences {
            existing.preferences = Some(preferences.clone());
        }
        if let Some(profile_strength) = patch.profile_strength {
            existing.profile_strength = Some(profile_strength);
        }
        if let Some(is_profile_complete) = patch.is_profile_complete {
            existing.is_profile_complete = Some(is_profile_complete);
        }

        let now = Utc::now();
        existing.updated_at = Some(now);
        existing.last_active = Some(now);
        Ok(())
    }

    async fn list_users(
        &self,
        excluding: &str,
        limit: usize,
    ) -> Result<Vec<UserRecord>, StoreError> {
        let users = self.users.read().await;
        let mut listed: Vec<UserRecord> = users
            .values()
            .filter(|record| record.id != excluding)
            .cloned()
            .collect();
        listed.sort_by(|a, b| a.id.cmp(&b.id));
        listed.truncate(limit);
        Ok(listed)
    }

    async fn list_matches(&self, user_id: &str) -> Result<Vec<MatchRecord>, StoreError> {
        let matches = self.matches.read().await;
        Ok(matches
            .iter()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn append_message(&self, message: &MessageRecord) -> Result<MessageRecord, StoreError> {
        assert!(
            !message.sender_id.trim().is_empty() && !message.receiver_id.trim().is_empty(),
            "Message endpoints cannot be empty"
        );
        let sequence = self.next_message_id.fetch_add(1, Ordering::Relaxed);
        let mut stored = message.clone();
        stored.id = format!("msg-{sequence}");
        stored.sent_at = Some(Utc::now());
        self.messages.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn list_conversation(
        &self,
        first: &str,
        second: &str,
    ) -> Result<Vec<MessageRecord>, StoreError> {
        let messages = self.messages.read().await;
        let mut conversation: Vec<MessageRecord> = messages
            .iter()
            .filter(|message| {
                (message.sender_id == first && message.receiver_id == second)
                    || (message.sender_id == second && message.receiver_id == first)
            })
            .cloned()
            .collect();
        conversation.sort_by_key(|message| message.sent_at);
        Ok(conversation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::MessageKind;

    fn record(id: &str) -> UserRecord {
        UserRecord {
            id: id.to_string(),
            display_name: Some(format!("User {id}")),
            bio: Some("Original bio".to_string()),
            ..UserRecord::default()
        }
    }

    #[tokio::test]
    async fn put_then_fetch_roundtrip() {
        let store = MemoryStore::new();
        store.put_user(&record("user-1")).await.expect("put");

        let fetched = store
            .fetch_user("user-1")
            .await
            .expect("fetch")
            .expect("present");
        assert_eq!(fetched.display_name.as_deref(), Some("User user-1"));
        assert!(fetched.created_at.is_some(), "write time assigned");
        assert!(fetched.updated_at.is_some());

        assert!(store.fetch_user("ghost").await.expect("fetch").is_none());
    }

    #[tokio::test]
    async fn update_touches_only_patched_fields() {
        let store = MemoryStore::new();
        store.put_user(&record("user-2")).await.expect("put");
        let before = store
            .fetch_user("user-2")
            .await
            .expect("fetch")
            .expect("present");

        let patch = UserPatch {
            bio: Some("New bio".to_string()),
            ..UserPatch::default()
        };
        store.update_user("user-2", &patch).await.expect("update");

        let after = store
            .fetch_user("user-2")
            .await
            .expect("fetch")
            .expect("present");
        assert_eq!(after.bio.as_deref(), Some("New bio"));
        assert_eq!(after.display_name, before.display_name);
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at >= before.updated_at);
    }

    #[tokio::test]
    async fn updating_a_missing_document_is_an_error() {
        let store = MemoryStore::new();
        let outcome = store.update_user("ghost", &UserPatch::default()).await;
        assert!(matches!(outcome, Err(StoreError::Missing(id)) if id == "ghost"));
    }

    #[tokio::test]
    async fn listing_excludes_the_caller_and_honors_the_limit() {
        let store = MemoryStore::new();
        for id in ["a", "b", "c", "d"] {
            store.put_user(&record(id)).await.expect("put");
        }

        let listed = store.list_users("b", 2).await.expect("list");
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|r| r.id != "b"));
    }

    #[tokio::test]
    async fn messages_are_assigned_ids_and_ordered() {
        let store = MemoryStore::new();
        let outbound = MessageRecord {
            sender_id: "a".to_string(),
            receiver_id: "b".to_string(),
            body: "hello".to_string(),
            kind: MessageKind::User,
            ..MessageRecord::default()
        };
        let first = store.append_message(&outbound).await.expect("append");
        let reply = MessageRecord {
            sender_id: "b".to_string(),
            receiver_id: "a".to_string(),
            body: "hi back".to_string(),
            ..MessageRecord::default()
        };
        let second = store.append_message(&reply).await.expect("append");
        assert_ne!(first.id, second.id);
        assert!(first.sent_at.is_some());

        let conversation = store.list_conversation("a", "b").await.expect("list");
        assert_eq!(conversation.len(), 2);
        assert_eq!(conversation[0].body, "hello");
        assert_eq!(conversation[1].body, "hi back");

        let unrelated = store.list_conversation("a", "z").await.expect("list");
        assert!(unrelated.is_empty());
    }

    #[tokio::test]
    async fn matches_are_filtered_by_user() {
        let store = MemoryStore::new();
        store
            .seed_match(MatchRecord {
                id: "m-1".to_string(),
                user_id: "a".to_string(),
                matched_user_id: "b".to_string(),
                compatibility: 80,
                ..MatchRecord::default()
            })
            .await;
        store
            .seed_match(MatchRecord {
                id: "m-2".to_string(),
                user_id: "z".to_string(),
                matched_user_id: "b".to_string(),
                compatibility: 60,
                ..MatchRecord::default()
            })
            .await;

        let for_a = store.list_matches("a").await.expect("list");
        assert_eq!(for_a.len(), 1);
        assert_eq!(for_a[0].matched_user_id, "b");
    }
}
