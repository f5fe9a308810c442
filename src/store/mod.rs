//! Access to the platform document store.
//!
//! Everything the client persists lives behind [`PlatformStore`]: user
//! documents, match suggestions, and chat messages. The production
//! implementation is [`RestStore`]; tests and offline tooling use
//! [`MemoryStore`]. Absent documents read back as `Ok(None)`, never as an
//! error.

use async_trait::async_trait;

use crate::documents::{MatchRecord, MessageRecord, UserPatch, UserRecord};

pub mod memory;
pub mod rest;

pub use memory::MemoryStore;
pub use rest::RestStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Transport(String),
    #[error("store denied the request: {0}")]
    Denied(String),
    #[error("store returned malformed data: {0}")]
    Malformed(String),
    #[error("document {0} does not exist")]
    Missing(String),
}

/// Document interface to the collaboration platform, keyed by identity
/// id. Concurrency control is the store's concern: concurrent writers
/// resolve last-write-wins, and callers do not retry on conflict.
#[async_trait]
pub trait PlatformStore: Send + Sync {
    /// Fetches one user document. Absence is `Ok(None)`.
    async fn fetch_user(&self, id: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Writes a complete user document, replacing any existing one.
    async fn put_user(&self, record: &UserRecord) -> Result<(), StoreError>;

    /// Applies a partial update. Fields absent from the patch are left
    /// untouched; updating a missing document is [`StoreError::Missing`].
    async fn update_user(&self, id: &str, patch: &UserPatch) -> Result<(), StoreError>;

    /// Lists user documents other than `excluding`, up to `limit`.
    async fn list_users(
        &self,
        excluding: &str,
        limit: usize,
    ) -> Result<Vec<UserRecord>, StoreError>;

    /// Lists stored match suggestions for a user.
    async fn list_matches(&self, user_id: &str) -> Result<Vec<MatchRecord>, StoreError>;

    /// Appends a chat message and returns the stored form, with id and
    /// send time assigned by the store.
    async fn append_message(&self, message: &MessageRecord) -> Result<MessageRecord, StoreError>;

    /// Lists every message between two users, oldest first.
    async fn list_conversation(
        &self,
        first: &str,
        second: &str,
    ) -> Result<Vec<MessageRecord>, StoreError>;
}
