//! The signed-in user's profile session.
//!
//! A [`SessionWorker`] task owns the lifecycle of the local user's
//! profile: it watches the auth bridge for sign-in and sign-out, loads
//! or creates the user document on sign-in, applies profile updates,
//! and publishes every transition over a watch channel. UI layers hold
//! a [`SessionHandle`] and treat the published [`SessionState`] as the
//! single source of truth.
//!
//! Store outages never leave the session empty. A failed load degrades
//! to a fully populated default profile so screens keep rendering, and
//! a failed update leaves the held profile untouched.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use crate::auth::Identity;
use crate::documents::UserPatch;
use crate::models::user::Profile;
use crate::profile;
use crate::state::{ClientState, FeedCache};
use crate::store::{PlatformStore, StoreError};

const COMMAND_BUFFER: usize = 16;

/// What the session currently knows about the local user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No identity. Nothing to show and nothing to update.
    SignedOut,
    /// The profile document is being fetched.
    Loading,
    /// The profile reflects the last successful store round trip.
    Ready { profile: Profile },
    /// The store was unreachable; `profile` is built from the identity
    /// and platform defaults so the UI still has something to render.
    Degraded { profile: Profile, reason: String },
}

impl SessionState {
    pub fn profile(&self) -> Option<&Profile> {
        match self {
            SessionState::SignedOut | SessionState::Loading => None,
            SessionState::Ready { profile } => Some(profile),
            SessionState::Degraded { profile, .. } => Some(profile),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no user is signed in")]
    SignedOut,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("session worker is no longer running")]
    Closed,
}

enum SessionCommand {
    Refresh,
    Update {
        patch: UserPatch,
        reply: oneshot::Sender<Result<Profile, SessionError>>,
    },
}

/// Spawns the session worker and returns a handle to it. The worker
/// runs until every handle is dropped and the auth bridge is gone.
pub fn spawn(state: &ClientState) -> SessionHandle {
    let (state_tx, state_rx) = watch::channel(SessionState::SignedOut);
    let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
    let worker = SessionWorker {
        store: Arc::clone(&state.store),
        cache: Arc::clone(&state.cache),
        auth: state.auth.subscribe(),
        state: state_tx,
        commands: command_rx,
    };
    tokio::spawn(worker.run());
    SessionHandle {
        state: state_rx,
        commands: command_tx,
    }
}

/// Cheap to clone; all clones talk to the same worker.
#[derive(Clone)]
pub struct SessionHandle {
    state: watch::Receiver<SessionState>,
    commands: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Watch receiver for state transitions, for UI layers that rerender
    /// on change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }

    /// Asks the worker to re-fetch the profile document. The session
    /// passes through [`SessionState::Loading`] while the fetch is in
    /// flight.
    pub async fn refresh(&self) -> Result<(), SessionError> {
        self.commands
            .send(SessionCommand::Refresh)
            .await
            .map_err(|_| SessionError::Closed)
    }

    /// Applies a partial profile update. The write is followed by a
    /// refetch, and the profile the session then holds is returned.
    /// Fields absent from the patch are never written, so concurrent
    /// edits to other fields survive.
    pub async fn update(&self, patch: UserPatch) -> Result<Profile, SessionError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(SessionCommand::Update { patch, reply })
            .await
            .map_err(|_| SessionError::Closed)?;
        response.await.map_err(|_| SessionError::Closed)?
    }
}

struct SessionWorker {
    store: Arc<dyn PlatformStore>,
    cache: Arc<FeedCache>,
    auth: watch::Receiver<Option<Identity>>,
    state: watch::Sender<SessionState>,
    commands: mpsc::Receiver<SessionCommand>,
}

impl SessionWorker {
    async fn run(mut self) {
        info!("Starting session worker loop");

        // The bridge may already hold an identity from before this
        // worker subscribed; changed() alone would never see it.
        let initial = self.auth.borrow_and_update().clone();
        if let Some(identity) = initial {
            self.reload(&identity).await;
        }

        loop {
            tokio::select! {
                changed = self.auth.changed() => {
                    match changed {
                        Ok(()) => {
                            let identity = self.auth.borrow_and_update().clone();
                            self.auth_changed(identity).await;
                        }
                        Err(_) => {
                            warn!("Auth channel closed unexpectedly. Exiting session loop");
                            break;
                        }
                    }
                }
                command = self.commands.recv() => {
                    match command {
                        Some(SessionCommand::Refresh) => self.refresh().await,
                        Some(SessionCommand::Update { patch, reply }) => {
                            let result = self.apply_update(patch).await;
                            let _ = reply.send(result);
                        }
                        None => {
                            debug!("All session handles dropped. Exiting session loop");
                            break;
                        }
                    }
                }
            }
        }
    }

    async fn auth_changed(&mut self, identity: Option<Identity>) {
        match identity {
            Some(identity) => {
                info!(user = %identity.id, "Identity changed; loading profile");
                self.reload(&identity).await;
            }
            None => {
                info!("Identity cleared; dropping session state");
                self.cache.clear();
                self.state.send_replace(SessionState::SignedOut);
            }
        }
    }

    /// Fetches the user document and publishes the outcome, passing
    /// through `Loading` while the fetch is in flight. A missing
    /// document means first sign-in: a default profile is written back
    /// so peers can discover the user immediately.
    async fn reload(&mut self, identity: &Identity) {
        self.state.send_replace(SessionState::Loading);
        let now = Utc::now();
        match self.store.fetch_user(&identity.id).await {
            Ok(Some(record)) => {
                let user = profile::normalize(Some(&record), identity, now);
                info!(user = %identity.id, "Session profile loaded");
                self.state.send_replace(SessionState::Ready { profile: user });
            }
            Ok(None) => {
                let user = profile::initial_profile(identity, now);
                let record = profile::to_record(&user);
                match self.store.put_user(&record).await {
                    Ok(()) => {
                        info!(user = %identity.id, "Created profile document on first sign-in");
                        self.state.send_replace(SessionState::Ready { profile: user });
                    }
                    Err(err) => {
                        warn!(user = %identity.id, "Profile creation failed; serving defaults: {err}");
                        self.state.send_replace(SessionState::Degraded {
                            profile: user,
                            reason: err.to_string(),
                        });
                    }
                }
            }
            Err(err) => {
                warn!(user = %identity.id, "Profile fetch failed; serving defaults: {err}");
                let user = profile::normalize(None, identity, now);
                self.state.send_replace(SessionState::Degraded {
                    profile: user,
                    reason: err.to_string(),
                });
            }
        }
    }

    async fn refresh(&mut self) {
        let identity = self.auth.borrow().clone();
        match identity {
            Some(identity) => self.reload(&identity).await,
            None => debug!("Ignoring refresh without an active identity"),
        }
    }

    async fn apply_update(&mut self, patch: UserPatch) -> Result<Profile, SessionError> {
        let identity = self
            .auth
            .borrow()
            .clone()
            .ok_or(SessionError::SignedOut)?;
        let held = self.state.borrow().profile().cloned();
        let Some(held) = held else {
            return Err(SessionError::SignedOut);
        };
        if patch.is_empty() {
            debug!("Ignoring empty profile patch");
            return Ok(held);
        }

        self.store.update_user(&identity.id, &patch).await?;
        info!(user = %identity.id, "Profile updated");
        self.cache.invalidate_matches(&identity.id).await;

        // The store owns merge semantics and server-assigned fields, so
        // read its view back instead of patching the held profile locally.
        self.reload(&identity).await;
        match self.state.borrow().profile() {
            Some(profile) => Ok(profile.clone()),
            None => Err(SessionError::SignedOut),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::assistant::Assistant;
    use crate::config::CacheConfig;
    use crate::documents::{MatchRecord, MessageRecord, UserRecord};
    use crate::profile::defaults::{DEFAULT_TITLE, NEW_USER_DISPLAY_NAME};
    use crate::profile::strength::BASE_SCORE;
    use crate::store::MemoryStore;

    struct FailingStore;

    #[async_trait]
    impl PlatformStore for FailingStore {
        async fn fetch_user(&self, _id: &str) -> Result<Option<UserRecord>, StoreError> {
            Err(StoreError::Transport("store offline".into()))
        }

        async fn put_user(&self, _record: &UserRecord) -> Result<(), StoreError> {
            Err(StoreError::Transport("store offline".into()))
        }

        async fn update_user(&self, _id: &str, _patch: &UserPatch) -> Result<(), StoreError> {
            Err(StoreError::Transport("store offline".into()))
        }

        async fn list_users(
            &self,
            _excluding: &str,
            _limit: usize,
        ) -> Result<Vec<UserRecord>, StoreError> {
            Err(StoreError::Transport("store offline".into()))
        }

        async fn list_matches(&self, _user_id: &str) -> Result<Vec<MatchRecord>, StoreError> {
            Err(StoreError::Transport("store offline".into()))
        }

        async fn append_message(
            &self,
            _message: &MessageRecord,
        ) -> Result<MessageRecord, StoreError> {
            Err(StoreError::Transport("store offline".into()))
        }

        async fn list_conversation(
            &self,
            _first: &str,
            _second: &str,
        ) -> Result<Vec<MessageRecord>, StoreError> {
            Err(StoreError::Transport("store offline".into()))
        }
    }

    fn client_state(store: Arc<dyn PlatformStore>) -> ClientState {
        ClientState::with_store(store, Assistant::disabled(), &CacheConfig::default())
    }

    fn identity(id: &str, email: &str) -> Identity {
        Identity {
            id: id.into(),
            email: email.into(),
            display_name: None,
            photo_url: None,
        }
    }

    async fn wait_for<F>(rx: &mut watch::Receiver<SessionState>, mut accept: F) -> SessionState
    where
        F: FnMut(&SessionState) -> bool,
    {
        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                if accept(&rx.borrow()) {
                    return rx.borrow().clone();
                }
                rx.changed().await.unwrap();
            }
        })
        .await
        .expect("session did not reach the expected state")
    }

    #[tokio::test]
    async fn first_sign_in_creates_profile_document() {
        let store = Arc::new(MemoryStore::new());
        let state = client_state(store.clone());
        let session = spawn(&state);
        let mut rx = session.subscribe();

        assert_eq!(session.state(), SessionState::SignedOut);
        state.auth.signed_in(identity("user-1", "dana@example.com"));

        let reached = wait_for(&mut rx, |s| matches!(s, SessionState::Ready { .. })).await;
        let profile = reached.profile().unwrap();
        assert_eq!(profile.display_name, NEW_USER_DISPLAY_NAME);
        assert_eq!(profile.title, DEFAULT_TITLE);
        assert_eq!(profile.profile_strength, BASE_SCORE);
        assert!(!profile.is_profile_complete);

        let stored = store.fetch_user("user-1").await.unwrap().unwrap();
        assert_eq!(stored.display_name.as_deref(), Some(NEW_USER_DISPLAY_NAME));
        assert_eq!(stored.email.as_deref(), Some("dana@example.com"));
    }

    #[tokio::test]
    async fn existing_document_loads_as_ready() {
        let store = Arc::new(MemoryStore::new());
        store
            .seed_user(UserRecord {
                id: "user-2".into(),
                display_name: Some("Priya".into()),
                bio: Some("Compilers and coffee.".into()),
                ..UserRecord::default()
            })
            .await;
        let state = client_state(store);
        let session = spawn(&state);
        let mut rx = session.subscribe();

        state.auth.signed_in(identity("user-2", "priya@example.com"));

        let reached = wait_for(&mut rx, |s| matches!(s, SessionState::Ready { .. })).await;
        let profile = reached.profile().unwrap();
        assert_eq!(profile.display_name, "Priya");
        assert_eq!(profile.bio, "Compilers and coffee.");
    }

    #[tokio::test]
    async fn update_patches_only_named_fields() {
        let store = Arc::new(MemoryStore::new());
        store
            .seed_user(UserRecord {
                id: "user-3".into(),
                bio: Some("Original bio.".into()),
                ..UserRecord::default()
            })
            .await;
        let state = client_state(store.clone());
        let session = spawn(&state);
        let mut rx = session.subscribe();

        state.auth.signed_in(identity("user-3", "kim@example.com"));
        wait_for(&mut rx, |s| matches!(s, SessionState::Ready { .. })).await;

        let updated = session
            .update(UserPatch {
                skills: Some(vec!["Rust".into(), "WebAssembly".into()]),
                ..UserPatch::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.skills, vec!["Rust", "WebAssembly"]);
        assert_eq!(updated.bio, "Original bio.");

        let stored = store.fetch_user("user-3").await.unwrap().unwrap();
        assert_eq!(stored.bio.as_deref(), Some("Original bio."));
        assert_eq!(
            stored.skills,
            Some(vec!["Rust".to_string(), "WebAssembly".to_string()])
        );
    }

    #[tokio::test]
    async fn store_outage_degrades_with_default_profile() {
        let state = client_state(Arc::new(FailingStore));
        let session = spawn(&state);
        let mut rx = session.subscribe();

        state.auth.signed_in(identity("user-4", "lee@example.com"));

        let reached = wait_for(&mut rx, |s| matches!(s, SessionState::Degraded { .. })).await;
        let SessionState::Degraded { profile, reason } = reached else {
            unreachable!()
        };
        assert_eq!(profile.id, "user-4");
        assert_eq!(profile.title, DEFAULT_TITLE);
        assert!(!profile.skills.is_empty());
        assert!(reason.contains("store offline"));
    }

    #[tokio::test]
    async fn update_failure_leaves_held_profile_untouched() {
        let state = client_state(Arc::new(FailingStore));
        let session = spawn(&state);
        let mut rx = session.subscribe();

        state.auth.signed_in(identity("user-5", "ana@example.com"));
        let before = wait_for(&mut rx, |s| matches!(s, SessionState::Degraded { .. })).await;

        let result = session
            .update(UserPatch {
                bio: Some("Should not stick.".into()),
                ..UserPatch::default()
            })
            .await;

        assert!(matches!(result, Err(SessionError::Store(_))));
        assert_eq!(session.state(), before);
    }

    #[tokio::test]
    async fn sign_out_discards_session_state() {
        let store = Arc::new(MemoryStore::new());
        let state = client_state(store);
        let session = spawn(&state);
        let mut rx = session.subscribe();

        state.auth.signed_in(identity("user-6", "sam@example.com"));
        wait_for(&mut rx, |s| matches!(s, SessionState::Ready { .. })).await;

        state.auth.signed_out();
        let reached = wait_for(&mut rx, |s| matches!(s, SessionState::SignedOut)).await;
        assert!(reached.profile().is_none());

        let result = session.update(UserPatch::default()).await;
        assert!(matches!(result, Err(SessionError::SignedOut)));
    }

    #[tokio::test]
    async fn refresh_picks_up_external_edits() {
        let store = Arc::new(MemoryStore::new());
        store
            .seed_user(UserRecord {
                id: "user-7".into(),
                bio: Some("Before.".into()),
                ..UserRecord::default()
            })
            .await;
        let state = client_state(store.clone());
        let session = spawn(&state);
        let mut rx = session.subscribe();

        state.auth.signed_in(identity("user-7", "joe@example.com"));
        wait_for(&mut rx, |s| matches!(s, SessionState::Ready { .. })).await;

        store
            .seed_user(UserRecord {
                id: "user-7".into(),
                bio: Some("After.".into()),
                ..UserRecord::default()
            })
            .await;
        session.refresh().await.unwrap();

        wait_for(&mut rx, |s| {
            s.profile().is_some_and(|p| p.bio == "After.")
        })
        .await;
    }
}
