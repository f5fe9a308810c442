use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use moka::future::Cache;

use crate::assistant::Assistant;
use crate::auth::AuthBridge;
use crate::config::{CacheConfig, ClientConfig};
use crate::models::matches::MatchView;
use crate::models::user::Profile;
use crate::store::{PlatformStore, RestStore};

/// Shared handles threaded through the client. Cheap to clone; every
/// clone sees the same store, caches, and auth feed.
#[derive(Clone)]
pub struct ClientState {
    pub store: Arc<dyn PlatformStore>,
    pub assistant: Assistant,
    pub cache: Arc<FeedCache>,
    pub auth: AuthBridge,
}

impl ClientState {
    /// Production wiring: REST store and (when configured) a live model.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let store = RestStore::new(&config.store)?;
        let assistant = Assistant::from_config(&config.assistant)?;
        Ok(Self::with_store(Arc::new(store), assistant, &config.cache))
    }

    /// Wiring with an explicit store implementation; tests hand in a
    /// `MemoryStore` here.
    pub fn with_store(
        store: Arc<dyn PlatformStore>,
        assistant: Assistant,
        cache: &CacheConfig,
    ) -> Self {
        Self {
            store,
            assistant,
            cache: Arc::new(FeedCache::new(cache)),
            auth: AuthBridge::new(),
        }
    }
}

pub struct FeedCache {
    pub peers: Cache<String, Arc<Vec<Profile>>>,
    pub match_feed: Cache<String, Arc<Vec<MatchView>>>,
}

impl FeedCache {
    pub fn new(config: &CacheConfig) -> Self {
        assert!(
            config.peers_max_capacity >= 16,
            "Peer cache capacity threshold"
        );
        assert!(
            config.matches_max_capacity >= 16,
            "Match cache capacity threshold"
        );

        let peers = Cache::builder()
            .max_capacity(config.peers_max_capacity)
            .time_to_live(Duration::from_secs(config.peers_ttl_seconds))
            .time_to_idle(Duration::from_secs(config.peers_ttl_seconds / 2 + 1))
            .build();

        let match_feed = Cache::builder()
            .max_capacity(config.matches_max_capacity)
            .time_to_live(Duration::from_secs(config.matches_ttl_seconds))
            .time_to_idle(Duration::from_secs(config.matches_ttl_seconds / 2 + 1))
            .build();

        Self { peers, match_feed }
    }

    /// Drops one user's cached match feed. Insight text is derived from
    /// the viewer's own profile, so a profile update stales it.
    pub async fn invalidate_matches(&self, user_id: &str) {
        self.match_feed.invalidate(user_id).await;
    }

    /// Drops every cached feed. Called on sign-out so one account's
    /// feeds never leak into the next session on the same device.
    pub fn clear(&self) {
        self.peers.invalidate_all();
        self.match_feed.invalidate_all();
    }
}
