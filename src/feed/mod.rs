//! Discovery feeds: browsable peers and the precomputed match list.
//!
//! Matching itself happens on the platform. This module only joins what
//! the store hands back into display-ready views, pushing every peer
//! document through the same normalizer the session uses so a sparse
//! document renders identically everywhere.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::assistant::fallback;
use crate::models::matches::MatchView;
use crate::models::user::Profile;
use crate::profile;
use crate::state::ClientState;
use crate::store::StoreError;

/// Most peer documents one feed page may request.
pub const MAX_PEER_LIMIT: usize = 100;

/// Lists other users as normalized profiles, newest store order
/// preserved. Results are cached per viewer and page size.
pub async fn peers(
    state: &ClientState,
    viewer_id: &str,
    limit: usize,
) -> Result<Arc<Vec<Profile>>, StoreError> {
    assert!(!viewer_id.trim().is_empty(), "Viewer id must be provided");
    assert!(limit > 0, "Peer limit must be positive");
    assert!(limit <= MAX_PEER_LIMIT, "Peer limit exceeds defensive bound");

    let cache_key = format!("{viewer_id}::{limit}");
    if let Some(cached) = state.cache.peers.get(&cache_key).await {
        debug!(viewer = %viewer_id, "Peer feed served from cache");
        return Ok(cached);
    }

    let records = state.store.list_users(viewer_id, limit).await?;
    let now = Utc::now();
    let mut profiles = Vec::with_capacity(records.len());
    for record in &records {
        if record.id.trim().is_empty() {
            warn!("Skipping peer document without an id");
            continue;
        }
        profiles.push(profile::normalize_peer(record, now));
    }

    let profiles = Arc::new(profiles);
    state
        .cache
        .peers
        .insert(cache_key, Arc::clone(&profiles))
        .await;
    Ok(profiles)
}

/// Joins the viewer's precomputed match suggestions with normalized
/// peer profiles, best match first. Compatibility arrives from the
/// platform and is clamped to 0..=100 for display; insight text comes
/// from the stored record when present, otherwise from the assistant.
pub async fn match_feed(
    state: &ClientState,
    viewer: &Profile,
) -> Result<Arc<Vec<MatchView>>, StoreError> {
    assert!(!viewer.id.trim().is_empty(), "Viewer id must be provided");

    if let Some(cached) = state.cache.match_feed.get(&viewer.id).await {
        debug!(viewer = %viewer.id, "Match feed served from cache");
        return Ok(cached);
    }

    let records = state.store.list_matches(&viewer.id).await?;
    let now = Utc::now();
    let mut views = Vec::with_capacity(records.len());
    for record in records {
        let peer = match state.store.fetch_user(&record.matched_user_id).await {
            Ok(Some(peer)) if !peer.id.trim().is_empty() => profile::normalize_peer(&peer, now),
            Ok(_) => {
                warn!(
                    matched = %record.matched_user_id,
                    "Skipping match without a peer document"
                );
                continue;
            }
            Err(err) => {
                warn!(
                    matched = %record.matched_user_id,
                    "Skipping match; peer fetch failed: {err}"
                );
                continue;
            }
        };

        let compatibility = record.compatibility.clamp(0, 100) as u8;
        let common_skills = match record.common_skills {
            Some(skills) if !skills.is_empty() => skills,
            _ => fallback::shared_skills(&viewer.skills, &peer.skills),
        };
        let reason = match record.reason {
            Some(reason) if !reason.trim().is_empty() => reason,
            _ => state.assistant.match_insight(viewer, &peer).await,
        };

        views.push(MatchView {
            user: peer,
            compatibility,
            reason,
            common_skills,
            matched_at: record.created_at.unwrap_or(now),
        });
    }

    views.sort_by(|a, b| b.compatibility.cmp(&a.compatibility));

    let views = Arc::new(views);
    state
        .cache
        .match_feed
        .insert(viewer.id.clone(), Arc::clone(&views))
        .await;
    Ok(views)
}
