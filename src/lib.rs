//! Client core for Crewmatch, a platform that matches people for
//! project collaboration.
//!
//! This crate is the layer between a UI shell and the platform's three
//! hosted collaborators: authentication, the document store, and the
//! generative assistant. It owns everything those surfaces share, so a
//! profile fetched for the session, listed in the peer feed, or joined
//! into a match renders identically everywhere:
//!
//! - [`profile`] normalizes arbitrarily sparse user documents into
//!   fully-populated [`Profile`]s and scores their completeness.
//! - [`session`] runs the signed-in user's profile lifecycle as a
//!   worker task, driven by [`auth`] sign-in events.
//! - [`feed`] and [`chat`] are the discovery and messaging surfaces.
//! - [`store`] and [`assistant`] wrap the hosted document API and text
//!   model; both degrade instead of blocking the UI.
//!
//! Wiring starts from [`ClientConfig::load`] and [`ClientState::new`];
//! tests inject [`store::MemoryStore`] through
//! [`ClientState::with_store`].

use tracing_subscriber::EnvFilter;

pub mod assistant;
pub mod auth;
pub mod chat;
pub mod config;
pub mod documents;
pub mod feed;
pub mod models;
pub mod profile;
pub mod session;
pub mod state;
pub mod store;

pub use crate::auth::{AuthBridge, Identity};
pub use crate::config::ClientConfig;
pub use crate::models::matches::MatchView;
pub use crate::models::user::Profile;
pub use crate::session::{SessionHandle, SessionState};
pub use crate::state::ClientState;

/// Installs the process-wide tracing subscriber. The embedding shell
/// calls this once at startup, before building a [`ClientState`].
pub fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    assert!(!filter.is_empty(), "Tracing filter must not be empty");
    assert!(filter.len() < 256, "Tracing filter length exceeds bounds");

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .compact()
        .init();
}
