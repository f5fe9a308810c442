//! Bridge to the external authentication collaborator.
//!
//! The host application owns the actual sign-in flow; it reports
//! sign-in/sign-out events here, and the session worker observes them
//! through a watch channel. Identities can also be extracted from a
//! provider ID token. The token is not signature-verified: it was handed
//! to this process by the provider moments ago, and nothing here grants
//! privileges beyond what the platform store itself enforces per request.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use tokio::sync::watch;
use tracing::info;

pub const MAX_ID_TOKEN_LEN: usize = 16_384;

/// The authenticated user as reported by the auth provider. `id` is
/// always present and non-blank; everything else is best-effort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("id token is not a three-part JWT")]
    MalformedToken,
    #[error("failed to decode token claims: {0}")]
    UndecodableClaims(String),
    #[error("token claims carry no subject")]
    MissingSubject,
}

impl Identity {
    /// Extracts the identity from a provider ID token. Only the claims
    /// segment is read; header and signature are ignored.
    pub fn from_id_token(token: &str) -> Result<Self, AuthError> {
        let token = token.trim();
        if token.is_empty() || token.len() > MAX_ID_TOKEN_LEN {
            return Err(AuthError::MalformedToken);
        }

        let mut segments = token.split('.');
        let (Some(_header), Some(claims), Some(_signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(AuthError::MalformedToken);
        };

        let decoded = URL_SAFE_NO_PAD
            .decode(claims)
            .map_err(|err| AuthError::UndecodableClaims(err.to_string()))?;
        let claims: TokenClaims = serde_json::from_slice(&decoded)
            .map_err(|err| AuthError::UndecodableClaims(err.to_string()))?;

        let id = claims
            .sub
            .or(claims.user_id)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(AuthError::MissingSubject)?;

        Ok(Identity {
            id,
            email: claims.email.unwrap_or_default(),
            display_name: claims.name,
            photo_url: claims.picture,
        })
    }
}

/// Fan-out point for identity-change events. Cheap to clone; all clones
/// feed the same channel.
#[derive(Debug, Clone)]
pub struct AuthBridge {
    identity: watch::Sender<Option<Identity>>,
}

impl AuthBridge {
    pub fn new() -> Self {
        let (identity, _) = watch::channel(None);
        Self { identity }
    }

    /// Announces a sign-in, replacing any previously held identity.
    pub fn signed_in(&self, identity: Identity) {
        assert!(
            !identity.id.trim().is_empty(),
            "Identity id cannot be empty"
        );
        info!(user = %identity.id, "Identity signed in");
        self.identity.send_replace(Some(identity));
    }

    /// Convenience path: extract the identity from an ID token, then
    /// announce it.
    pub fn signed_in_with_token(&self, token: &str) -> Result<Identity, AuthError> {
        let identity = Identity::from_id_token(token)?;
        self.signed_in(identity.clone());
        Ok(identity)
    }

    pub fn signed_out(&self) {
        if self.identity.send_replace(None).is_some() {
            info!("Identity signed out");
        }
    }

    pub fn current(&self) -> Option<Identity> {
        self.identity.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.identity.subscribe()
    }
}

impl Default for AuthBridge {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct TokenClaims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}
