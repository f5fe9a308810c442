//! REST implementation of the platform store.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::StoreConfig;
use crate::documents::{MatchRecord, MessageRecord, UserPatch, UserRecord};

use super::{PlatformStore, StoreError};

const MAX_LIST_LIMIT: usize = 500;
const MAX_ERROR_BODY_LEN: usize = 256;

pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: String,
    session_token: RwLock<Option<String>>,
}

impl RestStore {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        assert!(
            !config.base_url.is_empty(),
            "Store base URL must be provided"
        );
        assert!(
            config.request_timeout() >= Duration::from_millis(100),
            "Timeout below 100ms is unsafe"
        );

        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .with_context(|| format!("Failed to build store client for {}", config.base_url))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            session_token: RwLock::new(None),
        })
    }

    /// Attaches (or clears) the signed-in user's session token. Later
    /// requests carry it as a bearer credential alongside the API key.
    pub async fn attach_session_token(&self, token: Option<String>) {
        *self.session_token.write().await = token;
    }

    async fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self
            .client
            .request(method, format!("{}{path}", self.base_url));
        if !self.api_key.is_empty() {
            builder = builder.header("x-api-key", &self.api_key);
        }
        if let Some(token) = self.session_token.read().await.as_ref() {
            builder = builder.bearer_auth(token);
        }
        builder
    }
}

#[async_trait]
impl PlatformStore for RestStore {
    async fn fetch_user(&self, id: &str) -> Result<Option<UserRecord>, StoreError> {
        assert!(!id.trim().is_empty(), "User id cannot be empty");
        assert!(!id.contains('/'), "User id cannot contain '/'");

        let response = self
            .request(Method::GET, &format!("/v1/users/{id}"))
            .await
            .send()
            .await
            .map_err(transport_error)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(response).await?;
        let record: UserRecord = response
            .json()
            .await
            .map_err(|err| StoreError::Malformed(err.to_string()))?;
        debug!(user = %id, "Fetched user document");
        Ok(Some(record))
    }

    async fn put_user(&self, record: &UserRecord) -> Result<(), StoreError> {
        assert!(
            !record.id.trim().is_empty(),
            "User record id cannot be empty"
        );

        let response = self
            .request(Method::PUT, &format!("/v1/users/{}", record.id))
            .await
            .json(record)
            .send()
            .await
            .map_err(transport_error)?;
        check_status(response).await?;
        debug!(user = %record.id, "Stored user document");
        Ok(())
    }

    async fn update_user(&self, id: &str, patch: &UserPatch) -> Result<(), StoreError> {
        assert!(!id.trim().is_empty(), "User id cannot be empty");

        let response = self
            .request(Method::PATCH, &format!("/v1/users/{id}"))
            .await
            .json(patch)
            .send()
            .await
            .map_err(transport_error)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::Missing(id.to_string()));
        }
        check_status(response).await?;
        debug!(user = %id, "Patched user document");
        Ok(())
    }

    async fn list_users(
        &self,
        excluding: &str,
        limit: usize,
    ) -> Result<Vec<UserRecord>, StoreError> {
        assert!(limit > 0, "User listing limit must be positive");
        assert!(
            limit <= MAX_LIST_LIMIT,
            "User listing limit exceeds defensive bound"
        );

        let limit_param = limit.to_string();
        let response = self
            .request(Method::GET, "/v1/users")
            .await
            .query(&[("exclude", excluding), ("limit", limit_param.as_str())])
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response).await?;
        let listed: Vec<UserRecord> = response
            .json()
            .await
            .map_err(|err| StoreError::Malformed(err.to_string()))?;
        assert!(
            listed.len() <= limit,
            "Store returned more users than requested"
        );
        Ok(listed)
    }

    async fn list_matches(&self, user_id: &str) -> Result<Vec<MatchRecord>, StoreError> {
        assert!(!user_id.trim().is_empty(), "User id cannot be empty");

        let response = self
            .request(Method::GET, "/v1/matches")
            .await
            .query(&[("user", user_id)])
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|err| StoreError::Malformed(err.to_string()))
    }

    async fn append_message(&self, message: &MessageRecord) -> Result<MessageRecord, StoreError> {
        assert!(
            !message.sender_id.trim().is_empty() && !message.receiver_id.trim().is_empty(),
            "Message endpoints cannot be empty"
        );

        let response = self
            .request(Method::POST, "/v1/messages")
            .await
            .json(message)
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response).await?;
        let stored: MessageRecord = response
            .json()
            .await
            .map_err(|err| StoreError::Malformed(err.to_string()))?;
        assert!(!stored.id.is_empty(), "Store returned message without id");
        Ok(stored)
    }

    async fn list_conversation(
        &self,
        first: &str,
        second: &str,
    ) -> Result<Vec<MessageRecord>, StoreError> {
        let response = self
            .request(Method::GET, "/v1/messages")
            .await
            .query(&[("a", first), ("b", second)])
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|err| StoreError::Malformed(err.to_string()))
    }
}

async fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(StoreError::Denied(format!("status {status}")));
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let body: String = body.chars().take(MAX_ERROR_BODY_LEN).collect();
        return Err(StoreError::Transport(format!("status {status}: {body}")));
    }
    Ok(response)
}

fn transport_error(err: reqwest::Error) -> StoreError {
    StoreError::Transport(err.to_string())
}
