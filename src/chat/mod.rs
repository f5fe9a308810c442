//! Direct messages between matched users.
//!
//! Messages are plain store documents; ordering and id assignment are
//! the store's job. The assistant can attach an advisory follow-up to a
//! sent message, stored in the same thread as an
//! [`MessageKind::AiSuggestion`] record so history reads back complete
//! on any device.

use tracing::debug;

use crate::documents::{MessageKind, MessageRecord};
use crate::models::user::Profile;
use crate::state::ClientState;
use crate::store::StoreError;

/// Longest accepted message body, in characters.
pub const MAX_MESSAGE_LEN: usize = 2_000;

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message body is empty")]
    EmptyBody,
    #[error("message body exceeds {MAX_MESSAGE_LEN} characters")]
    TooLong,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A just-sent message together with the assistant's follow-up.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatExchange {
    pub message: MessageRecord,
    pub suggestion: MessageRecord,
}

/// Persists one user message and returns the stored record, id and send
/// time assigned by the store. The body is trimmed before storage.
pub async fn send(
    state: &ClientState,
    sender_id: &str,
    receiver_id: &str,
    body: &str,
) -> Result<MessageRecord, ChatError> {
    assert!(!sender_id.trim().is_empty(), "Sender id must be provided");
    assert!(
        !receiver_id.trim().is_empty(),
        "Receiver id must be provided"
    );

    let body = body.trim();
    if body.is_empty() {
        return Err(ChatError::EmptyBody);
    }
    if body.chars().count() > MAX_MESSAGE_LEN {
        return Err(ChatError::TooLong);
    }

    let message = MessageRecord {
        sender_id: sender_id.to_string(),
        receiver_id: receiver_id.to_string(),
        body: body.to_string(),
        kind: MessageKind::User,
        ..MessageRecord::default()
    };
    let stored = state.store.append_message(&message).await?;
    debug!(from = %sender_id, to = %receiver_id, "Message stored");
    Ok(stored)
}

/// Sends a message and follows it with an assistant suggestion in the
/// same thread. The suggestion text always materializes (the assistant
/// degrades to canned advice), and is authored by the assistant; its
/// endpoint ids only bind it to the conversation. If storing the
/// suggestion fails the user's message has already been persisted.
pub async fn send_with_suggestion(
    state: &ClientState,
    sender: &Profile,
    receiver: &Profile,
    body: &str,
) -> Result<ChatExchange, ChatError> {
    let message = send(state, &sender.id, &receiver.id, body).await?;

    let advice = state
        .assistant
        .chat_suggestion(
            &message.body,
            &sender.display_name,
            &receiver.display_name,
            None,
        )
        .await;
    let suggestion = MessageRecord {
        sender_id: sender.id.clone(),
        receiver_id: receiver.id.clone(),
        body: advice,
        kind: MessageKind::AiSuggestion,
        ..MessageRecord::default()
    };
    let suggestion = state.store.append_message(&suggestion).await?;

    Ok(ChatExchange { message, suggestion })
}

/// Full history between two users, both directions, oldest first.
pub async fn conversation(
    state: &ClientState,
    first: &str,
    second: &str,
) -> Result<Vec<MessageRecord>, ChatError> {
    assert!(!first.trim().is_empty(), "User id must be provided");
    assert!(!second.trim().is_empty(), "User id must be provided");
    Ok(state.store.list_conversation(first, second).await?)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use super::*;
    use crate::assistant::Assistant;
    use crate::auth::Identity;
    use crate::config::CacheConfig;
    use crate::profile;
    use crate::store::MemoryStore;

    fn client_state(store: Arc<MemoryStore>) -> ClientState {
        ClientState::with_store(store, Assistant::disabled(), &CacheConfig::default())
    }

    fn profile_for(id: &str) -> Profile {
        let identity = Identity {
            id: id.into(),
            email: format!("{id}@example.com"),
            display_name: Some(id.to_string()),
            photo_url: None,
        };
        profile::normalize(None, &identity, Utc::now())
    }

    #[tokio::test]
    async fn send_trims_and_stores_the_body() {
        let state = client_state(Arc::new(MemoryStore::new()));

        let stored = send(&state, "a", "b", "  see you at standup  ")
            .await
            .unwrap();

        assert_eq!(stored.body, "see you at standup");
        assert!(!stored.id.is_empty());
        assert!(stored.sent_at.is_some());
        assert_eq!(stored.kind, MessageKind::User);
    }

    #[tokio::test]
    async fn blank_and_oversized_bodies_are_rejected() {
        let state = client_state(Arc::new(MemoryStore::new()));

        let blank = send(&state, "a", "b", "   ").await;
        assert!(matches!(blank, Err(ChatError::EmptyBody)));

        let oversized = "x".repeat(MAX_MESSAGE_LEN + 1);
        let too_long = send(&state, "a", "b", &oversized).await;
        assert!(matches!(too_long, Err(ChatError::TooLong)));

        let at_limit = "x".repeat(MAX_MESSAGE_LEN);
        assert!(send(&state, "a", "b", &at_limit).await.is_ok());
    }

    #[tokio::test]
    async fn suggestion_lands_in_the_same_thread() {
        let state = client_state(Arc::new(MemoryStore::new()));
        let sender = profile_for("a");
        let receiver = profile_for("b");

        let exchange =
            send_with_suggestion(&state, &sender, &receiver, "Want to pair on the parser?")
                .await
                .unwrap();

        assert_eq!(exchange.message.kind, MessageKind::User);
        assert_eq!(exchange.suggestion.kind, MessageKind::AiSuggestion);
        assert!(!exchange.suggestion.body.is_empty());

        let thread = conversation(&state, "a", "b").await.unwrap();
        assert_eq!(thread.len(), 2);
        assert_eq!(thread[0].body, "Want to pair on the parser?");
        assert_eq!(thread[1].kind, MessageKind::AiSuggestion);
    }

    #[tokio::test]
    async fn conversation_reads_both_directions_in_order() {
        let state = client_state(Arc::new(MemoryStore::new()));

        send(&state, "a", "b", "first").await.unwrap();
        send(&state, "b", "a", "second").await.unwrap();
        send(&state, "a", "c", "unrelated").await.unwrap();

        let thread = conversation(&state, "a", "b").await.unwrap();
        let bodies: Vec<&str> = thread.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, vec!["first", "second"]);
    }
}
