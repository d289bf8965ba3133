//! Per-sender conversation state and the session store abstraction.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::types::{Flow, MediaRef};

/// Where a sender currently is in the conversation.
///
/// An absent session is the `NEW` state; `Menu` has no flow and, by
/// construction, no image references. No state ever holds a garment image:
/// it arrives on the terminal turn and the session is deleted in that step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    Menu,
    TryOnAwaitingPerson,
    TryOnAwaitingGarment { person: MediaRef },
    TextSearch,
    ImageSearch,
}

impl SessionState {
    /// State entered right after a flow is picked from the menu.
    pub fn entry(flow: Flow) -> Self {
        match flow {
            Flow::TryOn => SessionState::TryOnAwaitingPerson,
            Flow::TextSearch => SessionState::TextSearch,
            Flow::ImageSearch => SessionState::ImageSearch,
        }
    }

    pub fn selected_flow(&self) -> Option<Flow> {
        match self {
            SessionState::Menu => None,
            SessionState::TryOnAwaitingPerson | SessionState::TryOnAwaitingGarment { .. } => {
                Some(Flow::TryOn)
            }
            SessionState::TextSearch => Some(Flow::TextSearch),
            SessionState::ImageSearch => Some(Flow::ImageSearch),
        }
    }

    pub fn person_image(&self) -> Option<&MediaRef> {
        match self {
            SessionState::TryOnAwaitingGarment { person } => Some(person),
            _ => None,
        }
    }
}

/// Storage for per-sender sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, sender: &str) -> Option<SessionState>;

    async fn put(&self, sender: &str, state: SessionState);

    /// Remove a session. Returns whether one existed.
    async fn delete(&self, sender: &str) -> bool;

    /// Number of live sessions.
    async fn len(&self) -> usize;
}

/// Process-local session table. Not persisted across restarts.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionState>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, sender: &str) -> Option<SessionState> {
        self.sessions.read().await.get(sender).cloned()
    }

    async fn put(&self, sender: &str, state: SessionState) {
        self.sessions.write().await.insert(sender.to_string(), state);
    }

    async fn delete(&self, sender: &str) -> bool {
        self.sessions.write().await.remove(sender).is_some()
    }

    async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_has_no_flow_or_images() {
        let s = SessionState::Menu;
        assert!(s.selected_flow().is_none());
        assert!(s.person_image().is_none());
    }

    #[test]
    fn garment_wait_exposes_person() {
        let s = SessionState::TryOnAwaitingGarment {
            person: MediaRef::new("p"),
        };
        assert_eq!(s.selected_flow(), Some(Flow::TryOn));
        assert_eq!(s.person_image().map(MediaRef::as_str), Some("p"));
    }

    #[tokio::test]
    async fn store_put_get_delete() {
        let store = InMemorySessionStore::new();
        assert!(store.get("a").await.is_none());

        store.put("a", SessionState::Menu).await;
        store.put("b", SessionState::TextSearch).await;
        assert_eq!(store.get("a").await, Some(SessionState::Menu));
        assert_eq!(store.len().await, 2);

        assert!(store.delete("a").await);
        assert!(!store.delete("a").await);
        assert_eq!(store.get("b").await, Some(SessionState::TextSearch));
    }
}
