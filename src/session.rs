use crate::types::DataKind;
use std::{collections::HashMap, sync::Arc};
use teloxide::types::ChatId;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatSession {
    pub awaiting_username: bool,
    pub pressed: DataKind,
}

/// Pending inputs, at most one per chat. Lives only as long as the bot process.
#[derive(Clone, Default)]
pub struct SessionStore(Arc<Mutex<HashMap<ChatId, ChatSession>>>);

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts waiting for a channel name in `chat`, replacing whatever was pending there.
    pub async fn begin(&self, chat: ChatId, pressed: DataKind) -> Option<ChatSession> {
        self.0.lock().await.insert(
            chat,
            ChatSession {
                awaiting_username: true,
                pressed,
            },
        )
    }

    pub async fn is_awaiting(&self, chat: ChatId) -> bool {
        self.0
            .lock()
            .await
            .get(&chat)
            .map_or(false, |s| s.awaiting_username)
    }

    /// Removes and returns the session of `chat` if it is waiting for a channel name.
    pub async fn take_pending(&self, chat: ChatId) -> Option<ChatSession> {
        let mut sessions = self.0.lock().await;
        match sessions.get(&chat) {
            Some(s) if s.awaiting_username => sessions.remove(&chat),
            _ => None,
        }
    }

    pub async fn clear(&self, chat: ChatId) -> Option<ChatSession> {
        self.0.lock().await.remove(&chat)
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.0.lock().await.len()
    }

    #[cfg(test)]
    pub(crate) async fn insert(&self, chat: ChatId, session: ChatSession) {
        self.0.lock().await.insert(chat, session);
    }
}

#[cfg(test)]
mod session_tests {
    use super::*;

    #[tokio::test]
    async fn begin_overwrites_test() {
        let store = SessionStore::new();
        assert_eq!(store.begin(ChatId(1), DataKind::Vips).await, None);
        let previous = store.begin(ChatId(1), DataKind::Founders).await;
        assert_eq!(previous.map(|s| s.pressed), Some(DataKind::Vips));
        assert_eq!(store.len().await, 1);

        let taken = store.take_pending(ChatId(1)).await.unwrap();
        assert_eq!(taken.pressed, DataKind::Founders);
        assert!(!store.is_awaiting(ChatId(1)).await);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn chats_are_independent_test() {
        let store = SessionStore::new();
        store.begin(ChatId(1), DataKind::Follows).await;
        store.begin(ChatId(-100), DataKind::Moders).await;

        assert!(store.take_pending(ChatId(2)).await.is_none());
        assert_eq!(
            store.clear(ChatId(-100)).await.map(|s| s.pressed),
            Some(DataKind::Moders)
        );
        assert!(store.is_awaiting(ChatId(1)).await);
    }

    #[tokio::test]
    async fn idle_session_is_not_pending_test() {
        let store = SessionStore::new();
        let idle = ChatSession {
            awaiting_username: false,
            pressed: DataKind::Vips,
        };
        store.insert(ChatId(5), idle).await;

        assert!(!store.is_awaiting(ChatId(5)).await);
        assert_eq!(store.take_pending(ChatId(5)).await, None);
        assert_eq!(store.len().await, 1);
        assert_eq!(store.clear(ChatId(5)).await, Some(idle));
    }
}
