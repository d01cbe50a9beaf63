use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// One browser session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub logged_in: bool,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn authenticated() -> Self {
        Self {
            id: Uuid::new_v4(),
            logged_in: true,
            created_at: Utc::now(),
        }
    }
}

/// In-process registry of live sessions. Cleared on restart.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new authenticated session
    pub async fn create(&self) -> Session {
        let session = Session::authenticated();
        self.sessions
            .write()
            .await
            .insert(session.id, session.clone());
        session
    }

    pub async fn get(&self, id: &Uuid) -> Option<Session> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Drop a session. Returns whether it existed.
    pub async fn revoke(&self, id: &Uuid) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
