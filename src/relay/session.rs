//! Server-side relay sessions
//!
//! Browsers only hold an opaque id; the API tokens stay here. Expired
//! sessions are dropped when they are looked up or swept.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

pub const SESSION_COOKIE: &str = "relay_session";

#[derive(Debug, Clone)]
pub struct Session {
    pub account_id: i64,
    pub username: String,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

/// 32 random bytes, base64url without padding
pub fn new_session_id() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

impl SessionStore {
    pub fn new(ttl_secs: i64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl: Duration::seconds(ttl_secs),
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl.num_seconds()
    }

    pub async fn create(
        &self,
        account_id: i64,
        username: String,
        access_token: String,
        refresh_token: String,
    ) -> String {
        let id = new_session_id();
        let session = Session {
            account_id,
            username,
            access_token,
            refresh_token,
            expires_at: Utc::now() + self.ttl,
        };

        self.sweep_expired().await;
        self.sessions.write().await.insert(id.clone(), session);
        id
    }

    pub async fn get(&self, id: &str) -> Option<Session> {
        let session = self.sessions.read().await.get(id).cloned()?;
        if session.is_expired() {
            self.remove(id).await;
            return None;
        }
        Some(session)
    }

    pub async fn set_access_token(&self, id: &str, access_token: String) -> bool {
        match self.sessions.write().await.get_mut(id) {
            Some(session) => {
                session.access_token = access_token;
                true
            }
            None => false,
        }
    }

    pub async fn remove(&self, id: &str) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    pub async fn sweep_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired());
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Reads the session id out of a `Cookie` header value
pub fn session_id_from_cookie(header: &str) -> Option<&str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}
