//! In-memory session store for admin authentication.
//!
//! Single-instance deployments only: tokens live in process memory, so a
//! restart logs every admin out. A shared backend would replace this store
//! behind the same interface.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use rand::RngCore;
use std::collections::HashMap;
use subtle::ConstantTimeEq;

/// A session is valid iff it is present in the store and `now < expires_at`.
#[derive(Debug, Clone)]
pub struct Session {
    pub admin_id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Thread-safe in-memory session store with a fixed validity window.
pub struct SessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Mint a session for an admin and return the token (64-char hex string
    /// from 32 random bytes).
    pub fn create(&self, admin_id: i64, username: &str) -> String {
        let mut bytes = [0u8; 32];
        rand::rng().fill_bytes(&mut bytes);
        let token = hex::encode(bytes);

        let now = Utc::now();
        self.sessions.write().insert(
            token.clone(),
            Session {
                admin_id,
                username: username.to_string(),
                created_at: now,
                expires_at: now + self.ttl,
            },
        );

        token
    }

    /// Look up a token. Expired entries are purged on the spot and treated
    /// as absent. Token comparison is constant-time.
    pub fn get(&self, token: &str) -> Option<Session> {
        let found = {
            let sessions = self.sessions.read();
            sessions
                .iter()
                .find(|(stored, _)| bool::from(stored.as_bytes().ct_eq(token.as_bytes())))
                .map(|(stored, session)| (stored.clone(), session.clone()))
        };

        let (key, session) = found?;
        if Utc::now() < session.expires_at {
            Some(session)
        } else {
            self.sessions.write().remove(&key);
            None
        }
    }

    /// Remove a session (logout). Idempotent.
    pub fn remove(&self, token: &str) {
        self.sessions.write().remove(token);
    }

    /// Drop every expired session. Expiry is otherwise lazy, so a long-lived
    /// process may call this periodically to bound memory.
    pub fn purge_expired(&self) {
        let now = Utc::now();
        self.sessions
            .write()
            .retain(|_, session| now < session.expires_at);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }
}
