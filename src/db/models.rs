use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who caused a history entry to be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Actor {
    User,
    Admin,
}

impl Actor {
    pub fn as_str(self) -> &'static str {
        match self {
            Actor::User => "user",
            Actor::Admin => "admin",
        }
    }

    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Actor::User),
            "admin" => Some(Actor::Admin),
            _ => None,
        }
    }
}

/// An admin account row. `password_hash` is an argon2 PHC string.
#[derive(Debug, Clone)]
pub struct Admin {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

/// The singleton config row. `value` is `None` until an admin sets it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActiveValue {
    pub value: Option<i64>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One append-only audit entry. `id` is assigned by the store and only used
/// for ordering; the API exposes `{value, actor, timestamp}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    #[serde(skip_serializing)]
    pub id: i64,
    pub value: i64,
    pub actor: Actor,
    pub timestamp: DateTime<Utc>,
}
