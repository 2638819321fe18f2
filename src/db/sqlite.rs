use crate::db::models::{Actor, ActiveValue, Admin, HistoryEntry};
use crate::db::schema::SQLITE_INIT;
use crate::error::NumgenError;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;

pub type SqlitePool = Pool<Sqlite>;

#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the database at `database_url` and run the
    /// bundled DDL.
    pub async fn connect(database_url: &str) -> Result<Self, NumgenError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)
            .map_err(sqlx::Error::from)?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
        let storage = Self::new(pool);
        storage.init_schema().await?;
        Ok(storage)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), NumgenError> {
        // execute multiple statements safely (SQLite supports multi-commands but sqlx::query doesn't)
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Idempotent admin seeding: the UNIQUE constraint on `username` makes a
    /// concurrent second startup a no-op rather than a race.
    pub async fn seed_admin(&self, username: &str, password_hash: &str) -> Result<(), NumgenError> {
        sqlx::query(
            "INSERT INTO admins (username, password_hash) VALUES (?, ?)
             ON CONFLICT(username) DO NOTHING",
        )
        .bind(username)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Exact, case-sensitive lookup.
    pub async fn admin_by_username(&self, username: &str) -> Result<Option<Admin>, NumgenError> {
        let row = sqlx::query("SELECT id, username, password_hash FROM admins WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| {
            Ok(Admin {
                id: r.try_get("id")?,
                username: r.try_get("username")?,
                password_hash: r.try_get("password_hash")?,
            })
        })
        .transpose()
        .map_err(NumgenError::Database)
    }

    /// Read the singleton config row.
    pub async fn active(&self) -> Result<ActiveValue, NumgenError> {
        let row = sqlx::query("SELECT active_value, updated_at FROM config WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        let value: Option<i64> = row.try_get("active_value")?;
        let updated_at: Option<String> = row.try_get("updated_at")?;
        let updated_at = updated_at.map(|s| parse_rfc3339(&s)).transpose()?;
        Ok(ActiveValue { value, updated_at })
    }

    /// Set the active value and append the matching history entry in ONE
    /// transaction: a config change without its audit row must never be
    /// observable.
    pub async fn set_active(&self, value: i64) -> Result<ActiveValue, NumgenError> {
        let now = Utc::now();
        let now_s = now.to_rfc3339();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO config (id, active_value, updated_at) VALUES (1, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                active_value=excluded.active_value,
                updated_at=excluded.updated_at
            "#,
        )
        .bind(value)
        .bind(&now_s)
        .execute(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO history (value, actor, timestamp) VALUES (?, ?, ?)")
            .bind(value)
            .bind(Actor::Admin.as_str())
            .bind(&now_s)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(ActiveValue {
            value: Some(value),
            updated_at: Some(now),
        })
    }

    /// Snapshot the current active value into history with actor=user. The
    /// config row itself is untouched; a generation is a read-with-audit.
    /// Read and insert share a transaction so the snapshot can never record
    /// a value the config no longer holds.
    pub async fn record_generation(&self) -> Result<(i64, DateTime<Utc>), NumgenError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT active_value FROM config WHERE id = 1")
            .fetch_one(&mut *tx)
            .await?;
        let value: Option<i64> = row.try_get("active_value")?;
        let Some(value) = value else {
            return Err(NumgenError::Precondition("Active value not set".to_string()));
        };

        let now = Utc::now();
        sqlx::query("INSERT INTO history (value, actor, timestamp) VALUES (?, ?, ?)")
            .bind(value)
            .bind(Actor::User.as_str())
            .bind(now.to_rfc3339())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((value, now))
    }

    /// Newest entries first, bounded by `limit`.
    pub async fn list_history(&self, limit: u32) -> Result<Vec<HistoryEntry>, NumgenError> {
        let rows = sqlx::query(
            "SELECT id, value, actor, timestamp FROM history ORDER BY id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_history).collect()
    }

    fn row_to_history(row: SqliteRow) -> Result<HistoryEntry, NumgenError> {
        let id: i64 = row.try_get("id")?;
        let value: i64 = row.try_get("value")?;
        let actor_s: String = row.try_get("actor")?;
        let timestamp_s: String = row.try_get("timestamp")?;

        let actor = Actor::from_db(&actor_s).ok_or_else(|| {
            NumgenError::Database(sqlx::Error::Decode(
                format!("unknown actor {actor_s:?}").into(),
            ))
        })?;
        let timestamp = parse_rfc3339(&timestamp_s)?;

        Ok(HistoryEntry {
            id,
            value,
            actor,
            timestamp,
        })
    }
}

fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>, NumgenError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| NumgenError::Database(sqlx::Error::Decode(Box::new(e))))
}
