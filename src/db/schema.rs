//! SQL DDL for initializing the generator storage.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema with:
/// - `admins`: one row per admin account, `username` UNIQUE so startup
///   seeding can rely on `ON CONFLICT DO NOTHING` instead of check-then-insert
/// - `config`: the singleton active-value row; `CHECK (id = 1)` enforces
///   exactly one row at the schema level
/// - `history`: append-only audit log, `id` AUTOINCREMENT gives the display
///   order (newest first = highest id)
///
/// Timestamps are stored as RFC3339 TEXT.
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS admins (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS config (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    active_value INTEGER NULL,
    updated_at TEXT NULL
);

INSERT OR IGNORE INTO config (id, active_value, updated_at) VALUES (1, NULL, NULL);

CREATE TABLE IF NOT EXISTS history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    value INTEGER NOT NULL,
    actor TEXT NOT NULL,
    timestamp TEXT NOT NULL
);
"#;
