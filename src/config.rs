use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Process-wide configuration, read once at startup.
///
/// Every field can be overridden through a `NUMGEN_`-prefixed environment
/// variable, e.g. `NUMGEN_DATABASE_URL`, `NUMGEN_ADMIN_PASSWORD`.
pub static CONFIG: LazyLock<Config> =
    LazyLock::new(|| Config::load().expect("invalid configuration"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub bind_addr: String,
    pub database_url: String,
    pub admin_username: String,
    pub admin_password: String,
    pub session_ttl_hours: i64,
    pub loglevel: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            database_url: "sqlite:data/numgen.sqlite".to_string(),
            admin_username: "admin".to_string(),
            admin_password: "admin123".to_string(),
            session_ttl_hours: 24,
            loglevel: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::prefixed("NUMGEN_"))
            .extract()
    }
}
