use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Runtime configuration, layered as: built-in defaults, then `IDEALIZA_*` env vars.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    pub loglevel: String,
    /// bcrypt work factor (4..=31).
    pub bcrypt_cost: u32,
    pub max_connections: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:banco.db".to_string(),
            listen_addr: "0.0.0.0:8000".to_string(),
            loglevel: "info".to_string(),
            bcrypt_cost: bcrypt::DEFAULT_COST,
            max_connections: 5,
        }
    }
}

impl Config {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed("IDEALIZA_"))
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }
}

pub static CONFIG: LazyLock<Config> =
    LazyLock::new(|| Config::load().expect("FATAL: invalid IDEALIZA_* configuration"));
