use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use anyhow::{Context, Result, anyhow};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Redis,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "redis" => Ok(Self::Redis),
            other => Err(format!("unknown store backend '{other}', expected memory or redis")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub store_backend: StoreBackend,
    pub redis_url: String,
    pub static_dir: String,
    pub seed_on_start: bool,
    pub cors_max_age_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            store_backend: StoreBackend::Memory,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            static_dir: "public".to_string(),
            seed_on_start: true,
            cors_max_age_secs: 60 * 60,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let redis_url = match read_secret("REDIS_URL") {
            Some(url) => url,
            None => try_load("REDIS_URL", "redis://127.0.0.1:6379")?,
        };

        Ok(Self {
            port: try_load("RUST_PORT", "3000")?,
            store_backend: try_load("STORE_BACKEND", "memory")?,
            redis_url,
            static_dir: try_load("STATIC_DIR", "public")?,
            seed_on_start: try_load("SEED_ON_START", "true")?,
            cors_max_age_secs: try_load("CORS_MAX_AGE_SECS", "3600")?,
        })
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let raw = var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse().map_err(|e| {
        warn!("Invalid {key} value: {e}");
        anyhow!("Environment misconfigured: {key}={raw}: {e}")
    })
}

/// Docker secrets mount, `None` when the secret is not provided.
fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .with_context(|| format!("reading {path}"))
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            info!("Secret {secret_name} unavailable ({e:#}), falling back to environment");
        })
        .ok()
}
