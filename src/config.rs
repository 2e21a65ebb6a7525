use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::engine::AUTOSAVE_INTERVAL;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";
const DEFAULT_STATIC_DIR: &str = "public";
const SAVE_FILE_NAME: &str = "game_data.json";

/// Reads `key` and parses it, falling back to `default` on absence or junk.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!("Ignoring invalid {}={:?}", key, raw);
                default
            }
        },
        Err(_) => default,
    }
}

/// Default save location: the per-user data directory when there is one,
/// otherwise `./saves` next to the working directory.
pub fn default_save_file() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("drone-miner").join("saves"))
        .unwrap_or_else(|| PathBuf::from("saves"))
        .join(SAVE_FILE_NAME)
}

// ── Persistence service ─────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    pub save_file: PathBuf,
    /// Directory served at `/`, if it exists.
    pub static_dir: PathBuf,
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        let host: String = env_or("DRONE_MINER_HOST", DEFAULT_HOST.to_string());
        let port: u16 = env_or("PORT", DEFAULT_PORT);
        let bind_addr = match format!("{}:{}", host, port).parse() {
            Ok(addr) => addr,
            Err(_) => {
                warn!("Invalid bind address {}:{}; using defaults", host, port);
                SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT))
            }
        };

        let save_file = std::env::var("DRONE_MINER_SAVE_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_save_file());

        let static_dir = std::env::var("DRONE_MINER_STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATIC_DIR));

        Self {
            bind_addr,
            save_file,
            static_dir,
        }
    }
}

// ── Game client ─────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server_url: String,
    pub autosave_interval: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            autosave_interval: AUTOSAVE_INTERVAL,
            request_timeout: Duration::from_secs(5),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let server_url: String = env_or("DRONE_MINER_SERVER_URL", defaults.server_url);
        let autosave_secs: u64 = env_or(
            "DRONE_MINER_AUTOSAVE_SECS",
            defaults.autosave_interval.as_secs(),
        );
        let timeout_secs: u64 = env_or(
            "DRONE_MINER_REQUEST_TIMEOUT_SECS",
            defaults.request_timeout.as_secs(),
        );
        Self {
            server_url: server_url.trim_end_matches('/').to_string(),
            autosave_interval: Duration::from_secs(autosave_secs.max(1)),
            request_timeout: Duration::from_secs(timeout_secs.max(1)),
        }
    }
}
