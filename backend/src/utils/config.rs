use anyhow::Result;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use crate::constants::{DEFAULT_EVENT_BUFFER, DEFAULT_SERVER_PORT, DEFAULT_STORAGE_TIMEOUT_SECS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    /// Process-local tables, lost on restart. For development only.
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(anyhow::anyhow!("Unsupported STORAGE_BACKEND: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub storage_backend: StorageBackend,
    pub jwt_secret: String,
    pub jwt_audience: Option<String>,
    pub storage_timeout: Duration,
    pub event_buffer: usize,
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let storage_backend = match lookup("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => StorageBackend::Postgres,
        };

        Ok(Self {
            port: lookup("PORT")
                .and_then(|value| value.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            storage_backend,
            jwt_secret: lookup("JWT_SECRET")
                .filter(|secret| !secret.is_empty())
                .ok_or_else(|| anyhow::anyhow!("JWT_SECRET must be set"))?,
            jwt_audience: lookup("JWT_AUDIENCE").filter(|aud| !aud.is_empty()),
            storage_timeout: Duration::from_secs(
                lookup("STORAGE_TIMEOUT_SECS")
                    .and_then(|value| value.parse().ok())
                    .unwrap_or(DEFAULT_STORAGE_TIMEOUT_SECS),
            ),
            event_buffer: lookup("EVENT_BUFFER")
                .and_then(|value| value.parse().ok())
                .unwrap_or(DEFAULT_EVENT_BUFFER),
            allowed_origins: lookup("ALLOWED_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|origin| origin.trim().to_string())
                        .filter(|origin| !origin.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        })
    }
}
