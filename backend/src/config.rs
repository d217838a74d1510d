//! Process configuration, read once at startup from the environment.
//!
//! A `.env` file in the working directory is loaded first when present.
//!
//! | Variable       | Default                 |
//! |----------------|-------------------------|
//! | `DATABASE_URL` | unset (in-memory store) |
//! | `BIND_ADDR`    | `127.0.0.1:3000`        |
//! | `CORS_ORIGIN`  | `http://localhost:5173` |

use anyhow::{Context, Result};
use std::net::SocketAddr;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Selects the sqlite backend when set
    pub database_url: Option<String>,
    pub bind_addr: SocketAddr,
    /// Origin allowed to call the API from a browser
    pub cors_origin: String,
}

impl Config {
    /// Load `.env` if present, then read the process environment
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse()
            .with_context(|| format!("BIND_ADDR {:?} is not a socket address", bind_addr))?;

        Ok(Self {
            database_url: get("DATABASE_URL"),
            bind_addr,
            cors_origin: get("CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
        })
    }

    /// In-memory storage on the default address
    pub fn in_memory() -> Self {
        Self {
            database_url: None,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
        }
    }
}
