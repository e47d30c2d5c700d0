//! Portal configuration loaded from environment variables.

use dotenvy::dotenv;
use medichain_client::{API_URL_ENV, DEFAULT_API_URL};
use std::env;
use std::path::PathBuf;

/// Environment variable overriding the session directory.
pub const SESSION_DIR_ENV: &str = "MEDICHAIN_SESSION_DIR";

/// Portal configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Backend API origin.
    pub api_url: String,
    /// Directory the file-backed session store lives in.
    pub session_dir: PathBuf,
}

impl PortalConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads a `.env` file if present (development). Every value has a
    /// default, so loading cannot fail.
    pub fn from_env() -> Self {
        let _ = dotenv();

        let api_url = env::var(API_URL_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let session_dir = env::var(SESSION_DIR_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_session_dir);

        Self {
            api_url,
            session_dir,
        }
    }
}

/// Per-user default: `<local data dir>/medichain/session`, falling back to a
/// relative path when the platform reports no data directory.
fn default_session_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("medichain")
        .join("session")
}
