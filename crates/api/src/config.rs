use std::path::PathBuf;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// Every field except the JWT secret has a local-development default.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long shutdown waits for background tasks, in seconds (default: `10`).
    pub shutdown_timeout_secs: u64,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
    pub generation: GenerationConfig,
}

/// Where cover images are written and how their public URLs are built.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root directory; each bucket is a subdirectory.
    pub root: PathBuf,
    /// Base URL prepended to `/storage/{bucket}/{key}`.
    pub public_url: String,
}

/// OpenAI-compatible chat completion endpoint used for novel generation.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Base URL, without the `/chat/completions` suffix.
    pub api_url: String,
    /// Bearer key. Generation requests fail when this is unset.
    pub api_key: Option<String>,
    pub model: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                     |
    /// |-------------------------|-----------------------------|
    /// | `HOST`                  | `0.0.0.0`                   |
    /// | `PORT`                  | `3000`                      |
    /// | `CORS_ORIGINS`          | `http://localhost:3000`     |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                        |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `10`                        |
    /// | `STORAGE_ROOT`          | `storage`                   |
    /// | `STORAGE_PUBLIC_URL`    | `http://localhost:{PORT}`   |
    /// | `GENERATION_API_URL`    | `https://api.openai.com/v1` |
    /// | `GENERATION_API_KEY`    | unset                       |
    /// | `GENERATION_MODEL`      | `o1-preview`                |
    ///
    /// # Panics
    ///
    /// Panics on malformed numbers and on a missing `JWT_SECRET`.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let storage = StorageConfig {
            root: std::env::var("STORAGE_ROOT")
                .unwrap_or_else(|_| "storage".into())
                .into(),
            public_url: std::env::var("STORAGE_PUBLIC_URL")
                .unwrap_or_else(|_| format!("http://localhost:{port}"))
                .trim_end_matches('/')
                .to_string(),
        };

        let generation = GenerationConfig {
            api_url: std::env::var("GENERATION_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".into())
                .trim_end_matches('/')
                .to_string(),
            api_key: std::env::var("GENERATION_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
            model: std::env::var("GENERATION_MODEL").unwrap_or_else(|_| "o1-preview".into()),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt: JwtConfig::from_env(),
            storage,
            generation,
        }
    }
}
