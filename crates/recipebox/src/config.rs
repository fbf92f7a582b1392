//! Runtime configuration read from the environment.

use std::fmt;

use thiserror::Error;

/// Default listen address.
pub const DEFAULT_LISTEN: &str = "0.0.0.0:5800";
/// Default database location.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://recipebox.db";
/// Image stored on every new recipe until uploads exist.
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "https://placehold.jp/300x200.png";
/// Minimum length of the session signing secret, in bytes.
pub const MIN_SECRET_LEN: usize = 64;

const DEV_SESSION_SECRET: &str = "recipebox-development-secret-recipebox-development-secret-000000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Error raised when an environment variable holds an unusable value.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A numeric variable could not be parsed.
    #[error("{key} must be a positive number, got `{value}`")]
    InvalidNumber {
        /// Variable name.
        key: &'static str,
        /// Rejected value.
        value: String,
    },
    /// The session secret is too short to sign cookies.
    #[error("RECIPEBOX_SESSION_SECRET must be at least {MIN_SECRET_LEN} bytes, got {0}")]
    ShortSecret(usize),
}

/// Server settings.
#[derive(Clone)]
pub struct Config {
    /// Address the server binds to.
    pub listen: String,
    /// SQLite connection url.
    pub database_url: String,
    /// Upper bound of pooled database connections.
    pub max_connections: u32,
    /// Key signing the session cookie.
    pub session_secret: Vec<u8>,
    /// Image url stored on new recipes.
    pub placeholder_image: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("listen", &self.listen)
            .field("database_url", &self.database_url)
            .field("max_connections", &self.max_connections)
            .field("session_secret", &"<redacted>")
            .field("placeholder_image", &self.placeholder_image)
            .finish()
    }
}

impl Config {
    /// Read the configuration from the process environment, loading `.env` first when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let max_connections = match var("RECIPEBOX_DB_MAX_CONNECTIONS") {
            Some(value) => match value.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        key: "RECIPEBOX_DB_MAX_CONNECTIONS",
                        value,
                    });
                }
            },
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let session_secret = match var("RECIPEBOX_SESSION_SECRET") {
            Some(secret) if secret.len() < MIN_SECRET_LEN => return Err(ConfigError::ShortSecret(secret.len())),
            Some(secret) => secret.into_bytes(),
            None => {
                tracing::warn!("RECIPEBOX_SESSION_SECRET is not set, using the development secret");
                DEV_SESSION_SECRET.as_bytes().to_vec()
            }
        };

        Ok(Self {
            listen: var("RECIPEBOX_LISTEN").unwrap_or_else(|| DEFAULT_LISTEN.to_owned()),
            database_url: var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned()),
            max_connections,
            session_secret,
            placeholder_image: var("RECIPEBOX_PLACEHOLDER_IMAGE")
                .unwrap_or_else(|| DEFAULT_PLACEHOLDER_IMAGE.to_owned()),
        })
    }
}
