//! Server configuration sourced from the environment.
//!
//! `DATABASE_URL` is the only required variable. Everything else carries a
//! development-friendly default, including a freshly generated session key
//! (which means cookies do not survive a restart unless `QUILL_SESSION_KEY`
//! is pinned).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use actix_web::cookie::Key;
use tracing::warn;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_MEDIA_ROOT: &str = "media";
const DEFAULT_PAGE_SIZE: u32 = 10;
const DEFAULT_CACHE_TTL_SECS: u64 = 20;
const MIN_SESSION_KEY_BYTES: usize = 64;

/// Errors raised while reading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is absent.
    #[error("missing required environment variable {name}")]
    Missing { name: &'static str },

    /// A variable is present but unusable.
    #[error("invalid value for {name}: {message}")]
    Invalid { name: &'static str, message: String },
}

impl ConfigError {
    fn invalid(name: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            name,
            message: message.into(),
        }
    }
}

/// Everything the server needs to start.
#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub session_key: Key,
    pub cookie_secure: bool,
    pub media_root: PathBuf,
    pub page_size: u32,
    pub cache_ttl: Duration,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &self.database_url)
            .field("session_key", &"<redacted>")
            .field("cookie_secure", &self.cookie_secure)
            .field("media_root", &self.media_root)
            .field("page_size", &self.page_size)
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

impl AppConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(|name| std::env::var(name).ok())
    }

    /// Read the configuration from an arbitrary lookup, for tests.
    pub fn from_source(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing {
            name: "DATABASE_URL",
        })?;

        let bind_addr = lookup("QUILL_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned())
            .parse::<SocketAddr>()
            .map_err(|err| ConfigError::invalid("QUILL_BIND_ADDR", err.to_string()))?;

        let session_key = match lookup("QUILL_SESSION_KEY") {
            Some(raw) if raw.len() >= MIN_SESSION_KEY_BYTES => Key::from(raw.as_bytes()),
            Some(_) => {
                return Err(ConfigError::invalid(
                    "QUILL_SESSION_KEY",
                    format!("must be at least {MIN_SESSION_KEY_BYTES} bytes"),
                ));
            }
            None => {
                warn!("QUILL_SESSION_KEY not set; sessions will not survive a restart");
                Key::generate()
            }
        };

        let cookie_secure = match lookup("QUILL_COOKIE_SECURE").as_deref() {
            None | Some("false") | Some("0") => false,
            Some("true") | Some("1") => true,
            Some(other) => {
                return Err(ConfigError::invalid(
                    "QUILL_COOKIE_SECURE",
                    format!("expected true or false, got {other}"),
                ));
            }
        };

        let media_root = PathBuf::from(
            lookup("QUILL_MEDIA_ROOT").unwrap_or_else(|| DEFAULT_MEDIA_ROOT.to_owned()),
        );

        let page_size = match lookup("QUILL_PAGE_SIZE") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or_else(|| {
                    ConfigError::invalid("QUILL_PAGE_SIZE", "expected a positive integer")
                })?,
            None => DEFAULT_PAGE_SIZE,
        };

        let cache_ttl = match lookup("QUILL_CACHE_TTL_SECS") {
            Some(raw) => raw.parse::<u64>().map(Duration::from_secs).map_err(|err| {
                ConfigError::invalid("QUILL_CACHE_TTL_SECS", err.to_string())
            })?,
            None => Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        };

        Ok(Self {
            bind_addr,
            database_url,
            session_key,
            cookie_secure,
            media_root,
            page_size,
            cache_ttl,
        })
    }
}
