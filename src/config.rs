//! Run configuration loaded once from the environment (and `.env`).

use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    CLOUDINARY_BASE_URL, DEFAULT_API_VERSION, DEFAULT_CAPTION, GRAPH_BASE_URL, POLL_INTERVAL_SECS,
    POLL_TIMEOUT_SECS,
};
use tracing::warn;

use crate::error::{PublishError, Result};
use crate::services::poll::PollSettings;

/// Credentials for the Cloudinary account that hosts the video.
#[derive(Debug, Clone, Default)]
pub struct CloudinaryConfig {
    pub cloud_name: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub base_url: String,
}

/// Immutable settings threaded through every step of the run.
///
/// Required values are not checked here; each component reports
/// [`PublishError::MissingConfig`] when it actually needs one.
#[derive(Debug, Clone)]
pub struct Config {
    pub access_token: Option<String>,
    pub page_id: Option<String>,
    /// Expected Instagram account id. The connected account always wins.
    pub instagram_id: Option<String>,
    pub api_version: String,
    pub graph_base_url: String,
    pub cloudinary: CloudinaryConfig,
    pub caption: String,
    /// Publish this file instead of generating one.
    pub video_path: Option<PathBuf>,
    pub poll: PollSettings,
}

impl Config {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Self {
        check_dotenv(dotenvy::dotenv());
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let secs = |key: &str, default: u64| {
            get(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(default)
        };

        Self {
            access_token: get("USER_ACCESS_TOKEN"),
            page_id: get("FACEBOOK_PAGE_ID"),
            instagram_id: get("INSTAGRAM_ID"),
            api_version: get("API_VERSION").unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            graph_base_url: get("GRAPH_BASE_URL").unwrap_or_else(|| GRAPH_BASE_URL.to_string()),
            cloudinary: CloudinaryConfig {
                cloud_name: get("CLOUDINARY_CLOUD_NAME"),
                api_key: get("CLOUDINARY_API_KEY"),
                api_secret: get("CLOUDINARY_API_SECRET"),
                base_url: get("CLOUDINARY_BASE_URL")
                    .unwrap_or_else(|| CLOUDINARY_BASE_URL.to_string()),
            },
            caption: get("REEL_CAPTION").unwrap_or_else(|| DEFAULT_CAPTION.to_string()),
            video_path: get("REEL_VIDEO_PATH").map(PathBuf::from),
            poll: PollSettings {
                interval: Duration::from_secs(secs("REEL_POLL_INTERVAL_SECS", POLL_INTERVAL_SECS)),
                timeout: Duration::from_secs(secs("REEL_POLL_TIMEOUT_SECS", POLL_TIMEOUT_SECS)),
            },
        }
    }

    pub fn access_token(&self) -> Result<&str> {
        self.access_token
            .as_deref()
            .ok_or(PublishError::MissingConfig("USER_ACCESS_TOKEN"))
    }

    pub fn page_id(&self) -> Result<&str> {
        self.page_id
            .as_deref()
            .ok_or(PublishError::MissingConfig("FACEBOOK_PAGE_ID"))
    }
}

/// A missing `.env` is normal. One that exists but cannot be read or parsed
/// is logged and handed back.
fn check_dotenv<T>(loaded: dotenvy::Result<T>) -> Option<dotenvy::Error> {
    match loaded {
        Ok(_) => None,
        Err(e) if e.not_found() => None,
        Err(e) => {
            warn!(error = %e, "could not load .env, continuing with the process environment");
            Some(e)
        }
    }
}
