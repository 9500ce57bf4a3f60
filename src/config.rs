use std::{env, str::FromStr, time::Duration};
use tracing::warn;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_BANNER_SECS: u64 = 5;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Extensions the analysis backend knows how to load.
pub const ACCEPTED_EXTENSIONS: [&str; 4] = ["csv", "xlsx", "xls", "json"];

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub port: u16,
    pub backend_url: String,
    pub banner_ttl: Duration,
    pub max_upload_bytes: usize,
    pub request_timeout: Option<Duration>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            banner_ttl: Duration::from_secs(DEFAULT_BANNER_SECS),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            request_timeout: None,
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let backend_url = lookup("DASHBOARD_BACKEND_URL")
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.backend_url);

        Self {
            port: parse_var(&lookup, "PORT").unwrap_or(defaults.port),
            backend_url,
            banner_ttl: parse_var(&lookup, "DASHBOARD_BANNER_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.banner_ttl),
            max_upload_bytes: parse_var(&lookup, "DASHBOARD_MAX_UPLOAD_BYTES")
                .unwrap_or(defaults.max_upload_bytes),
            request_timeout: parse_var(&lookup, "DASHBOARD_REQUEST_TIMEOUT_SECS")
                .filter(|secs: &u64| *secs > 0)
                .map(Duration::from_secs),
        }
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("ignoring invalid {key}={raw:?}, using default");
            None
        }
    }
}
