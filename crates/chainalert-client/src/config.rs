use crate::error::ClientError;

pub const DEFAULT_SERVICE_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_WORKER_SCRIPT_PATH: &str = "static/service-worker.js";
pub const ENV_SERVICE_BASE_URL: &str = "CHAINALERT_SERVICE_BASE_URL";
pub const ENV_VAPID_PUBLIC_KEY: &str = "CHAINALERT_VAPID_PUBLIC_KEY";

/// Configuration for one push client: where the subscription service
/// lives, the VAPID public key handed to the push platform, and the worker
/// script path to register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub vapid_public_key: String,
    pub worker_script_path: String,
}

impl ClientConfig {
    pub fn new(
        base_url: impl Into<String>,
        vapid_public_key: impl Into<String>,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            base_url: normalize_base_url(&base_url.into())?,
            vapid_public_key: vapid_public_key.into(),
            worker_script_path: DEFAULT_WORKER_SCRIPT_PATH.to_string(),
        })
    }

    #[must_use]
    pub fn with_worker_script_path(mut self, path: impl Into<String>) -> Self {
        self.worker_script_path = path.into();
        self
    }
}

/// Resolve the service base URL from the environment, falling back to the
/// local default. Returns the URL and the source it came from.
pub fn resolve_service_base_url() -> Result<(String, &'static str), ClientError> {
    if let Some(base_url) = env_non_empty(ENV_SERVICE_BASE_URL) {
        return normalize_base_url(&base_url).map(|normalized| (normalized, ENV_SERVICE_BASE_URL));
    }
    normalize_base_url(DEFAULT_SERVICE_BASE_URL).map(|normalized| (normalized, "default_local"))
}

/// The VAPID public key, if the environment provides one. Pages usually
/// inject the key directly; this is the fallback for hosts that configure
/// it out of band.
#[must_use]
pub fn resolve_vapid_public_key() -> Option<String> {
    env_non_empty(ENV_VAPID_PUBLIC_KEY)
}

pub fn normalize_base_url(raw: &str) -> Result<String, ClientError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ClientError::BaseUrlMissing);
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ClientError::InvalidBaseUrl);
    }
    let Some((_, remainder)) = trimmed.split_once("://") else {
        return Err(ClientError::InvalidBaseUrl);
    };
    if remainder.trim().is_empty() || remainder.starts_with('/') {
        return Err(ClientError::InvalidBaseUrl);
    }
    Ok(trimmed.to_string())
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
