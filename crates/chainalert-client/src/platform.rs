//! Seam between the client core and the platform push API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Opaque push-endpoint credential issued by the platform push service.
///
/// The platform owns this object; the client only forwards its JSON form
/// to the subscription service, never inspects or rebuilds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PushSubscription(serde_json::Value);

impl PushSubscription {
    #[must_use]
    pub fn from_json(value: serde_json::Value) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn as_json(&self) -> &serde_json::Value {
        &self.0
    }

    #[must_use]
    pub fn endpoint(&self) -> Option<&str> {
        self.0.get("endpoint").and_then(serde_json::Value::as_str)
    }
}

/// Options for requesting a new platform subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribeOptions {
    /// Decoded VAPID public key.
    pub application_server_key: Vec<u8>,
    /// Push messages must result in user-visible notifications.
    pub user_visible_only: bool,
}

/// Platform push API: worker registration plus subscription lifecycle.
///
/// `?Send` because the whole client runs in a single-threaded, event-driven
/// context; browser bindings are not `Send`.
#[async_trait(?Send)]
pub trait PushPlatform {
    /// Whether the platform supports background workers and push messaging.
    fn push_supported(&self) -> bool;

    /// Register the background worker script at `script_path`.
    async fn register_worker(&self, script_path: &str) -> Result<(), ClientError>;

    /// The existing subscription for this profile, if any.
    async fn current_subscription(&self) -> Result<Option<PushSubscription>, ClientError>;

    /// Request a fresh subscription from the push service.
    async fn create_subscription(
        &self,
        options: &SubscribeOptions,
    ) -> Result<PushSubscription, ClientError>;
}
