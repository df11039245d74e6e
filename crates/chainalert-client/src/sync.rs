//! Subscription synchronizer: the local view of which networks this
//! profile is subscribed to, kept in step with the remote service.

use std::collections::HashSet;

use tracing::{info, warn};

use crate::api::SubscriptionApi;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::keys;
use crate::platform::{PushPlatform, PushSubscription, SubscribeOptions};

/// The single client-state object: platform handle, service transport,
/// decoded application-server key, and the subscribed-network set.
///
/// The set only changes after the corresponding server call succeeded, so
/// it always reflects the last acknowledged state per network.
pub struct SubscriptionSync<P, A> {
    platform: P,
    api: A,
    application_server_key: Vec<u8>,
    worker_script_path: String,
    networks: HashSet<String>,
}

impl<P, A> SubscriptionSync<P, A>
where
    P: PushPlatform,
    A: SubscriptionApi,
{
    /// Decodes the VAPID key eagerly so a malformed key fails here rather
    /// than on the first subscribe.
    pub fn new(platform: P, api: A, config: &ClientConfig) -> Result<Self, ClientError> {
        let application_server_key =
            keys::decode_application_server_key(&config.vapid_public_key)?;
        Ok(Self {
            platform,
            api,
            application_server_key,
            worker_script_path: config.worker_script_path.clone(),
            networks: HashSet::new(),
        })
    }

    pub fn push_supported(&self) -> bool {
        self.platform.push_supported()
    }

    pub async fn register_worker(&self) -> Result<(), ClientError> {
        self.platform
            .register_worker(&self.worker_script_path)
            .await
    }

    /// Rebuild the network set from the platform subscription and the
    /// service's answer. Fail-open: any failure logs and leaves the set
    /// empty so the UI still renders as "not subscribed".
    pub async fn load_state(&mut self) {
        self.networks.clear();

        let subscription = match self.platform.current_subscription().await {
            Ok(subscription) => subscription,
            Err(error) => {
                warn!("failed to read platform subscription: {error}");
                return;
            }
        };
        // No platform subscription means no server round trip at all.
        let Some(subscription) = subscription else {
            return;
        };

        match self.api.subscribed_networks(&subscription).await {
            Ok(networks) => {
                self.networks = networks.into_iter().collect();
                info!("loaded {} subscribed networks", self.networks.len());
            }
            Err(error) => {
                warn!("failed to load subscription state: {error}");
            }
        }
    }

    #[must_use]
    pub fn is_subscribed(&self, network_id: &str) -> bool {
        self.networks.contains(network_id)
    }

    #[must_use]
    pub fn subscribed_networks(&self) -> &HashSet<String> {
        &self.networks
    }

    /// Subscribe this profile to `network_id`. Reuses the existing platform
    /// subscription when there is one; the local set is updated only after
    /// the service acknowledged.
    pub async fn subscribe(&mut self, network_id: &str) -> Result<(), ClientError> {
        let subscription = self.ensure_subscription().await?;
        self.api.subscribe(&subscription, network_id).await?;
        self.networks.insert(network_id.to_string());
        Ok(())
    }

    /// Unsubscribe this profile from `network_id`. With no platform
    /// subscription there is nothing the service could be tracking, so the
    /// server call is skipped and the id is dropped locally.
    pub async fn unsubscribe(&mut self, network_id: &str) -> Result<(), ClientError> {
        if let Some(subscription) = self.platform.current_subscription().await? {
            self.api.unsubscribe(&subscription, network_id).await?;
        }
        self.networks.remove(network_id);
        Ok(())
    }

    async fn ensure_subscription(&self) -> Result<PushSubscription, ClientError> {
        if let Some(existing) = self.platform.current_subscription().await? {
            return Ok(existing);
        }
        let options = SubscribeOptions {
            application_server_key: self.application_server_key.clone(),
            user_visible_only: true,
        };
        self.platform.create_subscription(&options).await
    }
}
