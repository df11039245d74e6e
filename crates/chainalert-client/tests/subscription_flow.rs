//! End-to-end flows over mock platform, service, and UI implementations.

use std::cell::{Cell, RefCell};

use async_trait::async_trait;
use serde_json::json;

use chainalert_client::presenter::{
    self, AlertSink, SUBSCRIBE_LABEL, SUBSCRIBING_LABEL, SubscribeControl, UNSUBSCRIBE_LABEL,
    UNSUBSCRIBING_LABEL, UNSUPPORTED_LABEL,
};
use chainalert_client::{
    ClientConfig, ClientError, PushPlatform, PushSubscription, SubscribeOptions, SubscriptionApi,
    SubscriptionSync, registry,
};

// A valid base64url VAPID key ("chain" in url-safe base64, unpadded).
const TEST_KEY: &str = "Y2hhaW4";

fn test_config() -> ClientConfig {
    ClientConfig::new("http://127.0.0.1:5000", TEST_KEY).unwrap()
}

fn test_subscription() -> PushSubscription {
    PushSubscription::from_json(json!({
        "endpoint": "https://push.example.com/reg/abc",
        "keys": { "p256dh": "dh", "auth": "au" }
    }))
}

#[derive(Default)]
struct MockPlatform {
    supported: Cell<bool>,
    subscription: RefCell<Option<PushSubscription>>,
    register_calls: Cell<usize>,
    fail_registration: Cell<bool>,
    create_calls: Cell<usize>,
    last_options: RefCell<Option<SubscribeOptions>>,
}

impl MockPlatform {
    fn supported() -> Self {
        let platform = Self::default();
        platform.supported.set(true);
        platform
    }

    fn with_subscription(self, subscription: PushSubscription) -> Self {
        *self.subscription.borrow_mut() = Some(subscription);
        self
    }
}

#[async_trait(?Send)]
impl PushPlatform for &MockPlatform {
    fn push_supported(&self) -> bool {
        self.supported.get()
    }

    async fn register_worker(&self, _script_path: &str) -> Result<(), ClientError> {
        self.register_calls.set(self.register_calls.get() + 1);
        if self.fail_registration.get() {
            return Err(ClientError::platform("registration denied"));
        }
        Ok(())
    }

    async fn current_subscription(&self) -> Result<Option<PushSubscription>, ClientError> {
        Ok(self.subscription.borrow().clone())
    }

    async fn create_subscription(
        &self,
        options: &SubscribeOptions,
    ) -> Result<PushSubscription, ClientError> {
        self.create_calls.set(self.create_calls.get() + 1);
        *self.last_options.borrow_mut() = Some(options.clone());
        let created = test_subscription();
        *self.subscription.borrow_mut() = Some(created.clone());
        Ok(created)
    }
}

#[derive(Default)]
struct MockApi {
    networks: RefCell<Vec<String>>,
    fail_networks: Cell<bool>,
    networks_calls: Cell<usize>,
    subscribe_calls: RefCell<Vec<String>>,
    unsubscribe_calls: RefCell<Vec<String>>,
    reject_subscribe_with: RefCell<Option<String>>,
}

#[async_trait(?Send)]
impl SubscriptionApi for &MockApi {
    async fn subscribed_networks(
        &self,
        _subscription: &PushSubscription,
    ) -> Result<Vec<String>, ClientError> {
        self.networks_calls.set(self.networks_calls.get() + 1);
        if self.fail_networks.get() {
            return Err(ClientError::Request {
                message: "connection refused".to_string(),
            });
        }
        Ok(self.networks.borrow().clone())
    }

    async fn subscribe(
        &self,
        _subscription: &PushSubscription,
        network_id: &str,
    ) -> Result<(), ClientError> {
        if let Some(message) = self.reject_subscribe_with.borrow().clone() {
            return Err(ClientError::Rejected { message });
        }
        self.subscribe_calls.borrow_mut().push(network_id.to_string());
        Ok(())
    }

    async fn unsubscribe(
        &self,
        _subscription: &PushSubscription,
        network_id: &str,
    ) -> Result<(), ClientError> {
        self.unsubscribe_calls
            .borrow_mut()
            .push(network_id.to_string());
        Ok(())
    }
}

struct RecordingControl {
    network_id: String,
    label: RefCell<String>,
    enabled: Cell<bool>,
    labels_seen: RefCell<Vec<String>>,
}

impl RecordingControl {
    fn new(network_id: &str) -> Self {
        Self {
            network_id: network_id.to_string(),
            label: RefCell::new(String::new()),
            enabled: Cell::new(true),
            labels_seen: RefCell::new(Vec::new()),
        }
    }
}

impl SubscribeControl for RecordingControl {
    fn network_id(&self) -> String {
        self.network_id.clone()
    }

    fn set_label(&self, label: &str) {
        *self.label.borrow_mut() = label.to_string();
        self.labels_seen.borrow_mut().push(label.to_string());
    }

    fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }
}

#[derive(Default)]
struct RecordingAlerts {
    messages: RefCell<Vec<String>>,
}

impl AlertSink for RecordingAlerts {
    fn alert(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

#[tokio::test]
async fn load_state_without_platform_subscription_stays_empty() {
    let platform = MockPlatform::supported();
    let api = MockApi::default();
    let mut sync = SubscriptionSync::new(&platform, &api, &test_config()).unwrap();

    sync.load_state().await;

    assert!(sync.subscribed_networks().is_empty());
    // No subscription means the subscriptions endpoint is never hit.
    assert_eq!(api.networks_calls.get(), 0);
}

#[tokio::test]
async fn load_state_populates_from_service() {
    let platform = MockPlatform::supported().with_subscription(test_subscription());
    let api = MockApi::default();
    *api.networks.borrow_mut() = vec!["polkadot".to_string(), "kusama".to_string()];
    let mut sync = SubscriptionSync::new(&platform, &api, &test_config()).unwrap();

    sync.load_state().await;

    assert!(sync.is_subscribed("polkadot"));
    assert!(sync.is_subscribed("kusama"));
    assert!(!sync.is_subscribed("ethereum"));
}

#[tokio::test]
async fn load_state_fails_open_on_service_failure() {
    let platform = MockPlatform::supported().with_subscription(test_subscription());
    let api = MockApi::default();
    api.fail_networks.set(true);
    let mut sync = SubscriptionSync::new(&platform, &api, &test_config()).unwrap();

    sync.load_state().await;

    assert!(sync.subscribed_networks().is_empty());
}

#[tokio::test]
async fn toggle_subscribes_and_flips_label() {
    let platform = MockPlatform::supported();
    let api = MockApi::default();
    let mut sync = SubscriptionSync::new(&platform, &api, &test_config()).unwrap();
    let control = RecordingControl::new("polkadot");
    let alerts = RecordingAlerts::default();

    presenter::toggle(&mut sync, &control, &alerts).await;

    assert!(sync.is_subscribed("polkadot"));
    assert_eq!(*api.subscribe_calls.borrow(), vec!["polkadot".to_string()]);
    assert_eq!(
        *control.labels_seen.borrow(),
        vec![SUBSCRIBING_LABEL.to_string(), UNSUBSCRIBE_LABEL.to_string()]
    );
    assert!(control.enabled.get());
    assert!(alerts.messages.borrow().is_empty());
}

#[tokio::test]
async fn subscribe_reuses_existing_platform_subscription() {
    let platform = MockPlatform::supported().with_subscription(test_subscription());
    let api = MockApi::default();
    let mut sync = SubscriptionSync::new(&platform, &api, &test_config()).unwrap();

    sync.subscribe("polkadot").await.unwrap();

    assert_eq!(platform.create_calls.get(), 0);
    assert!(sync.is_subscribed("polkadot"));
}

#[tokio::test]
async fn subscribe_creates_subscription_with_decoded_key() {
    let platform = MockPlatform::supported();
    let api = MockApi::default();
    let mut sync = SubscriptionSync::new(&platform, &api, &test_config()).unwrap();

    sync.subscribe("polkadot").await.unwrap();

    assert_eq!(platform.create_calls.get(), 1);
    let options = platform.last_options.borrow().clone().unwrap();
    assert!(options.user_visible_only);
    // "Y2hhaW4" is base64url for the bytes of "chain".
    assert_eq!(options.application_server_key, b"chain".to_vec());
}

#[tokio::test]
async fn failed_subscribe_surfaces_server_message_and_restores_control() {
    let platform = MockPlatform::supported().with_subscription(test_subscription());
    let api = MockApi::default();
    *api.reject_subscribe_with.borrow_mut() = Some("quota exceeded".to_string());
    let mut sync = SubscriptionSync::new(&platform, &api, &test_config()).unwrap();
    let control = RecordingControl::new("polkadot");
    let alerts = RecordingAlerts::default();

    presenter::toggle(&mut sync, &control, &alerts).await;

    assert!(!sync.is_subscribed("polkadot"));
    assert_eq!(*alerts.messages.borrow(), vec!["quota exceeded".to_string()]);
    assert_eq!(*control.label.borrow(), SUBSCRIBE_LABEL);
    assert!(control.enabled.get());
}

#[tokio::test]
async fn toggle_unsubscribes_when_already_subscribed() {
    let platform = MockPlatform::supported().with_subscription(test_subscription());
    let api = MockApi::default();
    *api.networks.borrow_mut() = vec!["polkadot".to_string()];
    let mut sync = SubscriptionSync::new(&platform, &api, &test_config()).unwrap();
    sync.load_state().await;
    let control = RecordingControl::new("polkadot");
    let alerts = RecordingAlerts::default();

    presenter::toggle(&mut sync, &control, &alerts).await;

    assert!(!sync.is_subscribed("polkadot"));
    assert_eq!(
        *api.unsubscribe_calls.borrow(),
        vec!["polkadot".to_string()]
    );
    assert_eq!(
        *control.labels_seen.borrow(),
        vec![
            UNSUBSCRIBING_LABEL.to_string(),
            SUBSCRIBE_LABEL.to_string()
        ]
    );
    assert!(alerts.messages.borrow().is_empty());
}

#[tokio::test]
async fn unsubscribe_without_platform_subscription_skips_server_call() {
    let platform = MockPlatform::supported();
    let api = MockApi::default();
    let mut sync = SubscriptionSync::new(&platform, &api, &test_config()).unwrap();

    sync.unsubscribe("polkadot").await.unwrap();

    assert!(api.unsubscribe_calls.borrow().is_empty());
    assert!(!sync.is_subscribed("polkadot"));
}

#[tokio::test]
async fn initialize_renders_controls_from_loaded_state() {
    let platform = MockPlatform::supported().with_subscription(test_subscription());
    let api = MockApi::default();
    *api.networks.borrow_mut() = vec!["kusama".to_string()];
    let mut sync = SubscriptionSync::new(&platform, &api, &test_config()).unwrap();
    let polkadot = RecordingControl::new("polkadot");
    let kusama = RecordingControl::new("kusama");

    registry::initialize(&mut sync, &[&polkadot, &kusama])
        .await
        .unwrap();

    assert_eq!(platform.register_calls.get(), 1);
    assert_eq!(*polkadot.label.borrow(), SUBSCRIBE_LABEL);
    assert_eq!(*kusama.label.borrow(), UNSUBSCRIBE_LABEL);
    assert!(polkadot.enabled.get());
    assert!(kusama.enabled.get());
}

#[tokio::test]
async fn initialize_on_unsupported_platform_disables_controls() {
    let platform = MockPlatform::default(); // supported = false
    let api = MockApi::default();
    let mut sync = SubscriptionSync::new(&platform, &api, &test_config()).unwrap();
    let control = RecordingControl::new("polkadot");

    let result = registry::initialize(&mut sync, &[&control]).await;

    assert!(matches!(result, Err(ClientError::Unsupported)));
    assert_eq!(*control.label.borrow(), UNSUPPORTED_LABEL);
    assert!(!control.enabled.get());
    assert_eq!(platform.register_calls.get(), 0);
    assert_eq!(api.networks_calls.get(), 0);
}

#[tokio::test]
async fn initialize_registration_failure_leaves_controls_untouched() {
    let platform = MockPlatform::supported();
    platform.fail_registration.set(true);
    let api = MockApi::default();
    let mut sync = SubscriptionSync::new(&platform, &api, &test_config()).unwrap();
    let control = RecordingControl::new("polkadot");

    let result = registry::initialize(&mut sync, &[&control]).await;

    assert!(matches!(result, Err(ClientError::Registration { .. })));
    assert!(control.labels_seen.borrow().is_empty());
    assert!(control.enabled.get());
}

#[tokio::test]
async fn initialize_survives_load_state_failure() {
    let platform = MockPlatform::supported().with_subscription(test_subscription());
    let api = MockApi::default();
    api.fail_networks.set(true);
    let mut sync = SubscriptionSync::new(&platform, &api, &test_config()).unwrap();
    let control = RecordingControl::new("polkadot");

    registry::initialize(&mut sync, &[&control]).await.unwrap();

    // Fail-open: the UI still renders, as "not subscribed".
    assert_eq!(*control.label.borrow(), SUBSCRIBE_LABEL);
    assert!(control.enabled.get());
}

// The original design relies on button disablement alone to serialize
// clicks; the core performs no deduplication of its own. A second
// subscribe for the same network posts to the server again.
#[tokio::test]
async fn repeated_subscribe_posts_to_server_again() {
    let platform = MockPlatform::supported().with_subscription(test_subscription());
    let api = MockApi::default();
    let mut sync = SubscriptionSync::new(&platform, &api, &test_config()).unwrap();

    sync.subscribe("polkadot").await.unwrap();
    sync.subscribe("polkadot").await.unwrap();

    assert_eq!(api.subscribe_calls.borrow().len(), 2);
    assert!(sync.is_subscribed("polkadot"));
}

#[tokio::test]
async fn malformed_vapid_key_fails_at_construction() {
    let platform = MockPlatform::supported();
    let api = MockApi::default();
    let config = ClientConfig::new("http://127.0.0.1:5000", "!!!").unwrap();

    let result = SubscriptionSync::new(&platform, &api, &config);
    assert!(matches!(result, Err(ClientError::InvalidKey(_))));
}
