//! Client core for chainalert web-push subscriptions.
//!
//! Owns the per-network subscription state and the logic that keeps it in
//! step with the remote subscription service, behind small traits for the
//! platform push API ([`platform::PushPlatform`]), the service transport
//! ([`api::SubscriptionApi`]), and the page UI ([`presenter::SubscribeControl`],
//! [`presenter::AlertSink`]). Browser bindings live in `chainalert-pwa`;
//! everything here is host-testable.

pub mod api;
pub mod config;
pub mod error;
pub mod keys;
pub mod platform;
pub mod presenter;
pub mod registry;
pub mod sync;
pub mod worker;

pub use api::{HttpSubscriptionApi, SubscriptionApi};
pub use config::ClientConfig;
pub use error::ClientError;
pub use platform::{PushPlatform, PushSubscription, SubscribeOptions};
pub use sync::SubscriptionSync;
