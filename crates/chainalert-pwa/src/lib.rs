//! Browser bindings for `chainalert-client`.
//!
//! Implements the core's platform and UI traits over web-sys: service
//! worker registration and the PushManager lifecycle, DOM subscribe
//! buttons, `window.alert`, and the worker-context push/notification-click
//! handlers. Everything is wasm32-only; on other targets this crate
//! compiles to an empty library so the workspace builds and tests on the
//! host.
//!
//! The page calls `start` once on load; the background worker script
//! forwards its `push` and `notificationclick` events to
//! `worker::handle_push_event` and `worker::handle_notification_click`.

#[cfg(target_arch = "wasm32")]
mod boot;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod platform;
#[cfg(target_arch = "wasm32")]
pub mod worker;

#[cfg(target_arch = "wasm32")]
pub use boot::start;
#[cfg(target_arch = "wasm32")]
pub use dom::{DomSubscribeControl, WindowAlerts};
#[cfg(target_arch = "wasm32")]
pub use platform::BrowserPushPlatform;
