//! `PushPlatform` over the browser's service-worker and push APIs.

use std::cell::RefCell;

use async_trait::async_trait;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    PushSubscriptionOptionsInit, ServiceWorkerContainer, ServiceWorkerRegistration, Window,
};

use chainalert_client::{ClientError, PushPlatform, PushSubscription, SubscribeOptions};

/// Browser push platform. Keeps the worker registration handle private;
/// the core only ever sees the trait methods.
pub struct BrowserPushPlatform {
    window: Window,
    container: ServiceWorkerContainer,
    registration: RefCell<Option<ServiceWorkerRegistration>>,
}

impl BrowserPushPlatform {
    #[must_use]
    pub fn new(window: Window) -> Self {
        let container = window.navigator().service_worker();
        Self {
            window,
            container,
            registration: RefCell::new(None),
        }
    }

    fn push_manager(&self) -> Result<web_sys::PushManager, ClientError> {
        let registration = self.registration.borrow();
        let registration = registration
            .as_ref()
            .ok_or_else(|| ClientError::platform("background worker is not registered"))?;
        registration.push_manager().map_err(js_error)
    }
}

#[async_trait(?Send)]
impl PushPlatform for BrowserPushPlatform {
    fn push_supported(&self) -> bool {
        let navigator = self.window.navigator();
        js_sys::Reflect::has(&navigator, &JsValue::from_str("serviceWorker")).unwrap_or(false)
            && js_sys::Reflect::has(&self.window, &JsValue::from_str("PushManager"))
                .unwrap_or(false)
    }

    async fn register_worker(&self, script_path: &str) -> Result<(), ClientError> {
        let value = JsFuture::from(self.container.register(script_path))
            .await
            .map_err(js_error)?;
        let registration: ServiceWorkerRegistration = value.unchecked_into();
        *self.registration.borrow_mut() = Some(registration);
        Ok(())
    }

    async fn current_subscription(&self) -> Result<Option<PushSubscription>, ClientError> {
        let manager = self.push_manager()?;
        let promise = manager.get_subscription().map_err(js_error)?;
        let value = JsFuture::from(promise).await.map_err(js_error)?;
        if value.is_null() || value.is_undefined() {
            return Ok(None);
        }
        subscription_from_js(&value).map(Some)
    }

    async fn create_subscription(
        &self,
        options: &SubscribeOptions,
    ) -> Result<PushSubscription, ClientError> {
        let manager = self.push_manager()?;
        let init = PushSubscriptionOptionsInit::new();
        init.set_user_visible_only(options.user_visible_only);
        let key = js_sys::Uint8Array::from(options.application_server_key.as_slice());
        init.set_application_server_key(Some(&JsValue::from(key)));
        let promise = manager.subscribe_with_options(&init).map_err(js_error)?;
        let value = JsFuture::from(promise).await.map_err(js_error)?;
        subscription_from_js(&value)
    }
}

/// The wire form of a subscription is whatever its `toJSON` says; the
/// credential stays opaque on the Rust side.
fn subscription_from_js(value: &JsValue) -> Result<PushSubscription, ClientError> {
    let text: String = js_sys::JSON::stringify(value).map_err(js_error)?.into();
    let json = serde_json::from_str(&text)
        .map_err(|error| ClientError::platform(error.to_string()))?;
    Ok(PushSubscription::from_json(json))
}

fn js_error(value: JsValue) -> ClientError {
    let message = value
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(&value, &JsValue::from_str("message"))
                .ok()
                .and_then(|message| message.as_string())
        })
        .unwrap_or_else(|| format!("{value:?}"));
    ClientError::platform(message)
}
