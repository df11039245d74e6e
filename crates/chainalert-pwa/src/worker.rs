//! Worker-context event glue. The background worker script forwards its
//! `push` and `notificationclick` events here; the decisions themselves
//! are made by `chainalert_client::worker`.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{NotificationEvent, NotificationOptions, PushEvent, ServiceWorkerGlobalScope};

use chainalert_client::worker::{self, ClickResponse, NotificationSpec};

fn worker_scope() -> ServiceWorkerGlobalScope {
    js_sys::global().unchecked_into()
}

/// Inbound push message: decode the payload and show the notification.
/// The show promise is handed to `waitUntil` so the worker stays alive
/// until it resolves. Pushes without data or with malformed payloads are
/// dropped (logged), never notified.
#[wasm_bindgen]
pub fn handle_push_event(event: PushEvent) {
    let Some(data) = event.data() else {
        return;
    };
    let text = match data.text() {
        Ok(text) => text,
        Err(_) => return,
    };
    let spec = match worker::notification_for_push(&text) {
        Ok(spec) => spec.with_arrival_ms(js_sys::Date::now()),
        Err(error) => {
            web_sys::console::error_1(&JsValue::from_str(&error.to_string()));
            return;
        }
    };
    match show_notification(&spec) {
        Ok(promise) => {
            let _ = event.wait_until(&promise);
        }
        Err(error) => web_sys::console::error_1(&error),
    }
}

/// Notification click: always close; the explore action opens the site
/// root in a client window.
#[wasm_bindgen]
pub fn handle_notification_click(event: NotificationEvent) {
    event.notification().close();
    match worker::on_notification_click(&event.action()) {
        ClickResponse::OpenWindow(url) => {
            if let Ok(promise) = worker_scope().clients().open_window(url) {
                let _ = event.wait_until(&promise);
            }
        }
        ClickResponse::Dismiss => {}
    }
}

fn show_notification(spec: &NotificationSpec) -> Result<js_sys::Promise, JsValue> {
    let options = NotificationOptions::new();
    options.set_body(&spec.body);

    let vibration = spec
        .vibration
        .iter()
        .copied()
        .map(JsValue::from)
        .collect::<js_sys::Array>();
    options.set_vibrate(&vibration);

    let actions = js_sys::Array::new();
    for action in spec.actions {
        let entry = js_sys::Object::new();
        js_sys::Reflect::set(
            &entry,
            &JsValue::from_str("action"),
            &JsValue::from_str(action.action),
        )?;
        js_sys::Reflect::set(
            &entry,
            &JsValue::from_str("title"),
            &JsValue::from_str(action.title),
        )?;
        actions.push(&entry);
    }
    options.set_actions(&actions);

    if let Some(arrival_ms) = spec.arrival_ms {
        let data = js_sys::Object::new();
        js_sys::Reflect::set(
            &data,
            &JsValue::from_str("dateOfArrival"),
            &JsValue::from_f64(arrival_ms),
        )?;
        options.set_data(&data);
    }

    worker_scope()
        .registration()
        .show_notification_with_options(&spec.title, &options)
}
