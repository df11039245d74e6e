//! Page entry point: config, client construction, initialization, and
//! click wiring.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use chainalert_client::{
    ClientConfig, ClientError, HttpSubscriptionApi, SubscriptionSync, config, presenter, registry,
};

use crate::dom::{DomSubscribeControl, WindowAlerts};
use crate::platform::BrowserPushPlatform;

type BrowserSync = SubscriptionSync<BrowserPushPlatform, HttpSubscriptionApi>;

/// Bring the push client up for this page. `base_url` and
/// `vapid_public_key` default to their environment-resolved values when
/// the page does not inject them.
///
/// Unsupported platforms and registration failures leave the page inert
/// (logged, not raised), matching the degraded modes of the client core.
#[wasm_bindgen]
pub async fn start(
    base_url: Option<String>,
    vapid_public_key: Option<String>,
) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let base_url = match base_url {
        Some(value) => value,
        None => config::resolve_service_base_url().map_err(to_js)?.0,
    };
    let vapid_public_key = vapid_public_key
        .or_else(config::resolve_vapid_public_key)
        .unwrap_or_default();
    let config = ClientConfig::new(base_url, vapid_public_key).map_err(to_js)?;
    let api = HttpSubscriptionApi::new(&config.base_url).map_err(to_js)?;
    let platform = BrowserPushPlatform::new(window.clone());
    let mut sync = SubscriptionSync::new(platform, api, &config).map_err(to_js)?;

    let controls = DomSubscribeControl::discover(&document);
    {
        let refs: Vec<&dyn presenter::SubscribeControl> = controls
            .iter()
            .map(|control| control as &dyn presenter::SubscribeControl)
            .collect();
        if let Err(error) = registry::initialize(&mut sync, &refs).await {
            web_sys::console::warn_1(&JsValue::from_str(&error.to_string()));
            return Ok(());
        }
    }

    let sync = Rc::new(RefCell::new(sync));
    let alerts = Rc::new(WindowAlerts::new(window));
    for control in controls {
        wire_click(&sync, &alerts, control);
    }
    Ok(())
}

fn wire_click(
    sync: &Rc<RefCell<BrowserSync>>,
    alerts: &Rc<WindowAlerts>,
    control: DomSubscribeControl,
) {
    let element = control.element().clone();
    let sync = Rc::clone(sync);
    let alerts = Rc::clone(alerts);
    let closure = Closure::<dyn FnMut()>::new(move || {
        let sync = Rc::clone(&sync);
        let alerts = Rc::clone(&alerts);
        let control = control.clone();
        wasm_bindgen_futures::spawn_local(async move {
            // A click landing before the disable renders finds the state
            // busy; dropping it is the same guard the disabled button
            // provides once it paints.
            let Ok(mut sync) = sync.try_borrow_mut() else {
                return;
            };
            presenter::toggle(&mut sync, &control, alerts.as_ref()).await;
        });
    });
    if element
        .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
        .is_ok()
    {
        closure.forget();
    }
}

fn to_js(error: ClientError) -> JsValue {
    JsValue::from_str(&error.to_string())
}
