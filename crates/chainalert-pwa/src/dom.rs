//! Page-side trait implementations: subscribe buttons and alerts.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Window};

use chainalert_client::presenter::{AlertSink, SubscribeControl};

pub const SUBSCRIBE_BUTTON_SELECTOR: &str = ".subscribe-btn";
pub const NETWORK_ATTRIBUTE: &str = "data-network";

const SUBSCRIBED_CLASS: &str = "btn-outline-danger";
const UNSUBSCRIBED_CLASS: &str = "btn-outline-primary";

/// A subscribe button discovered in the page markup.
#[derive(Clone)]
pub struct DomSubscribeControl {
    element: Element,
}

impl DomSubscribeControl {
    /// Every element carrying the subscribe class.
    #[must_use]
    pub fn discover(document: &Document) -> Vec<Self> {
        let Ok(list) = document.query_selector_all(SUBSCRIBE_BUTTON_SELECTOR) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|index| list.get(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|element| Self { element })
            .collect()
    }

    #[must_use]
    pub fn element(&self) -> &Element {
        &self.element
    }
}

impl SubscribeControl for DomSubscribeControl {
    fn network_id(&self) -> String {
        self.element
            .get_attribute(NETWORK_ATTRIBUTE)
            .unwrap_or_default()
    }

    fn set_label(&self, label: &str) {
        self.element.set_text_content(Some(label));
    }

    fn set_enabled(&self, enabled: bool) {
        if enabled {
            let _ = self.element.remove_attribute("disabled");
        } else {
            let _ = self.element.set_attribute("disabled", "");
        }
    }

    fn set_subscribed_style(&self, subscribed: bool) {
        let classes = self.element.class_list();
        let _ = classes.toggle_with_force(SUBSCRIBED_CLASS, subscribed);
        let _ = classes.toggle_with_force(UNSUBSCRIBED_CLASS, !subscribed);
    }
}

/// Blocking alerts via `window.alert`, per the page's error surface.
pub struct WindowAlerts {
    window: Window,
}

impl WindowAlerts {
    #[must_use]
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl AlertSink for WindowAlerts {
    fn alert(&self, message: &str) {
        let _ = self.window.alert_with_message(message);
    }
}
