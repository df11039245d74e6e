//! Background message handler: the decision logic executed inside the
//! isolated worker context. Pure functions here; the event glue that
//! awaits `showNotification` and opens windows lives in `chainalert-pwa`.

use serde::Deserialize;

use crate::error::ClientError;

pub const VIBRATION_PATTERN: [u32; 3] = [100, 50, 400];
pub const CLICK_ACTION_EXPLORE: &str = "explore";
pub const CLICK_ACTION_CLOSE: &str = "close";

pub const NOTIFICATION_ACTIONS: [NotificationAction; 2] = [
    NotificationAction {
        action: CLICK_ACTION_EXPLORE,
        title: "View Details",
    },
    NotificationAction {
        action: CLICK_ACTION_CLOSE,
        title: "Close",
    },
];

/// Inbound push payload: `{ "chain": ..., "message": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PushPayload {
    pub chain: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationAction {
    pub action: &'static str,
    pub title: &'static str,
}

/// Everything the worker glue needs to show one notification.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationSpec {
    pub title: String,
    pub body: String,
    pub vibration: &'static [u32],
    pub actions: &'static [NotificationAction],
    /// Arrival timestamp in milliseconds, attached to the notification's
    /// data object. Filled by the worker glue from the platform clock.
    pub arrival_ms: Option<f64>,
}

impl NotificationSpec {
    #[must_use]
    pub fn with_arrival_ms(mut self, arrival_ms: f64) -> Self {
        self.arrival_ms = Some(arrival_ms);
        self
    }
}

/// What a notification click should do after closing the notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickResponse {
    OpenWindow(&'static str),
    Dismiss,
}

/// Build the notification for an inbound push payload.
pub fn notification_for_push(text: &str) -> Result<NotificationSpec, ClientError> {
    let payload: PushPayload =
        serde_json::from_str(text).map_err(|error| ClientError::Decode {
            message: error.to_string(),
        })?;
    Ok(NotificationSpec {
        title: format!("{} Alert", payload.chain),
        body: payload.message,
        vibration: &VIBRATION_PATTERN,
        actions: &NOTIFICATION_ACTIONS,
        arrival_ms: None,
    })
}

/// Only the explore action navigates; every other action (including the
/// explicit close) just dismisses.
#[must_use]
pub fn on_notification_click(action: &str) -> ClickResponse {
    if action == CLICK_ACTION_EXPLORE {
        ClickResponse::OpenWindow("/")
    } else {
        ClickResponse::Dismiss
    }
}
