//! Button presenter: maps synchronizer state onto subscribe controls and
//! forwards user intent back to it.

use tracing::warn;

use crate::api::SubscriptionApi;
use crate::platform::PushPlatform;
use crate::sync::SubscriptionSync;

pub const SUBSCRIBE_LABEL: &str = "Subscribe";
pub const UNSUBSCRIBE_LABEL: &str = "Unsubscribe";
pub const SUBSCRIBING_LABEL: &str = "Subscribing...";
pub const UNSUBSCRIBING_LABEL: &str = "Unsubscribing...";
pub const UNSUPPORTED_LABEL: &str = "Notifications not supported";

/// One subscribe/unsubscribe affordance on the page.
pub trait SubscribeControl {
    /// The network id bound to this control by the page markup.
    fn network_id(&self) -> String;

    fn set_label(&self, label: &str);

    fn set_enabled(&self, enabled: bool);

    /// Visual subscribed/unsubscribed styling. Default no-op for hosts
    /// without one.
    fn set_subscribed_style(&self, subscribed: bool) {
        let _ = subscribed;
    }
}

/// Where user-visible error messages go. The core never decides how to
/// display them.
pub trait AlertSink {
    fn alert(&self, message: &str);
}

/// Render the final (idle) state of a control.
pub fn render(control: &dyn SubscribeControl, subscribed: bool) {
    control.set_label(if subscribed {
        UNSUBSCRIBE_LABEL
    } else {
        SUBSCRIBE_LABEL
    });
    control.set_subscribed_style(subscribed);
    control.set_enabled(true);
}

/// Terminal state for platforms without push support.
pub fn mark_unsupported(control: &dyn SubscribeControl) {
    control.set_enabled(false);
    control.set_label(UNSUPPORTED_LABEL);
}

/// Handle a click on a subscribe control: flip the subscription in the
/// direction opposite to the current state, keeping the control disabled
/// with an in-progress label for the duration of the call. On failure the
/// control returns to its pre-action state and the error message is
/// surfaced through `alerts`.
pub async fn toggle<P, A>(
    sync: &mut SubscriptionSync<P, A>,
    control: &dyn SubscribeControl,
    alerts: &dyn AlertSink,
) where
    P: PushPlatform,
    A: SubscriptionApi,
{
    let network_id = control.network_id();
    control.set_enabled(false);

    if sync.is_subscribed(&network_id) {
        control.set_label(UNSUBSCRIBING_LABEL);
        match sync.unsubscribe(&network_id).await {
            Ok(()) => render(control, false),
            Err(error) => {
                warn!("unsubscribe from {network_id} failed: {error}");
                control.set_label(UNSUBSCRIBE_LABEL);
                control.set_enabled(true);
                alerts.alert(&error.user_message("unsubscribe"));
            }
        }
    } else {
        control.set_label(SUBSCRIBING_LABEL);
        match sync.subscribe(&network_id).await {
            Ok(()) => render(control, true),
            Err(error) => {
                warn!("subscribe to {network_id} failed: {error}");
                control.set_label(SUBSCRIBE_LABEL);
                control.set_enabled(true);
                alerts.alert(&error.user_message("subscribe"));
            }
        }
    }
}
