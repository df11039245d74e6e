//! Startup flow: capability check, worker registration, state load, and
//! the first render of every subscribe control.

use tracing::{error, info, warn};

use crate::api::SubscriptionApi;
use crate::error::ClientError;
use crate::platform::PushPlatform;
use crate::presenter::{self, SubscribeControl};
use crate::sync::SubscriptionSync;

/// Bring the push client up on page load.
///
/// On an unsupported platform every control is disabled and nothing else
/// runs. A registration failure is logged and leaves the controls in their
/// markup-default state; there is no retry, the system simply stays inert.
pub async fn initialize<P, A>(
    sync: &mut SubscriptionSync<P, A>,
    controls: &[&dyn SubscribeControl],
) -> Result<(), ClientError>
where
    P: PushPlatform,
    A: SubscriptionApi,
{
    if !sync.push_supported() {
        warn!("push messaging is not supported");
        for control in controls {
            presenter::mark_unsupported(*control);
        }
        return Err(ClientError::Unsupported);
    }

    if let Err(cause) = sync.register_worker().await {
        error!("background worker registration failed: {cause}");
        return Err(ClientError::Registration {
            message: cause.to_string(),
        });
    }
    info!("background worker registered");

    sync.load_state().await;

    for control in controls {
        presenter::render(*control, sync.is_subscribed(&control.network_id()));
    }
    Ok(())
}
