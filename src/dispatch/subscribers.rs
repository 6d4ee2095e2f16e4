use tracing::info;

use super::{Dispatcher, Event};

/// Log every event to the analytics target. Runs off the request path.
pub fn register_analytics(dispatcher: &Dispatcher) {
    dispatcher.subscribe_all_async(|event: Event| async move {
        let payload = serde_json::to_string(&event)?;
        info!(target: "analytics", "event={} {}", event.kind().as_str(), payload);
        Ok(())
    });
}
