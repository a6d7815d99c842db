//! Mirror rendered events into the tracing log

use pyfreeze_events::{AppEvent, EventLevel};
use tracing::{debug, error, info, warn};

/// Log an `AppEvent` at its own severity, with the domain as a field
pub fn log_event_with_tracing(event: &AppEvent, message: &str) {
    let domain = event.domain();
    match event.level() {
        EventLevel::Debug => debug!(domain, "{message}"),
        EventLevel::Info => info!(domain, "{message}"),
        EventLevel::Warn => warn!(domain, "{message}"),
        EventLevel::Error => error!(domain, "{message}"),
    }
}
