//! New-order alert sink
//!
//! The audible "new order" chime is a consumer-side effect: feeds fire it
//! on insert events only, and an operator mute skips it without affecting
//! event delivery. The sink is an explicit object with its own lifecycle
//! (constructed once per process, passed to the feeds), not ambient global
//! state, so tests can count alerts without leaking between each other.

/// Fire-and-forget alert sink
///
/// Implementations must swallow their own failures (audio device missing,
/// autoplay blocked): a broken chime must never surface as an error in the
/// order pipeline.
pub trait NotificationSink: Send + Sync {
    fn order_alert(&self);
}

/// Sink that does nothing. Default for headless deployments and tests.
pub struct SilentSink;

impl NotificationSink for SilentSink {
    fn order_alert(&self) {}
}

/// Sink that logs the alert at debug level.
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn order_alert(&self) {
        tracing::debug!("New order alert");
    }
}
