//! Pluggable log-event dispatch.
//!
//! One process-wide listener slot, swappable at runtime. The default listener
//! forwards events to `tracing` at DEBUG.

use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;

use flicker_types::{InvalidationKind, LogEvent};

/// Consumes classified recompositions. Implementations must be cheap; the
/// emitting invocation blocks on `on_event`.
pub trait InvalidationListener: Send + Sync {
    fn on_event(&self, event: &LogEvent);
}

/// Default listener: structured `tracing` emission.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingListener;

impl InvalidationListener for TracingListener {
    fn on_event(&self, event: &LogEvent) {
        match &event.kind {
            InvalidationKind::Processed(reason) => tracing::debug!(
                function = %event.function.function,
                package = %event.function.package,
                file = %event.function.file,
                line = event.function.line,
                %reason,
                "invalidation processed"
            ),
            InvalidationKind::Skipped => tracing::debug!(
                function = %event.function.function,
                package = %event.function.package,
                file = %event.function.file,
                line = event.function.line,
                "invalidation skipped"
            ),
        }
    }
}

static LISTENER: LazyLock<RwLock<Arc<dyn InvalidationListener>>> =
    LazyLock::new(|| RwLock::new(Arc::new(TracingListener)));

/// Replaces the process-wide listener. Events already in flight keep the
/// listener they read; later events see the new one.
pub fn set_listener(listener: Arc<dyn InvalidationListener>) {
    *LISTENER.write() = listener;
}

/// Forwards `event` to the configured listener. Always returns.
pub fn emit_log_event(event: &LogEvent) {
    let listener = Arc::clone(&LISTENER.read());
    listener.on_event(event);
}
