//! Record tracing events in memory.
//!
//! [`CaptureLayer`] renders every event it sees with [`fmt::render_event`]
//! and appends it to a shared buffer. Clones share the buffer, so one clone
//! can be installed in a subscriber while another is inspected.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{Event, Level, Subscriber, subscriber};
use tracing_subscriber::{
    layer::{Context, Layer, SubscriberExt},
    registry,
};

use crate::fmt::{self, RenderedLog};

/// Tracing layer that buffers rendered events.
#[derive(Debug, Clone, Default)]
pub struct CaptureLayer {
    /// Shared event buffer.
    events: Arc<Mutex<Vec<RenderedLog>>>,
}

impl CaptureLayer {
    /// Create a layer with an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the captured events, oldest first.
    pub fn events(&self) -> Vec<RenderedLog> {
        self.events.lock().clone()
    }

    /// True if any captured event has exactly this message.
    pub fn contains(&self, message: &str) -> bool {
        self.events.lock().iter().any(|e| e.message == message)
    }

    /// Number of captured events at `level`.
    pub fn count_at(&self, level: Level) -> usize {
        let level = level.to_string();
        self.events
            .lock()
            .iter()
            .filter(|e| e.level == level)
            .count()
    }

    /// Drop everything captured so far.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        self.events.lock().push(fmt::render_event(event));
    }
}

/// Run `f` with a capturing subscriber installed for the current thread,
/// returning its result together with the captured events.
pub fn with_capture<R>(f: impl FnOnce() -> R) -> (R, CaptureLayer) {
    let layer = CaptureLayer::new();
    let sub = registry().with(layer.clone());
    let out = subscriber::with_default(sub, f);
    (out, layer)
}
