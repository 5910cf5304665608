//! In-process native engine.
//!
//! Stores the handlers the client registers and lets callers raise events
//! and deliver frame batches from any thread, the way the real engine does
//! from its worker threads. Used by the replay tool and by tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use huddle_common::error::{HuddleError, HuddleResult};
use huddle_media_model::{EventArgs, FrameDescriptor};

use crate::native::{FrameBatchHandler, NativeEngine, NativeEventHandler};

type SharedEventHandler = Arc<dyn Fn(EventArgs) + Send + Sync>;
type SharedFrameHandler = Arc<dyn Fn(Vec<FrameDescriptor>) + Send + Sync>;

#[derive(Default)]
struct LoopbackState {
    event_handlers: HashMap<String, SharedEventHandler>,
    frame_handler: Option<SharedFrameHandler>,
    unsubscribed: Vec<u32>,
    fail_unsubscribe: bool,
}

/// A [`NativeEngine`] driven by the caller.
#[derive(Default)]
pub struct LoopbackEngine {
    state: Mutex<LoopbackState>,
}

impl LoopbackEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, LoopbackState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Raise a native event. Returns `false` if nothing subscribed to `name`.
    pub fn fire(&self, name: &str, args: EventArgs) -> bool {
        let handler = self.lock().event_handlers.get(name).cloned();
        match handler {
            Some(handler) => {
                handler(args);
                true
            }
            None => {
                tracing::debug!(event = %name, "Loopback event has no subscriber");
                false
            }
        }
    }

    /// Deliver a frame batch. Returns `false` if no frame handler is registered.
    pub fn deliver_frames(&self, batch: Vec<FrameDescriptor>) -> bool {
        let handler = self.lock().frame_handler.clone();
        match handler {
            Some(handler) => {
                handler(batch);
                true
            }
            None => false,
        }
    }

    /// Uids passed to `unsubscribe`, in call order.
    pub fn unsubscribed(&self) -> Vec<u32> {
        self.lock().unsubscribed.clone()
    }

    /// Event names with a registered handler, sorted.
    pub fn subscribed_events(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().event_handlers.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn has_frame_handler(&self) -> bool {
        self.lock().frame_handler.is_some()
    }

    /// Make subsequent `unsubscribe` calls fail.
    pub fn set_fail_unsubscribe(&self, fail: bool) {
        self.lock().fail_unsubscribe = fail;
    }

    /// Drop every registered handler, closing the client's task queue once
    /// in-flight callbacks finish.
    pub fn shutdown(&self) {
        let mut state = self.lock();
        state.event_handlers.clear();
        state.frame_handler = None;
    }
}

impl NativeEngine for LoopbackEngine {
    fn on_event(&self, name: &str, handler: NativeEventHandler) {
        self.lock()
            .event_handlers
            .insert(name.to_string(), Arc::from(handler));
    }

    fn register_deliver_frame(&self, handler: FrameBatchHandler) {
        self.lock().frame_handler = Some(Arc::from(handler));
    }

    fn unsubscribe(&self, uid: u32) -> HuddleResult<()> {
        let mut state = self.lock();
        state.unsubscribed.push(uid);
        if state.fail_unsubscribe {
            return Err(HuddleError::engine(format!("unsubscribe({uid}) rejected")));
        }
        Ok(())
    }
}
