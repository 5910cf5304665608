//! Native media engine contract.
//!
//! The engine runs on its own threads and talks to the client only through
//! two callback channels: named events and batched frame delivery. The only
//! control call the core issues back is `unsubscribe`.

use huddle_common::error::HuddleResult;
use huddle_media_model::{EventArgs, FrameDescriptor};

/// Handler invoked by the engine for one named event.
pub type NativeEventHandler = Box<dyn Fn(EventArgs) + Send + Sync>;

/// Handler invoked by the engine with each decoded frame batch.
pub type FrameBatchHandler = Box<dyn Fn(Vec<FrameDescriptor>) + Send + Sync>;

/// The external media engine, as seen by the client core.
pub trait NativeEngine: Send + Sync {
    /// Register the handler for one native event name. A later registration
    /// for the same name replaces the earlier one.
    fn on_event(&self, name: &str, handler: NativeEventHandler);

    /// Register the frame-delivery handler.
    fn register_deliver_frame(&self, handler: FrameBatchHandler);

    /// Stop receiving the given remote participant's stream.
    fn unsubscribe(&self, uid: u32) -> HuddleResult<()>;
}
