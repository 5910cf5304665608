//! Frame dispatch.
//!
//! Each native delivery carries a batch of frames. Frames are routed in
//! array order; anything that cannot be drawn right now is dropped, since
//! only the freshest frame matters for presentation and the next one is
//! at most a few tens of milliseconds away.

use huddle_media_model::{FrameClass, FrameDescriptor, StreamKey};

use crate::registry::RenderTargetRegistry;
use crate::validator::FrameValidator;

/// Why a frame could not be mapped to a stream key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UnroutableFrame {
    #[error("device test frames are not rendered outside a test harness")]
    DeviceTest,

    #[error("unknown frame class {0}")]
    UnknownClass(u8),
}

/// Resolve the stream key for a raw class tag and uid.
pub fn resolve_stream_key(class: u8, uid: u32) -> Result<StreamKey, UnroutableFrame> {
    let class = FrameClass::try_from(class).map_err(|_| UnroutableFrame::UnknownClass(class))?;
    class.stream_key(uid).ok_or(UnroutableFrame::DeviceTest)
}

/// Cumulative dispatch counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Batches received.
    pub batches: u64,

    /// Frames handed to a renderer successfully.
    pub frames_drawn: u64,

    /// Frames whose stream had no bound render target.
    pub dropped_unbound: u64,

    /// Frames rejected by the validator.
    pub dropped_invalid: u64,

    /// Frames with a class that has no render target.
    pub dropped_unroutable: u64,

    /// Frames the renderer failed to draw.
    pub draw_errors: u64,
}

impl DispatchStats {
    /// Total frames that did not reach the screen.
    pub fn frames_dropped(&self) -> u64 {
        self.dropped_unbound + self.dropped_invalid + self.dropped_unroutable + self.draw_errors
    }

    /// Drop rate as a percentage.
    pub fn drop_rate(&self) -> f64 {
        let total = self.frames_drawn + self.frames_dropped();
        if total == 0 {
            return 0.0;
        }
        self.frames_dropped() as f64 / total as f64 * 100.0
    }
}

/// Routes frame batches to bound renderers.
#[derive(Debug, Default)]
pub struct FrameDispatcher {
    validator: FrameValidator,
    stats: DispatchStats,
}

impl FrameDispatcher {
    pub fn new(validator: FrameValidator) -> Self {
        Self {
            validator,
            stats: DispatchStats::default(),
        }
    }

    /// Dispatch one batch in array order. Returns the number of frames drawn.
    pub fn dispatch(&mut self, batch: &[FrameDescriptor], registry: &mut RenderTargetRegistry) -> usize {
        self.stats.batches += 1;
        let mut drawn = 0;

        for frame in batch {
            let key = match resolve_stream_key(frame.class, frame.uid) {
                Ok(key) => key,
                Err(reason) => {
                    tracing::trace!(class = frame.class, uid = frame.uid, %reason, "Dropping unroutable frame");
                    self.stats.dropped_unroutable += 1;
                    continue;
                }
            };

            let Some(target) = registry.lookup_mut(key) else {
                tracing::trace!(%key, "No render target bound; dropping frame");
                self.stats.dropped_unbound += 1;
                continue;
            };

            let buffer = frame.buffer();
            if !self.validator.validate_buffer(&buffer) {
                self.stats.dropped_invalid += 1;
                continue;
            }

            match target.draw(&buffer) {
                Ok(()) => {
                    self.stats.frames_drawn += 1;
                    drawn += 1;
                }
                Err(e) => {
                    tracing::warn!(%key, error = %e, "Renderer failed to draw frame");
                    self.stats.draw_errors += 1;
                }
            }
        }

        drawn
    }

    pub fn stats(&self) -> &DispatchStats {
        &self.stats
    }
}
