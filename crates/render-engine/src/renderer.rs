//! Renderer contract and backend factories.
//!
//! Concrete drawing lives outside this crate. Every backend, built-in or
//! application-supplied, implements [`Renderer`] and is produced by a
//! [`RendererFactory`]; the registry picks the factory once per target.

use std::fmt;
use std::sync::Arc;

use huddle_common::config::RenderPreference;
use huddle_common::error::HuddleResult;
use huddle_media_model::{ContentMode, FrameBuffer, RenderMode};
use serde::{Deserialize, Serialize};

/// Opaque handle to a UI drawing surface (native window or view).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceHandle(u64);

impl SurfaceHandle {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SurfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{:x}", self.0)
    }
}

/// Capability set every renderer backend provides.
pub trait Renderer {
    /// Attach to a surface. Calling again re-binds to the new surface.
    fn bind(&mut self, surface: SurfaceHandle) -> HuddleResult<()>;

    /// Detach from the current surface and release drawing resources.
    fn unbind(&mut self) -> HuddleResult<()>;

    /// Draw one validated frame.
    fn draw_frame(&mut self, frame: &FrameBuffer<'_>) -> HuddleResult<()>;

    /// Recompute scaling for the surface's current size.
    fn refresh_canvas(&mut self) -> HuddleResult<()>;

    /// Change how frames are scaled into the surface.
    fn set_content_mode(&mut self, mode: ContentMode) -> HuddleResult<()>;
}

/// Produces renderer instances for one backend family.
pub trait RendererFactory {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Create a fresh, unbound renderer.
    fn create(&self) -> HuddleResult<Box<dyn Renderer>>;

    /// Whether this backend can create a drawing context on this system.
    fn probe(&self) -> bool {
        true
    }
}

/// The two built-in backend families.
#[derive(Clone)]
pub struct RendererBackends {
    pub accelerated: Arc<dyn RendererFactory>,
    pub software: Arc<dyn RendererFactory>,
}

impl RendererBackends {
    pub fn new(accelerated: Arc<dyn RendererFactory>, software: Arc<dyn RendererFactory>) -> Self {
        Self {
            accelerated,
            software,
        }
    }

    /// Resolve the initial render mode for a preference.
    ///
    /// Runs the accelerated capability probe unless software is forced.
    pub fn select_mode(&self, preference: RenderPreference) -> RenderMode {
        if preference == RenderPreference::Software {
            return RenderMode::Software;
        }

        if self.accelerated.probe() {
            RenderMode::Accelerated
        } else {
            if preference == RenderPreference::Accelerated {
                tracing::warn!(
                    backend = %self.accelerated.name(),
                    "Accelerated rendering requested but unavailable; using software"
                );
            } else {
                tracing::info!(
                    backend = %self.accelerated.name(),
                    "Accelerated context probe failed; using software rendering"
                );
            }
            RenderMode::Software
        }
    }
}

impl fmt::Debug for RendererBackends {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererBackends")
            .field("accelerated", &self.accelerated.name())
            .field("software", &self.software.name())
            .finish()
    }
}
