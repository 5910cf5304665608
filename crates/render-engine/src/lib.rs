//! Huddle Render Engine
//!
//! Routes decoded video planes from the native engine to the renderer bound
//! for each stream.
//!
//! # Frame Path
//!
//! ```text
//! native frame batch
//!        │
//!        ▼
//! FrameDispatcher ── class/uid ──► StreamKey
//!        │                            │
//!        │                  RenderTargetRegistry lookup
//!        ▼                            │
//! FrameValidator ◄────────────────────┘
//!        │
//!        ▼
//! Renderer::draw_frame (accelerated | software | custom)
//! ```

pub mod dispatcher;
pub mod headless;
pub mod registry;
pub mod renderer;
pub mod validator;

pub use dispatcher::*;
pub use headless::{HeadlessFactory, HeadlessRenderer, JournalEntry, RendererCall, RendererJournal};
pub use registry::*;
pub use renderer::*;
pub use validator::*;
