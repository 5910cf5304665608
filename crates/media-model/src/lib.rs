//! Huddle Media Model
//!
//! Defines the data contracts shared by the render and session crates:
//! - **Streams:** `StreamKey` identifies a renderable source
//! - **Frames:** raw native frame descriptors and validated plane views
//! - **Render modes:** renderer family and content scaling selection
//! - **Events:** native engine events and replay trace records

pub mod event;
pub mod frame;
pub mod render_mode;
pub mod stream;
pub mod trace;

pub use event::*;
pub use frame::*;
pub use render_mode::*;
pub use stream::*;
pub use trace::*;

/// Errors raised while interpreting model values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("Invalid stream key '{0}'")]
    InvalidStreamKey(String),

    #[error("Unknown frame class {0}")]
    UnknownFrameClass(u8),

    #[error("Trace line {line}: {message}")]
    Trace { line: usize, message: String },

    #[error("Unknown {kind} '{value}'")]
    UnknownVariant { kind: &'static str, value: String },
}
