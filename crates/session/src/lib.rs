//! Huddle Session
//!
//! Bridges the native media engine to the application thread.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────── engine threads ────────────────┐
//! │  onEvent(name, args)     deliverFrame(batch)   │
//! └────────┬──────────────────────────┬────────────┘
//!          │ Task::Event              │ Task::Frames
//!          ▼                          ▼
//!    ┌──────────────────────────────────────┐
//!    │        FIFO task queue (mpsc)        │
//!    └──────────────────┬───────────────────┘
//!                       │ drain() / run()   (application thread)
//!          ┌────────────┴─────────────┐
//!          ▼                          ▼
//!    EventBridge                FrameDispatcher
//!    side effects + aliases     validate + draw
//!          │                          │
//!          ▼                          ▼
//!    app listeners             RenderTargetRegistry
//! ```

pub mod bridge;
pub mod catalogue;
pub mod client;
pub mod loopback;
pub mod native;
pub mod queue;

pub use bridge::{CanonicalEvent, EventBridge, Listener, ListenerId};
pub use client::RtcClient;
pub use loopback::LoopbackEngine;
pub use native::{FrameBatchHandler, NativeEngine, NativeEventHandler};
pub use queue::{task_queue, Task, TaskReceiver, TaskSender};
