//! Headless renderer backend.
//!
//! Draws nothing; records every renderer call into a shared journal. The
//! replay tool uses it to report what each stream received, and tests use
//! it to observe bind/unbind ordering.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use huddle_common::error::{HuddleError, HuddleResult};
use huddle_media_model::{ContentMode, FrameBuffer};

use crate::renderer::{Renderer, RendererFactory, SurfaceHandle};

/// A renderer operation as seen by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RendererCall {
    Bind(SurfaceHandle),
    Unbind,
    DrawFrame { y: usize, u: usize, v: usize },
    RefreshCanvas,
    SetContentMode(ContentMode),
}

/// One journaled call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    /// Name of the factory that created the renderer.
    pub backend: String,
    /// Renderer instance id, unique per journal.
    pub instance: usize,
    pub call: RendererCall,
}

#[derive(Debug, Default)]
struct JournalState {
    entries: Vec<JournalEntry>,
    next_instance: usize,
}

/// Shared call log. Cloning yields another handle to the same log.
#[derive(Debug, Clone, Default)]
pub struct RendererJournal {
    state: Arc<Mutex<JournalState>>,
}

impl RendererJournal {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, JournalState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn allocate_instance(&self) -> usize {
        let mut state = self.lock();
        let id = state.next_instance;
        state.next_instance += 1;
        id
    }

    fn record(&self, backend: &str, instance: usize, call: RendererCall) {
        self.lock().entries.push(JournalEntry {
            backend: backend.to_string(),
            instance,
            call,
        });
    }

    /// Snapshot of all entries in call order.
    pub fn entries(&self) -> Vec<JournalEntry> {
        self.lock().entries.clone()
    }

    /// Calls received by one renderer instance, in order.
    pub fn calls_for(&self, instance: usize) -> Vec<RendererCall> {
        self.lock()
            .entries
            .iter()
            .filter(|e| e.instance == instance)
            .map(|e| e.call.clone())
            .collect()
    }

    /// Number of renderers created so far.
    pub fn instances_created(&self) -> usize {
        self.lock().next_instance
    }

    /// Number of `unbind` calls an instance received.
    pub fn unbind_count(&self, instance: usize) -> usize {
        self.calls_for(instance)
            .iter()
            .filter(|c| matches!(c, RendererCall::Unbind))
            .count()
    }

    /// Number of frames an instance drew.
    pub fn frames_drawn(&self, instance: usize) -> usize {
        self.calls_for(instance)
            .iter()
            .filter(|c| matches!(c, RendererCall::DrawFrame { .. }))
            .count()
    }

    /// Backend name that created an instance.
    pub fn backend_of(&self, instance: usize) -> Option<String> {
        self.lock()
            .entries
            .iter()
            .find(|e| e.instance == instance)
            .map(|e| e.backend.clone())
    }

    pub fn clear(&self) {
        self.lock().entries.clear();
    }
}

/// Factory for [`HeadlessRenderer`] instances.
#[derive(Debug, Clone)]
pub struct HeadlessFactory {
    name: String,
    available: bool,
    fail_unbind: bool,
    journal: RendererJournal,
}

impl HeadlessFactory {
    /// Create a factory with its own journal.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_journal(name, RendererJournal::new())
    }

    /// Create a factory that records into an existing journal.
    pub fn with_journal(name: impl Into<String>, journal: RendererJournal) -> Self {
        Self {
            name: name.into(),
            available: true,
            fail_unbind: false,
            journal,
        }
    }

    /// Make the capability probe fail.
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Make every renderer's `unbind` fail after journaling it.
    pub fn failing_unbind(mut self) -> Self {
        self.fail_unbind = true;
        self
    }

    pub fn journal(&self) -> RendererJournal {
        self.journal.clone()
    }
}

impl RendererFactory for HeadlessFactory {
    fn name(&self) -> &str {
        &self.name
    }

    fn create(&self) -> HuddleResult<Box<dyn Renderer>> {
        if !self.available {
            return Err(HuddleError::render(format!(
                "{} backend has no drawing context",
                self.name
            )));
        }
        Ok(Box::new(HeadlessRenderer {
            backend: self.name.clone(),
            instance: self.journal.allocate_instance(),
            surface: None,
            fail_unbind: self.fail_unbind,
            journal: self.journal.clone(),
        }))
    }

    fn probe(&self) -> bool {
        self.available
    }
}

/// Renderer that journals calls instead of drawing.
#[derive(Debug)]
pub struct HeadlessRenderer {
    backend: String,
    instance: usize,
    surface: Option<SurfaceHandle>,
    fail_unbind: bool,
    journal: RendererJournal,
}

impl HeadlessRenderer {
    fn record(&self, call: RendererCall) {
        self.journal.record(&self.backend, self.instance, call);
    }
}

impl Renderer for HeadlessRenderer {
    fn bind(&mut self, surface: SurfaceHandle) -> HuddleResult<()> {
        self.record(RendererCall::Bind(surface));
        self.surface = Some(surface);
        Ok(())
    }

    fn unbind(&mut self) -> HuddleResult<()> {
        self.record(RendererCall::Unbind);
        if self.fail_unbind {
            return Err(HuddleError::render(format!(
                "{} renderer {} failed to release its surface",
                self.backend, self.instance
            )));
        }
        self.surface = None;
        Ok(())
    }

    fn draw_frame(&mut self, frame: &FrameBuffer<'_>) -> HuddleResult<()> {
        if self.surface.is_none() {
            return Err(HuddleError::render("draw on unbound renderer"));
        }
        let (y, u, v) = frame.plane_lens();
        self.record(RendererCall::DrawFrame { y, u, v });
        Ok(())
    }

    fn refresh_canvas(&mut self) -> HuddleResult<()> {
        self.record(RendererCall::RefreshCanvas);
        Ok(())
    }

    fn set_content_mode(&mut self, mode: ContentMode) -> HuddleResult<()> {
        self.record(RendererCall::SetContentMode(mode));
        Ok(())
    }
}
