//! Render target registry.
//!
//! Owns every live renderer, keyed by stream. At most one target exists per
//! key: binding a key that is already bound tears the old target down first.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use huddle_common::config::RenderPreference;
use huddle_common::error::{HuddleError, HuddleResult};
use huddle_media_model::{ContentMode, FrameBuffer, RenderMode, StreamKey};

use crate::renderer::{Renderer, RendererBackends, RendererFactory, SurfaceHandle};

/// A stream bound to a surface through a concrete renderer.
pub struct RenderTarget {
    key: StreamKey,
    surface: SurfaceHandle,
    mode: RenderMode,
    backend: String,
    renderer: Box<dyn Renderer>,
}

impl RenderTarget {
    pub fn key(&self) -> StreamKey {
        self.key
    }

    pub fn surface(&self) -> SurfaceHandle {
        self.surface
    }

    /// Renderer family this target was created with.
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Name of the factory that produced the renderer.
    pub fn backend(&self) -> &str {
        &self.backend
    }

    pub(crate) fn draw(&mut self, frame: &FrameBuffer<'_>) -> HuddleResult<()> {
        self.renderer.draw_frame(frame)
    }
}

impl fmt::Debug for RenderTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderTarget")
            .field("key", &self.key)
            .field("surface", &self.surface)
            .field("mode", &self.mode)
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

/// Keyed store of live render targets.
pub struct RenderTargetRegistry {
    backends: RendererBackends,
    custom: Option<Arc<dyn RendererFactory>>,
    mode: RenderMode,
    targets: HashMap<StreamKey, RenderTarget>,
}

impl RenderTargetRegistry {
    /// Create a registry, probing for accelerated rendering per `preference`.
    pub fn new(backends: RendererBackends, preference: RenderPreference) -> Self {
        let mode = backends.select_mode(preference);
        tracing::info!(%mode, "Render mode selected");
        Self {
            backends,
            custom: None,
            mode,
            targets: HashMap::new(),
        }
    }

    /// Render mode used for targets created from now on.
    pub fn render_mode(&self) -> RenderMode {
        self.mode
    }

    /// Switch the renderer family for future targets.
    ///
    /// Existing targets keep the renderer they were created with. Selecting
    /// `Custom` requires a factory from [`set_custom_renderer`](Self::set_custom_renderer).
    pub fn set_render_mode(&mut self, mode: RenderMode) -> HuddleResult<()> {
        if mode == RenderMode::Custom && self.custom.is_none() {
            return Err(HuddleError::config(
                "custom render mode requires a renderer factory",
            ));
        }
        if mode != self.mode {
            tracing::info!(from = %self.mode, to = %mode, "Render mode changed");
        }
        self.mode = mode;
        Ok(())
    }

    /// Install an application renderer factory and switch to `Custom` mode.
    pub fn set_custom_renderer(&mut self, factory: Arc<dyn RendererFactory>) {
        tracing::info!(backend = %factory.name(), "Custom renderer installed");
        self.custom = Some(factory);
        self.mode = RenderMode::Custom;
    }

    fn factory_for(&self, mode: RenderMode) -> HuddleResult<&Arc<dyn RendererFactory>> {
        match mode {
            RenderMode::Accelerated => Ok(&self.backends.accelerated),
            RenderMode::Software => Ok(&self.backends.software),
            RenderMode::Custom => self
                .custom
                .as_ref()
                .ok_or_else(|| HuddleError::config("no custom renderer factory installed")),
        }
    }

    /// Bind `key` to `surface` with a renderer of the current mode.
    ///
    /// An existing target for `key` is destroyed first. If the new renderer
    /// cannot be created or bound, the error is returned and `key` is left
    /// unbound.
    pub fn init_render(&mut self, key: StreamKey, surface: SurfaceHandle) -> HuddleResult<()> {
        self.destroy_render(key);

        let mode = self.mode;
        let factory = self.factory_for(mode)?;
        let backend = factory.name().to_string();
        let mut renderer = factory.create()?;
        renderer.bind(surface).map_err(|e| {
            tracing::warn!(%key, %surface, %backend, error = %e, "Renderer failed to bind");
            e
        })?;

        tracing::info!(%key, %surface, %mode, %backend, "Render target bound");
        self.insert(RenderTarget {
            key,
            surface,
            mode,
            backend,
            renderer,
        });
        Ok(())
    }

    /// Unbind and remove the target for `key`; unbind failures are logged.
    ///
    /// Returns whether a target was removed.
    pub fn destroy_render(&mut self, key: StreamKey) -> bool {
        self.destroy_render_with(key, |e| {
            tracing::warn!(%key, error = %e, "Renderer unbind failed");
        })
    }

    /// Unbind and remove the target for `key`, routing unbind failures to
    /// `on_failure`.
    ///
    /// Absent keys are a no-op and never invoke `on_failure`. The entry is
    /// removed even when `unbind` fails so a broken renderer cannot pin the
    /// key.
    pub fn destroy_render_with<F>(&mut self, key: StreamKey, on_failure: F) -> bool
    where
        F: FnOnce(HuddleError),
    {
        let Some(mut target) = self.remove(key) else {
            return false;
        };

        match target.renderer.unbind() {
            Ok(()) => tracing::info!(%key, surface = %target.surface, "Render target released"),
            Err(e) => on_failure(e),
        }
        true
    }

    /// Ask the bound renderer to rescale for its surface's current size.
    ///
    /// Returns whether a target was bound.
    pub fn resize_render(&mut self, key: StreamKey) -> bool {
        let Some(target) = self.lookup_mut(key) else {
            return false;
        };
        if let Err(e) = target.renderer.refresh_canvas() {
            tracing::warn!(%key, error = %e, "Renderer refresh failed");
        }
        true
    }

    /// Forward a content scaling mode to the bound renderer.
    pub fn setup_view_content_mode(&mut self, key: StreamKey, mode: ContentMode) -> HuddleResult<()> {
        let target = self
            .lookup_mut(key)
            .ok_or_else(|| HuddleError::target_not_found(key))?;
        target.renderer.set_content_mode(mode)?;
        tracing::debug!(%key, %mode, "Content mode applied");
        Ok(())
    }

    /// Destroy every target. Used on client shutdown.
    pub fn clear(&mut self) {
        let keys: Vec<StreamKey> = self.targets.keys().copied().collect();
        for key in keys {
            self.destroy_render(key);
        }
    }

    pub fn target(&self, key: StreamKey) -> Option<&RenderTarget> {
        self.targets.get(&key)
    }

    pub fn is_bound(&self, key: StreamKey) -> bool {
        self.targets.contains_key(&key)
    }

    /// Bound keys in sorted order.
    pub fn keys(&self) -> Vec<StreamKey> {
        let mut keys: Vec<StreamKey> = self.targets.keys().copied().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    fn insert(&mut self, target: RenderTarget) {
        self.targets.insert(target.key, target);
    }

    pub(crate) fn lookup_mut(&mut self, key: StreamKey) -> Option<&mut RenderTarget> {
        self.targets.get_mut(&key)
    }

    fn remove(&mut self, key: StreamKey) -> Option<RenderTarget> {
        self.targets.remove(&key)
    }
}

impl fmt::Debug for RenderTargetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderTargetRegistry")
            .field("mode", &self.mode)
            .field("targets", &self.keys())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessFactory, RendererCall, RendererJournal};

    fn registry_with(preference: RenderPreference) -> (RenderTargetRegistry, RendererJournal) {
        let journal = RendererJournal::new();
        let backends = RendererBackends::new(
            Arc::new(HeadlessFactory::with_journal("gl", journal.clone())),
            Arc::new(HeadlessFactory::with_journal("canvas", journal.clone())),
        );
        (RenderTargetRegistry::new(backends, preference), journal)
    }

    #[test]
    fn rebinding_key_unbinds_previous_renderer_once() {
        let (mut registry, journal) = registry_with(RenderPreference::Auto);
        let a = SurfaceHandle::new(0xA);
        let b = SurfaceHandle::new(0xB);

        registry.init_render(StreamKey::Local, a).unwrap();
        registry.init_render(StreamKey::Local, b).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.target(StreamKey::Local).unwrap().surface(), b);
        assert_eq!(journal.calls_for(0), vec![RendererCall::Bind(a), RendererCall::Unbind]);
        assert_eq!(journal.unbind_count(0), 1);
        assert_eq!(journal.calls_for(1), vec![RendererCall::Bind(b)]);
    }

    #[test]
    fn same_surface_rebinds_with_fresh_renderer() {
        let (mut registry, journal) = registry_with(RenderPreference::Auto);
        let surface = SurfaceHandle::new(1);
        registry.init_render(StreamKey::Remote(4), surface).unwrap();
        registry.init_render(StreamKey::Remote(4), surface).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(journal.instances_created(), 2);
        assert_eq!(journal.unbind_count(0), 1);
    }

    #[test]
    fn destroy_unbound_key_is_noop() {
        let (mut registry, _journal) = registry_with(RenderPreference::Auto);
        let mut failures = 0;
        let removed = registry.destroy_render_with(StreamKey::Remote(3), |_| failures += 1);
        assert!(!removed);
        assert_eq!(failures, 0);
    }

    #[test]
    fn unbind_failure_routes_to_callback_and_removes_entry() {
        let journal = RendererJournal::new();
        let backends = RendererBackends::new(
            Arc::new(HeadlessFactory::with_journal("gl", journal.clone()).failing_unbind()),
            Arc::new(HeadlessFactory::with_journal("canvas", journal.clone())),
        );
        let mut registry = RenderTargetRegistry::new(backends, RenderPreference::Auto);
        registry.init_render(StreamKey::Local, SurfaceHandle::new(1)).unwrap();

        let mut failure = None;
        assert!(registry.destroy_render_with(StreamKey::Local, |e| failure = Some(e)));
        assert!(matches!(failure, Some(HuddleError::Render { .. })));
        assert!(!registry.is_bound(StreamKey::Local));
    }

    #[test]
    fn mode_change_does_not_touch_bound_targets() {
        let (mut registry, journal) = registry_with(RenderPreference::Software);
        assert_eq!(registry.render_mode(), RenderMode::Software);

        registry.init_render(StreamKey::Local, SurfaceHandle::new(1)).unwrap();
        registry.set_render_mode(RenderMode::Accelerated).unwrap();

        let local = registry.target(StreamKey::Local).unwrap();
        assert_eq!(local.mode(), RenderMode::Software);
        assert_eq!(local.backend(), "canvas");
        assert_eq!(journal.unbind_count(0), 0);

        registry.init_render(StreamKey::Remote(8), SurfaceHandle::new(2)).unwrap();
        assert_eq!(
            registry.target(StreamKey::Remote(8)).unwrap().mode(),
            RenderMode::Accelerated
        );
    }

    #[test]
    fn custom_mode_requires_factory() {
        let (mut registry, _journal) = registry_with(RenderPreference::Auto);
        assert!(matches!(
            registry.set_render_mode(RenderMode::Custom),
            Err(HuddleError::Config { .. })
        ));

        let custom = HeadlessFactory::new("app");
        let custom_journal = custom.journal();
        registry.set_custom_renderer(Arc::new(custom));
        assert_eq!(registry.render_mode(), RenderMode::Custom);

        registry.init_render(StreamKey::VideoSource, SurfaceHandle::new(5)).unwrap();
        let target = registry.target(StreamKey::VideoSource).unwrap();
        assert_eq!(target.mode(), RenderMode::Custom);
        assert_eq!(target.backend(), "app");
        assert_eq!(custom_journal.instances_created(), 1);
    }

    #[test]
    fn failed_create_leaves_key_unbound() {
        let backends = RendererBackends::new(
            Arc::new(HeadlessFactory::new("gl")),
            Arc::new(HeadlessFactory::new("canvas")),
        );
        let mut registry = RenderTargetRegistry::new(backends, RenderPreference::Auto);
        registry.init_render(StreamKey::Local, SurfaceHandle::new(1)).unwrap();

        registry.set_custom_renderer(Arc::new(HeadlessFactory::new("broken").unavailable()));
        assert!(registry.init_render(StreamKey::Local, SurfaceHandle::new(2)).is_err());
        assert!(!registry.is_bound(StreamKey::Local));
    }

    #[test]
    fn content_mode_on_unbound_key_is_not_found() {
        let (mut registry, journal) = registry_with(RenderPreference::Auto);
        assert!(matches!(
            registry.setup_view_content_mode(StreamKey::Remote(1), ContentMode::FitLetterbox),
            Err(HuddleError::TargetNotFound { .. })
        ));

        registry.init_render(StreamKey::Remote(1), SurfaceHandle::new(1)).unwrap();
        registry
            .setup_view_content_mode(StreamKey::Remote(1), ContentMode::FitLetterbox)
            .unwrap();
        assert!(registry.resize_render(StreamKey::Remote(1)));
        assert!(!registry.resize_render(StreamKey::Remote(2)));
        assert_eq!(
            journal.calls_for(0)[1..],
            [
                RendererCall::SetContentMode(ContentMode::FitLetterbox),
                RendererCall::RefreshCanvas
            ]
        );
    }

    #[test]
    fn clear_releases_everything() {
        let (mut registry, journal) = registry_with(RenderPreference::Auto);
        registry.init_render(StreamKey::Local, SurfaceHandle::new(1)).unwrap();
        registry.init_render(StreamKey::Remote(2), SurfaceHandle::new(2)).unwrap();
        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(journal.unbind_count(0) + journal.unbind_count(1), 2);
    }
}
