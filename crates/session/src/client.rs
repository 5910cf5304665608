//! Application-facing client.
//!
//! `RtcClient` wires the native engine's two callback channels into a
//! single FIFO task queue and owns everything the application thread
//! mutates: the render-target registry, the frame dispatcher, and the
//! event bridge.

use std::future::Future;
use std::sync::Arc;

use huddle_common::config::AppConfig;
use huddle_common::error::{HuddleError, HuddleResult};
use huddle_media_model::{ContentMode, NativeEvent, RenderMode, StreamKey};
use huddle_render_engine::{
    DispatchStats, FrameDispatcher, FrameValidator, RenderTargetRegistry, RendererBackends,
    RendererFactory, SurfaceHandle,
};
use serde_json::Value;

use crate::bridge::{EventBridge, ListenerId};
use crate::catalogue;
use crate::native::NativeEngine;
use crate::queue::{task_queue, Task, TaskReceiver};

/// Video-conferencing client core.
pub struct RtcClient {
    engine: Arc<dyn NativeEngine>,
    registry: RenderTargetRegistry,
    dispatcher: FrameDispatcher,
    bridge: EventBridge,
    tasks: TaskReceiver,
    drain_budget: usize,
}

impl RtcClient {
    /// Create a client and subscribe to the engine's full event catalogue
    /// and its frame delivery.
    pub fn new(engine: Arc<dyn NativeEngine>, backends: RendererBackends, config: &AppConfig) -> Self {
        let registry = RenderTargetRegistry::new(backends, config.render.mode);
        let dispatcher = FrameDispatcher::new(FrameValidator::from_config(&config.render));
        let (sender, tasks) = task_queue();

        for entry in catalogue::entries() {
            let sender = sender.clone();
            let name = entry.native;
            engine.on_event(
                name,
                Box::new(move |args| {
                    sender.push(Task::Event(NativeEvent::new(name, args)));
                }),
            );
        }
        engine.register_deliver_frame(Box::new(move |batch| {
            sender.push(Task::Frames(batch));
        }));

        tracing::info!(
            events = catalogue::entries().len(),
            mode = %registry.render_mode(),
            "Client attached to native engine"
        );

        Self {
            engine,
            registry,
            dispatcher,
            bridge: EventBridge::new(),
            tasks,
            drain_budget: config.events.drain_budget,
        }
    }

    /// Bind a stream to a surface, replacing any existing binding.
    pub fn init_render(&mut self, key: StreamKey, surface: SurfaceHandle) -> HuddleResult<()> {
        self.registry.init_render(key, surface)
    }

    /// Release a stream's render target. Unbind failures are logged.
    pub fn destroy_render(&mut self, key: StreamKey) -> bool {
        self.registry.destroy_render(key)
    }

    /// Release a stream's render target, reporting unbind failures to `on_failure`.
    pub fn destroy_render_with<F>(&mut self, key: StreamKey, on_failure: F) -> bool
    where
        F: FnOnce(HuddleError),
    {
        self.registry.destroy_render_with(key, on_failure)
    }

    pub fn resize_render(&mut self, key: StreamKey) -> bool {
        self.registry.resize_render(key)
    }

    pub fn setup_view_content_mode(&mut self, key: StreamKey, mode: ContentMode) -> HuddleResult<()> {
        self.registry.setup_view_content_mode(key, mode)
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) -> HuddleResult<()> {
        self.registry.set_render_mode(mode)
    }

    pub fn set_custom_renderer(&mut self, factory: Arc<dyn RendererFactory>) {
        self.registry.set_custom_renderer(factory)
    }

    pub fn render_mode(&self) -> RenderMode {
        self.registry.render_mode()
    }

    /// Subscribe to an external event name.
    pub fn on<F>(&mut self, name: impl Into<String>, listener: F) -> ListenerId
    where
        F: FnMut(&[Value]) + 'static,
    {
        self.bridge.on(name, Box::new(listener))
    }

    pub fn off(&mut self, name: &str, id: ListenerId) -> bool {
        self.bridge.off(name, id)
    }

    pub fn remove_all_listeners(&mut self, name: &str) -> usize {
        self.bridge.remove_all_listeners(name)
    }

    /// Process queued engine callbacks in arrival order.
    ///
    /// Stops when the queue is empty or, if configured, after
    /// `events.drain_budget` tasks. Returns the number of tasks processed.
    pub fn drain(&mut self) -> usize {
        let mut processed = 0;
        while self.drain_budget == 0 || processed < self.drain_budget {
            let Some(task) = self.tasks.try_next() else {
                break;
            };
            self.process(task);
            processed += 1;
        }
        processed
    }

    /// Process tasks as they arrive until the engine drops its handlers.
    pub async fn run(&mut self) -> usize {
        let mut processed = 0;
        while let Some(task) = self.tasks.next().await {
            self.process(task);
            processed += 1;
        }
        tracing::info!(processed, "Native engine detached");
        processed
    }

    /// Like [`run`](Self::run), but also returns once `stop` completes.
    pub async fn run_until<F>(&mut self, stop: F) -> usize
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(stop);
        let mut processed = 0;
        loop {
            tokio::select! {
                biased;
                _ = &mut stop => break,
                task = self.tasks.next() => match task {
                    Some(task) => {
                        self.process(task);
                        processed += 1;
                    }
                    None => break,
                },
            }
        }
        processed
    }

    fn process(&mut self, task: Task) {
        match task {
            Task::Frames(batch) => {
                self.dispatcher.dispatch(&batch, &mut self.registry);
            }
            Task::Event(event) => {
                self.bridge
                    .handle(event, &mut self.registry, self.engine.as_ref());
            }
        }
    }

    pub fn dispatch_stats(&self) -> &DispatchStats {
        self.dispatcher.stats()
    }

    pub fn registry(&self) -> &RenderTargetRegistry {
        &self.registry
    }

    /// Native events handled so far.
    pub fn events_handled(&self) -> u64 {
        self.bridge.events_handled()
    }
}

impl Drop for RtcClient {
    fn drop(&mut self) {
        self.registry.clear();
    }
}
