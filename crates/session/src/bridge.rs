//! Event normalization bridge.
//!
//! Turns one native event occurrence into one canonical event and re-emits
//! it, with identical arguments, under each of its external names.
//! Listener panics are not caught.

use std::collections::HashMap;
use std::fmt;

use huddle_media_model::{value_as_uid, EventArgs, NativeEvent, StreamKey};
use huddle_render_engine::RenderTargetRegistry;
use serde_json::Value;

use crate::catalogue::{self, CatalogueEntry, SideEffect};
use crate::native::NativeEngine;

/// Application callback for one external event name.
pub type Listener = Box<dyn FnMut(&[Value])>;

/// Handle returned by [`EventBridge::on`], used to remove a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// A native event resolved against the catalogue.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalEvent {
    pub entry: &'static CatalogueEntry,
    pub args: EventArgs,
}

impl CanonicalEvent {
    /// Resolve a native event. Uncatalogued names yield `None`.
    pub fn from_native(event: NativeEvent) -> Option<Self> {
        let entry = catalogue::lookup(&event.name)?;
        Some(Self {
            entry,
            args: event.args,
        })
    }

    pub fn native_name(&self) -> &'static str {
        self.entry.native
    }

    pub fn aliases(&self) -> &'static [&'static str] {
        self.entry.aliases
    }
}

/// Listener table plus the normalization logic.
#[derive(Default)]
pub struct EventBridge {
    listeners: HashMap<String, Vec<(ListenerId, Listener)>>,
    next_id: u64,
    events_handled: u64,
}

impl EventBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to an external event name.
    pub fn on(&mut self, name: impl Into<String>, listener: Listener) -> ListenerId {
        let name = name.into();
        if !catalogue::is_known_alias(&name) {
            tracing::debug!(event = %name, "Listener registered for a name the engine never emits");
        }
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.entry(name).or_default().push((id, listener));
        id
    }

    /// Remove one listener. Returns whether it was registered.
    pub fn off(&mut self, name: &str, id: ListenerId) -> bool {
        let Some(list) = self.listeners.get_mut(name) else {
            return false;
        };
        let before = list.len();
        list.retain(|(lid, _)| *lid != id);
        let removed = list.len() != before;
        if list.is_empty() {
            self.listeners.remove(name);
        }
        removed
    }

    /// Remove every listener for `name`, returning how many were removed.
    pub fn remove_all_listeners(&mut self, name: &str) -> usize {
        self.listeners.remove(name).map_or(0, |list| list.len())
    }

    pub fn listener_count(&self, name: &str) -> usize {
        self.listeners.get(name).map_or(0, Vec::len)
    }

    /// Native events handled so far.
    pub fn events_handled(&self) -> u64 {
        self.events_handled
    }

    /// Normalize one native event: run its side effects, then emit every alias.
    ///
    /// Returns `false` for uncatalogued names, which are dropped.
    pub fn handle(
        &mut self,
        event: NativeEvent,
        registry: &mut RenderTargetRegistry,
        engine: &dyn NativeEngine,
    ) -> bool {
        let name = event.name.clone();
        let Some(canonical) = CanonicalEvent::from_native(event) else {
            tracing::warn!(event = %name, "Dropping uncatalogued native event");
            return false;
        };

        apply_side_effects(&canonical, registry, engine);
        self.emit(&canonical);
        self.events_handled += 1;
        true
    }

    /// Invoke listeners for each alias, in alias order then registration order.
    pub fn emit(&mut self, event: &CanonicalEvent) {
        tracing::trace!(event = event.native_name(), args = event.args.len(), "Emitting");
        for alias in event.aliases() {
            if let Some(list) = self.listeners.get_mut(*alias) {
                for (_, listener) in list.iter_mut() {
                    listener(&event.args);
                }
            }
        }
    }
}

fn apply_side_effects(
    event: &CanonicalEvent,
    registry: &mut RenderTargetRegistry,
    engine: &dyn NativeEngine,
) {
    match event.entry.effect {
        SideEffect::None => {}
        SideEffect::ReleaseRemoteStream { uid_arg } => {
            let Some(uid) = event.args.get(uid_arg).and_then(value_as_uid) else {
                tracing::warn!(event = event.native_name(), "Missing uid argument; skipping stream release");
                return;
            };

            registry.destroy_render(StreamKey::Remote(uid));
            if let Err(e) = engine.unsubscribe(uid) {
                tracing::warn!(uid, error = %e, "Failed to unsubscribe departed user");
            }
            tracing::info!(uid, "Released stream for departed user");
        }
    }
}

impl fmt::Debug for EventBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.listeners.keys().collect();
        names.sort();
        f.debug_struct("EventBridge")
            .field("listening", &names)
            .field("events_handled", &self.events_handled)
            .finish()
    }
}
