//! Replay a recorded client trace.
//!
//! Engine records go through a loopback engine, application records call
//! the client directly, and the queue is drained after every record the
//! way an application event loop would between callbacks.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use huddle_common::config::AppConfig;
use huddle_media_model::{parse_trace, TraceRecord};
use huddle_render_engine::{
    HeadlessFactory, RendererBackends, RendererCall, RendererJournal, SurfaceHandle,
};
use huddle_session::{catalogue, LoopbackEngine, RtcClient};

pub fn run(
    trace_path: PathBuf,
    config: AppConfig,
    accelerated_available: bool,
    quiet: bool,
) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&trace_path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", trace_path.display()))?;
    let records = parse_trace(&content)?;
    tracing::info!(records = records.len(), path = %trace_path.display(), "Replaying trace");

    let engine = Arc::new(LoopbackEngine::new());
    let journal = RendererJournal::new();
    let mut accelerated = HeadlessFactory::with_journal("accelerated", journal.clone());
    if !accelerated_available {
        accelerated = accelerated.unavailable();
    }
    let backends = RendererBackends::new(
        Arc::new(accelerated),
        Arc::new(HeadlessFactory::with_journal("software", journal.clone())),
    );

    let mut client = RtcClient::new(engine.clone(), backends, &config);
    println!("Render mode: {}", client.render_mode());

    let emitted = Rc::new(Cell::new(0u64));
    for alias in catalogue::all_aliases() {
        let emitted = Rc::clone(&emitted);
        client.on(alias, move |args| {
            emitted.set(emitted.get() + 1);
            if !quiet {
                let args = serde_json::Value::from(args.to_vec());
                println!("  event {alias} {args}");
            }
        });
    }

    for (index, record) in records.into_iter().enumerate() {
        apply(&mut client, &engine, record, index + 1, quiet);
        client.drain();
    }

    print_summary(&client, &journal, emitted.get());
    Ok(())
}

fn apply(
    client: &mut RtcClient,
    engine: &LoopbackEngine,
    record: TraceRecord,
    index: usize,
    quiet: bool,
) {
    match record {
        TraceRecord::InitRender { key, surface } => {
            let surface = SurfaceHandle::new(surface);
            match client.init_render(key, surface) {
                Ok(()) if !quiet => println!("[{index}] init_render {key} -> {surface}"),
                Ok(()) => {}
                Err(e) => println!("[{index}] init_render {key} failed: {e}"),
            }
        }
        TraceRecord::DestroyRender { key } => {
            let removed = client.destroy_render_with(key, |e| {
                println!("[{index}] destroy_render {key}: unbind failed: {e}");
            });
            if !quiet {
                println!("[{index}] destroy_render {key} (removed: {removed})");
            }
        }
        TraceRecord::ResizeRender { key } => {
            let resized = client.resize_render(key);
            if !quiet {
                println!("[{index}] resize_render {key} (bound: {resized})");
            }
        }
        TraceRecord::ContentMode { key, mode } => {
            if let Err(e) = client.setup_view_content_mode(key, mode) {
                println!("[{index}] content_mode {key} {mode}: {e}");
            } else if !quiet {
                println!("[{index}] content_mode {key} {mode}");
            }
        }
        TraceRecord::RenderMode { mode } => {
            if let Err(e) = client.set_render_mode(mode) {
                println!("[{index}] render_mode {mode}: {e}");
            } else if !quiet {
                println!("[{index}] render_mode {mode}");
            }
        }
        TraceRecord::Event { name, args } => {
            if !quiet {
                println!("[{index}] native {name}");
            }
            if !engine.fire(&name, args) {
                println!("[{index}] native event '{name}' is not in the catalogue");
            }
        }
        TraceRecord::Frames { batch } => {
            if !quiet {
                println!("[{index}] frames x{}", batch.len());
            }
            engine.deliver_frames(batch.iter().map(|spec| spec.to_descriptor()).collect());
        }
    }
}

fn print_summary(client: &RtcClient, journal: &RendererJournal, emitted: u64) {
    println!();
    println!("Summary");
    println!("{}", "=".repeat(50));
    println!("Native events handled: {}", client.events_handled());
    println!("Application events emitted: {emitted}");

    let stats = client.dispatch_stats();
    println!("Frame batches: {}", stats.batches);
    println!("  Drawn: {}", stats.frames_drawn);
    println!("  Dropped (no target): {}", stats.dropped_unbound);
    println!("  Dropped (malformed): {}", stats.dropped_invalid);
    println!("  Dropped (unroutable): {}", stats.dropped_unroutable);
    println!("  Draw errors: {}", stats.draw_errors);
    println!("  Drop rate: {:.1}%", stats.drop_rate());

    let mut draws_by_backend: BTreeMap<String, usize> = BTreeMap::new();
    for entry in journal.entries() {
        if matches!(entry.call, RendererCall::DrawFrame { .. }) {
            *draws_by_backend.entry(entry.backend).or_default() += 1;
        }
    }
    println!("Renderers created: {}", journal.instances_created());
    for (backend, draws) in &draws_by_backend {
        println!("  {backend}: {draws} frame(s)");
    }

    let registry = client.registry();
    println!("Bound targets: {}", registry.len());
    for key in registry.keys() {
        if let Some(target) = registry.target(key) {
            println!(
                "  {key}: {} via {} ({})",
                target.surface(),
                target.backend(),
                target.mode()
            );
        }
    }
}
