use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use huddle_common::config::AppConfig;
use huddle_media_model::{parse_trace, RenderMode, StreamKey, TraceRecord};
use huddle_render_engine::{HeadlessFactory, RendererBackends, RendererJournal, SurfaceHandle};
use huddle_session::{LoopbackEngine, RtcClient};

const TWO_PARTY_CALL: &str = include_str!("../../../demos/two-party-call.jsonl");

fn replay(records: Vec<TraceRecord>, client: &mut RtcClient, engine: &LoopbackEngine) {
    for record in records {
        match record {
            TraceRecord::InitRender { key, surface } => {
                client.init_render(key, SurfaceHandle::new(surface)).unwrap();
            }
            TraceRecord::DestroyRender { key } => {
                client.destroy_render(key);
            }
            TraceRecord::ResizeRender { key } => {
                client.resize_render(key);
            }
            TraceRecord::ContentMode { key, mode } => {
                client.setup_view_content_mode(key, mode).unwrap();
            }
            TraceRecord::RenderMode { mode } => client.set_render_mode(mode).unwrap(),
            TraceRecord::Event { name, args } => {
                assert!(engine.fire(&name, args), "unknown native event {name}");
            }
            TraceRecord::Frames { batch } => {
                engine.deliver_frames(batch.iter().map(|spec| spec.to_descriptor()).collect());
            }
        }
        client.drain();
    }
}

#[test]
fn two_party_call_trace() {
    let records = parse_trace(TWO_PARTY_CALL).unwrap();
    assert_eq!(records.len(), 16);

    let engine = Arc::new(LoopbackEngine::new());
    let journal = RendererJournal::new();
    let backends = RendererBackends::new(
        Arc::new(HeadlessFactory::with_journal("gl", journal.clone())),
        Arc::new(HeadlessFactory::with_journal("canvas", journal.clone())),
    );
    let mut client = RtcClient::new(engine.clone(), backends, &AppConfig::default());

    let removed: Rc<RefCell<Vec<serde_json::Value>>> = Rc::new(RefCell::new(Vec::new()));
    {
        let removed = Rc::clone(&removed);
        client.on("removestream", move |args| {
            removed.borrow_mut().push(args[0].clone());
        });
    }

    replay(records, &mut client, &engine);

    assert_eq!(client.render_mode(), RenderMode::Software);
    assert_eq!(client.events_handled(), 5);
    assert_eq!(*removed.borrow(), vec![serde_json::json!(7)]);
    assert_eq!(engine.unsubscribed(), vec![7]);
    assert!(client.registry().is_empty());

    let stats = client.dispatch_stats();
    assert_eq!(stats.batches, 5);
    assert_eq!(stats.frames_drawn, 4);
    assert_eq!(stats.dropped_invalid, 1);
    assert_eq!(stats.dropped_unroutable, 1);
    assert_eq!(stats.dropped_unbound, 1);

    // local(gl), remote 7(gl), local again after the switch (canvas)
    assert_eq!(journal.instances_created(), 3);
    assert_eq!(journal.backend_of(1).as_deref(), Some("gl"));
    assert_eq!(journal.backend_of(2).as_deref(), Some("canvas"));
    assert_eq!(journal.frames_drawn(0), 1);
    assert_eq!(journal.frames_drawn(1), 2);
    assert_eq!(journal.frames_drawn(2), 1);
    for instance in 0..3 {
        assert_eq!(journal.unbind_count(instance), 1);
    }
}

#[test]
fn trace_keys_parse_as_stream_keys() {
    let records = parse_trace(TWO_PARTY_CALL).unwrap();
    let keys: Vec<StreamKey> = records
        .iter()
        .filter_map(|r| match r {
            TraceRecord::InitRender { key, .. } => Some(*key),
            _ => None,
        })
        .collect();
    assert_eq!(keys, vec![StreamKey::Local, StreamKey::Remote(7), StreamKey::Local]);
}
