//! Replay traces.
//!
//! A trace is a JSONL file of client inputs: render-target calls issued by
//! the application and events/frame batches raised by the native engine.
//! Frames are described by plane sizes rather than pixel data.

use serde::{Deserialize, Serialize};

use crate::{ContentMode, EventArgs, FrameDescriptor, ModelError, RenderMode, StreamKey};

/// One recorded client input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceRecord {
    /// Application binds a surface to a stream.
    InitRender { key: StreamKey, surface: u64 },

    /// Application releases a stream's surface.
    DestroyRender { key: StreamKey },

    /// Application resized the surface of a stream.
    ResizeRender { key: StreamKey },

    /// Application changed a stream's scaling mode.
    ContentMode { key: StreamKey, mode: ContentMode },

    /// Application switched renderer family.
    RenderMode { mode: RenderMode },

    /// Engine raised a named event.
    Event {
        name: String,
        #[serde(default)]
        args: EventArgs,
    },

    /// Engine delivered a frame batch.
    Frames { batch: Vec<FrameSpec> },
}

/// Size-only description of a frame in a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSpec {
    pub class: u8,
    pub uid: u32,
    #[serde(default = "default_header_len")]
    pub header_len: usize,
    pub y_len: usize,
    pub u_len: usize,
    pub v_len: usize,
}

/// Largest plane a trace may describe: four 8K luma planes.
pub const MAX_TRACE_PLANE_LEN: usize = 4 * 7680 * 4320;

fn default_header_len() -> usize {
    crate::FRAME_HEADER_LEN
}

impl FrameSpec {
    fn check_sizes(&self) -> Result<(), String> {
        let sizes = [
            ("header_len", self.header_len),
            ("y_len", self.y_len),
            ("u_len", self.u_len),
            ("v_len", self.v_len),
        ];
        for (field, len) in sizes {
            if len > MAX_TRACE_PLANE_LEN {
                return Err(format!(
                    "{field} {len} exceeds the {MAX_TRACE_PLANE_LEN} byte limit"
                ));
            }
        }
        Ok(())
    }

    /// Materialize a zero-filled descriptor with the described sizes.
    pub fn to_descriptor(&self) -> FrameDescriptor {
        FrameDescriptor::new(
            self.class,
            self.uid,
            vec![0; self.header_len],
            vec![0; self.y_len],
            vec![0; self.u_len],
            vec![0; self.v_len],
        )
    }
}

/// Parse a trace from JSONL content. Blank lines and `#` comments are skipped.
pub fn parse_trace(jsonl: &str) -> Result<Vec<TraceRecord>, ModelError> {
    jsonl
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_no, line)| -> Result<TraceRecord, ModelError> {
            let record: TraceRecord = serde_json::from_str(line).map_err(|e| ModelError::Trace {
                line: line_no,
                message: e.to_string(),
            })?;
            if let TraceRecord::Frames { batch } = &record {
                for spec in batch {
                    spec.check_sizes().map_err(|message| ModelError::Trace {
                        line: line_no,
                        message,
                    })?;
                }
            }
            Ok(record)
        })
        .collect()
}
