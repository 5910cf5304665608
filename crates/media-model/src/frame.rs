//! Video frame types delivered by the native engine.
//!
//! Frames arrive as planar YUV 4:2:0: one full-resolution luma plane and
//! two quarter-size chroma planes, preceded by a fixed 20-byte header that
//! only renderers interpret.

use crate::{ModelError, StreamKey};

/// Length of the opaque frame header block, in bytes.
pub const FRAME_HEADER_LEN: usize = 20;

/// Source class tag carried by each native frame descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameClass {
    /// Local capture (uid 0) as seen by the sender.
    Local,
    /// Decoded remote stream (uid 0 still means local loopback).
    Remote,
    /// Device self-test preview. Only meaningful inside a test harness.
    DeviceTest,
    /// Secondary video source.
    VideoSource,
}

impl FrameClass {
    /// Resolve the stream key this class/uid pair renders to.
    ///
    /// `DeviceTest` has no render target outside a test harness and
    /// resolves to `None`.
    pub fn stream_key(self, uid: u32) -> Option<StreamKey> {
        match self {
            FrameClass::Local | FrameClass::Remote if uid == 0 => Some(StreamKey::Local),
            FrameClass::Local | FrameClass::Remote => Some(StreamKey::Remote(uid)),
            FrameClass::DeviceTest => None,
            FrameClass::VideoSource => Some(StreamKey::VideoSource),
        }
    }
}

impl TryFrom<u8> for FrameClass {
    type Error = ModelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(FrameClass::Local),
            1 => Ok(FrameClass::Remote),
            2 => Ok(FrameClass::DeviceTest),
            3 => Ok(FrameClass::VideoSource),
            other => Err(ModelError::UnknownFrameClass(other)),
        }
    }
}

impl From<FrameClass> for u8 {
    fn from(class: FrameClass) -> Self {
        match class {
            FrameClass::Local => 0,
            FrameClass::Remote => 1,
            FrameClass::DeviceTest => 2,
            FrameClass::VideoSource => 3,
        }
    }
}

/// One frame as handed over by the native frame-delivery callback.
///
/// `class` stays a raw byte: the engine may send tags this crate does not
/// know about, and those must be dropped rather than rejected at decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameDescriptor {
    pub class: u8,
    pub uid: u32,
    pub header: Vec<u8>,
    pub ydata: Vec<u8>,
    pub udata: Vec<u8>,
    pub vdata: Vec<u8>,
}

impl FrameDescriptor {
    pub fn new(
        class: impl Into<u8>,
        uid: u32,
        header: Vec<u8>,
        ydata: Vec<u8>,
        udata: Vec<u8>,
        vdata: Vec<u8>,
    ) -> Self {
        Self {
            class: class.into(),
            uid,
            header,
            ydata,
            udata,
            vdata,
        }
    }

    /// A zero-filled 4:2:0 frame with a `luma_len` byte Y plane.
    pub fn blank(class: impl Into<u8>, uid: u32, luma_len: usize) -> Self {
        let chroma_len = luma_len / 4;
        Self::new(
            class,
            uid,
            vec![0; FRAME_HEADER_LEN],
            vec![0; luma_len],
            vec![0; chroma_len],
            vec![0; chroma_len],
        )
    }

    /// Borrow the header and planes as a [`FrameBuffer`].
    pub fn buffer(&self) -> FrameBuffer<'_> {
        FrameBuffer {
            header: &self.header,
            y: &self.ydata,
            u: &self.udata,
            v: &self.vdata,
        }
    }
}

/// Borrowed view of one frame's header and planes, as passed to renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameBuffer<'a> {
    pub header: &'a [u8],
    pub y: &'a [u8],
    pub u: &'a [u8],
    pub v: &'a [u8],
}

impl<'a> FrameBuffer<'a> {
    /// Plane lengths as `(y, u, v)`.
    pub fn plane_lens(&self) -> (usize, usize, usize) {
        (self.y.len(), self.u.len(), self.v.len())
    }

    /// Total payload size including the header.
    pub fn byte_len(&self) -> usize {
        self.header.len() + self.y.len() + self.u.len() + self.v.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_resolution_table() {
        assert_eq!(FrameClass::Local.stream_key(0), Some(StreamKey::Local));
        assert_eq!(FrameClass::Remote.stream_key(0), Some(StreamKey::Local));
        assert_eq!(FrameClass::Remote.stream_key(77), Some(StreamKey::Remote(77)));
        assert_eq!(FrameClass::Local.stream_key(12), Some(StreamKey::Remote(12)));
        assert_eq!(FrameClass::VideoSource.stream_key(3), Some(StreamKey::VideoSource));
        assert_eq!(FrameClass::DeviceTest.stream_key(0), None);
    }

    #[test]
    fn raw_class_tags() {
        assert_eq!(FrameClass::try_from(3), Ok(FrameClass::VideoSource));
        assert_eq!(FrameClass::try_from(4), Err(ModelError::UnknownFrameClass(4)));
        assert_eq!(u8::from(FrameClass::DeviceTest), 2);
    }

    #[test]
    fn blank_frame_has_quarter_chroma() {
        let frame = FrameDescriptor::blank(FrameClass::Remote, 5, 64);
        assert_eq!(frame.class, 1);
        assert_eq!(frame.buffer().plane_lens(), (64, 16, 16));
        assert_eq!(frame.buffer().byte_len(), 20 + 96);
    }
}
