//! Frame validation.
//!
//! A frame is drawable when its header is exactly [`FRAME_HEADER_LEN`]
//! bytes and its planes have 4:2:0 proportions. Planes that are exactly one
//! header long are treated as a degenerate marker and rejected unless that
//! check is disabled in configuration.

use std::fmt;

use huddle_common::config::RenderConfig;
use huddle_media_model::{FrameBuffer, FRAME_HEADER_LEN};

/// Plane identifier for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    Y,
    U,
    V,
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Plane::Y => "y",
            Plane::U => "u",
            Plane::V => "v",
        })
    }
}

/// Why a frame was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FrameDefect {
    #[error("header is {actual} bytes, expected {}", FRAME_HEADER_LEN)]
    HeaderLength { actual: usize },

    #[error("{plane} plane has sentinel length {}", FRAME_HEADER_LEN)]
    SentinelPlane { plane: Plane },

    #[error("y plane ({y} bytes) is not four times the u plane ({u} bytes)")]
    LumaChromaRatio { y: usize, u: usize },

    #[error("u plane ({u} bytes) and v plane ({v} bytes) differ")]
    ChromaMismatch { u: usize, v: usize },
}

/// Stateless frame predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameValidator {
    reject_sentinel_planes: bool,
}

impl Default for FrameValidator {
    fn default() -> Self {
        Self {
            reject_sentinel_planes: true,
        }
    }
}

impl FrameValidator {
    pub fn new(reject_sentinel_planes: bool) -> Self {
        Self {
            reject_sentinel_planes,
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(config.reject_sentinel_planes)
    }

    /// Check a frame, returning the first defect found.
    pub fn check(&self, header: &[u8], y: &[u8], u: &[u8], v: &[u8]) -> Result<(), FrameDefect> {
        if header.len() != FRAME_HEADER_LEN {
            return Err(FrameDefect::HeaderLength {
                actual: header.len(),
            });
        }

        if self.reject_sentinel_planes {
            for (plane, data) in [(Plane::Y, y), (Plane::U, u), (Plane::V, v)] {
                if data.len() == FRAME_HEADER_LEN {
                    return Err(FrameDefect::SentinelPlane { plane });
                }
            }
        }

        if Some(y.len()) != u.len().checked_mul(4) {
            return Err(FrameDefect::LumaChromaRatio {
                y: y.len(),
                u: u.len(),
            });
        }

        if u.len() != v.len() {
            return Err(FrameDefect::ChromaMismatch {
                u: u.len(),
                v: v.len(),
            });
        }

        Ok(())
    }

    /// Boolean form of [`FrameValidator::check`]; logs the defect on rejection.
    pub fn validate(&self, header: &[u8], y: &[u8], u: &[u8], v: &[u8]) -> bool {
        match self.check(header, y, u, v) {
            Ok(()) => true,
            Err(defect) => {
                tracing::debug!(%defect, "Rejected malformed frame");
                false
            }
        }
    }

    pub fn validate_buffer(&self, frame: &FrameBuffer<'_>) -> bool {
        self.validate(frame.header, frame.y, frame.u, frame.v)
    }
}

/// Validate with default settings (sentinel check enabled).
pub fn validate(header: &[u8], y: &[u8], u: &[u8], v: &[u8]) -> bool {
    FrameValidator::default().validate(header, y, u, v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn planes(y: usize, u: usize, v: usize) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
        (vec![0; y], vec![0; u], vec![0; v])
    }

    #[test]
    fn accepts_well_formed_frame() {
        let (y, u, v) = planes(64, 16, 16);
        assert!(validate(&[0; 20], &y, &u, &v));
    }

    #[test]
    fn accepts_empty_planes() {
        assert!(validate(&[0; 20], &[], &[], &[]));
    }

    #[test]
    fn header_checked_first() {
        let (y, u, v) = planes(20, 3, 3);
        assert_eq!(
            FrameValidator::default().check(&[0; 19], &y, &u, &v),
            Err(FrameDefect::HeaderLength { actual: 19 })
        );
    }

    #[test]
    fn sentinel_length_rejected_on_each_plane() {
        let validator = FrameValidator::default();
        let (y, u, v) = planes(80, 20, 20);
        assert_eq!(
            validator.check(&[0; 20], &y, &u, &v),
            Err(FrameDefect::SentinelPlane { plane: Plane::U })
        );
        let (y, u, v) = planes(20, 5, 5);
        assert_eq!(
            validator.check(&[0; 20], &y, &u, &v),
            Err(FrameDefect::SentinelPlane { plane: Plane::Y })
        );
    }

    #[test]
    fn sentinel_check_can_be_disabled() {
        let validator = FrameValidator::new(false);
        let (y, u, v) = planes(80, 20, 20);
        assert!(validator.validate(&[0; 20], &y, &u, &v));
    }

    #[test]
    fn chroma_mismatch_reported() {
        let (y, u, v) = planes(64, 16, 15);
        assert_eq!(
            FrameValidator::default().check(&[0; 20], &y, &u, &v),
            Err(FrameDefect::ChromaMismatch { u: 16, v: 15 })
        );
    }

    proptest! {
        #[test]
        fn wrong_header_length_always_rejected(
            header_len in (0usize..64).prop_filter("not 20", |n| *n != FRAME_HEADER_LEN),
            chroma in 0usize..64,
        ) {
            let (y, u, v) = planes(chroma * 4, chroma, chroma);
            prop_assert!(!validate(&vec![0; header_len], &y, &u, &v));
        }

        #[test]
        fn broken_proportions_always_rejected(y_len in 0usize..256, u_len in 0usize..64, v_len in 0usize..64) {
            prop_assume!(y_len != 4 * u_len || u_len != v_len);
            let (y, u, v) = planes(y_len, u_len, v_len);
            prop_assert!(!validate(&[0; 20], &y, &u, &v));
        }

        #[test]
        fn sentinel_plane_always_rejected(which in 0usize..3, other in 0usize..64) {
            let mut lens = [other * 4, other, other];
            lens[which] = FRAME_HEADER_LEN;
            let (y, u, v) = planes(lens[0], lens[1], lens[2]);
            prop_assert!(!validate(&[0; 20], &y, &u, &v));
        }

        #[test]
        fn proportional_frames_accepted(chroma in (0usize..128).prop_filter("no sentinel", |c| *c != 5 && *c != 20)) {
            let (y, u, v) = planes(chroma * 4, chroma, chroma);
            prop_assert!(validate(&[0; 20], &y, &u, &v));
        }
    }
}
