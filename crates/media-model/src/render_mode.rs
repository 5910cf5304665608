//! Renderer family and content scaling modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Which renderer family produces new render targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// GPU-backed drawing context.
    Accelerated,
    /// CPU drawing into a 2D canvas.
    Software,
    /// Application-supplied renderer factory.
    Custom,
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RenderMode::Accelerated => "accelerated",
            RenderMode::Software => "software",
            RenderMode::Custom => "custom",
        })
    }
}

impl FromStr for RenderMode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "accelerated" => Ok(RenderMode::Accelerated),
            "software" => Ok(RenderMode::Software),
            "custom" => Ok(RenderMode::Custom),
            other => Err(ModelError::UnknownVariant {
                kind: "render mode",
                value: other.to_string(),
            }),
        }
    }
}

/// How a frame is scaled into its surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentMode {
    /// Scale to fill the surface, cropping overflow.
    #[default]
    CropFill,
    /// Scale to fit inside the surface, letterboxing the remainder.
    FitLetterbox,
}

impl fmt::Display for ContentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContentMode::CropFill => "crop-fill",
            ContentMode::FitLetterbox => "fit-letterbox",
        })
    }
}

impl FromStr for ContentMode {
    type Err = ModelError;

    /// Accepts the kebab-case names and the legacy numeric codes (0 = crop, 1 = fit).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "crop-fill" | "crop" | "0" => Ok(ContentMode::CropFill),
            "fit-letterbox" | "fit" | "1" => Ok(ContentMode::FitLetterbox),
            other => Err(ModelError::UnknownVariant {
                kind: "content mode",
                value: other.to_string(),
            }),
        }
    }
}
