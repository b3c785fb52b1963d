//! Animated gradient logic for Glimmer
//!
//! This library provides the core of an animated multi-color linear
//! gradient: where the gradient line sits on a rectangular surface, and which
//! colors it carries at any point in time. It is UI-agnostic and can be
//! tested without a window or a renderer; the runtime that ticks it lives in
//! `glimmer-animator`.

pub mod color;
pub mod config;
pub mod geometry;
pub mod interpolation;

pub use color::{from_argb, lerp_color, parse_color, to_argb, Color};
pub use config::{AnimationConfig, ConfigError};
pub use geometry::{resolve_gradient_line, GradientLine, Point};
pub use interpolation::{CycleState, FrameColors, InterpolationEngine};
pub use rgb::RGBA8;

/// Maximum colors stored inline in `SmallVec` (avoids heap allocation for typical use)
pub const MAX_INLINE_COLORS: usize = 4;

/// Everything a renderer needs to paint one frame of the animation.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Endpoints of the linear gradient
    pub line: GradientLine,
    /// Color stops, evenly spaced from `line.start` to `line.end`
    pub colors: FrameColors,
}
