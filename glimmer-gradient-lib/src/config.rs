use std::time::Duration;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::color::{Color, BLUE, GREEN, RED};
use crate::MAX_INLINE_COLORS;

/// Errors raised when an animation configuration cannot be used as-is.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("palette must contain at least one color")]
    EmptyPalette,
    #[display("simultaneous_colors must be at least 1")]
    NoSimultaneousColors,
    #[display("simultaneous_colors ({requested}) exceeds palette length ({available})")]
    TooManySimultaneousColors { requested: usize, available: usize },
    #[display("cycle_duration_ms must be greater than zero")]
    ZeroCycleDuration,
    #[display("target_fps must be greater than zero")]
    ZeroTargetFps,
    #[display("invalid color {input:?}")]
    InvalidColor { input: String },
}

/// Animation parameters, fixed for the lifetime of an animated surface.
///
/// Every field falls back to its own default when missing, so a partial
/// configuration (e.g. only `angle_degrees`) keeps the other defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Palette, cycled in order
    #[serde(default = "default_colors")]
    pub colors: SmallVec<[Color; MAX_INLINE_COLORS]>,
    /// How many palette entries are blended into the gradient at once
    #[serde(default = "default_simultaneous_colors")]
    pub simultaneous_colors: usize,
    /// Gradient angle; normalized into `[0, 360)` when used
    #[serde(default = "default_angle_degrees")]
    pub angle_degrees: i32,
    /// Time to morph from one palette entry to the next
    #[serde(default = "default_cycle_duration_ms")]
    pub cycle_duration_ms: u32,
    /// Upper bound on computed frames per second
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
}

fn default_colors() -> SmallVec<[Color; MAX_INLINE_COLORS]> {
    smallvec::smallvec![BLUE, RED, GREEN]
}

const fn default_simultaneous_colors() -> usize {
    2
}

const fn default_angle_degrees() -> i32 {
    45
}

const fn default_cycle_duration_ms() -> u32 {
    2000
}

const fn default_target_fps() -> u32 {
    24
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            colors: default_colors(),
            simultaneous_colors: default_simultaneous_colors(),
            angle_degrees: default_angle_degrees(),
            cycle_duration_ms: default_cycle_duration_ms(),
            target_fps: default_target_fps(),
        }
    }
}

impl AnimationConfig {
    /// Check the invariants the interpolation engine relies on.
    ///
    /// # Errors
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.colors.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        if self.simultaneous_colors == 0 {
            return Err(ConfigError::NoSimultaneousColors);
        }
        if self.simultaneous_colors > self.colors.len() {
            return Err(ConfigError::TooManySimultaneousColors {
                requested: self.simultaneous_colors,
                available: self.colors.len(),
            });
        }
        if self.cycle_duration_ms == 0 {
            return Err(ConfigError::ZeroCycleDuration);
        }
        if self.target_fps == 0 {
            return Err(ConfigError::ZeroTargetFps);
        }
        Ok(())
    }

    /// Angle folded into `[0, 360)`.
    #[must_use]
    pub const fn normalized_angle(&self) -> i32 {
        self.angle_degrees.rem_euclid(360)
    }

    #[must_use]
    pub fn cycle_duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.cycle_duration_ms))
    }

    /// Minimum time between two computed frames.
    ///
    /// A zero `target_fps` is treated as 1 here; [`validate`](Self::validate)
    /// is what rejects it.
    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_micros(1_000_000 / u64::from(self.target_fps.max(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AnimationConfig::default();
        assert_eq!(cfg.colors.as_slice(), &[BLUE, RED, GREEN]);
        assert_eq!(cfg.simultaneous_colors, 2);
        assert_eq!(cfg.angle_degrees, 45);
        assert_eq!(cfg.cycle_duration_ms, 2000);
        assert_eq!(cfg.target_fps, 24);
        assert!(cfg.validate().is_ok());
    }

    /// Missing fields fall back individually
    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let cfg: AnimationConfig =
            serde_json::from_str(r#"{"angle_degrees": 90, "target_fps": 60}"#).unwrap();
        assert_eq!(cfg.angle_degrees, 90);
        assert_eq!(cfg.target_fps, 60);
        assert_eq!(cfg.simultaneous_colors, 2);
        assert_eq!(cfg.cycle_duration_ms, 2000);
        assert_eq!(cfg.colors.len(), 3);
    }

    #[test]
    fn test_colors_from_json() {
        let cfg: AnimationConfig = serde_json::from_str(
            r#"{"colors": [{"r": 1, "g": 2, "b": 3, "a": 4}], "simultaneous_colors": 1}"#,
        )
        .unwrap();
        assert_eq!(cfg.colors.as_slice(), &[Color::new(1, 2, 3, 4)]);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = AnimationConfig::default();

        let cfg = AnimationConfig {
            colors: SmallVec::new(),
            ..base.clone()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyPalette));

        let cfg = AnimationConfig {
            simultaneous_colors: 0,
            ..base.clone()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::NoSimultaneousColors));

        let cfg = AnimationConfig {
            simultaneous_colors: 4,
            ..base.clone()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::TooManySimultaneousColors {
                requested: 4,
                available: 3
            })
        );

        let cfg = AnimationConfig {
            cycle_duration_ms: 0,
            ..base.clone()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroCycleDuration));

        let cfg = AnimationConfig {
            target_fps: 0,
            ..base
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroTargetFps));
    }

    #[test]
    fn test_error_messages() {
        let err = ConfigError::TooManySimultaneousColors {
            requested: 5,
            available: 2,
        };
        assert_eq!(
            err.to_string(),
            "simultaneous_colors (5) exceeds palette length (2)"
        );
        let err = ConfigError::InvalidColor {
            input: "nope".to_string(),
        };
        assert_eq!(err.to_string(), "invalid color \"nope\"");
    }

    #[test]
    fn test_normalized_angle() {
        let mut cfg = AnimationConfig::default();
        cfg.angle_degrees = 405;
        assert_eq!(cfg.normalized_angle(), 45);
        cfg.angle_degrees = -90;
        assert_eq!(cfg.normalized_angle(), 270);
        cfg.angle_degrees = 360;
        assert_eq!(cfg.normalized_angle(), 0);
    }

    #[test]
    fn test_frame_interval() {
        let mut cfg = AnimationConfig::default();
        assert_eq!(cfg.frame_interval(), Duration::from_micros(41_666));
        cfg.target_fps = 60;
        assert_eq!(cfg.frame_interval(), Duration::from_micros(16_666));
        assert_eq!(cfg.cycle_duration(), Duration::from_millis(2000));
    }
}
