//! Time-driven palette cycling
//!
//! The engine keeps a position in the palette (`current_step_index`) and how
//! far it has morphed toward the next entry (`elapsed_within_step`). Each
//! call to [`InterpolationEngine::advance`] adds the frame delta and returns
//! `simultaneous_colors` colors, where output slot `i` blends palette entry
//! `step + i` toward `step + i + 1` (indices wrap around the palette).
//!
//! When a step completes the frame still shows the fully morphed colors;
//! the state then rolls over so the next frame starts the following step at
//! progress zero, which is the same set of colors. The hand-off is seamless.

use std::time::Duration;

use smallvec::SmallVec;

use crate::color::{lerp_color, Color};
use crate::config::{AnimationConfig, ConfigError};
use crate::MAX_INLINE_COLORS;

/// Ordered colors for one frame, `simultaneous_colors` long.
pub type FrameColors = SmallVec<[Color; MAX_INLINE_COLORS]>;

/// Position of the animation within the palette cycle.
///
/// This is the only state that needs to survive a pause: restoring it
/// resumes the animation exactly where it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CycleState {
    /// Time spent morphing from `current_step_index` toward the next entry
    pub elapsed_within_step: Duration,
    /// Palette entry currently being morphed away from
    pub current_step_index: usize,
}

#[derive(Debug, Clone)]
pub struct InterpolationEngine {
    colors: SmallVec<[Color; MAX_INLINE_COLORS]>,
    simultaneous_colors: usize,
    cycle_duration: Duration,
    state: CycleState,
}

impl InterpolationEngine {
    /// Create an engine at the start of the cycle.
    ///
    /// # Errors
    /// Fails if `config` does not pass [`AnimationConfig::validate`].
    pub fn new(config: &AnimationConfig) -> Result<Self, ConfigError> {
        Self::with_state(config, CycleState::default())
    }

    /// Create an engine resuming from a previously saved [`CycleState`].
    ///
    /// # Errors
    /// Fails if `config` does not pass [`AnimationConfig::validate`].
    pub fn with_state(config: &AnimationConfig, state: CycleState) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut engine = Self {
            colors: config.colors.clone(),
            simultaneous_colors: config.simultaneous_colors,
            cycle_duration: config.cycle_duration(),
            state: CycleState::default(),
        };
        engine.restore(state);
        Ok(engine)
    }

    /// Feed `delta` of elapsed time and produce this frame's colors.
    pub fn advance(&mut self, delta: Duration) -> FrameColors {
        self.state.elapsed_within_step = self.state.elapsed_within_step.saturating_add(delta);

        let saturated = self.state.elapsed_within_step >= self.cycle_duration;
        let progress = self.progress();

        let len = self.colors.len();
        let step = self.state.current_step_index;
        let frame = (0..self.simultaneous_colors)
            .map(|i| {
                let from = self.colors[(step + i) % len];
                let to = self.colors[(step + i + 1) % len];
                lerp_color(from, to, progress)
            })
            .collect();

        if saturated {
            self.state.elapsed_within_step = Duration::ZERO;
            self.state.current_step_index = (step + 1) % len;
        }

        frame
    }

    /// Fraction of the current step completed, in `[0.0, 1.0]`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.state.elapsed_within_step >= self.cycle_duration {
            return 1.0;
        }
        // cycle_duration is non-zero, guaranteed by validate()
        let ratio =
            self.state.elapsed_within_step.as_secs_f64() / self.cycle_duration.as_secs_f64();
        #[allow(clippy::cast_possible_truncation)]
        let progress = ratio.clamp(0.0, 1.0) as f32;
        progress
    }

    #[must_use]
    pub const fn snapshot(&self) -> CycleState {
        self.state
    }

    /// Resume from `state`. Out-of-range step indices wrap around the palette.
    pub fn restore(&mut self, state: CycleState) {
        self.state = CycleState {
            elapsed_within_step: state.elapsed_within_step,
            current_step_index: state.current_step_index % self.colors.len(),
        };
    }

    #[must_use]
    pub fn palette(&self) -> &[Color] {
        &self.colors
    }
}
