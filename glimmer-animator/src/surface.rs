//! Seams to the host that owns the paintable surface.

use std::time::Instant;

use glimmer_gradient_lib::Frame;

/// Receives every computed frame.
///
/// Called from the scheduler's tick thread, not from the thread that owns
/// the surface. Implementations marshal the redraw to wherever it has to
/// happen (e.g. post an event to the UI loop). An implementation must not
/// call back into `FrameScheduler::stop` or `FrameScheduler::progress` from
/// `on_frame`: both wait on the tick thread.
pub trait RenderSink: Send + Sync + 'static {
    fn on_frame(&self, frame: &Frame);
}

impl<F> RenderSink for F
where
    F: Fn(&Frame) + Send + Sync + 'static,
{
    fn on_frame(&self, frame: &Frame) {
        self(frame);
    }
}

/// Current size of a surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when there is nothing to paint on.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Answers "how big is the surface right now?".
pub trait SizeProvider: Send + Sync + 'static {
    fn size(&self) -> SurfaceSize;
}

impl SizeProvider for SurfaceSize {
    fn size(&self) -> SurfaceSize {
        *self
    }
}

/// Source of monotonic time for frame deltas.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Instant;
}

/// [`Clock`] backed by [`Instant::now`], unaffected by wall-clock changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_empty_sizes() {
        assert!(SurfaceSize::new(0, 10).is_empty());
        assert!(SurfaceSize::new(10, 0).is_empty());
        assert!(!SurfaceSize::new(1, 1).is_empty());
        assert_eq!(SurfaceSize::new(3, 4).size(), SurfaceSize::new(3, 4));
    }

    #[test]
    fn test_closure_sink() {
        let seen = Arc::new(Mutex::new(0usize));
        let counter = Arc::clone(&seen);
        let sink = move |frame: &Frame| *counter.lock().unwrap() += frame.colors.len();

        let frame = Frame {
            line: glimmer_gradient_lib::resolve_gradient_line(10, 10, 45.0).unwrap(),
            colors: smallvec_of_two(),
        };
        sink.on_frame(&frame);
        sink.on_frame(&frame);
        assert_eq!(*seen.lock().unwrap(), 4);
    }

    fn smallvec_of_two() -> glimmer_gradient_lib::FrameColors {
        use glimmer_gradient_lib::color::{BLUE, RED};
        [BLUE, RED].into_iter().collect()
    }

    #[test]
    fn test_monotonic_clock_never_goes_back() {
        let clock = MonotonicClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
