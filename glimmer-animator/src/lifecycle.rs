//! Maps host surface signals to scheduler start/stop
//!
//! The controller remembers the latest value of each signal and keeps the
//! scheduler running exactly while the surface is shown: visible itself, in
//! a visible window, with the screen on and a non-zero scale. A size change
//! restarts the scheduler so the gradient line is recomputed; progress is
//! carried across because `stop` saves it.

use log::debug;

use crate::scheduler::FrameScheduler;
use crate::surface::{Clock, MonotonicClock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    /// Not drawn, but still takes up space
    Invisible,
    /// Not drawn and takes no space
    Gone,
}

impl Visibility {
    #[must_use]
    pub const fn is_visible(self) -> bool {
        matches!(self, Self::Visible)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    On,
    Off,
}

/// Signals delivered by the host that owns the surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceEvent {
    /// The surface itself was shown or hidden
    VisibilityChanged(Visibility),
    /// The window containing the surface was shown or hidden
    WindowVisibilityChanged(Visibility),
    /// The surface's scale factors changed
    ScaleChanged { x: f32, y: f32 },
    /// The display was turned on or off
    ScreenStateChanged(ScreenState),
    /// The surface was resized; the size provider already reports the new size
    SizeChanged { width: u32, height: u32 },
}

pub struct LifecycleController<C: Clock = MonotonicClock> {
    scheduler: FrameScheduler<C>,
    surface_visible: bool,
    window_visible: bool,
    screen_on: bool,
    scale: (f32, f32),
}

impl<C: Clock> LifecycleController<C> {
    /// Wrap an idle scheduler. The surface is assumed shown until told
    /// otherwise; call [`resume`](Self::resume) or deliver an event to start.
    pub fn new(scheduler: FrameScheduler<C>) -> Self {
        Self {
            scheduler,
            surface_visible: true,
            window_visible: true,
            screen_on: true,
            scale: (1.0, 1.0),
        }
    }

    /// True when every signal says the surface can be seen.
    #[must_use]
    pub fn is_shown(&self) -> bool {
        self.surface_visible
            && self.window_visible
            && self.screen_on
            && self.scale.0 != 0.0
            && self.scale.1 != 0.0
    }

    pub fn handle_event(&mut self, event: SurfaceEvent) {
        debug!("Surface event: {event:?}");
        match event {
            SurfaceEvent::VisibilityChanged(visibility) => {
                self.surface_visible = visibility.is_visible();
            }
            SurfaceEvent::WindowVisibilityChanged(visibility) => {
                self.window_visible = visibility.is_visible();
            }
            SurfaceEvent::ScaleChanged { x, y } => self.scale = (x, y),
            SurfaceEvent::ScreenStateChanged(state) => self.screen_on = state == ScreenState::On,
            SurfaceEvent::SizeChanged { width, height } => {
                debug!("Surface resized to {width}x{height}, re-resolving gradient line");
                // Cached geometry is stale: always go through stop
                self.scheduler.stop();
            }
        }
        self.resume();
    }

    /// Start the scheduler if the surface is shown, stop it otherwise.
    pub fn resume(&self) {
        if self.is_shown() {
            self.scheduler.start();
        } else {
            self.scheduler.stop();
        }
    }

    #[must_use]
    pub const fn scheduler(&self) -> &FrameScheduler<C> {
        &self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{RenderSink, SizeProvider, SurfaceSize};
    use glimmer_gradient_lib::{AnimationConfig, CycleState, Frame};
    use std::sync::{Arc, Mutex};
    use std::thread::sleep;
    use std::time::Duration;

    /// Host surface whose size can change under the controller
    #[derive(Default)]
    struct TestSurface {
        size: Mutex<SurfaceSize>,
        frames: Mutex<Vec<Frame>>,
    }

    impl TestSurface {
        fn with_size(width: u32, height: u32) -> Arc<Self> {
            let surface = Self::default();
            *surface.size.lock().unwrap() = SurfaceSize::new(width, height);
            Arc::new(surface)
        }

        fn resize(&self, width: u32, height: u32) {
            *self.size.lock().unwrap() = SurfaceSize::new(width, height);
        }

        fn frame_count(&self) -> usize {
            self.frames.lock().unwrap().len()
        }

        fn last_frame(&self) -> Option<Frame> {
            self.frames.lock().unwrap().last().cloned()
        }
    }

    impl SizeProvider for TestSurface {
        fn size(&self) -> SurfaceSize {
            *self.size.lock().unwrap()
        }
    }

    impl RenderSink for TestSurface {
        fn on_frame(&self, frame: &Frame) {
            self.frames.lock().unwrap().push(frame.clone());
        }
    }

    fn controller(surface: &Arc<TestSurface>) -> LifecycleController {
        let config = AnimationConfig {
            cycle_duration_ms: 10_000,
            target_fps: 100,
            ..AnimationConfig::default()
        };
        let scheduler = FrameScheduler::new(
            config,
            Arc::clone(surface) as Arc<dyn SizeProvider>,
            Arc::clone(surface) as Arc<dyn RenderSink>,
        )
        .unwrap();
        LifecycleController::new(scheduler)
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_visibility_starts_and_stops() {
        let surface = TestSurface::with_size(100, 50);
        let mut lifecycle = controller(&surface);
        assert!(!lifecycle.scheduler().is_running());

        lifecycle.handle_event(SurfaceEvent::VisibilityChanged(Visibility::Visible));
        assert!(lifecycle.scheduler().is_running());

        lifecycle.handle_event(SurfaceEvent::VisibilityChanged(Visibility::Gone));
        assert!(!lifecycle.scheduler().is_running());

        lifecycle.handle_event(SurfaceEvent::VisibilityChanged(Visibility::Invisible));
        assert!(!lifecycle.scheduler().is_running());
    }

    #[test]
    fn test_window_and_screen_gate_running() {
        let surface = TestSurface::with_size(100, 50);
        let mut lifecycle = controller(&surface);
        lifecycle.resume();
        assert!(lifecycle.scheduler().is_running());

        lifecycle.handle_event(SurfaceEvent::WindowVisibilityChanged(Visibility::Invisible));
        assert!(!lifecycle.scheduler().is_running());

        // Screen coming on does not override a hidden window
        lifecycle.handle_event(SurfaceEvent::ScreenStateChanged(ScreenState::On));
        assert!(!lifecycle.scheduler().is_running());

        lifecycle.handle_event(SurfaceEvent::WindowVisibilityChanged(Visibility::Visible));
        assert!(lifecycle.scheduler().is_running());

        lifecycle.handle_event(SurfaceEvent::ScreenStateChanged(ScreenState::Off));
        assert!(!lifecycle.scheduler().is_running());

        lifecycle.handle_event(SurfaceEvent::ScreenStateChanged(ScreenState::On));
        assert!(lifecycle.scheduler().is_running());
    }

    #[test]
    fn test_zero_scale_stops() {
        let surface = TestSurface::with_size(100, 50);
        let mut lifecycle = controller(&surface);
        lifecycle.handle_event(SurfaceEvent::ScaleChanged { x: 0.0, y: 1.0 });
        assert!(!lifecycle.scheduler().is_running());

        // Visibility alone is not enough while scaled to nothing
        lifecycle.handle_event(SurfaceEvent::VisibilityChanged(Visibility::Visible));
        assert!(!lifecycle.scheduler().is_running());

        lifecycle.handle_event(SurfaceEvent::ScaleChanged { x: 0.5, y: 2.0 });
        assert!(lifecycle.scheduler().is_running());
    }

    /// Scenario: a zero-width surface emits nothing until a resize gives it area
    #[test]
    fn test_resize_from_zero_starts() {
        let surface = TestSurface::with_size(0, 40);
        let mut lifecycle = controller(&surface);

        lifecycle.resume();
        sleep(ms(30));
        assert!(!lifecycle.scheduler().is_running());
        assert_eq!(surface.frame_count(), 0);

        surface.resize(120, 40);
        lifecycle.handle_event(SurfaceEvent::SizeChanged {
            width: 120,
            height: 40,
        });
        assert!(lifecycle.scheduler().is_running());
        sleep(ms(30));
        assert!(surface.frame_count() > 0);
    }

    /// Resizing recomputes the gradient line and keeps progress
    #[test]
    fn test_resize_recomputes_line_and_keeps_progress() {
        let surface = TestSurface::with_size(200, 100);
        let mut lifecycle = controller(&surface);
        lifecycle.resume();
        sleep(ms(80));

        let before = lifecycle.scheduler().progress();
        assert!(before.elapsed_within_step > Duration::ZERO);

        surface.resize(100, 200);
        lifecycle.handle_event(SurfaceEvent::SizeChanged {
            width: 100,
            height: 200,
        });
        assert!(lifecycle.scheduler().is_running());
        sleep(ms(20));
        lifecycle.handle_event(SurfaceEvent::VisibilityChanged(Visibility::Gone));

        let line = surface.last_frame().unwrap().line;
        assert_eq!(line.start.x, 0);
        assert_eq!(line.end.x, 100);

        let after = lifecycle.scheduler().progress();
        assert!(after.elapsed_within_step >= before.elapsed_within_step);
    }

    /// Resize while hidden must not start anything
    #[test]
    fn test_resize_while_hidden_stays_idle() {
        let surface = TestSurface::with_size(200, 100);
        let mut lifecycle = controller(&surface);
        lifecycle.handle_event(SurfaceEvent::VisibilityChanged(Visibility::Invisible));

        surface.resize(300, 100);
        lifecycle.handle_event(SurfaceEvent::SizeChanged {
            width: 300,
            height: 100,
        });
        assert!(!lifecycle.scheduler().is_running());
        assert_eq!(lifecycle.scheduler().progress(), CycleState::default());
    }

    #[test]
    fn test_repeated_events_are_idempotent() {
        let surface = TestSurface::with_size(50, 50);
        let mut lifecycle = controller(&surface);
        for _ in 0..3 {
            lifecycle.handle_event(SurfaceEvent::VisibilityChanged(Visibility::Visible));
            assert!(lifecycle.scheduler().is_running());
        }
        for _ in 0..3 {
            lifecycle.handle_event(SurfaceEvent::ScreenStateChanged(ScreenState::Off));
            assert!(!lifecycle.scheduler().is_running());
        }
    }
}
