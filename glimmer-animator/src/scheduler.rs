//! Frame scheduler and tick task
//!
//! This module handles:
//! - Throttled per-frame work (`FrameTicker`)
//! - The background tick task that owns the interpolation engine while running
//! - Start/stop with progress handed back and forth between task and scheduler
//!
//! At most one tick task exists per scheduler. Its `TickTask` handle lives
//! in the control mutex: holding a handle *is* the running state, so `start`
//! and `stop` serialize on that one lock.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use glimmer_gradient_lib::{
    resolve_gradient_line, AnimationConfig, ConfigError, CycleState, Frame, GradientLine,
    InterpolationEngine,
};
use log::{debug, info, trace, warn};

use crate::surface::{Clock, MonotonicClock, RenderSink, SizeProvider};
use crate::thread_util::spawn_named;

/// Name given to tick threads
const TICK_THREAD_NAME: &str = "glimmer-tick";

/// Added to each wait so the following tick is strictly past the frame interval
const TICK_SLACK: Duration = Duration::from_micros(100);

/// Messages sent to the tick task
enum TickTaskMessage {
    /// Finish the current frame and exit, handing back the cycle state
    Stop,
    /// Report the live cycle state without stopping
    Snapshot(oneshot::Sender<CycleState>),
}

/// Per-frame work of a running animation: cached geometry, the engine and
/// frame-rate throttling.
#[derive(Debug)]
pub struct FrameTicker {
    line: GradientLine,
    engine: InterpolationEngine,
    frame_interval: Duration,
    last_tick: Instant,
}

impl FrameTicker {
    pub fn new(
        line: GradientLine,
        engine: InterpolationEngine,
        frame_interval: Duration,
        now: Instant,
    ) -> Self {
        Self {
            line,
            engine,
            frame_interval,
            last_tick: now,
        }
    }

    /// Frame for the current position, without advancing time.
    pub fn current_frame(&mut self) -> Frame {
        Frame {
            line: self.line,
            colors: self.engine.advance(Duration::ZERO),
        }
    }

    /// Advance by the time since the last computed frame.
    ///
    /// Returns `None` (and does no work) unless more than one frame interval
    /// has passed, so calling this more often than the target rate is
    /// harmless.
    pub fn tick(&mut self, now: Instant) -> Option<Frame> {
        let elapsed = now.saturating_duration_since(self.last_tick);
        if elapsed <= self.frame_interval {
            return None;
        }
        self.last_tick = now;

        let colors = self.engine.advance(elapsed);
        trace!("Tick: +{elapsed:?}, progress {:.3}", self.engine.progress());
        Some(Frame {
            line: self.line,
            colors,
        })
    }

    /// How long to wait from `now` before the next tick can do work.
    #[must_use]
    pub fn time_until_next_frame(&self, now: Instant) -> Duration {
        let deadline = self.last_tick + self.frame_interval;
        deadline.saturating_duration_since(now) + TICK_SLACK
    }

    #[must_use]
    pub const fn state(&self) -> CycleState {
        self.engine.snapshot()
    }

    #[must_use]
    pub const fn line(&self) -> GradientLine {
        self.line
    }
}

/// Run the tick task.
///
/// This task:
/// - Emits the current frame immediately so the surface is painted at once
/// - Waits one frame interval at a time for control messages
/// - On timeout, ticks the engine and hands the frame to the sink
///
/// Returns the final cycle state when told to stop or when the control
/// channel is dropped.
// The task owns its receiver
#[allow(clippy::needless_pass_by_value)]
fn tick_task<C: Clock>(
    mut ticker: FrameTicker,
    rx: Receiver<TickTaskMessage>,
    sink: Arc<dyn RenderSink>,
    clock: Arc<C>,
) -> CycleState {
    debug!("Tick task started, line {:?}", ticker.line());
    sink.on_frame(&ticker.current_frame());

    loop {
        let timeout = ticker.time_until_next_frame(clock.now());
        match rx.recv_timeout(timeout) {
            Ok(TickTaskMessage::Stop) => break,
            Ok(TickTaskMessage::Snapshot(reply)) => {
                // Requester may have given up waiting; nothing to do then
                let _ = reply.send(ticker.state());
            }
            Err(RecvTimeoutError::Timeout) => {
                if let Some(frame) = ticker.tick(clock.now()) {
                    sink.on_frame(&frame);
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                warn!("Tick control channel disconnected, exiting task");
                break;
            }
        }
    }

    let state = ticker.state();
    debug!("Tick task exiting at {state:?}");
    state
}

/// Handle to a running tick task
struct TickTask {
    tx: Sender<TickTaskMessage>,
    handle: JoinHandle<CycleState>,
}

/// State guarded by the scheduler's single control lock
#[derive(Default)]
struct Control {
    task: Option<TickTask>,
    /// Progress to resume from on the next start
    saved: CycleState,
}

/// Drives an animated gradient at the configured frame rate on a background
/// thread, preserving progress across stop/start.
pub struct FrameScheduler<C: Clock = MonotonicClock> {
    config: AnimationConfig,
    surface: Arc<dyn SizeProvider>,
    sink: Arc<dyn RenderSink>,
    clock: Arc<C>,
    control: Mutex<Control>,
}

impl FrameScheduler<MonotonicClock> {
    /// Create an idle scheduler.
    ///
    /// # Errors
    /// Fails if `config` is invalid; nothing is started in that case.
    pub fn new(
        config: AnimationConfig,
        surface: Arc<dyn SizeProvider>,
        sink: Arc<dyn RenderSink>,
    ) -> Result<Self, ConfigError> {
        Self::with_clock(config, surface, sink, MonotonicClock)
    }
}

impl<C: Clock> FrameScheduler<C> {
    /// Create an idle scheduler reading time from `clock`.
    ///
    /// # Errors
    /// Fails if `config` is invalid.
    pub fn with_clock(
        config: AnimationConfig,
        surface: Arc<dyn SizeProvider>,
        sink: Arc<dyn RenderSink>,
        clock: C,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            surface,
            sink,
            clock: Arc::new(clock),
            control: Mutex::new(Control::default()),
        })
    }

    fn lock_control(&self) -> MutexGuard<'_, Control> {
        // Control is only ever updated by whole-field assignments, so a
        // poisoned lock still holds consistent data.
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start ticking if the surface has a non-zero size.
    ///
    /// Does nothing if already running, or if the surface is empty (a later
    /// start after a resize will pick it up).
    pub fn start(&self) {
        let mut control = self.lock_control();
        if control.task.is_some() {
            debug!("Scheduler already running");
            return;
        }

        let size = self.surface.size();
        let angle = f64::from(self.config.normalized_angle());
        let Some(line) = resolve_gradient_line(size.width, size.height, angle) else {
            debug!(
                "Surface is {}x{}, not starting until it has an area",
                size.width, size.height
            );
            return;
        };

        let engine = match InterpolationEngine::with_state(&self.config, control.saved) {
            Ok(engine) => engine,
            Err(e) => {
                warn!("Cannot start animation: {e}");
                return;
            }
        };

        let frame_interval = self.config.frame_interval();
        let ticker = FrameTicker::new(line, engine, frame_interval, self.clock.now());
        let (tx, rx) = mpsc::channel();
        let sink = Arc::clone(&self.sink);
        let clock = Arc::clone(&self.clock);

        match spawn_named(TICK_THREAD_NAME, move || tick_task(ticker, rx, sink, clock)) {
            Ok(handle) => {
                info!(
                    "Animation started on {}x{} ({} fps, resuming at {:?})",
                    size.width, size.height, self.config.target_fps, control.saved
                );
                control.task = Some(TickTask { tx, handle });
            }
            Err(e) => warn!("Failed to spawn tick thread: {e}"),
        }
    }

    /// Stop ticking and keep the current progress for the next start.
    ///
    /// Blocks until the tick thread has finished the frame it is working on;
    /// the last completed frame stands. Does nothing if already idle.
    pub fn stop(&self) {
        let mut control = self.lock_control();
        let Some(task) = control.task.take() else {
            debug!("Scheduler already idle");
            return;
        };

        // A send error means the task already exited; join still reports its state
        let _ = task.tx.send(TickTaskMessage::Stop);
        match task.handle.join() {
            Ok(state) => {
                control.saved = state;
                info!("Animation stopped at {state:?}");
            }
            Err(_) => warn!("Tick thread panicked, keeping progress from last start"),
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.lock_control().task.is_some()
    }

    /// Current cycle state: live from the tick task while running, the saved
    /// snapshot while idle.
    #[must_use]
    pub fn progress(&self) -> CycleState {
        let control = self.lock_control();
        let Some(task) = control.task.as_ref() else {
            return control.saved;
        };

        let (reply_tx, reply_rx) = oneshot::channel();
        if task.tx.send(TickTaskMessage::Snapshot(reply_tx)).is_ok() {
            if let Ok(state) = reply_rx.recv() {
                return state;
            }
        }
        warn!("Tick task did not answer snapshot request");
        control.saved
    }

    /// Forget saved progress so the next start begins at the first palette
    /// entry. Has no effect on a running animation until it is restarted.
    pub fn reset_progress(&self) {
        self.lock_control().saved = CycleState::default();
    }

    #[must_use]
    pub const fn config(&self) -> &AnimationConfig {
        &self.config
    }
}

impl<C: Clock> Drop for FrameScheduler<C> {
    fn drop(&mut self) {
        self.stop();
    }
}
