//! Runtime for Glimmer animated gradients
//!
//! Wraps the pure logic from `glimmer-gradient-lib` in a background tick
//! task ([`FrameScheduler`]) and a controller that starts and stops it as
//! the host surface is shown, hidden or resized ([`LifecycleController`]).
//! Frames are delivered to a [`RenderSink`] on the tick thread.

pub mod config;
pub mod lifecycle;
pub mod scheduler;
pub mod surface;
mod thread_util;

pub use config::{AnimatorConfig, LogLevel};
pub use lifecycle::{LifecycleController, ScreenState, SurfaceEvent, Visibility};
pub use scheduler::{FrameScheduler, FrameTicker};
pub use surface::{Clock, MonotonicClock, RenderSink, SizeProvider, SurfaceSize};
