//! Terminal demo for Glimmer animated gradients
//!
//! Paints an animated gradient (or gradient-colored text) into the terminal
//! using ANSI truecolor. Frames are computed on the tick thread and handed to
//! the main thread over a channel, which plays the part of a UI loop.
//!
//! Usage: cargo run -p glimmer-demo -- [OPTIONS]

mod shader;

use anyhow::Result;
use clap::Parser;
use glimmer_animator::{
    AnimatorConfig, FrameScheduler, LifecycleController, LogLevel, RenderSink, SizeProvider,
    SurfaceEvent, SurfaceSize, Visibility,
};
use glimmer_gradient_lib::{parse_color, Frame};
use log::{info, LevelFilter};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "glimmer-demo")]
#[command(about = "Animated multi-color gradient in the terminal")]
struct Args {
    /// JSON config file; command-line options override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Palette, comma separated (#RRGGBB, #AARRGGBB or a color name)
    #[arg(long, value_delimiter = ',')]
    colors: Option<Vec<String>>,

    /// Number of colors visible at once
    #[arg(short, long)]
    simultaneous: Option<usize>,

    /// Gradient angle in degrees
    #[arg(short, long, allow_negative_numbers = true)]
    angle: Option<i32>,

    /// Time to shift the palette by one color, in milliseconds
    #[arg(long)]
    speed_ms: Option<u32>,

    /// Maximum frames per second
    #[arg(long)]
    fps: Option<u32>,

    /// Surface width in character cells
    #[arg(long, default_value = "64")]
    width: u32,

    /// Surface height in character cells
    #[arg(long, default_value = "12")]
    height: u32,

    /// Text to paint with the gradient instead of solid blocks
    #[arg(short, long)]
    text: Option<String>,

    /// How long to run in seconds (0 = run forever)
    #[arg(short, long, default_value = "10")]
    duration_secs: u64,

    /// Hide and show the surface every N seconds
    #[arg(short, long)]
    pause_every_secs: Option<u64>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<LogLevel>,
}

impl Args {
    /// Config file values with command-line overrides applied on top.
    fn resolve_config(&self) -> Result<AnimatorConfig> {
        let mut config = self
            .config
            .as_deref()
            .map(AnimatorConfig::load_or_default)
            .unwrap_or_default();

        let animation = &mut config.animation;
        if let Some(colors) = &self.colors {
            animation.colors = colors
                .iter()
                .map(|c| parse_color(c.trim()))
                .collect::<Result<_, _>>()?;
        }
        if let Some(simultaneous) = self.simultaneous {
            animation.simultaneous_colors = simultaneous;
        }
        if let Some(angle) = self.angle {
            animation.angle_degrees = angle;
        }
        if let Some(speed_ms) = self.speed_ms {
            animation.cycle_duration_ms = speed_ms;
        }
        if let Some(fps) = self.fps {
            animation.target_fps = fps;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        Ok(config)
    }
}

fn draw(out: &mut impl Write, frame: &Frame, size: SurfaceSize, text: Option<&str>) -> Result<()> {
    // Cursor home, then overwrite the previous frame in place
    write!(out, "\x1b[H{}", shader::render(frame, size, text))?;
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    // RUST_LOG can narrow targets; the configured level caps verbosity
    env_logger::Builder::new()
        .filter_level(LevelFilter::Trace)
        .parse_default_env()
        .init();
    log::set_max_level(LevelFilter::Info);

    let args = Args::parse();
    let config = args.resolve_config()?;
    log::set_max_level(config.log_level.as_level_filter());
    info!("Log level set to {:?}", config.log_level);

    let size = SurfaceSize::new(args.width, args.height);
    let (frame_tx, frame_rx) = mpsc::channel::<Frame>();
    let sink = move |frame: &Frame| {
        // Receiver gone means main is shutting down
        let _ = frame_tx.send(frame.clone());
    };
    let scheduler = FrameScheduler::new(
        config.animation,
        Arc::new(size) as Arc<dyn SizeProvider>,
        Arc::new(sink) as Arc<dyn RenderSink>,
    )?;
    let mut lifecycle = LifecycleController::new(scheduler);

    let mut stdout = std::io::stdout().lock();
    write!(stdout, "\x1b[2J")?;
    lifecycle.resume();

    let started = Instant::now();
    let deadline = (args.duration_secs > 0)
        .then(|| started + Duration::from_secs(args.duration_secs));
    let pause_every = args.pause_every_secs.filter(|&secs| secs > 0).map(Duration::from_secs);
    let mut next_toggle = pause_every.map(|every| started + every);
    let mut visible = true;

    loop {
        let now = Instant::now();
        if deadline.is_some_and(|d| now >= d) {
            break;
        }

        if let (Some(toggle_at), Some(every)) = (next_toggle, pause_every) {
            if now >= toggle_at {
                visible = !visible;
                let visibility = if visible { Visibility::Visible } else { Visibility::Gone };
                lifecycle.handle_event(SurfaceEvent::VisibilityChanged(visibility));
                info!(
                    "Surface {} at {:?}",
                    if visible { "shown" } else { "hidden" },
                    lifecycle.scheduler().progress()
                );
                next_toggle = Some(toggle_at + every);
            }
        }

        let wake_at = [deadline, next_toggle].into_iter().flatten().min();
        let timeout = wake_at.map_or(Duration::from_millis(100), |at| {
            at.saturating_duration_since(now)
        });

        match frame_rx.recv_timeout(timeout) {
            Ok(mut frame) => {
                // Only the newest frame matters if drawing fell behind
                while let Ok(newer) = frame_rx.try_recv() {
                    frame = newer;
                }
                draw(&mut stdout, &frame, size, args.text.as_deref())?;
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    lifecycle.handle_event(SurfaceEvent::VisibilityChanged(Visibility::Gone));
    writeln!(stdout, "\x1b[0m")?;
    info!("Stopped at {:?}", lifecycle.scheduler().progress());
    Ok(())
}
