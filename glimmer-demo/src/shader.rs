//! Paints a [`Frame`] into a block of ANSI truecolor text
//!
//! Each character cell is treated as one pixel sampled at its center. The
//! gradient clamps past either end of the line, and color stops are spaced
//! evenly from `line.start` to `line.end`.

use std::fmt::Write;

use glimmer_animator::SurfaceSize;
use glimmer_gradient_lib::{lerp_color, Color, Frame};

const RESET: &str = "\x1b[0m";

/// Color of the gradient at pixel position (`x`, `y`).
#[must_use]
pub fn color_at(frame: &Frame, x: f64, y: f64) -> Color {
    let colors = &frame.colors;
    let Some(&first) = colors.first() else {
        return Color::default();
    };
    if colors.len() == 1 {
        return first;
    }

    let start = frame.line.start;
    let end = frame.line.end;
    let dx = f64::from(end.x - start.x);
    let dy = f64::from(end.y - start.y);
    let len_sq = dx.mul_add(dx, dy * dy);
    if len_sq == 0.0 {
        return first;
    }

    let along = (x - f64::from(start.x)).mul_add(dx, (y - f64::from(start.y)) * dy) / len_sq;
    #[allow(clippy::cast_precision_loss)] // stop counts are tiny
    let position = along.clamp(0.0, 1.0) * (colors.len() - 1) as f64;
    // position is in [0, len - 1]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let index = (position.floor() as usize).min(colors.len() - 2);
    #[allow(clippy::cast_possible_truncation)]
    let t = (position - index as f64) as f32;
    lerp_color(colors[index], colors[index + 1], t)
}

/// Composite over a black terminal background.
fn over_black(color: Color) -> (u8, u8, u8) {
    let scale = |channel: u8| {
        // channel * alpha / 255 always fits in a u8
        #[allow(clippy::cast_possible_truncation)]
        let value = ((u16::from(channel) * u16::from(color.a) + 127) / 255) as u8;
        value
    };
    (scale(color.r), scale(color.g), scale(color.b))
}

/// Render one frame as `size.height` lines of `size.width` cells.
///
/// Without `text`, every cell is a colored block. With `text`, the text is
/// tiled across each line and its glyphs take the gradient color; whitespace
/// stays uncolored.
#[must_use]
pub fn render(frame: &Frame, size: SurfaceSize, text: Option<&str>) -> String {
    let pattern: Vec<char> = text
        .map(|t| t.chars().chain(std::iter::once(' ')).collect())
        .unwrap_or_default();

    let mut out = String::new();
    for row in 0..size.height {
        for col in 0..size.width {
            let color = color_at(frame, f64::from(col) + 0.5, f64::from(row) + 0.5);
            let (r, g, b) = over_black(color);
            if pattern.is_empty() {
                let _ = write!(out, "\x1b[48;2;{r};{g};{b}m ");
            } else {
                let glyph = pattern[col as usize % pattern.len()];
                if glyph.is_whitespace() {
                    let _ = write!(out, "{RESET}{glyph}");
                } else {
                    let _ = write!(out, "\x1b[38;2;{r};{g};{b}m{glyph}");
                }
            }
        }
        out.push_str(RESET);
        out.push('\n');
    }
    out
}
