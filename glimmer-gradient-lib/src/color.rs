//! Color helpers: packed ARGB conversion, parsing and per-channel blending.

use crate::ConfigError;

/// An 8-bit-per-channel color with alpha.
pub type Color = rgb::RGBA8;

pub const BLACK: Color = Color::new(0, 0, 0, 255);
pub const WHITE: Color = Color::new(255, 255, 255, 255);
pub const BLUE: Color = Color::new(0, 0, 255, 255);
pub const RED: Color = Color::new(255, 0, 0, 255);
pub const GREEN: Color = Color::new(0, 255, 0, 255);
pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);

/// Unpack a `0xAARRGGBB` value.
#[must_use]
pub const fn from_argb(argb: u32) -> Color {
    let [a, r, g, b] = argb.to_be_bytes();
    Color::new(r, g, b, a)
}

/// Pack a color as `0xAARRGGBB`.
#[must_use]
pub const fn to_argb(color: Color) -> u32 {
    u32::from_be_bytes([color.a, color.r, color.g, color.b])
}

/// Parse a color from `#RRGGBB`, `#AARRGGBB` or a small set of names.
///
/// `#RRGGBB` is fully opaque. Hex digits and names are case-insensitive.
///
/// # Errors
/// Returns [`ConfigError::InvalidColor`] if the input matches none of the
/// accepted forms.
pub fn parse_color(input: &str) -> Result<Color, ConfigError> {
    let trimmed = input.trim();
    let invalid = || ConfigError::InvalidColor {
        input: input.to_string(),
    };

    if let Some(hex) = trimmed.strip_prefix('#') {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let value = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
        return match hex.len() {
            6 => Ok(from_argb(0xFF00_0000 | value)),
            8 => Ok(from_argb(value)),
            _ => Err(invalid()),
        };
    }

    let named = match trimmed.to_ascii_lowercase().as_str() {
        "black" => BLACK,
        "white" => WHITE,
        "blue" => BLUE,
        "red" => RED,
        "green" => GREEN,
        "gray" | "grey" => from_argb(0xFF88_8888),
        "cyan" => from_argb(0xFF00_FFFF),
        "magenta" => from_argb(0xFFFF_00FF),
        "yellow" => from_argb(0xFFFF_FF00),
        "transparent" => TRANSPARENT,
        _ => return Err(invalid()),
    };
    Ok(named)
}

/// Blend two colors channel by channel, alpha included.
///
/// `t` is clamped to `[0.0, 1.0]`: `0.0` yields `from`, `1.0` yields `to`.
#[must_use]
pub fn lerp_color(from: Color, to: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    Color::new(
        lerp_u8(from.r, to.r, t),
        lerp_u8(from.g, to.g, t),
        lerp_u8(from.b, to.b, t),
        lerp_u8(from.a, to.a, t),
    )
}

/// Linear interpolation between two `u8` channel values, rounded to nearest.
///
/// # Panics
/// Debug-asserts that `t` is in `[0.0, 1.0]`.
#[inline]
fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    debug_assert!(
        (0.0..=1.0).contains(&t),
        "lerp_u8: t={t} outside [0.0, 1.0]"
    );
    let a_f = f32::from(a);
    let b_f = f32::from(b);
    // With a,b in [0,255] and t in [0.0,1.0] the result stays in [0.0, 255.0].
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let result = (a_f + (b_f - a_f) * t).round() as u8;
    result
}
