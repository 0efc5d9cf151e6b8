//! Status pixel colours.
//!
//! Converts a speed level's HSV triple to RGB bytes and applies the
//! animation brightness.

use palette::{FromColor, Hsv, Srgb};

use crate::speed::SpeedState;

/// Colour as (R, G, B) tuple, each 0–255.
pub type Rgb = (u8, u8, u8);

pub const OFF: Rgb = (0, 0, 0);

/// Full-value RGB for an HSV triple (hue in degrees, s/v in 0.0–1.0).
pub fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> Rgb {
    let rgb: Srgb = Srgb::from_color(Hsv::new(hue, saturation, value));
    let rgb: Srgb<u8> = rgb.into_format();
    (rgb.red, rgb.green, rgb.blue)
}

/// Scale every channel by `brightness` (clamped to 0.0–1.0), truncating.
pub fn scale(rgb: Rgb, brightness: f32) -> Rgb {
    let b = brightness.clamp(0.0, 1.0);
    let ch = |c: u8| (f32::from(c) * b) as u8;
    (ch(rgb.0), ch(rgb.1), ch(rgb.2))
}

/// The pixel colour for `speed` at `brightness`.
pub fn speed_rgb(speed: SpeedState, brightness: f32) -> Rgb {
    let (h, s, v) = speed.hsv();
    scale(hsv_to_rgb(h, s, v), brightness)
}
