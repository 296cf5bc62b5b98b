// Default theme functions
//
// Color helpers shared by the map, the banner and the status bar.

use ratatui::style::Color;

use super::{BLOOD_RED, MAP_BACKGROUND, PUMPKIN_ORANGE, TOXIC_GREEN};
use crate::net::Direction;

/// Interpolate between two RGB colors based on a ratio (0.0 ~ 1.0)
///
/// # Arguments
/// * `color1` - Starting color as (r, g, b) tuple
/// * `color2` - Ending color as (r, g, b) tuple
/// * `ratio` - Interpolation ratio (0.0 = color1, 1.0 = color2)
///
/// # Returns
/// Interpolated Color::Rgb value
pub fn interpolate_color(color1: (u8, u8, u8), color2: (u8, u8, u8), ratio: f32) -> Color {
    let ratio = ratio.clamp(0.0, 1.0);
    let r = (color1.0 as f32 + (color2.0 as f32 - color1.0 as f32) * ratio) as u8;
    let g = (color1.1 as f32 + (color2.1 as f32 - color1.1 as f32) * ratio) as u8;
    let b = (color1.2 as f32 + (color2.2 as f32 - color1.2 as f32) * ratio) as u8;
    Color::Rgb(r, g, b)
}

/// RGB components of a palette color, black for non-RGB colors
pub fn rgb_components(color: Color) -> (u8, u8, u8) {
    match color {
        Color::Rgb(r, g, b) => (r, g, b),
        _ => (0, 0, 0),
    }
}

/// Base color for a traffic direction
pub fn direction_color(direction: Direction) -> Color {
    match direction {
        Direction::Outbound => BLOOD_RED,
        Direction::Inbound => TOXIC_GREEN,
    }
}

/// Direction color blended toward the map background by `opacity`
///
/// Opacity 1.0 yields the pure direction color; lower values move it
/// toward MAP_BACKGROUND.
pub fn arc_color(direction: Direction, opacity: f64) -> Color {
    interpolate_color(
        rgb_components(MAP_BACKGROUND),
        rgb_components(direction_color(direction)),
        opacity as f32,
    )
}

/// Get color for refresh interval based on its value relative to default
///
/// Color coding:
/// - Green (TOXIC_GREEN): Default value or slower
/// - Yellow (PUMPKIN_ORANGE): High frequency
/// - Red (BLOOD_RED): Very high frequency
///
/// If recently_changed is true, returns a brighter version of the color
pub fn get_refresh_color(interval_ms: u64, default_ms: u64, recently_changed: bool) -> Color {
    let base_color = if interval_ms < default_ms {
        let ratio = (default_ms - interval_ms) as f32 / default_ms as f32;
        if ratio > 0.5 {
            BLOOD_RED
        } else {
            PUMPKIN_ORANGE
        }
    } else {
        TOXIC_GREEN
    };

    // If recently changed, make the color brighter
    if recently_changed {
        let (r, g, b) = rgb_components(base_color);
        let r = ((r as f32 * 1.2).min(255.0)) as u8;
        let g = ((g as f32 * 1.2).min(255.0)) as u8;
        let b = ((b as f32 * 1.2).min(255.0)) as u8;
        Color::Rgb(r, g, b)
    } else {
        base_color
    }
}
