// Theme module - Color constants and theme re-exports
//
// This module provides the color palette and color functions for the map
// display. Outbound traffic is drawn in red, inbound traffic in green, and
// every arc is blended toward the map background as it fades.

pub mod default;

use ratatui::style::Color;

/// Primary accent color - used for borders, titles, the host marker
/// RGB: (187, 154, 247)
pub const NEON_PURPLE: Color = Color::Rgb(187, 154, 247);

/// Highlight color - used for panel titles and the imprecision caution
/// RGB: (255, 158, 100)
pub const PUMPKIN_ORANGE: Color = Color::Rgb(255, 158, 100);

/// Outbound traffic
/// RGB: (247, 118, 142)
pub const BLOOD_RED: Color = Color::Rgb(247, 118, 142);

/// Inbound traffic
/// RGB: (158, 206, 106)
pub const TOXIC_GREEN: Color = Color::Rgb(158, 206, 106);

/// Neutral text and coastlines
/// RGB: (169, 177, 214)
pub const BONE_WHITE: Color = Color::Rgb(169, 177, 214);

/// Canvas background that fading arcs blend toward
/// RGB: (26, 27, 38)
pub const MAP_BACKGROUND: Color = Color::Rgb(26, 27, 38);

// Re-export theme functions for convenient access
pub use default::*;
