//! Theme constants and colors for the chess UI.

use gpui::{Rgba, rgb};

// Layout constants
pub const BOARD_PADDING: f32 = 20.0;
pub const PIECE_SCALE: f32 = 0.98; // piece size relative to square
pub const GHOST_OPACITY: f32 = 0.4;
pub const STATUS_BAR_HEIGHT: f32 = 36.0;

// Initial window size: board plus status line
pub const INITIAL_BOARD_PANEL: f32 = 680.0;

// Board colors (the classic brown board)
pub const LIGHT_SQUARE: u32 = 0xF0D9B5;
pub const DARK_SQUARE: u32 = 0xB58863;

// Panel colors
pub const PANEL_BG: u32 = 0x2a2a2a;
pub const TEXT_SECONDARY: u32 = 0x888888;
pub const TEXT_ALERT: u32 = 0xff0000;

// Promotion overlay
pub const OVERLAY_SCRIM: u32 = 0x000000aa;
pub const CHOICE_BG: u32 = 0xc8c8c8;
pub const CHOICE_BORDER: u32 = 0x4a4a4a;

/// Get the color for a board square based on its position
pub fn square_color(row: usize, col: usize) -> Rgba {
    if (row + col) % 2 == 0 {
        rgb(LIGHT_SQUARE)
    } else {
        rgb(DARK_SQUARE)
    }
}
