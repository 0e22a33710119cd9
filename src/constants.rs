//! Centralized constants for grid geometry, timing, and colors.
//!
//! This module consolidates all magic numbers and colors used throughout the
//! application to improve maintainability and provide semantic meaning to values.

use eframe::egui::Color32;
use std::time::Duration;

// =============================================================================
// GRID GEOMETRY
// =============================================================================

/// Number of columns the board is divided into. Column width is derived from
/// the available panel width; rows have a fixed pixel height.
pub const GRID_COLS: u16 = 12;

/// Pixel height of one grid row.
pub const ROW_HEIGHT: f32 = 64.0;

/// Pixel gap between adjacent cells, and between the grid and the panel edge.
pub const CELL_MARGIN: f32 = 8.0;

/// The board always shows at least this many rows, even when empty.
pub const MIN_VISIBLE_ROWS: u16 = 6;

/// Rows kept visible below the lowest occupied cell.
pub const ROW_OVERSCAN: u16 = 2;

// =============================================================================
// SYNCHRONIZATION
// =============================================================================

/// Quiet period after the last layout mutation before the board is written
/// out. Bursts of edits inside the window collapse into a single write.
pub const SYNC_DEBOUNCE: Duration = Duration::from_millis(500);

/// Board loaded and saved when no explicit board id is given.
pub const DEFAULT_BOARD_ID: &str = "default";

// =============================================================================
// WINDOW CONSTANTS
// =============================================================================

/// Initial window width when the application starts.
pub const INITIAL_WINDOW_WIDTH: f32 = 1100.0;

/// Initial window height when the application starts.
pub const INITIAL_WINDOW_HEIGHT: f32 = 720.0;

// =============================================================================
// BLOCK RENDERING CONSTANTS
// =============================================================================

/// Corner radius for block rectangles.
pub const BLOCK_CORNER_RADIUS: f32 = 6.0;

/// Height of the title strip at the top of every block.
pub const TITLE_BAR_HEIGHT: f32 = 26.0;

/// Horizontal inset of block content from the block edge.
pub const CONTENT_PADDING: f32 = 8.0;

/// Side length of the square resize hot zone in a block's bottom-right corner.
pub const RESIZE_HANDLE_SIZE: f32 = 16.0;

/// Radius of the remove button shown in edit mode.
pub const REMOVE_BUTTON_RADIUS: f32 = 8.0;

/// Font size for block titles.
pub const TITLE_FONT_SIZE: f32 = 13.0;

// =============================================================================
// COLORS
// =============================================================================

/// Background color for the toolbar.
pub const COLOR_TOOLBAR_BG: Color32 = Color32::from_rgb(30, 30, 30);

/// Block body fill.
pub const COLOR_BLOCK_BG: Color32 = Color32::from_rgb(40, 42, 46);

/// Block body fill while the block is being dragged or resized.
pub const COLOR_BLOCK_ACTIVE_BG: Color32 = Color32::from_rgb(50, 54, 60);

/// Block outline.
pub const COLOR_BLOCK_BORDER: Color32 = Color32::from_rgb(70, 74, 80);

/// Block title text.
pub const COLOR_TITLE_TEXT: Color32 = Color32::from_gray(220);

/// Outline of empty background cells, visible in edit mode.
pub const COLOR_GRID_LINE: Color32 = Color32::from_gray(50);

/// Fill of background cells covered by the drop placeholder.
pub const COLOR_PLACEHOLDER: Color32 = Color32::from_rgba_premultiplied(70, 100, 150, 90);

/// Remove button color in normal state.
pub const COLOR_REMOVE_BUTTON: Color32 = Color32::from_rgb(170, 60, 60);

/// Remove button color when hovered.
pub const COLOR_REMOVE_BUTTON_HOVER: Color32 = Color32::from_rgb(230, 90, 90);

/// Resize handle glyph color.
pub const COLOR_RESIZE_HANDLE: Color32 = Color32::from_gray(120);
