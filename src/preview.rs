//! Drop placeholder and background grid sizing for in-flight gestures.

use crate::block::PlacedBlock;
use crate::constants::{MIN_VISIBLE_ROWS, ROW_OVERSCAN};

/// Cell rectangle previewing where the active block will land.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaceholderRect {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

/// Holds the placeholder for the single active gesture, if any.
///
/// Idle until a gesture starts, updated on every gesture tick, cleared when
/// the gesture ends or commits. At most one gesture is ever active.
#[derive(Default)]
pub struct PlacementPreview {
    placeholder: Option<PlaceholderRect>,
}

impl PlacementPreview {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_gesture_tick(&mut self, rect: PlaceholderRect) {
        self.placeholder = Some(rect);
    }

    pub fn on_gesture_end(&mut self) {
        self.placeholder = None;
    }

    pub fn placeholder(&self) -> Option<PlaceholderRect> {
        self.placeholder
    }
}

/// Number of grid rows the board background should show: always at least
/// `MIN_VISIBLE_ROWS`, and always `ROW_OVERSCAN` past the lowest occupied
/// cell. Blocks still awaiting placement have no row and are ignored.
pub fn background_rows(blocks: &[PlacedBlock]) -> u16 {
    let lowest = blocks
        .iter()
        .filter_map(|b| b.placement.explicit().map(|(_, y)| y + b.h))
        .max()
        .unwrap_or(0);
    (lowest + ROW_OVERSCAN).max(MIN_VISIBLE_ROWS)
}

/// Whether the flattened cell index falls inside the placeholder. With no
/// active placeholder, no cell is highlighted.
pub fn cell_is_highlighted(
    cell_index: usize,
    placeholder: Option<PlaceholderRect>,
    cols: u16,
) -> bool {
    let Some(p) = placeholder else {
        return false;
    };
    if cols == 0 {
        return false;
    }
    let x = (cell_index % cols as usize) as u16;
    let y = (cell_index / cols as usize) as u16;
    x >= p.x && x < p.x + p.w && y >= p.y && y < p.y + p.h
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{BlockType, Placement};
    use uuid::Uuid;

    fn block_at(y: u16, h: u16) -> PlacedBlock {
        PlacedBlock {
            id: Uuid::new_v4(),
            kind: BlockType::Notes,
            placement: Placement::Explicit { x: 0, y },
            w: 2,
            h,
        }
    }

    #[test]
    fn empty_board_shows_minimum_rows() {
        assert_eq!(background_rows(&[]), 6);
    }

    #[test]
    fn rows_extend_past_the_lowest_block() {
        assert_eq!(background_rows(&[block_at(4, 3)]), 9);
    }

    #[test]
    fn unplaced_blocks_do_not_stretch_the_board() {
        let pending = PlacedBlock::new(BlockType::Notes, 3, 2);
        assert_eq!(background_rows(&[pending]), 6);
        assert_eq!(background_rows(&[block_at(1, 2), PlacedBlock::new(BlockType::Clock, 2, 1)]), 6);
    }

    #[test]
    fn no_placeholder_highlights_nothing() {
        for idx in 0..12 * 8 {
            assert!(!cell_is_highlighted(idx, None, 12));
        }
    }

    #[test]
    fn placeholder_covers_exactly_its_cells() {
        let p = Some(PlaceholderRect { x: 2, y: 1, w: 3, h: 2 });
        let cols = 12u16;
        let mut covered = 0;
        for idx in 0..(cols as usize) * 6 {
            if cell_is_highlighted(idx, p, cols) {
                covered += 1;
                let x = (idx % cols as usize) as u16;
                let y = (idx / cols as usize) as u16;
                assert!((2..5).contains(&x) && (1..3).contains(&y));
            }
        }
        assert_eq!(covered, 6);
    }

    #[test]
    fn zero_columns_highlights_nothing() {
        let p = Some(PlaceholderRect { x: 0, y: 0, w: 2, h: 2 });
        assert!(!cell_is_highlighted(0, p, 0));
    }

    #[test]
    fn gesture_lifecycle_clears_the_placeholder() {
        let mut preview = PlacementPreview::new();
        assert_eq!(preview.placeholder(), None);

        preview.on_gesture_tick(PlaceholderRect { x: 1, y: 1, w: 2, h: 2 });
        preview.on_gesture_tick(PlaceholderRect { x: 4, y: 1, w: 2, h: 2 });
        assert_eq!(
            preview.placeholder(),
            Some(PlaceholderRect { x: 4, y: 1, w: 2, h: 2 })
        );

        preview.on_gesture_end();
        assert_eq!(preview.placeholder(), None);
    }
}
