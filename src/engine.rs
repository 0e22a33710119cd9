//! Grid arrangement: constraint clamping, append resolution, and vertical
//! compaction.
//!
//! The layout store consumes arrangement output without knowing how it was
//! computed, so the contract is a trait. `Compactor` is the built-in
//! provider: deterministic, allocation-light, and total (every input item
//! gets exactly one output position).

use uuid::Uuid;

use crate::block::Placement;
use crate::registry::BlockConstraints;

/// Arrangement input: one block plus the limits it must respect.
#[derive(Clone, Copy, Debug)]
pub struct GridItem {
    pub id: Uuid,
    pub placement: Placement,
    pub w: u16,
    pub h: u16,
    pub constraints: BlockConstraints,
}

/// Arrangement output: a resolved, conflict-free rectangle for one block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridPosition {
    pub id: Uuid,
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

impl GridPosition {
    pub fn overlaps(&self, other: &GridPosition) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

/// Computes a conflict-free arrangement for a set of blocks.
pub trait GridEngine {
    /// Returns one position per input item.
    ///
    /// The `active` item, if any, is held at its own rectangle while the
    /// rest are arranged around it; this is how an in-flight drag or resize
    /// is fed through without the engine fighting the gesture.
    fn arrange(&self, items: &[GridItem], cols: u16, active: Option<Uuid>) -> Vec<GridPosition>;
}

/// Vertical compaction in reading order.
///
/// Sizes are clamped into per-item constraints and the column span is kept
/// inside the grid (x shifts left before w shrinks). Unplaced items resolve
/// at the left edge. Each block then settles at the lowest free row for its
/// span, processed top-to-bottom then left-to-right, which preserves the
/// relative vertical order of an existing layout.
pub struct Compactor;

impl Compactor {
    fn clamp(item: &GridItem, cols: u16) -> (Option<u16>, Option<u16>, u16, u16) {
        let c = item.constraints;
        let w = item.w.clamp(c.min_w, c.max_w).min(cols).max(1);
        let h = item.h.clamp(c.min_h, c.max_h).max(1);
        match item.placement {
            Placement::Explicit { x, y } => (Some(x.min(cols - w)), Some(y), w, h),
            Placement::AppendBelow => (None, None, w, h),
        }
    }

    /// Smallest y at which `probe` fits without touching `placed`, searching
    /// downward from `probe.y`.
    fn settle(placed: &[GridPosition], mut probe: GridPosition) -> u16 {
        loop {
            match placed.iter().filter(|p| p.overlaps(&probe)).map(|p| p.y + p.h).max() {
                None => return probe.y,
                Some(below) => probe.y = below,
            }
        }
    }
}

impl GridEngine for Compactor {
    fn arrange(&self, items: &[GridItem], cols: u16, active: Option<Uuid>) -> Vec<GridPosition> {
        let cols = cols.max(1);
        let mut placed: Vec<GridPosition> = Vec::with_capacity(items.len());

        // The active block is pinned first so everything else yields to it.
        // An active block that is still unplaced has no rectangle to pin.
        let pinned = active.and_then(|id| {
            items.iter().find(|item| {
                item.id == id && matches!(item.placement, Placement::Explicit { .. })
            })
        });
        if let Some(item) = pinned {
            let (x, y, w, h) = Self::clamp(item, cols);
            placed.push(GridPosition {
                id: item.id,
                x: x.unwrap_or(0),
                y: y.unwrap_or(0),
                w,
                h,
            });
        }

        // Reading order: by row, then column, then insertion order. Unplaced
        // items come last, in insertion order.
        let mut order: Vec<usize> = (0..items.len())
            .filter(|&i| Some(items[i].id) != pinned.map(|p| p.id))
            .collect();
        order.sort_by_key(|&i| match items[i].placement {
            Placement::Explicit { x, y } => (0u8, y, x, i),
            Placement::AppendBelow => (1u8, 0, 0, i),
        });

        for i in order {
            let item = &items[i];
            let (x, _, w, h) = Self::clamp(item, cols);
            let x = x.unwrap_or(0);
            let probe = GridPosition {
                id: item.id,
                x,
                y: 0,
                w,
                h,
            };
            let y = Self::settle(&placed, probe);
            placed.push(GridPosition { y, ..probe });
        }

        placed
    }
}
