//! Ownership of the placed-block list and the mutations the UI applies to it.
//!
//! The store is the single holder of board state. Arrangement is computed
//! elsewhere and fed back in through `apply_external_layout_change`; the
//! store itself never moves a block.

use uuid::Uuid;

use crate::block::{BlockType, PlacedBlock, Placement};
use crate::engine::GridPosition;
use crate::registry::BlockConstraints;

/// Canonical ordered list of blocks on one board.
pub struct LayoutStore {
    blocks: Vec<PlacedBlock>,
    hydrated: bool,
}

impl LayoutStore {
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            hydrated: false,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Hydration
    // ─────────────────────────────────────────────────────────────────────────────

    /// Replaces in-memory state with the fetched snapshot.
    ///
    /// Only the first call has any effect. A fetch that resolves after the
    /// user already edited would otherwise clobber those edits; conversely,
    /// edits made before the first call are discarded by it. Returns whether
    /// the snapshot was applied.
    pub fn initialize(&mut self, snapshot: Vec<PlacedBlock>) -> bool {
        if self.hydrated {
            log::warn!(
                "ignoring late board hydration carrying {} blocks",
                snapshot.len()
            );
            return false;
        }
        self.blocks = snapshot;
        self.hydrated = true;
        true
    }

    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Access
    // ─────────────────────────────────────────────────────────────────────────────

    /// Returns a slice of all blocks, in board order.
    pub fn blocks(&self) -> &[PlacedBlock] {
        &self.blocks
    }

    /// Returns a block by its ID.
    pub fn get(&self, id: Uuid) -> Option<&PlacedBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// Returns the number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns true if there are no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Owned copy of the current state, as handed to the persistence layer.
    pub fn snapshot(&self) -> Vec<PlacedBlock> {
        self.blocks.clone()
    }

    /// True while any block still awaits its first arrangement pass.
    pub fn has_unplaced(&self) -> bool {
        self.blocks
            .iter()
            .any(|b| b.placement == Placement::AppendBelow)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Appends a new block with the type's default size, awaiting placement.
    /// Returns the new block's ID.
    pub fn add_block(&mut self, kind: BlockType, constraints: BlockConstraints) -> Uuid {
        let block = PlacedBlock::new(kind, constraints.default_w, constraints.default_h);
        let id = block.id;
        self.blocks.push(block);
        id
    }

    /// Removes a block by its ID. Removing an absent ID is a no-op.
    /// Returns whether anything was removed.
    pub fn remove_block(&mut self, id: Uuid) -> bool {
        let before = self.blocks.len();
        self.blocks.retain(|b| b.id != id);
        self.blocks.len() != before
    }

    /// Overwrites position and size for every block named in `new_positions`.
    ///
    /// This is a full replace by ID, not a patch: each named block takes all
    /// four of x, y, w, h from its entry, so a reordering pass can never
    /// leave stale partial coordinates. Blocks not named are untouched; IDs
    /// with no matching block are ignored. Returns whether anything changed.
    pub fn apply_external_layout_change(&mut self, new_positions: &[GridPosition]) -> bool {
        let mut changed = false;
        for pos in new_positions {
            if let Some(block) = self.blocks.iter_mut().find(|b| b.id == pos.id) {
                let placement = Placement::Explicit { x: pos.x, y: pos.y };
                if block.placement != placement || block.w != pos.w || block.h != pos.h {
                    block.placement = placement;
                    block.w = pos.w;
                    block.h = pos.h;
                    changed = true;
                }
            }
        }
        changed
    }
}

impl Default for LayoutStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTES: BlockConstraints = BlockConstraints {
        min_w: 2,
        max_w: 12,
        min_h: 1,
        max_h: 8,
        default_w: 3,
        default_h: 2,
    };

    fn seeded_store() -> LayoutStore {
        let mut store = LayoutStore::new();
        store.initialize(vec![
            PlacedBlock {
                id: Uuid::new_v4(),
                kind: BlockType::Calendar,
                placement: Placement::Explicit { x: 0, y: 0 },
                w: 4,
                h: 4,
            },
            PlacedBlock {
                id: Uuid::new_v4(),
                kind: BlockType::Clock,
                placement: Placement::Explicit { x: 4, y: 0 },
                w: 2,
                h: 1,
            },
        ]);
        store
    }

    #[test]
    fn initialize_applies_only_once() {
        let mut store = LayoutStore::new();
        assert!(store.initialize(vec![PlacedBlock::new(BlockType::Notes, 3, 2)]));
        assert_eq!(store.len(), 1);

        assert!(!store.initialize(Vec::new()));
        assert_eq!(store.len(), 1, "late hydration must not clobber state");
    }

    #[test]
    fn edits_before_hydration_are_discarded() {
        let mut store = LayoutStore::new();
        store.add_block(BlockType::Clock, NOTES);

        store.initialize(Vec::new());

        assert!(store.is_empty());
    }

    #[test]
    fn new_block_settles_after_one_engine_pass() {
        use crate::engine::{Compactor, GridEngine, GridItem};

        let mut store = seeded_store();
        let id = store.add_block(BlockType::Notes, NOTES);
        assert!(store.has_unplaced());

        let items: Vec<GridItem> = store
            .blocks()
            .iter()
            .map(|b| GridItem {
                id: b.id,
                placement: b.placement,
                w: b.w,
                h: b.h,
                constraints: NOTES,
            })
            .collect();
        let positions = Compactor.arrange(&items, 12, None);
        assert!(store.apply_external_layout_change(&positions));

        assert!(!store.has_unplaced());
        let settled = store.get(id).unwrap();
        assert!(settled.placement.explicit().is_some());
        let rects: Vec<GridPosition> = store
            .blocks()
            .iter()
            .map(|b| {
                let (x, y) = b.placement.explicit().unwrap();
                GridPosition {
                    id: b.id,
                    x,
                    y,
                    w: b.w,
                    h: b.h,
                }
            })
            .collect();
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                assert!(!a.overlaps(b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn add_uses_defaults_and_awaits_placement() {
        let mut store = seeded_store();
        let id = store.add_block(BlockType::Notes, NOTES);

        let block = store.get(id).expect("block was appended");
        assert_eq!(block.kind, BlockType::Notes);
        assert_eq!((block.w, block.h), (3, 2));
        assert_eq!(block.placement, Placement::AppendBelow);
        assert!(store.has_unplaced());
        assert_eq!(store.blocks().last().map(|b| b.id), Some(id));
    }

    #[test]
    fn add_then_remove_round_trips() {
        let mut store = seeded_store();
        let before = store.snapshot();

        let id = store.add_block(BlockType::Notes, NOTES);
        assert!(store.remove_block(id));

        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn removing_an_absent_id_is_a_no_op() {
        let mut store = seeded_store();
        let before = store.snapshot();

        assert!(!store.remove_block(Uuid::new_v4()));
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn apply_is_a_full_replace_by_id() {
        let mut store = seeded_store();
        let target = store.blocks()[0].id;
        let untouched = store.blocks()[1].clone();

        let changed = store.apply_external_layout_change(&[GridPosition {
            id: target,
            x: 6,
            y: 2,
            w: 5,
            h: 3,
        }]);

        assert!(changed);
        let moved = store.get(target).unwrap();
        assert_eq!(moved.placement, Placement::Explicit { x: 6, y: 2 });
        assert_eq!((moved.w, moved.h), (5, 3));
        assert_eq!(store.blocks()[1], untouched);
    }

    #[test]
    fn apply_is_idempotent() {
        let mut store = seeded_store();
        let positions = vec![
            GridPosition {
                id: store.blocks()[0].id,
                x: 1,
                y: 1,
                w: 4,
                h: 4,
            },
            GridPosition {
                id: store.blocks()[1].id,
                x: 5,
                y: 1,
                w: 2,
                h: 1,
            },
        ];

        assert!(store.apply_external_layout_change(&positions));
        let once = store.snapshot();

        assert!(!store.apply_external_layout_change(&positions));
        assert_eq!(store.snapshot(), once);
    }

    #[test]
    fn apply_ignores_unknown_ids() {
        let mut store = seeded_store();
        let before = store.snapshot();

        let changed = store.apply_external_layout_change(&[GridPosition {
            id: Uuid::new_v4(),
            x: 0,
            y: 0,
            w: 1,
            h: 1,
        }]);

        assert!(!changed);
        assert_eq!(store.snapshot(), before);
    }
}
