use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a block renders. Fixed for the block's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    Calendar,
    Ranking,
    Goals,
    Notes,
    Clock,
}

/// Where a block sits on the grid.
///
/// `AppendBelow` marks a freshly added block that has not been through an
/// arrangement pass yet. It is a distinct state, not a magic coordinate, so
/// "unplaced" can never be confused with row zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    Explicit { x: u16, y: u16 },
    AppendBelow,
}

impl Placement {
    pub fn explicit(self) -> Option<(u16, u16)> {
        match self {
            Placement::Explicit { x, y } => Some((x, y)),
            Placement::AppendBelow => None,
        }
    }
}

/// One block on the board. Coordinates and sizes are in grid units.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacedBlock {
    pub id: Uuid,
    pub kind: BlockType,
    pub placement: Placement,
    pub w: u16,
    pub h: u16,
}

impl PlacedBlock {
    /// A new block awaiting its first arrangement pass.
    pub fn new(kind: BlockType, w: u16, h: u16) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            placement: Placement::AppendBelow,
            w,
            h,
        }
    }
}
