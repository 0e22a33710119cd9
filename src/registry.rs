//! Static per-type block definitions: size constraints, titles, and content
//! renderers.
//!
//! The registry is populated once at startup and never mutated afterward.
//! Looking up a type with no definition is a schema mismatch between the
//! board data and the build, so it panics rather than degrading.

use std::collections::HashMap;

use crate::block::BlockType;
use crate::widgets;

/// Draws one block type's body. Receives only the edit-mode flag.
pub type RenderFn = fn(&mut egui::Ui, bool);

/// Size limits and defaults for one block type, in grid units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockConstraints {
    pub min_w: u16,
    pub max_w: u16,
    pub min_h: u16,
    pub max_h: u16,
    pub default_w: u16,
    pub default_h: u16,
}

/// Everything the board needs to know about one block type.
pub struct BlockDefinition {
    pub title: &'static str,
    pub constraints: BlockConstraints,
    pub render: RenderFn,
}

/// Lookup table from block type to its definition.
pub struct BlockRegistry {
    defs: HashMap<BlockType, BlockDefinition>,
    order: Vec<BlockType>,
}

impl BlockRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            defs: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Registry holding every built-in block type.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(
            BlockType::Calendar,
            BlockDefinition {
                title: "Calendar",
                constraints: BlockConstraints {
                    min_w: 3,
                    max_w: 6,
                    min_h: 3,
                    max_h: 6,
                    default_w: 4,
                    default_h: 4,
                },
                render: widgets::render_calendar,
            },
        );
        registry.register(
            BlockType::Ranking,
            BlockDefinition {
                title: "Ranking",
                constraints: BlockConstraints {
                    min_w: 2,
                    max_w: 6,
                    min_h: 2,
                    max_h: 8,
                    default_w: 3,
                    default_h: 4,
                },
                render: widgets::render_ranking,
            },
        );
        registry.register(
            BlockType::Goals,
            BlockDefinition {
                title: "Goals",
                constraints: BlockConstraints {
                    min_w: 2,
                    max_w: 8,
                    min_h: 2,
                    max_h: 4,
                    default_w: 4,
                    default_h: 2,
                },
                render: widgets::render_goals,
            },
        );
        registry.register(
            BlockType::Notes,
            BlockDefinition {
                title: "Notes",
                constraints: BlockConstraints {
                    min_w: 2,
                    max_w: 12,
                    min_h: 1,
                    max_h: 8,
                    default_w: 3,
                    default_h: 2,
                },
                render: widgets::render_notes,
            },
        );
        registry.register(
            BlockType::Clock,
            BlockDefinition {
                title: "Clock",
                constraints: BlockConstraints {
                    min_w: 2,
                    max_w: 4,
                    min_h: 1,
                    max_h: 2,
                    default_w: 2,
                    default_h: 1,
                },
                render: widgets::render_clock,
            },
        );
        registry
    }

    /// Adds a definition. First registration of a type fixes its menu position.
    pub fn register(&mut self, kind: BlockType, def: BlockDefinition) {
        if self.defs.insert(kind, def).is_none() {
            self.order.push(kind);
        }
    }

    /// Registered types in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = BlockType> + '_ {
        self.order.iter().copied()
    }

    /// Size constraints for a type.
    ///
    /// Panics if the type has no definition.
    pub fn constraints_for(&self, kind: BlockType) -> BlockConstraints {
        self.definition(kind).constraints
    }

    /// Display title for a type.
    ///
    /// Panics if the type has no definition.
    pub fn title_for(&self, kind: BlockType) -> &'static str {
        self.definition(kind).title
    }

    /// Content renderer for a type.
    ///
    /// Panics if the type has no definition.
    pub fn renderable_for(&self, kind: BlockType) -> RenderFn {
        self.definition(kind).render
    }

    fn definition(&self, kind: BlockType) -> &BlockDefinition {
        self.defs
            .get(&kind)
            .unwrap_or_else(|| panic!("no block definition registered for {kind:?}"))
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
