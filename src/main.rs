mod block;
mod constants;
mod engine;
mod layout;
mod paths;
mod preview;
mod registry;
mod sync;
mod widgets;

use block::{PlacedBlock, Placement};
use constants::{
    BLOCK_CORNER_RADIUS, CELL_MARGIN, COLOR_BLOCK_ACTIVE_BG, COLOR_BLOCK_BG, COLOR_BLOCK_BORDER,
    COLOR_GRID_LINE, COLOR_PLACEHOLDER, COLOR_REMOVE_BUTTON, COLOR_REMOVE_BUTTON_HOVER,
    COLOR_RESIZE_HANDLE, COLOR_TITLE_TEXT, COLOR_TOOLBAR_BG, CONTENT_PADDING, DEFAULT_BOARD_ID,
    GRID_COLS, INITIAL_WINDOW_HEIGHT, INITIAL_WINDOW_WIDTH, REMOVE_BUTTON_RADIUS,
    RESIZE_HANDLE_SIZE, ROW_HEIGHT, TITLE_BAR_HEIGHT, TITLE_FONT_SIZE,
};
use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, RichText, Sense, UiBuilder, Vec2};
use egui::{pos2, vec2};
use engine::{Compactor, GridEngine, GridItem};
use layout::LayoutStore;
use paths::AppPaths;
use preview::{PlacementPreview, PlaceholderRect};
use registry::BlockRegistry;
use std::path::PathBuf;
use std::time::Instant;
use sync::{FileBoardApi, PersistenceSync};
use uuid::Uuid;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([INITIAL_WINDOW_WIDTH, INITIAL_WINDOW_HEIGHT]),
        ..Default::default()
    };

    eframe::run_native(
        "Gridboard",
        options,
        Box::new(|_cc| Ok(Box::new(GridboardApp::new()))),
    )
}

#[derive(Clone, Copy, PartialEq)]
enum GestureKind {
    Move,
    Resize,
}

#[derive(Clone, Copy)]
struct GestureState {
    id: Uuid,
    kind: GestureKind,
    start_pointer: Pos2,
    start_px: Rect,
    start_x: u16,
    start_y: u16,
    start_w: u16,
    start_h: u16,
}

/// Pixel mapping for the logical grid at the current panel width.
#[derive(Clone, Copy)]
struct GridGeometry {
    origin: Pos2,
    cell_w: f32,
}

impl GridGeometry {
    fn new(origin: Pos2, available_width: f32) -> Self {
        let span = (available_width - CELL_MARGIN).max(GRID_COLS as f32);
        let cell_w = (span / GRID_COLS as f32 - CELL_MARGIN).max(8.0);
        Self { origin, cell_w }
    }

    fn step_x(&self) -> f32 {
        self.cell_w + CELL_MARGIN
    }

    fn step_y(&self) -> f32 {
        ROW_HEIGHT + CELL_MARGIN
    }

    fn cell_rect(&self, x: u16, y: u16, w: u16, h: u16) -> Rect {
        let min = pos2(
            self.origin.x + CELL_MARGIN + x as f32 * self.step_x(),
            self.origin.y + CELL_MARGIN + y as f32 * self.step_y(),
        );
        let size = vec2(
            w as f32 * self.cell_w + w.saturating_sub(1) as f32 * CELL_MARGIN,
            h as f32 * ROW_HEIGHT + h.saturating_sub(1) as f32 * CELL_MARGIN,
        );
        Rect::from_min_size(min, size)
    }

    fn height_px(&self, rows: u16) -> f32 {
        CELL_MARGIN + rows as f32 * self.step_y()
    }
}

fn remove_button_rect(block_rect: Rect) -> Rect {
    Rect::from_center_size(
        block_rect.right_top() + vec2(-REMOVE_BUTTON_RADIUS - 6.0, REMOVE_BUTTON_RADIUS + 6.0),
        Vec2::splat(REMOVE_BUTTON_RADIUS * 2.4),
    )
}

fn resize_handle_rect(block_rect: Rect) -> Rect {
    Rect::from_min_size(
        block_rect.max - Vec2::splat(RESIZE_HANDLE_SIZE),
        Vec2::splat(RESIZE_HANDLE_SIZE),
    )
}

struct GridboardApp {
    registry: BlockRegistry,
    store: LayoutStore,
    sync: PersistenceSync,
    preview: PlacementPreview,
    engine: Compactor,
    edit_mode: bool,
    gesture: Option<GestureState>,
}

impl GridboardApp {
    fn new() -> Self {
        let boards_dir = AppPaths::from_project_dirs()
            .map(|paths| {
                if let Err(err) = paths.ensure_dirs_exist() {
                    log::warn!("could not create data directories: {err}");
                }
                paths.boards
            })
            .unwrap_or_else(|| PathBuf::from("boards"));

        let mut sync = PersistenceSync::new(Box::new(FileBoardApi::new(boards_dir)), DEFAULT_BOARD_ID);
        let mut store = LayoutStore::new();
        match sync.fetch_initial() {
            Ok(Some(blocks)) => {
                store.initialize(blocks);
            }
            Ok(None) => {
                store.initialize(Vec::new());
            }
            Err(err) => {
                log::warn!("could not load board '{DEFAULT_BOARD_ID}', starting empty: {err}");
                store.initialize(Vec::new());
            }
        }

        let mut app = Self {
            registry: BlockRegistry::with_defaults(),
            store,
            sync,
            preview: PlacementPreview::new(),
            engine: Compactor,
            edit_mode: false,
            gesture: None,
        };
        // Stored boards may predate their last arrangement pass.
        app.run_engine_pass(None);
        app
    }

    fn schedule_save(&mut self) {
        let snapshot = self.store.snapshot();
        self.sync.schedule(&snapshot, Instant::now());
    }

    /// Feeds the current blocks through the arrangement engine and applies
    /// the result. While a gesture is in flight its block is pinned at the
    /// gesture rectangle so the engine arranges everything else around it.
    fn run_engine_pass(&mut self, pinned: Option<(Uuid, PlaceholderRect)>) {
        let items: Vec<GridItem> = self
            .store
            .blocks()
            .iter()
            .map(|b| {
                let mut item = GridItem {
                    id: b.id,
                    placement: b.placement,
                    w: b.w,
                    h: b.h,
                    constraints: self.registry.constraints_for(b.kind),
                };
                if let Some((id, rect)) = pinned {
                    if id == b.id {
                        item.placement = Placement::Explicit { x: rect.x, y: rect.y };
                        item.w = rect.w;
                        item.h = rect.h;
                    }
                }
                item
            })
            .collect();

        let positions = self
            .engine
            .arrange(&items, GRID_COLS, pinned.map(|(id, _)| id));
        if self.store.apply_external_layout_change(&positions) {
            self.schedule_save();
        }
    }

    fn add_block(&mut self, kind: block::BlockType) {
        let constraints = self.registry.constraints_for(kind);
        self.store.add_block(kind, constraints);
        self.schedule_save();
        self.run_engine_pass(None);
    }

    fn remove_block(&mut self, id: Uuid) {
        if self.store.remove_block(id) {
            self.schedule_save();
            self.run_engine_pass(None);
        }
    }

    /// Target cells for the active gesture at the current pointer position.
    fn gesture_target(
        &self,
        gesture: &GestureState,
        pointer: Pos2,
        geom: &GridGeometry,
    ) -> Option<PlaceholderRect> {
        let constraints = self.registry.constraints_for(self.store.get(gesture.id)?.kind);
        let dx = ((pointer.x - gesture.start_pointer.x) / geom.step_x()).round() as i32;
        let dy = ((pointer.y - gesture.start_pointer.y) / geom.step_y()).round() as i32;

        let target = match gesture.kind {
            GestureKind::Move => {
                let max_x = GRID_COLS.saturating_sub(gesture.start_w) as i32;
                let x = (gesture.start_x as i32 + dx).clamp(0, max_x) as u16;
                let y = (gesture.start_y as i32 + dy).max(0) as u16;
                PlaceholderRect {
                    x,
                    y,
                    w: gesture.start_w,
                    h: gesture.start_h,
                }
            }
            GestureKind::Resize => {
                let max_w = constraints.max_w.min(GRID_COLS - gesture.start_x);
                let w = (gesture.start_w as i32 + dx)
                    .max(constraints.min_w as i32)
                    .min(max_w as i32) as u16;
                let h = (gesture.start_h as i32 + dy)
                    .max(constraints.min_h as i32)
                    .min(constraints.max_h as i32) as u16;
                PlaceholderRect {
                    x: gesture.start_x,
                    y: gesture.start_y,
                    w,
                    h,
                }
            }
        };
        Some(target)
    }

    /// Pixel rectangle the active block is drawn at while the pointer still
    /// holds it, before it snaps to its target cells.
    fn gesture_float_rect(gesture: &GestureState, pointer: Pos2) -> Rect {
        let delta = pointer - gesture.start_pointer;
        match gesture.kind {
            GestureKind::Move => gesture.start_px.translate(delta),
            GestureKind::Resize => {
                let size = (gesture.start_px.size() + delta).max(vec2(24.0, 24.0));
                Rect::from_min_size(gesture.start_px.min, size)
            }
        }
    }

    fn draw_block(
        &self,
        ui: &mut egui::Ui,
        block: &PlacedBlock,
        rect: Rect,
        active: bool,
        remove_hovered: bool,
    ) {
        let painter = ui.painter_at(ui.clip_rect());
        let rounding = egui::Rounding::same(BLOCK_CORNER_RADIUS);
        let fill = if active {
            COLOR_BLOCK_ACTIVE_BG
        } else {
            COLOR_BLOCK_BG
        };
        painter.rect_filled(rect, rounding, fill);
        painter.rect_stroke(rect, rounding, egui::Stroke::new(1.0, COLOR_BLOCK_BORDER));

        painter.text(
            pos2(rect.min.x + CONTENT_PADDING, rect.min.y + TITLE_BAR_HEIGHT * 0.5),
            Align2::LEFT_CENTER,
            self.registry.title_for(block.kind),
            FontId::proportional(TITLE_FONT_SIZE),
            COLOR_TITLE_TEXT,
        );

        if self.edit_mode {
            let remove_rect = remove_button_rect(rect);
            painter.circle_filled(
                remove_rect.center(),
                REMOVE_BUTTON_RADIUS,
                if remove_hovered {
                    COLOR_REMOVE_BUTTON_HOVER
                } else {
                    COLOR_REMOVE_BUTTON
                },
            );
            painter.text(
                remove_rect.center(),
                Align2::CENTER_CENTER,
                "x",
                FontId::monospace(11.0),
                Color32::WHITE,
            );

            for i in 0..3 {
                let inset = 3.0 + i as f32 * 4.0;
                painter.line_segment(
                    [
                        pos2(rect.max.x - inset, rect.max.y - 3.0),
                        pos2(rect.max.x - 3.0, rect.max.y - inset),
                    ],
                    egui::Stroke::new(1.0, COLOR_RESIZE_HANDLE),
                );
            }
        }

        let content_rect = Rect::from_min_max(
            pos2(rect.min.x + CONTENT_PADDING, rect.min.y + TITLE_BAR_HEIGHT),
            pos2(rect.max.x - CONTENT_PADDING, rect.max.y - CONTENT_PADDING),
        );
        if content_rect.width() > 8.0 && content_rect.height() > 8.0 {
            let mut content_ui = ui.new_child(
                UiBuilder::new()
                    .max_rect(content_rect)
                    .layout(egui::Layout::top_down(egui::Align::Min)),
            );
            content_ui.set_clip_rect(content_rect.intersect(ui.clip_rect()));
            (self.registry.renderable_for(block.kind))(&mut content_ui, self.edit_mode);
        }
    }

    fn show_toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar")
            .frame(
                egui::Frame::default()
                    .fill(COLOR_TOOLBAR_BG)
                    .inner_margin(6.0),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.add_space(8.0);
                    ui.label(RichText::new("Gridboard").strong().size(16.0));
                    ui.add_space(16.0);

                    let edit_label = if self.edit_mode { "Done" } else { "Edit layout" };
                    if ui.selectable_label(self.edit_mode, edit_label).clicked() {
                        self.edit_mode = !self.edit_mode;
                        if !self.edit_mode {
                            self.gesture = None;
                            self.preview.on_gesture_end();
                        }
                    }

                    if self.edit_mode {
                        ui.menu_button("Add block", |ui| {
                            let kinds: Vec<block::BlockType> = self.registry.kinds().collect();
                            for kind in kinds {
                                if ui.button(self.registry.title_for(kind)).clicked() {
                                    self.add_block(kind);
                                    ui.close_menu();
                                }
                            }
                        });
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.add_space(8.0);
                        if self.sync.has_pending() {
                            ui.label(RichText::new("saving…").weak());
                        }
                    });
                });
            });
    }

    fn show_board(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .id_salt("board_scroll")
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    let available_width = ui.available_width();
                    let rows = preview::background_rows(self.store.blocks());
                    let probe = GridGeometry::new(Pos2::ZERO, available_width);
                    let canvas_size = vec2(available_width, probe.height_px(rows));
                    let (canvas_rect, _) = ui.allocate_exact_size(canvas_size, Sense::hover());
                    let geom = GridGeometry::new(canvas_rect.min, available_width);

                    let mut canvas_ui = ui.new_child(
                        UiBuilder::new()
                            .max_rect(canvas_rect)
                            .layout(egui::Layout::default()),
                    );

                    let pointer = ui.input(|i| i.pointer.hover_pos());
                    let primary_clicked =
                        ui.input(|i| i.pointer.button_clicked(egui::PointerButton::Primary));

                    let mut removed = None;
                    let mut gesture_tick = None;
                    let mut gesture_ended = false;
                    let mut remove_hover_id = None;

                    for block in self.store.snapshot() {
                        let Some((x, y)) = block.placement.explicit() else {
                            continue;
                        };
                        let rect = geom.cell_rect(x, y, block.w, block.h);

                        let remove_hovered = self.edit_mode
                            && pointer.is_some_and(|p| remove_button_rect(rect).contains(p));
                        if remove_hovered {
                            remove_hover_id = Some(block.id);
                            if primary_clicked {
                                removed = Some(block.id);
                                continue;
                            }
                        }

                        let sense = if self.edit_mode {
                            Sense::click_and_drag()
                        } else {
                            Sense::hover()
                        };
                        let response =
                            canvas_ui.interact(rect, canvas_ui.id().with(block.id), sense);

                        if self.edit_mode
                            && response.drag_started_by(egui::PointerButton::Primary)
                            && !remove_hovered
                        {
                            if let Some(pressed_at) = response.interact_pointer_pos() {
                                let kind = if resize_handle_rect(rect).contains(pressed_at) {
                                    GestureKind::Resize
                                } else {
                                    GestureKind::Move
                                };
                                self.gesture = Some(GestureState {
                                    id: block.id,
                                    kind,
                                    start_pointer: pressed_at,
                                    start_px: rect,
                                    start_x: x,
                                    start_y: y,
                                    start_w: block.w,
                                    start_h: block.h,
                                });
                            }
                        }

                        let holds_gesture =
                            self.gesture.is_some_and(|g| g.id == block.id);
                        if holds_gesture && response.dragged_by(egui::PointerButton::Primary) {
                            if let (Some(gesture), Some(p)) =
                                (self.gesture, response.interact_pointer_pos())
                            {
                                if let Some(target) = self.gesture_target(&gesture, p, &geom) {
                                    gesture_tick = Some((block.id, target));
                                }
                            }
                        }
                        if holds_gesture && response.drag_stopped() {
                            gesture_ended = true;
                        }
                    }

                    if let Some((id, target)) = gesture_tick {
                        self.preview.on_gesture_tick(target);
                        self.run_engine_pass(Some((id, target)));
                    }
                    if gesture_ended {
                        self.gesture = None;
                        self.preview.on_gesture_end();
                        self.run_engine_pass(None);
                    }
                    if let Some(id) = removed {
                        self.remove_block(id);
                    }

                    // Background cells, then resting blocks, then the block in
                    // hand so it stays on top.
                    if self.edit_mode {
                        let painter = canvas_ui.painter_at(canvas_rect);
                        let placeholder = self.preview.placeholder();
                        let rows = preview::background_rows(self.store.blocks());
                        for idx in 0..(rows as usize * GRID_COLS as usize) {
                            let cx = (idx % GRID_COLS as usize) as u16;
                            let cy = (idx / GRID_COLS as usize) as u16;
                            let cell = geom.cell_rect(cx, cy, 1, 1);
                            if preview::cell_is_highlighted(idx, placeholder, GRID_COLS) {
                                painter.rect_filled(
                                    cell,
                                    egui::Rounding::same(3.0),
                                    COLOR_PLACEHOLDER,
                                );
                            } else {
                                painter.rect_stroke(
                                    cell,
                                    egui::Rounding::same(3.0),
                                    egui::Stroke::new(1.0, COLOR_GRID_LINE),
                                );
                            }
                        }
                    }

                    let mut in_hand = None;
                    for block in self.store.snapshot() {
                        let Some((x, y)) = block.placement.explicit() else {
                            continue;
                        };
                        if self.gesture.is_some_and(|g| g.id == block.id) {
                            in_hand = Some(block);
                            continue;
                        }
                        let rect = geom.cell_rect(x, y, block.w, block.h);
                        let remove_hovered = remove_hover_id == Some(block.id);
                        self.draw_block(&mut canvas_ui, &block, rect, false, remove_hovered);
                    }
                    if let (Some(block), Some(gesture), Some(p)) =
                        (in_hand, self.gesture, pointer)
                    {
                        let rect = Self::gesture_float_rect(&gesture, p);
                        self.draw_block(&mut canvas_ui, &block, rect, true, false);
                    }
                });
        });
    }
}

impl eframe::App for GridboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show_toolbar(ctx);
        self.show_board(ctx);

        if let Some(wait) = self.sync.poll(Instant::now()) {
            ctx.request_repaint_after(wait);
        }
    }
}
