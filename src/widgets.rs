//! Built-in block content renderers.
//!
//! Each renderer draws one block type's body into the content area it is
//! given. Renderers are pure presentation: they receive the edit-mode flag
//! and nothing else, and never touch layout state.

use chrono::{Datelike, Local, NaiveDate};
use eframe::egui::{self, Color32, RichText};
use std::time::Duration;

const WEEKDAY_LABELS: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];

const RANKING_ROWS: [(&str, u32); 5] = [
    ("Aurora", 2841),
    ("Basalt", 2512),
    ("Cinder", 2390),
    ("Drift", 2102),
    ("Ember", 1987),
];

const GOAL_ROWS: [(&str, f32); 3] = [
    ("Weekly review", 0.8),
    ("Reading streak", 0.55),
    ("Inbox zero", 0.3),
];

pub fn render_calendar(ui: &mut egui::Ui, _edit_mode: bool) {
    let today = Local::now().date_naive();
    ui.label(RichText::new(today.format("%B %Y").to_string()).strong());
    ui.add_space(2.0);

    egui::Grid::new("calendar_days")
        .num_columns(7)
        .min_col_width(18.0)
        .spacing([4.0, 2.0])
        .show(ui, |ui| {
            for label in WEEKDAY_LABELS {
                ui.label(RichText::new(label).weak().size(11.0));
            }
            ui.end_row();

            let first = today.with_day(1).unwrap_or(today);
            let leading = first.weekday().num_days_from_monday() as usize;
            for _ in 0..leading {
                ui.label("");
            }
            let mut column = leading;
            for day in 1..=days_in_month(today.year(), today.month()) {
                let text = if day == today.day() {
                    RichText::new(day.to_string())
                        .strong()
                        .color(Color32::from_rgb(120, 170, 255))
                } else {
                    RichText::new(day.to_string())
                };
                ui.label(text.size(12.0));
                column += 1;
                if column % 7 == 0 {
                    ui.end_row();
                }
            }
        });
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next.and_then(|d| d.pred_opt()).map(|d| d.day()).unwrap_or(30)
}

pub fn render_ranking(ui: &mut egui::Ui, _edit_mode: bool) {
    egui::Grid::new("ranking_rows")
        .num_columns(3)
        .spacing([8.0, 3.0])
        .show(ui, |ui| {
            for (place, (name, score)) in RANKING_ROWS.iter().enumerate() {
                ui.label(RichText::new(format!("{}.", place + 1)).weak());
                ui.label(*name);
                ui.label(RichText::new(score.to_string()).monospace());
                ui.end_row();
            }
        });
}

pub fn render_goals(ui: &mut egui::Ui, _edit_mode: bool) {
    for (name, progress) in GOAL_ROWS {
        ui.add(
            egui::ProgressBar::new(progress)
                .text(RichText::new(name).size(11.0))
                .desired_height(14.0),
        );
        ui.add_space(2.0);
    }
}

pub fn render_notes(ui: &mut egui::Ui, edit_mode: bool) {
    ui.label("Ship the quarterly summary.");
    ui.label("Water the office plants on Friday.");
    if edit_mode {
        ui.label(RichText::new("Drag the corner to make room for more.").weak());
    }
}

pub fn render_clock(ui: &mut egui::Ui, _edit_mode: bool) {
    let now = Local::now();
    ui.label(
        RichText::new(now.format("%H:%M:%S").to_string())
            .monospace()
            .size(22.0),
    );
    ui.label(RichText::new(now.format("%A, %d %B").to_string()).weak().size(11.0));
    ui.ctx().request_repaint_after(Duration::from_secs(1));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_lengths_are_correct() {
        assert_eq!(days_in_month(2025, 1), 31);
        assert_eq!(days_in_month(2025, 4), 30);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 12), 31);
    }
}
