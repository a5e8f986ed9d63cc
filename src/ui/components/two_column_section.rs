use eframe::egui::{self, Margin};

use crate::ui::design_tokens::{self, TextRole};

const SECTION_TO_PANEL_GAP: f32 = 6.0;
const LABEL_COLUMN_WIDTH: f32 = 72.0;

/// Titled block with an optional right-aligned header action (e.g. an "Add" button).
pub fn section_with_header_action(
    ui: &mut egui::Ui,
    title: &str,
    header_action: impl FnOnce(&mut egui::Ui),
    body: impl FnOnce(&mut egui::Ui),
) {
    ui.horizontal(|ui| {
        ui.label(design_tokens::rich_text(title, TextRole::SectionTitle));
        ui.with_layout(
            egui::Layout::right_to_left(egui::Align::Center),
            header_action,
        );
    });
    ui.add_space(SECTION_TO_PANEL_GAP);
    egui::Frame::new()
        .fill(design_tokens::PANEL_BG)
        .inner_margin(Margin::same(6))
        .corner_radius(design_tokens::radius(4))
        .show(ui, body);
}

pub fn section(ui: &mut egui::Ui, title: &str, body: impl FnOnce(&mut egui::Ui)) {
    section_with_header_action(ui, title, |_| {}, body);
}

/// Label in a fixed-width left column, control filling the rest of the row.
pub fn labeled_row(ui: &mut egui::Ui, label: &str, body: impl FnOnce(&mut egui::Ui)) {
    ui.horizontal(|ui| {
        ui.allocate_ui_with_layout(
            egui::vec2(LABEL_COLUMN_WIDTH, design_tokens::CONTROL_ROW_HEIGHT),
            egui::Layout::left_to_right(egui::Align::Center),
            |ui| {
                ui.label(design_tokens::rich_text(label, TextRole::AttributeTitle));
            },
        );
        body(ui);
    });
}
