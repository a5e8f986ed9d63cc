use eframe::egui;

use crate::settings::{MAX_DETAIL, MIN_BOUNDS, Settings};
use crate::ui::components::two_column_section::{labeled_row, section};

/// Plane, color and render toggles. None of these resynthesize the program.
pub fn settings_panel(ui: &mut egui::Ui, settings: &mut Settings) {
    section(ui, "Plane", |ui| {
        labeled_row(ui, "Detail", |ui| {
            ui.add(egui::Slider::new(&mut settings.detail, 1..=MAX_DETAIL).logarithmic(true));
        });
        labeled_row(ui, "Bounds", |ui| {
            ui.add(
                egui::DragValue::new(&mut settings.bounds)
                    .speed(0.01)
                    .range(MIN_BOUNDS..=1000.0),
            );
        });
    });
    ui.add_space(8.0);

    section(ui, "Colors", |ui| {
        labeled_row(ui, "Background", |ui| {
            ui.color_edit_button_rgba_unmultiplied(&mut settings.background);
        });
        labeled_row(ui, "Surface", |ui| {
            ui.color_edit_button_rgba_unmultiplied(&mut settings.surface_color);
        });
    });
    ui.add_space(8.0);

    section(ui, "Render", |ui| {
        ui.checkbox(&mut settings.wireframe, "Wireframe");
        ui.checkbox(&mut settings.grid_lines, "Grid lines");
        ui.checkbox(&mut settings.animate_time, "Animate time");
    });

    settings.sanitize();
}
