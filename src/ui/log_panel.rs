use eframe::egui;

use crate::console::{Console, LogLevel};
use crate::ui::design_tokens::{self, TextRole};

fn level_tag(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    }
}

pub fn log_panel(ui: &mut egui::Ui, console: &Console) {
    ui.label(design_tokens::rich_text("Log", TextRole::SectionTitle));
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for entry in console.entries() {
                let text = format!("[{}] {}", level_tag(entry.level), entry.message);
                ui.label(
                    design_tokens::rich_text(text, TextRole::Code)
                        .color(design_tokens::log_level_fg(entry.level)),
                );
            }
        });
}
