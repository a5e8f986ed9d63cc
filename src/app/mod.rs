mod canvas;
mod project_actions;
mod texture_bridge;
mod types;

pub use project_actions::{MenuAction, apply_menu_action, export_obj_to, load_project_from};
pub use types::{AnimationClock, App, AppInit, SymbolTab};

use eframe::egui;

use crate::{
    console::Console,
    registry::{RegistryError, SymbolKind, SymbolRegistry},
    ui::{self, symbol_panel::SymbolAction},
};

const SIDE_PANEL_WIDTH: f32 = 340.0;
const LOG_PANEL_HEIGHT: f32 = 140.0;

/// Apply one table edit to the registry. Rejected edits leave the registry untouched
/// and surface as a console warning.
pub fn apply_symbol_action(
    registry: &mut SymbolRegistry,
    console: &mut Console,
    action: SymbolAction,
) {
    let result: Result<(), RegistryError> = match action {
        SymbolAction::Add(kind) => {
            match kind {
                SymbolKind::Function => registry.add_function(),
                SymbolKind::Constant => registry.add_constant(),
                SymbolKind::Slider => registry.add_slider(),
            };
            Ok(())
        }
        SymbolAction::Remove(kind, index) => match kind {
            SymbolKind::Function => registry.remove_function(index).map(drop),
            SymbolKind::Constant => registry.remove_constant(index).map(drop),
            SymbolKind::Slider => registry.remove_slider(index).map(drop),
        },
        SymbolAction::Move(kind, index, delta) => match kind {
            SymbolKind::Function => registry.move_function(index, delta).map(drop),
            SymbolKind::Constant => registry.move_constant(index, delta).map(drop),
            SymbolKind::Slider => registry.move_slider(index, delta).map(drop),
        },
        SymbolAction::Rename(kind, index, name) => match kind {
            SymbolKind::Function => registry.rename_function(index, &name),
            SymbolKind::Constant => registry.rename_constant(index, &name),
            SymbolKind::Slider => registry.rename_slider(index, &name),
        },
        SymbolAction::SetExpression(index, expression) => {
            registry.set_expression(index, &expression)
        }
        SymbolAction::SetConstant(index, value) => registry.set_constant_value(index, value),
        SymbolAction::SetSliderValue(index, value) => registry.set_slider_value(index, value),
        SymbolAction::SetSliderRange(index, min, max) => {
            registry.set_slider_range(index, min, max)
        }
        SymbolAction::Rejected(message) => {
            console.warn(format!("[edit] {message}"));
            return;
        }
    };

    if let Err(e) = result {
        console.warn(format!("[edit] {e}"));
    }
}

fn project_menu(ui: &mut egui::Ui) -> Option<MenuAction> {
    let mut action = None;
    ui.menu_button("Project", |ui| {
        let items = [
            ("Open…", MenuAction::Open),
            ("Save", MenuAction::Save),
            ("Save As…", MenuAction::SaveAs),
            ("Export OBJ…", MenuAction::ExportObj),
        ];
        for (label, item) in items {
            if ui.button(label).clicked() {
                action = Some(item);
                ui.close();
            }
        }
    });
    action
}

impl App {
    fn symbol_tabs(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for tab in SymbolTab::ALL {
                ui.selectable_value(&mut self.tab, tab, tab.label());
            }
        });
        ui.separator();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let actions = match self.tab {
                    SymbolTab::Functions => {
                        ui::symbol_panel::functions_table(ui, &self.registry, &mut self.symbol_editor)
                    }
                    SymbolTab::Constants => {
                        ui::symbol_panel::constants_table(ui, &self.registry, &mut self.symbol_editor)
                    }
                    SymbolTab::Sliders => {
                        ui::symbol_panel::sliders_table(ui, &self.registry, &mut self.symbol_editor)
                    }
                    SymbolTab::Settings => {
                        ui::settings_panel::settings_panel(ui, &mut self.settings);
                        Vec::new()
                    }
                };
                for action in actions {
                    if action.shifts_rows() {
                        self.symbol_editor.forget_drafts();
                    }
                    apply_symbol_action(&mut self.registry, &mut self.console, action);
                }
            });
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        let mut visuals = egui::Visuals::dark();
        visuals.override_text_color =
            Some(egui::Color32::from_rgba_unmultiplied(255, 255, 255, 204));
        ctx.set_visuals(visuals);

        let Some(render_state) = frame.wgpu_render_state() else {
            return;
        };

        let mut menu_action = None;
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                menu_action = project_menu(ui);
            });
        });
        if let Some(action) = menu_action {
            apply_menu_action(self, action);
        }

        egui::SidePanel::right("symbols")
            .default_width(SIDE_PANEL_WIDTH)
            .resizable(true)
            .frame(
                egui::Frame::new()
                    .fill(ui::design_tokens::PANEL_BG)
                    .inner_margin(egui::Margin::same(8)),
            )
            .show(ctx, |ui| self.symbol_tabs(ui));

        egui::TopBottomPanel::bottom("log")
            .default_height(LOG_PANEL_HEIGHT)
            .resizable(true)
            .show(ctx, |ui| ui::log_panel::log_panel(ui, &self.console));

        let panel_frame = egui::Frame::default()
            .fill(egui::Color32::BLACK)
            .inner_margin(egui::Margin::same(0));
        egui::CentralPanel::default()
            .frame(panel_frame)
            .show(ctx, |ui| canvas::show_canvas_panel(self, ui, render_state));

        ctx.request_repaint();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::LogLevel;

    #[test]
    fn protected_entry_point_edits_become_warnings() {
        let mut registry = SymbolRegistry::new();
        let mut console = Console::default();
        let revision = registry.revision();

        apply_symbol_action(
            &mut registry,
            &mut console,
            SymbolAction::Remove(SymbolKind::Function, 0),
        );
        assert_eq!(registry.functions().len(), 1);
        assert_eq!(registry.revision(), revision);
        let last = console.last().expect("warning");
        assert_eq!(last.level, LogLevel::Warn);
        assert!(last.message.starts_with("[edit]"));
    }

    #[test]
    fn accepted_edits_reach_the_registry() {
        let mut registry = SymbolRegistry::new();
        let mut console = Console::default();

        apply_symbol_action(&mut registry, &mut console, SymbolAction::Add(SymbolKind::Slider));
        apply_symbol_action(
            &mut registry,
            &mut console,
            SymbolAction::SetExpression(0, "x * z".to_string()),
        );
        assert_eq!(registry.sliders().len(), 1);
        assert_eq!(registry.functions()[0].expression, "x * z");
        assert!(console.is_empty());
    }

    #[test]
    fn rejected_input_is_logged_once() {
        let mut registry = SymbolRegistry::new();
        let mut console = Console::default();
        apply_symbol_action(
            &mut registry,
            &mut console,
            SymbolAction::Rejected("not a number: abc".to_string()),
        );
        assert_eq!(console.len(), 1);
    }

    #[test]
    fn bracketed_rename_is_refused_with_a_warning() {
        let mut registry = SymbolRegistry::new();
        let mut console = Console::default();
        let c = registry.add_constant();

        apply_symbol_action(
            &mut registry,
            &mut console,
            SymbolAction::Rename(SymbolKind::Constant, c, "[Sliders]".to_string()),
        );
        assert_eq!(registry.constants()[c].name, "_1");
        assert_eq!(console.last().map(|e| e.level), Some(LogLevel::Warn));
    }
}
