//! Functions / Constants / Sliders tables.
//!
//! Rows are edited in place. Text edits live in a draft buffer and are only turned
//! into a [`SymbolAction`] when the field loses focus, so typing never resynthesizes.

use std::collections::HashMap;

use eframe::egui;

use crate::registry::{ENTRY_POINT, SymbolKind, SymbolRegistry};
use crate::ui::components::two_column_section;
use crate::ui::components::value_slider::value_slider;
use crate::ui::design_tokens::{self, TextRole};

const NAME_WIDTH: f32 = 72.0;
const NUMBER_WIDTH: f32 = 56.0;

#[derive(Debug, Clone, PartialEq)]
pub enum SymbolAction {
    Add(SymbolKind),
    Remove(SymbolKind, usize),
    Move(SymbolKind, usize, isize),
    Rename(SymbolKind, usize, String),
    SetExpression(usize, String),
    SetConstant(usize, f32),
    SetSliderValue(usize, f32),
    SetSliderRange(usize, f32, f32),
    /// Input that could not be turned into an edit, e.g. an unparsable number.
    Rejected(String),
}

impl SymbolAction {
    /// Whether applying this action changes which symbol sits at a row index.
    pub fn shifts_rows(&self) -> bool {
        matches!(self, Self::Move(..) | Self::Remove(..))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Field {
    Name,
    Expression,
    Value,
    Min,
    Max,
}

type DraftKey = (SymbolKind, usize, Field);

/// Uncommitted text of the fields currently being edited.
#[derive(Debug, Default)]
pub struct SymbolEditor {
    drafts: HashMap<DraftKey, String>,
}

impl SymbolEditor {
    /// Drop every draft. Drafts are keyed by row, so this must follow any reorder or removal.
    pub fn forget_drafts(&mut self) {
        self.drafts.clear();
    }

    /// Single-line field that yields its text once, when focus leaves and the text differs.
    fn committed_text(
        &mut self,
        ui: &mut egui::Ui,
        key: DraftKey,
        current: &str,
        width: f32,
    ) -> (egui::Response, Option<String>) {
        let draft = self
            .drafts
            .entry(key)
            .or_insert_with(|| current.to_string());
        let response = ui.add(
            egui::TextEdit::singleline(draft)
                .desired_width(width)
                .font(egui::TextStyle::Monospace),
        );
        let committed = if response.lost_focus() {
            self.drafts.remove(&key).filter(|text| text != current)
        } else {
            if !response.has_focus() {
                self.drafts.remove(&key);
            }
            None
        };
        (response, committed)
    }

    fn committed_number(
        &mut self,
        ui: &mut egui::Ui,
        key: DraftKey,
        current: f32,
    ) -> (egui::Response, Option<Result<f32, String>>) {
        let (response, text) = self.committed_text(ui, key, &current.to_string(), NUMBER_WIDTH);
        let parsed = text.map(|text| {
            text.trim()
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| format!("{text:?} is not a number"))
        });
        (response, parsed)
    }
}

/// Context menu with reorder and delete shared by every row kind.
fn row_menu(
    response: &egui::Response,
    kind: SymbolKind,
    index: usize,
    deletable: bool,
    actions: &mut Vec<SymbolAction>,
) {
    response.context_menu(|ui| {
        if ui.button("Move up").clicked() {
            actions.push(SymbolAction::Move(kind, index, -1));
            ui.close();
        }
        if ui.button("Move down").clicked() {
            actions.push(SymbolAction::Move(kind, index, 1));
            ui.close();
        }
        ui.separator();
        if ui
            .add_enabled(deletable, egui::Button::new("Delete"))
            .clicked()
        {
            actions.push(SymbolAction::Remove(kind, index));
            ui.close();
        }
    });
}

fn add_button(ui: &mut egui::Ui, kind: SymbolKind) -> bool {
    ui.small_button(format!("Add new {}", kind.label())).clicked()
}

pub fn functions_table(
    ui: &mut egui::Ui,
    registry: &SymbolRegistry,
    editor: &mut SymbolEditor,
) -> Vec<SymbolAction> {
    let mut actions = Vec::new();
    let mut add_clicked = false;
    two_column_section::section_with_header_action(
        ui,
        "Functions",
        |ui| add_clicked = add_button(ui, SymbolKind::Function),
        |ui| {
            for (i, function) in registry.functions().iter().enumerate() {
                ui.horizontal(|ui| {
                    let name_response = if function.name == ENTRY_POINT {
                        ui.add_sized(
                            [NAME_WIDTH, design_tokens::CONTROL_ROW_HEIGHT],
                            egui::Label::new(design_tokens::rich_text(
                                format!("{ENTRY_POINT}(x, z)"),
                                TextRole::Code,
                            ))
                            .sense(egui::Sense::click()),
                        )
                    } else {
                        let key = (SymbolKind::Function, i, Field::Name);
                        let (response, name) =
                            editor.committed_text(ui, key, &function.name, NAME_WIDTH);
                        if let Some(name) = name {
                            actions.push(SymbolAction::Rename(SymbolKind::Function, i, name));
                        }
                        response
                    };
                    row_menu(
                        &name_response,
                        SymbolKind::Function,
                        i,
                        function.name != ENTRY_POINT,
                        &mut actions,
                    );

                    let key = (SymbolKind::Function, i, Field::Expression);
                    let width = ui.available_width();
                    let (response, expression) =
                        editor.committed_text(ui, key, &function.expression, width);
                    if let Some(expression) = expression {
                        actions.push(SymbolAction::SetExpression(i, expression));
                    }
                    row_menu(
                        &response,
                        SymbolKind::Function,
                        i,
                        function.name != ENTRY_POINT,
                        &mut actions,
                    );
                });
            }
        },
    );
    if add_clicked {
        actions.push(SymbolAction::Add(SymbolKind::Function));
    }
    actions
}

pub fn constants_table(
    ui: &mut egui::Ui,
    registry: &SymbolRegistry,
    editor: &mut SymbolEditor,
) -> Vec<SymbolAction> {
    let mut actions = Vec::new();
    let mut add_clicked = false;
    two_column_section::section_with_header_action(
        ui,
        "Constants",
        |ui| add_clicked = add_button(ui, SymbolKind::Constant),
        |ui| {
            if registry.constants().is_empty() {
                ui.label(design_tokens::rich_text("No constants", TextRole::AttributeTitle));
            }
            for (i, constant) in registry.constants().iter().enumerate() {
                ui.horizontal(|ui| {
                    let key = (SymbolKind::Constant, i, Field::Name);
                    let (response, name) =
                        editor.committed_text(ui, key, &constant.name, NAME_WIDTH);
                    if let Some(name) = name {
                        actions.push(SymbolAction::Rename(SymbolKind::Constant, i, name));
                    }
                    row_menu(&response, SymbolKind::Constant, i, true, &mut actions);

                    let key = (SymbolKind::Constant, i, Field::Value);
                    match editor.committed_number(ui, key, constant.value).1 {
                        Some(Ok(value)) => actions.push(SymbolAction::SetConstant(i, value)),
                        Some(Err(message)) => actions.push(SymbolAction::Rejected(message)),
                        None => {}
                    }
                });
            }
        },
    );
    if add_clicked {
        actions.push(SymbolAction::Add(SymbolKind::Constant));
    }
    actions
}

pub fn sliders_table(
    ui: &mut egui::Ui,
    registry: &SymbolRegistry,
    editor: &mut SymbolEditor,
) -> Vec<SymbolAction> {
    let mut actions = Vec::new();
    let mut add_clicked = false;
    two_column_section::section_with_header_action(
        ui,
        "Sliders",
        |ui| add_clicked = add_button(ui, SymbolKind::Slider),
        |ui| {
            if registry.sliders().is_empty() {
                ui.label(design_tokens::rich_text("No sliders", TextRole::AttributeTitle));
            }
            for (i, slider) in registry.sliders().iter().enumerate() {
                ui.horizontal(|ui| {
                    let key = (SymbolKind::Slider, i, Field::Name);
                    let (response, name) = editor.committed_text(ui, key, &slider.name, NAME_WIDTH);
                    if let Some(name) = name {
                        actions.push(SymbolAction::Rename(SymbolKind::Slider, i, name));
                    }
                    row_menu(&response, SymbolKind::Slider, i, true, &mut actions);

                    let (_, min) = editor.committed_number(ui, (SymbolKind::Slider, i, Field::Min), slider.min);
                    let (_, max) = editor.committed_number(ui, (SymbolKind::Slider, i, Field::Max), slider.max);
                    match (min, max) {
                        (Some(Err(message)), _) | (_, Some(Err(message))) => {
                            actions.push(SymbolAction::Rejected(message));
                        }
                        (Some(Ok(min)), _) => {
                            actions.push(SymbolAction::SetSliderRange(i, min, slider.max));
                        }
                        (_, Some(Ok(max))) => {
                            actions.push(SymbolAction::SetSliderRange(i, slider.min, max));
                        }
                        (None, None) => {}
                    }
                });

                let mut value = slider.value;
                if value_slider(ui, ("slider_value", i), &mut value, slider.min, slider.max).changed {
                    actions.push(SymbolAction::SetSliderValue(i, value));
                }
            }
        },
    );
    if add_clicked {
        actions.push(SymbolAction::Add(SymbolKind::Slider));
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_reorders_and_removals_shift_rows() {
        assert!(SymbolAction::Move(SymbolKind::Constant, 1, -1).shifts_rows());
        assert!(SymbolAction::Remove(SymbolKind::Slider, 0).shifts_rows());
        assert!(!SymbolAction::Add(SymbolKind::Function).shifts_rows());
        assert!(!SymbolAction::SetConstant(0, 1.0).shifts_rows());
        assert!(!SymbolAction::Rename(SymbolKind::Constant, 0, "amp".to_string()).shifts_rows());
    }

    #[test]
    fn forgetting_drafts_empties_the_editor() {
        let mut editor = SymbolEditor::default();
        editor
            .drafts
            .insert((SymbolKind::Constant, 1, Field::Name), "amp".to_string());
        assert_eq!(editor.drafts.len(), 1);
        editor.forget_drafts();
        assert!(editor.drafts.is_empty());
    }
}
