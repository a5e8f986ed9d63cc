use std::hash::Hash;

use eframe::egui;

use crate::ui::design_tokens;

const EDGE_INSET_X: f32 = 6.0;
const INDICATOR_WIDTH: f32 = 2.0;

pub struct ValueSliderOutput {
    pub response: egui::Response,
    pub changed: bool,
}

/// Position of `value` inside `[min, max]` as `0..=1`. Degenerate or inverted ranges map to 0.
pub fn normalized_value(value: f32, min: f32, max: f32) -> f32 {
    if max - min <= f32::EPSILON {
        0.0
    } else {
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    }
}

pub fn value_from_normalized(t: f32, min: f32, max: f32) -> f32 {
    if max < min {
        return min;
    }
    min + (max - min) * t.clamp(0.0, 1.0)
}

/// Flat track slider for a bounded slider symbol. Click or drag sets the value; the
/// current value is printed inside the track.
pub fn value_slider(
    ui: &mut egui::Ui,
    id_source: impl Hash,
    value: &mut f32,
    min: f32,
    max: f32,
) -> ValueSliderOutput {
    let desired_size = egui::vec2(ui.available_width(), design_tokens::CONTROL_ROW_HEIGHT);
    let (rect, _) = ui.allocate_exact_size(desired_size, egui::Sense::hover());
    let track = rect.shrink2(egui::vec2(EDGE_INSET_X, 0.0));
    let id = ui.make_persistent_id(id_source);
    let response = ui
        .interact(rect, id, egui::Sense::click_and_drag())
        .on_hover_cursor(egui::CursorIcon::ResizeHorizontal);

    let mut changed = false;
    if (response.clicked() || response.dragged())
        && let Some(pointer) = response.interact_pointer_pos()
    {
        let t = (pointer.x - track.left()) / track.width().max(f32::EPSILON);
        let next = value_from_normalized(t, min, max);
        if (*value - next).abs() > f32::EPSILON {
            *value = next;
            changed = true;
        }
    }

    let t = normalized_value(*value, min, max);
    let painter = ui.painter_at(rect);
    let stroke = if response.hovered() || response.dragged() {
        egui::Stroke::new(design_tokens::LINE_THICKNESS_05, design_tokens::white(20))
    } else {
        egui::Stroke::NONE
    };
    painter.rect(
        rect,
        design_tokens::radius(4),
        design_tokens::ROW_ACTIVE_BG,
        stroke,
        egui::StrokeKind::Inside,
    );
    let fill = egui::Rect::from_min_max(
        rect.min,
        egui::pos2(track.left() + track.width() * t, rect.max.y),
    );
    painter.rect_filled(fill, design_tokens::radius(4), design_tokens::white(10));
    painter.rect_filled(
        egui::Rect::from_center_size(
            egui::pos2(fill.right(), rect.center().y),
            egui::vec2(INDICATOR_WIDTH, rect.height() - 8.0),
        ),
        design_tokens::radius(2),
        design_tokens::white(90),
    );
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        format!("{:.3}", *value),
        egui::FontId::proportional(design_tokens::FONT_SIZE_12),
        design_tokens::white(80),
    );

    ValueSliderOutput { response, changed }
}
