use eframe::{
    egui::{self, Color32, Rect, pos2},
    egui_wgpu,
};

use crate::renderer::FrameInputs;

use super::{texture_bridge, types::App};

/// Canvas size in physical pixels for a panel of `size` points.
pub fn physical_size(size: egui::Vec2, pixels_per_point: f32) -> [u32; 2] {
    [
        (size.x * pixels_per_point).round().max(1.0) as u32,
        (size.y * pixels_per_point).round().max(1.0) as u32,
    ]
}

/// Camera input, then the GPU frame (resynthesis, capacity, dispatch, draw), then the
/// offscreen image shown in the panel.
pub fn show_canvas_panel(
    app: &mut App,
    ui: &mut egui::Ui,
    render_state: &egui_wgpu::RenderState,
) {
    let available = ui.available_size();
    let resized = app.viewport.resize(
        &render_state.device,
        physical_size(available, ui.ctx().pixels_per_point()),
    );

    let (rect, response) = ui.allocate_exact_size(available, egui::Sense::click_and_drag());
    if response.dragged_by(egui::PointerButton::Primary) {
        let delta = response.drag_delta();
        app.camera.orbit(delta.x, delta.y);
    }
    if response.hovered() {
        let scroll = ui.input(|i| i.smooth_scroll_delta.y);
        app.camera.zoom(scroll);
    }

    let time = app.clock.tick(app.settings.animate_time);
    app.height_field.synchronize(&app.registry, &mut app.console);
    app.height_field.render(
        &app.viewport,
        &app.registry,
        FrameInputs {
            settings: &app.settings,
            view_proj: app.camera.view_proj(app.viewport.aspect()),
            time,
        },
    );

    if resized || app.color_attachment.is_none() {
        let mut renderer = render_state.renderer.write();
        texture_bridge::sync_viewport_texture(app, render_state, &mut renderer);
    }

    if let Some(id) = app.color_attachment {
        ui.painter().image(
            id,
            rect,
            Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
            Color32::WHITE,
        );
    }
}
