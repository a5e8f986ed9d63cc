use eframe::{egui_wgpu, wgpu};

use super::types::App;

pub fn canvas_sampler_descriptor(filter: wgpu::FilterMode) -> wgpu::SamplerDescriptor<'static> {
    wgpu::SamplerDescriptor {
        label: Some("hf.canvas.sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: filter,
        min_filter: filter,
        ..Default::default()
    }
}

/// Point the canvas texture id at the viewport's current color view, registering it
/// on first use.
pub fn sync_viewport_texture(
    app: &mut App,
    render_state: &egui_wgpu::RenderState,
    renderer: &mut egui_wgpu::Renderer,
) {
    let view = app.viewport.color_view();
    let sampler = canvas_sampler_descriptor(wgpu::FilterMode::Linear);
    if let Some(id) = app.color_attachment {
        renderer.update_egui_texture_from_wgpu_texture_with_sampler_options(
            &render_state.device,
            view,
            sampler,
            id,
        );
    } else {
        app.color_attachment = Some(renderer.register_native_texture_with_sampler_options(
            &render_state.device,
            view,
            sampler,
        ));
    }
}
