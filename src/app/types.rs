use std::{path::PathBuf, time::Instant};

use eframe::egui;

use crate::{
    camera::OrbitCamera,
    console::Console,
    project::Project,
    registry::SymbolRegistry,
    renderer::{HeightField, Viewport},
    settings::Settings,
    ui::symbol_panel::SymbolEditor,
};

pub const INITIAL_VIEWPORT_SIZE: [u32; 2] = [960, 720];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SymbolTab {
    #[default]
    Functions,
    Constants,
    Sliders,
    Settings,
}

impl SymbolTab {
    pub const ALL: [SymbolTab; 4] = [
        SymbolTab::Functions,
        SymbolTab::Constants,
        SymbolTab::Sliders,
        SymbolTab::Settings,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Functions => "Functions",
            Self::Constants => "Constants",
            Self::Sliders => "Sliders",
            Self::Settings => "Settings",
        }
    }
}

/// Elapsed-time source for `TIME`. Freezes while animation is off.
#[derive(Debug, Clone)]
pub struct AnimationClock {
    start: Instant,
    last_raw_secs: f32,
    value_secs: f32,
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self {
            start: Instant::now(),
            last_raw_secs: 0.0,
            value_secs: 0.0,
        }
    }
}

impl AnimationClock {
    pub fn tick(&mut self, animate: bool) -> f32 {
        let raw = self.start.elapsed().as_secs_f32();
        self.advance(raw, animate)
    }

    fn advance(&mut self, raw_secs: f32, animate: bool) -> f32 {
        let delta = (raw_secs - self.last_raw_secs).max(0.0);
        self.last_raw_secs = raw_secs;
        if animate {
            self.value_secs += delta;
        }
        self.value_secs
    }

    pub fn value(&self) -> f32 {
        self.value_secs
    }
}

pub struct AppInit {
    pub project: Project,
    pub project_path: Option<PathBuf>,
    pub console: Console,
}

pub struct App {
    pub registry: SymbolRegistry,
    pub settings: Settings,
    pub console: Console,
    pub camera: OrbitCamera,
    pub clock: AnimationClock,
    pub height_field: HeightField,
    pub viewport: Viewport,
    pub color_attachment: Option<egui::TextureId>,
    pub project_path: Option<PathBuf>,
    pub tab: SymbolTab,
    pub symbol_editor: SymbolEditor,
}

impl App {
    pub fn from_init(init: AppInit, render_state: &eframe::egui_wgpu::RenderState) -> Self {
        let device = &render_state.device;
        Self {
            registry: init.project.registry,
            settings: init.project.settings,
            console: init.console,
            camera: OrbitCamera::default(),
            clock: AnimationClock::default(),
            height_field: HeightField::new(device, &render_state.queue),
            viewport: Viewport::new(device, INITIAL_VIEWPORT_SIZE),
            color_attachment: None,
            project_path: init.project_path,
            tab: SymbolTab::default(),
            symbol_editor: SymbolEditor::default(),
        }
    }

    /// Swap in a loaded project. The new registry carries a fresh revision, so the
    /// next frame resynthesizes.
    pub fn replace_project(&mut self, project: Project, path: Option<PathBuf>) {
        self.registry = project.registry;
        self.settings = project.settings;
        self.project_path = path;
        self.symbol_editor = SymbolEditor::default();
        self.height_field.mark_dirty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_freezes_while_animation_is_off() {
        let mut clock = AnimationClock::default();
        assert_eq!(clock.advance(1.0, true), 1.0);
        assert_eq!(clock.advance(3.0, false), 1.0);
        assert_eq!(clock.advance(3.5, true), 1.5);
        assert_eq!(clock.value(), 1.5);
    }
}
