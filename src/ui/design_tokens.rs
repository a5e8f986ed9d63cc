use eframe::egui::{self, Color32, FontFamily, FontId, RichText};

use crate::console::LogLevel;

pub const FONT_SIZE_11: f32 = 11.0;
pub const FONT_SIZE_12: f32 = 12.0;
pub const FONT_SIZE_13: f32 = 13.0;
pub const CONTROL_ROW_HEIGHT: f32 = 24.0;
pub const PANEL_BG: Color32 = Color32::from_rgb(0x17, 0x17, 0x17);
pub const ROW_ACTIVE_BG: Color32 = Color32::from_gray(40);

pub const LINE_THICKNESS_05: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextRole {
    SectionTitle,
    AttributeTitle,
    Code,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyleToken {
    pub size: f32,
    pub strong: bool,
    pub monospace: bool,
    pub color: Color32,
}

pub fn text_style(role: TextRole) -> TextStyleToken {
    match role {
        TextRole::SectionTitle => TextStyleToken {
            size: FONT_SIZE_13,
            strong: true,
            monospace: false,
            color: white(90),
        },
        TextRole::AttributeTitle => TextStyleToken {
            size: FONT_SIZE_11,
            strong: false,
            monospace: false,
            color: white(60),
        },
        TextRole::Code => TextStyleToken {
            size: FONT_SIZE_12,
            strong: false,
            monospace: true,
            color: white(80),
        },
    }
}

pub fn rich_text(text: impl Into<String>, role: TextRole) -> RichText {
    let style = text_style(role);
    let family = if style.monospace {
        FontFamily::Monospace
    } else {
        FontFamily::Proportional
    };
    let text = RichText::new(text)
        .font(FontId::new(style.size, family))
        .color(style.color);
    if style.strong { text.strong() } else { text }
}

/// Foreground color of a console entry.
pub fn log_level_fg(level: LogLevel) -> Color32 {
    match level {
        LogLevel::Info => Color32::from_gray(200),
        LogLevel::Warn => Color32::from_rgb(240, 200, 110),
        LogLevel::Error => Color32::from_rgb(255, 118, 118),
    }
}

pub fn white(step: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(255, 255, 255, alpha_from_step(step))
}

pub fn radius(px: u8) -> egui::CornerRadius {
    let canonical = (px.clamp(2, 24) / 2) * 2;
    egui::CornerRadius::same(canonical)
}

fn alpha_from_step(step: u8) -> u8 {
    let clamped = step.clamp(10, 100);
    let rounded = ((clamped as f32 / 10.0).round() * 10.0) as u8;
    ((rounded as f32 / 100.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_step_mapping_matches_expected_alpha() {
        assert_eq!(white(90).a(), 230);
        assert_eq!(white(10).a(), 26);
        assert_eq!(white(5).a(), 26);
        assert_eq!(white(100).a(), 255);
    }

    #[test]
    fn radius_is_even_and_clamped() {
        assert_eq!(radius(1), egui::CornerRadius::same(2));
        assert_eq!(radius(5), egui::CornerRadius::same(4));
        assert_eq!(radius(31), egui::CornerRadius::same(24));
    }

    #[test]
    fn error_entries_stand_out_from_info() {
        assert_ne!(log_level_fg(LogLevel::Error), log_level_fg(LogLevel::Info));
    }
}
