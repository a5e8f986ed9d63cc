pub mod components;
pub mod design_tokens;
pub mod log_panel;
pub mod settings_panel;
pub mod symbol_panel;
