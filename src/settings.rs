/// Largest accepted grid subdivision count per axis.
pub const MAX_DETAIL: u32 = 1024;
pub const DEFAULT_DETAIL: u32 = 64;
pub const DEFAULT_BOUNDS: f32 = 2.0;
pub const MIN_BOUNDS: f32 = 0.01;

/// Plane, color and render toggles. Persisted in the project file next to the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub background: [f32; 4],
    pub surface_color: [f32; 4],
    pub detail: u32,
    pub bounds: f32,
    pub wireframe: bool,
    pub grid_lines: bool,
    pub animate_time: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            background: [0.08, 0.08, 0.09, 1.0],
            surface_color: [0.35, 0.62, 0.86, 1.0],
            detail: DEFAULT_DETAIL,
            bounds: DEFAULT_BOUNDS,
            wireframe: false,
            grid_lines: true,
            animate_time: true,
        }
    }
}

impl Settings {
    /// Clamp `detail` into `[1, MAX_DETAIL]` and keep `bounds` positive and finite.
    pub fn sanitize(&mut self) {
        self.detail = clamp_detail(self.detail);
        self.bounds = clamp_bounds(self.bounds);
    }

    pub fn sample_count(&self) -> usize {
        sample_count(self.detail)
    }
}

pub fn clamp_detail(detail: u32) -> u32 {
    detail.clamp(1, MAX_DETAIL)
}

pub fn clamp_bounds(bounds: f32) -> f32 {
    if bounds.is_finite() {
        bounds.abs().max(MIN_BOUNDS)
    } else {
        DEFAULT_BOUNDS
    }
}

/// Height samples for a grid with `detail` subdivisions per axis.
pub fn sample_count(detail: u32) -> usize {
    let side = detail as usize + 1;
    side * side
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_clamps_detail_and_bounds() {
        let mut settings = Settings {
            detail: 0,
            bounds: f32::NAN,
            ..Settings::default()
        };
        settings.sanitize();
        assert_eq!(settings.detail, 1);
        assert_eq!(settings.bounds, DEFAULT_BOUNDS);

        settings.detail = MAX_DETAIL + 7;
        settings.bounds = -3.0;
        settings.sanitize();
        assert_eq!(settings.detail, MAX_DETAIL);
        assert_eq!(settings.bounds, 3.0);
    }

    #[test]
    fn sample_count_is_square_of_side() {
        assert_eq!(sample_count(1), 4);
        assert_eq!(sample_count(2), 9);
        assert_eq!(sample_count(64), 65 * 65);
    }
}
