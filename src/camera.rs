use glam::{Mat4, Vec3};

const ORBIT_SPEED: f32 = 0.008;
const ZOOM_SPEED: f32 = 0.0015;
const PITCH_LIMIT: f32 = core::f32::consts::FRAC_PI_2 - 0.017;

/// Orbit camera around the origin of the height field.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub fov_y: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            yaw: 0.8,
            pitch: 0.55,
            distance: 6.0,
            fov_y: 45f32.to_radians(),
            z_near: 0.01,
            z_far: 500.0,
            min_distance: 0.5,
            max_distance: 200.0,
        }
    }
}

impl OrbitCamera {
    /// Apply a pointer drag in logical pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * ORBIT_SPEED;
        self.pitch = (self.pitch + dy * ORBIT_SPEED).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Apply a scroll delta; positive scroll moves closer.
    pub fn zoom(&mut self, scroll: f32) {
        if scroll.abs() > 0.0 {
            let factor = (-scroll * ZOOM_SPEED).exp();
            self.distance = (self.distance * factor).clamp(self.min_distance, self.max_distance);
        }
    }

    pub fn eye(&self) -> Vec3 {
        Vec3::new(
            self.distance * self.yaw.cos() * self.pitch.cos(),
            self.distance * self.pitch.sin(),
            self.distance * self.yaw.sin() * self.pitch.cos(),
        )
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect.max(1e-3), self.z_near, self.z_far)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view()
    }
}
