/// Orbiting camera state around a fixed target
use nalgebra::{Rotation3, Vector3};
use rast3d_core::{ProjectOptions, Vec2, Vec3};

/// Keeps the camera off the poles, where the view direction would be parallel to
/// world up and the screen axes undefined
const MAX_PITCH: f64 = 1.45;

/// Camera position as yaw and pitch (in radians) around a target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    pub target: Vec3,
    pub distance: f64,
    pub yaw: f64,
    pub pitch: f64,
}

impl Orbit {
    pub fn new(target: Vec3, distance: f64) -> Self {
        Self {
            target,
            distance,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dyaw: f64, dpitch: f64) {
        self.yaw = (self.yaw + dyaw) % std::f64::consts::TAU;
        self.pitch = (self.pitch + dpitch).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Where the camera sits
    pub fn eye(&self) -> Vec3 {
        let yaw = Rotation3::from_axis_angle(&Vector3::y_axis(), self.yaw);
        let pitch = Rotation3::from_axis_angle(&Vector3::z_axis(), self.pitch);
        self.target + yaw * (pitch * Vec3::x()) * self.distance
    }

    pub fn project_options(&self, fov: f64, screen_dim: Vec2) -> ProjectOptions {
        let eye = self.eye();
        ProjectOptions::new(eye, self.target - eye, fov, screen_dim)
    }
}

impl Default for Orbit {
    fn default() -> Self {
        Self::new(Vec3::zeros(), 6.0)
    }
}
