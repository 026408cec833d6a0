//! Time-parameterized rigid motions for animated objects

use std::time::Duration;

use super::mat4::Mat4;

/// Angular phase for a repeating animation: `2π * (elapsed mod period) / period`.
///
/// Computed from the absolute elapsed time so repeated calls never drift,
/// no matter how long the loop has been running.
pub fn phase(elapsed: Duration, period: Duration) -> f64 {
    let period_s = period.as_secs_f64();
    let pos = elapsed.as_secs_f64() % period_s;
    std::f64::consts::TAU * pos / period_s
}

/// How an object moves over time. Positions are functions of elapsed time
/// only; there is no per-frame integration state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// Fixed placement.
    Stationary { translation: [f32; 3] },

    /// Orbit in the xz-plane at a fixed height:
    /// `(cos θ * r, height, sin θ * r + center_z)`.
    CircularOrbit {
        period: Duration,
        radius: f32,
        height: f32,
        center_z: f32,
    },

    /// Orbit in the xy-plane at a fixed depth:
    /// `(cos θ * rx, sin θ * ry, center_z)`.
    EllipticalOrbit {
        period: Duration,
        radius_x: f32,
        radius_y: f32,
        center_z: f32,
    },
}

impl Motion {
    /// Position at the given elapsed time.
    pub fn position(&self, elapsed: Duration) -> [f32; 3] {
        match *self {
            Motion::Stationary { translation } => translation,
            Motion::CircularOrbit {
                period,
                radius,
                height,
                center_z,
            } => {
                let theta = phase(elapsed, period);
                [
                    (theta.cos() * radius as f64) as f32,
                    height,
                    (theta.sin() * radius as f64) as f32 + center_z,
                ]
            }
            Motion::EllipticalOrbit {
                period,
                radius_x,
                radius_y,
                center_z,
            } => {
                let theta = phase(elapsed, period);
                [
                    (theta.cos() * radius_x as f64) as f32,
                    (theta.sin() * radius_y as f64) as f32,
                    center_z,
                ]
            }
        }
    }

    /// Model matrix placing the object at [`position`](Self::position).
    pub fn model_matrix(&self, elapsed: Duration) -> Mat4 {
        let [x, y, z] = self.position(elapsed);
        Mat4::translation(x, y, z)
    }
}
