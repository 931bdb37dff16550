//! Coordinate transforms between the global frame and a bending-axis frame

use nalgebra::{Point2, Rotation2};

/// Local frame aligned with a bending axis at angle `theta`
///
/// `theta` is measured counter-clockwise from the global x-axis, in radians.
/// Local `u` runs along the bending axis and local `v` perpendicular to it:
///
/// ```text
/// u =  x * cos(theta) + y * sin(theta)
/// v = -x * sin(theta) + y * cos(theta)
/// ```
///
/// For a positive moment about the axis the compression side lies at
/// positive `v`.
#[derive(Debug, Clone, Copy)]
pub struct BendingAxes {
    theta: f64,
    /// Maps local (u, v) coordinates into global (x, y)
    rotation: Rotation2<f64>,
}

impl BendingAxes {
    pub fn new(theta: f64) -> Self {
        Self {
            theta,
            rotation: Rotation2::new(theta),
        }
    }

    /// Bending axis angle in radians
    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Map a global point into local `(u, v)` coordinates
    pub fn to_local(&self, point: &Point2<f64>) -> Point2<f64> {
        self.rotation.inverse_transform_point(point)
    }

    /// Map a local `(u, v)` point back into global coordinates
    pub fn to_global(&self, point: &Point2<f64>) -> Point2<f64> {
        self.rotation * point
    }

    /// Perpendicular offset of a global point from the bending axis through the origin
    pub fn v(&self, point: &Point2<f64>) -> f64 {
        self.to_local(point).y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_round_trip() {
        let axes = BendingAxes::new(0.7);
        let p = Point2::new(3.2, -1.4);
        let back = axes.to_global(&axes.to_local(&p));
        assert_relative_eq!(back.x, p.x, epsilon = 1e-14);
        assert_relative_eq!(back.y, p.y, epsilon = 1e-14);
    }

    #[test]
    fn test_axis_aligned_frames() {
        let p = Point2::new(1.0, 2.0);

        // theta = 0: u = x, v = y
        let axes = BendingAxes::new(0.0);
        let local = axes.to_local(&p);
        assert_relative_eq!(local.x, 1.0, epsilon = 1e-14);
        assert_relative_eq!(local.y, 2.0, epsilon = 1e-14);

        // theta = pi/2: u = y, v = -x
        let axes = BendingAxes::new(FRAC_PI_2);
        let local = axes.to_local(&p);
        assert_relative_eq!(local.x, 2.0, epsilon = 1e-14);
        assert_relative_eq!(local.y, -1.0, epsilon = 1e-14);
        assert_relative_eq!(axes.v(&p), -1.0, epsilon = 1e-14);
    }
}
