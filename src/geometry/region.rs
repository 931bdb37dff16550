//! Section regions: matrix polygons and discrete inclusions

use std::sync::Arc;

use nalgebra::{Point2, Vector2};

use crate::error::{SectionError, SectionResult};
use crate::geometry::polygon::{Polygon, PolygonIntegrals};
use crate::material::Material;

/// Continuous polygonal area of matrix material
///
/// Matrix regions carry compression in every analysis and tension only while
/// uncracked. Materials are shared between regions through `Arc`.
#[derive(Debug, Clone)]
pub struct MatrixRegion {
    polygon: Polygon,
    material: Arc<Material>,
}

impl MatrixRegion {
    pub fn new(polygon: Polygon, material: Arc<Material>) -> Self {
        Self { polygon, material }
    }

    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn area(&self) -> f64 {
        self.polygon.area()
    }

    pub fn centroid(&self) -> Point2<f64> {
        self.polygon.centroid()
    }

    pub fn integrals(&self) -> PolygonIntegrals {
        self.polygon.integrals()
    }

    /// Rotate about the global origin
    pub fn rotated(&self, theta: f64) -> MatrixRegion {
        MatrixRegion {
            polygon: self.polygon.rotated(theta),
            material: Arc::clone(&self.material),
        }
    }

    pub fn translated(&self, offset: &Vector2<f64>) -> MatrixRegion {
        MatrixRegion {
            polygon: self.polygon.translated(offset),
            material: Arc::clone(&self.material),
        }
    }
}

/// Discrete reinforcement area lumped at a point
///
/// An inclusion has no extent of its own: the strain at its centroid acts
/// over its whole area. It participates in every analysis regardless of the
/// crack state.
#[derive(Debug, Clone)]
pub struct Inclusion {
    position: Point2<f64>,
    area: f64,
    material: Arc<Material>,
}

impl Inclusion {
    pub fn new(x: f64, y: f64, area: f64, material: Arc<Material>) -> SectionResult<Self> {
        if !x.is_finite() || !y.is_finite() {
            return Err(SectionError::InvalidGeometry(format!(
                "inclusion position must be finite, got ({}, {})",
                x, y
            )));
        }
        if !area.is_finite() || area <= 0.0 {
            return Err(SectionError::InvalidGeometry(format!(
                "inclusion area must be positive, got {}",
                area
            )));
        }
        Ok(Self {
            position: Point2::new(x, y),
            area,
            material,
        })
    }

    pub fn position(&self) -> Point2<f64> {
        self.position
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn integrals(&self) -> PolygonIntegrals {
        PolygonIntegrals::point_area(self.position.x, self.position.y, self.area)
    }

    /// Rotate about the global origin
    pub fn rotated(&self, theta: f64) -> Inclusion {
        let rotated = nalgebra::Rotation2::new(theta) * self.position;
        Inclusion {
            position: rotated,
            area: self.area,
            material: Arc::clone(&self.material),
        }
    }

    pub fn translated(&self, offset: &Vector2<f64>) -> Inclusion {
        Inclusion {
            position: self.position + offset,
            area: self.area,
            material: Arc::clone(&self.material),
        }
    }
}
