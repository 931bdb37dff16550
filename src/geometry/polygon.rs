//! Polygon primitives and exact area integrals
//!
//! All section integration reduces to closed-form integrals over polygons,
//! evaluated with Green's theorem over the boundary. No meshing or numeric
//! quadrature is involved, so clipped sub-polygons integrate exactly.

use nalgebra::{Point2, Rotation2, Vector2};
use serde::{Deserialize, Serialize};

use crate::error::{SectionError, SectionResult};

/// Relative tolerance for rejecting near-zero-area polygons at construction
const DEGENERATE_AREA_TOL: f64 = 1e-12;

/// Exact area integrals of a region in the frame it is expressed in
///
/// `qx` and `ixx` are the first and second moments about the x-axis
/// (integrals of y and y^2), `qy` and `iyy` the moments about the y-axis
/// (integrals of x and x^2), and `ixy` the product moment (integral of x*y).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PolygonIntegrals {
    pub area: f64,
    pub qx: f64,
    pub qy: f64,
    pub ixx: f64,
    pub iyy: f64,
    pub ixy: f64,
}

impl PolygonIntegrals {
    /// Integrals of an area concentrated at a single point
    pub fn point_area(x: f64, y: f64, area: f64) -> Self {
        Self {
            area,
            qx: area * y,
            qy: area * x,
            ixx: area * y * y,
            iyy: area * x * x,
            ixy: area * x * y,
        }
    }

    /// Centroid of the region; meaningful only when the area is non-zero
    pub fn centroid(&self) -> Point2<f64> {
        Point2::new(self.qy / self.area, self.qx / self.area)
    }

    /// Integrals scaled by a factor, such as an elastic modulus weighting
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            area: self.area * factor,
            qx: self.qx * factor,
            qy: self.qy * factor,
            ixx: self.ixx * factor,
            iyy: self.iyy * factor,
            ixy: self.ixy * factor,
        }
    }

    /// The same integrals taken about a shifted origin
    pub fn about(&self, origin: &Point2<f64>) -> Self {
        let dx = origin.x;
        let dy = origin.y;
        Self {
            area: self.area,
            qx: self.qx - self.area * dy,
            qy: self.qy - self.area * dx,
            ixx: self.ixx - 2.0 * dy * self.qx + self.area * dy * dy,
            iyy: self.iyy - 2.0 * dx * self.qy + self.area * dx * dx,
            ixy: self.ixy - dx * self.qx - dy * self.qy + self.area * dx * dy,
        }
    }
}

impl std::ops::AddAssign for PolygonIntegrals {
    fn add_assign(&mut self, rhs: Self) {
        self.area += rhs.area;
        self.qx += rhs.qx;
        self.qy += rhs.qy;
        self.ixx += rhs.ixx;
        self.iyy += rhs.iyy;
        self.ixy += rhs.ixy;
    }
}

/// Closed polygon stored counter-clockwise without a repeated end vertex
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self")]
pub struct Polygon {
    vertices: Vec<Point2<f64>>,
}

// The remote derive keeps the generated format but leaves the trait impls to
// us, so decoded polygons pass through the validating constructor.
impl Serialize for Polygon {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Self::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for Polygon {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = Self::deserialize(deserializer)?;
        Polygon::new(raw.vertices).map_err(serde::de::Error::custom)
    }
}

impl Polygon {
    /// Build a polygon from its boundary vertices
    ///
    /// Vertices may be supplied in either winding order; they are normalised
    /// to counter-clockwise. Fails on fewer than three vertices, non-finite
    /// coordinates, near-zero area or a self-intersecting boundary.
    pub fn new(vertices: Vec<Point2<f64>>) -> SectionResult<Self> {
        if vertices.len() < 3 {
            return Err(SectionError::InvalidGeometry(format!(
                "polygon needs at least 3 vertices, got {}",
                vertices.len()
            )));
        }
        if vertices.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(SectionError::InvalidGeometry(
                "polygon vertices must have finite coordinates".to_string(),
            ));
        }

        let mut polygon = Self { vertices };
        let area = polygon.signed_area();
        if area.abs() <= DEGENERATE_AREA_TOL * polygon.extent_squared().max(1.0) {
            return Err(SectionError::InvalidGeometry(
                "polygon has zero or near-zero area".to_string(),
            ));
        }
        if area < 0.0 {
            polygon.vertices.reverse();
        }
        if polygon.self_intersects() {
            return Err(SectionError::InvalidGeometry(
                "polygon boundary is self-intersecting".to_string(),
            ));
        }
        Ok(polygon)
    }

    /// Axis-aligned rectangle with its bottom-left corner at the origin
    pub fn rectangle(width: f64, depth: f64) -> SectionResult<Self> {
        Self::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(width, 0.0),
            Point2::new(width, depth),
            Point2::new(0.0, depth),
        ])
    }

    /// Regular polygon approximation of a circle centred on the origin
    pub fn circle(diameter: f64, segments: usize) -> SectionResult<Self> {
        if segments < 3 {
            return Err(SectionError::InvalidGeometry(format!(
                "circle needs at least 3 segments, got {}",
                segments
            )));
        }
        let r = 0.5 * diameter;
        let vertices = (0..segments)
            .map(|i| {
                let angle = 2.0 * std::f64::consts::PI * i as f64 / segments as f64;
                Point2::new(r * angle.cos(), r * angle.sin())
            })
            .collect();
        Self::new(vertices)
    }

    pub fn vertices(&self) -> &[Point2<f64>] {
        &self.vertices
    }

    /// Enclosed area; always positive for a validated polygon
    pub fn area(&self) -> f64 {
        self.signed_area()
    }

    pub fn centroid(&self) -> Point2<f64> {
        self.integrals().centroid()
    }

    /// All six area integrals in a single boundary pass
    pub fn integrals(&self) -> PolygonIntegrals {
        let mut area = 0.0;
        let mut qx = 0.0;
        let mut qy = 0.0;
        let mut ixx = 0.0;
        let mut iyy = 0.0;
        let mut ixy = 0.0;

        let n = self.vertices.len();
        for i in 0..n {
            let p0 = self.vertices[i];
            let p1 = self.vertices[(i + 1) % n];
            let cross = p0.x * p1.y - p1.x * p0.y;
            area += cross;
            qy += (p0.x + p1.x) * cross;
            qx += (p0.y + p1.y) * cross;
            iyy += (p0.x * p0.x + p0.x * p1.x + p1.x * p1.x) * cross;
            ixx += (p0.y * p0.y + p0.y * p1.y + p1.y * p1.y) * cross;
            ixy += (p0.x * p1.y + 2.0 * p0.x * p0.y + 2.0 * p1.x * p1.y + p1.x * p0.y) * cross;
        }

        PolygonIntegrals {
            area: 0.5 * area,
            qx: qx / 6.0,
            qy: qy / 6.0,
            ixx: ixx / 12.0,
            iyy: iyy / 12.0,
            ixy: ixy / 24.0,
        }
    }

    /// Bounding box as (min corner, max corner)
    pub fn bounds(&self) -> (Point2<f64>, Point2<f64>) {
        let mut min = self.vertices[0];
        let mut max = self.vertices[0];
        for p in &self.vertices[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        (min, max)
    }

    /// Rotate about the origin by `theta` radians counter-clockwise
    pub fn rotated(&self, theta: f64) -> Polygon {
        let rotation = Rotation2::new(theta);
        Polygon {
            vertices: self.vertices.iter().map(|p| rotation * p).collect(),
        }
    }

    /// Translate by an offset vector
    pub fn translated(&self, offset: &Vector2<f64>) -> Polygon {
        Polygon {
            vertices: self.vertices.iter().map(|p| p + offset).collect(),
        }
    }

    /// Clip against the half-plane `normal . p >= offset` (Sutherland-Hodgman)
    ///
    /// Returns `None` when nothing of substance remains on the kept side.
    pub fn clip_half_plane(&self, normal: &Vector2<f64>, offset: f64) -> Option<Polygon> {
        let n = self.vertices.len();
        let mut out: Vec<Point2<f64>> = Vec::with_capacity(n + 4);
        for i in 0..n {
            let cur = self.vertices[i];
            let nxt = self.vertices[(i + 1) % n];
            let dc = normal.x * cur.x + normal.y * cur.y - offset;
            let dn = normal.x * nxt.x + normal.y * nxt.y - offset;
            if dc >= 0.0 {
                out.push(cur);
            }
            if (dc > 0.0 && dn < 0.0) || (dc < 0.0 && dn > 0.0) {
                let t = dc / (dc - dn);
                out.push(cur + (nxt - cur) * t);
            }
        }
        Self::from_clip_output(out)
    }

    /// Keep the part of the polygon with `y >= y0`
    pub fn clip_above(&self, y0: f64) -> Option<Polygon> {
        self.clip_half_plane(&Vector2::new(0.0, 1.0), y0)
    }

    /// Keep the part of the polygon with `y <= y1`
    pub fn clip_below(&self, y1: f64) -> Option<Polygon> {
        self.clip_half_plane(&Vector2::new(0.0, -1.0), -y1)
    }

    /// Accept clipper output, discarding empty or sliver results
    ///
    /// Clipping a valid counter-clockwise polygon with a half-plane preserves
    /// winding and cannot introduce crossings, so full validation is skipped.
    fn from_clip_output(vertices: Vec<Point2<f64>>) -> Option<Polygon> {
        if vertices.len() < 3 {
            return None;
        }
        let polygon = Polygon { vertices };
        if polygon.signed_area() <= f64::EPSILON * polygon.extent_squared().max(1.0) {
            return None;
        }
        Some(polygon)
    }

    fn signed_area(&self) -> f64 {
        let n = self.vertices.len();
        let mut sum = 0.0;
        for i in 0..n {
            let p0 = self.vertices[i];
            let p1 = self.vertices[(i + 1) % n];
            sum += p0.x * p1.y - p1.x * p0.y;
        }
        0.5 * sum
    }

    /// Squared diagonal of the bounding box, used to scale area tolerances
    fn extent_squared(&self) -> f64 {
        let (min, max) = self.bounds();
        let w = max.x - min.x;
        let h = max.y - min.y;
        w * w + h * h
    }

    fn self_intersects(&self) -> bool {
        let n = self.vertices.len();
        for i in 0..n {
            let a0 = self.vertices[i];
            let a1 = self.vertices[(i + 1) % n];
            for j in (i + 2)..n {
                // Edges sharing a vertex cannot properly cross
                if i == 0 && j == n - 1 {
                    continue;
                }
                let b0 = self.vertices[j];
                let b1 = self.vertices[(j + 1) % n];
                if segments_cross(&a0, &a1, &b0, &b1) {
                    return true;
                }
            }
        }
        false
    }
}

fn orientation(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// True when the open segments (p0, p1) and (q0, q1) properly cross
fn segments_cross(p0: &Point2<f64>, p1: &Point2<f64>, q0: &Point2<f64>, q1: &Point2<f64>) -> bool {
    let d1 = orientation(p0, p1, q0);
    let d2 = orientation(p0, p1, q1);
    let d3 = orientation(q0, q1, p0);
    let d4 = orientation(q0, q1, p1);
    d1 * d2 < 0.0 && d3 * d4 < 0.0
}
