//! Composite cross-section model
//!
//! A [`Section`] is a collection of matrix regions (continuous polygonal
//! areas of a parent material) and inclusions (discrete areas lumped at a
//! point, such as reinforcement bars). Axial force and the compressive side
//! of strain are positive; `mx` positive compresses the positive-y edge and
//! `my` positive the positive-x edge.

use nalgebra::{Point2, Vector2};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::analysis::{self, AnalysisOptions};
use crate::error::{SectionError, SectionResult};
use crate::geometry::{Inclusion, MatrixRegion, PolygonIntegrals};
use crate::results::{
    BiaxialBendingResults, CrackedResults, MomentCurvatureResults, MomentInteractionResults,
    StressResult, UltimateResults,
};

/// Modulus-weighted elastic properties of the uncracked section
///
/// Global-frame values carry the `_g` suffix, values about the elastic
/// centroid the `_c` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrossProperties {
    /// Total cross-sectional area
    pub total_area: f64,
    /// Mass per unit length of member
    pub mass: f64,
    /// Axial rigidity (modulus-weighted area)
    pub e_a: f64,
    /// Modulus-weighted first moments in the global frame
    pub e_qx: f64,
    pub e_qy: f64,
    /// Elastic centroid
    pub cx: f64,
    pub cy: f64,
    /// Modulus-weighted second moments in the global frame
    pub e_ixx_g: f64,
    pub e_iyy_g: f64,
    pub e_ixy_g: f64,
    /// Modulus-weighted second moments about the elastic centroid
    pub e_ixx_c: f64,
    pub e_iyy_c: f64,
    pub e_ixy_c: f64,
    /// Principal modulus-weighted second moments
    pub e_i11: f64,
    pub e_i22: f64,
    /// Angle of the major principal axis, radians in (-pi/2, pi/2]
    pub phi: f64,
    /// Modulus-weighted section moduli about the centroidal axes
    pub e_zxx_plus: f64,
    pub e_zxx_minus: f64,
    pub e_zyy_plus: f64,
    pub e_zyy_minus: f64,
    /// Axial capacity in pure compression (positive)
    pub squash_load: f64,
    /// Axial capacity in pure tension (negative or zero)
    pub tensile_load: f64,
    /// Governing compressive ultimate strain over the matrix materials
    pub ultimate_strain: f64,
}

impl GrossProperties {
    pub fn centroid(&self) -> Point2<f64> {
        Point2::new(self.cx, self.cy)
    }

    /// Modulus-weighted second moment about a centroidal axis at angle `theta`
    pub fn e_iuu(&self, theta: f64) -> f64 {
        let half_sum = 0.5 * (self.e_ixx_c + self.e_iyy_c);
        let half_diff = 0.5 * (self.e_ixx_c - self.e_iyy_c);
        half_sum + half_diff * (2.0 * theta).cos() - self.e_ixy_c * (2.0 * theta).sin()
    }
}

/// Gross properties expressed as equivalent areas of a reference material
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformedProperties {
    /// Reference modulus the transformation divides by
    pub e_ref: f64,
    pub area: f64,
    pub qx: f64,
    pub qy: f64,
    pub ixx_g: f64,
    pub iyy_g: f64,
    pub ixy_g: f64,
    pub ixx_c: f64,
    pub iyy_c: f64,
    pub ixy_c: f64,
    pub i11: f64,
    pub i22: f64,
    pub zxx_plus: f64,
    pub zxx_minus: f64,
    pub zyy_plus: f64,
    pub zyy_minus: f64,
}

/// Composite cross-section: matrix regions plus discrete inclusions
#[derive(Debug, Clone)]
pub struct Section {
    matrix_regions: Vec<MatrixRegion>,
    inclusions: Vec<Inclusion>,
    gross: OnceCell<GrossProperties>,
}

impl Section {
    /// Create a section from matrix regions and inclusions
    ///
    /// At least one matrix region is required; the governing ultimate strain
    /// and the crack model are defined by the matrix.
    pub fn new(
        matrix_regions: Vec<MatrixRegion>,
        inclusions: Vec<Inclusion>,
    ) -> SectionResult<Self> {
        if matrix_regions.is_empty() {
            return Err(SectionError::InvalidGeometry(
                "section needs at least one matrix region".to_string(),
            ));
        }
        Ok(Self {
            matrix_regions,
            inclusions,
            gross: OnceCell::new(),
        })
    }

    pub fn matrix_regions(&self) -> &[MatrixRegion] {
        &self.matrix_regions
    }

    pub fn inclusions(&self) -> &[Inclusion] {
        &self.inclusions
    }

    // ========================
    // Elastic Properties
    // ========================

    /// Gross section properties, computed once and cached
    pub fn gross_properties(&self) -> &GrossProperties {
        self.gross.get_or_init(|| self.compute_gross_properties())
    }

    /// Gross properties transformed into equivalent areas of a reference modulus
    pub fn transformed_properties(&self, e_ref: f64) -> SectionResult<TransformedProperties> {
        if !e_ref.is_finite() || e_ref <= 0.0 {
            return Err(SectionError::InvalidInput(format!(
                "reference modulus must be positive, got {}",
                e_ref
            )));
        }
        let gp = self.gross_properties();
        Ok(TransformedProperties {
            e_ref,
            area: gp.e_a / e_ref,
            qx: gp.e_qx / e_ref,
            qy: gp.e_qy / e_ref,
            ixx_g: gp.e_ixx_g / e_ref,
            iyy_g: gp.e_iyy_g / e_ref,
            ixy_g: gp.e_ixy_g / e_ref,
            ixx_c: gp.e_ixx_c / e_ref,
            iyy_c: gp.e_iyy_c / e_ref,
            ixy_c: gp.e_ixy_c / e_ref,
            i11: gp.e_i11 / e_ref,
            i22: gp.e_i22 / e_ref,
            zxx_plus: gp.e_zxx_plus / e_ref,
            zxx_minus: gp.e_zxx_minus / e_ref,
            zyy_plus: gp.e_zyy_plus / e_ref,
            zyy_minus: gp.e_zyy_minus / e_ref,
        })
    }

    /// Axial capacity in pure compression
    pub fn squash_load(&self) -> f64 {
        self.gross_properties().squash_load
    }

    /// Axial capacity in pure tension (negative)
    pub fn tensile_load(&self) -> f64 {
        self.gross_properties().tensile_load
    }

    fn compute_gross_properties(&self) -> GrossProperties {
        let mut total_area = 0.0;
        let mut mass = 0.0;
        let mut e_ints = PolygonIntegrals::default();
        let mut squash_load = 0.0;
        let mut tensile_load = 0.0;
        let mut ultimate_strain = f64::INFINITY;

        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;

        for region in &self.matrix_regions {
            let material = region.material();
            let ints = region.integrals();
            total_area += ints.area;
            mass += material.density * ints.area;
            e_ints += ints.scaled(material.elastic_modulus());
            squash_load += ints.area
                * material.squash_factor
                * material.ultimate_law.max_compressive_stress();
            tensile_load -= ints.area * material.ultimate_law.max_tensile_stress();
            ultimate_strain = ultimate_strain.min(material.ultimate_strain());

            let (min, max) = region.polygon().bounds();
            x_min = x_min.min(min.x);
            x_max = x_max.max(max.x);
            y_min = y_min.min(min.y);
            y_max = y_max.max(max.y);
        }

        for inclusion in &self.inclusions {
            let material = inclusion.material();
            let ints = inclusion.integrals();
            total_area += ints.area;
            mass += material.density * ints.area;
            e_ints += ints.scaled(material.elastic_modulus());
            squash_load += ints.area * material.ultimate_law.max_compressive_stress();
            tensile_load -= ints.area * material.ultimate_law.max_tensile_stress();

            let p = inclusion.position();
            x_min = x_min.min(p.x);
            x_max = x_max.max(p.x);
            y_min = y_min.min(p.y);
            y_max = y_max.max(p.y);
        }

        let e_a = e_ints.area;
        let cx = e_ints.qy / e_a;
        let cy = e_ints.qx / e_a;
        let centroidal = e_ints.about(&Point2::new(cx, cy));

        let half_sum = 0.5 * (centroidal.ixx + centroidal.iyy);
        let half_diff = 0.5 * (centroidal.ixx - centroidal.iyy);
        let radius = (half_diff * half_diff + centroidal.ixy * centroidal.ixy).sqrt();
        let e_i11 = half_sum + radius;
        let e_i22 = half_sum - radius;
        // Mohr half-angle form; reports the major axis in (-pi/2, pi/2]
        let phi = 0.5 * f64::atan2(-2.0 * centroidal.ixy, centroidal.ixx - centroidal.iyy);

        GrossProperties {
            total_area,
            mass,
            e_a,
            e_qx: e_ints.qx,
            e_qy: e_ints.qy,
            cx,
            cy,
            e_ixx_g: e_ints.ixx,
            e_iyy_g: e_ints.iyy,
            e_ixy_g: e_ints.ixy,
            e_ixx_c: centroidal.ixx,
            e_iyy_c: centroidal.iyy,
            e_ixy_c: centroidal.ixy,
            e_i11,
            e_i22,
            phi,
            e_zxx_plus: centroidal.ixx / (y_max - cy),
            e_zxx_minus: centroidal.ixx / (cy - y_min),
            e_zyy_plus: centroidal.iyy / (x_max - cx),
            e_zyy_minus: centroidal.iyy / (cx - x_min),
            squash_load,
            tensile_load,
            ultimate_strain,
        }
    }

    // ========================
    // Geometry Operations
    // ========================

    /// The section rotated about the global origin by `theta` radians
    pub fn rotated(&self, theta: f64) -> Section {
        Section {
            matrix_regions: self.matrix_regions.iter().map(|r| r.rotated(theta)).collect(),
            inclusions: self.inclusions.iter().map(|i| i.rotated(theta)).collect(),
            gross: OnceCell::new(),
        }
    }

    /// The section translated by `(dx, dy)`
    pub fn translated(&self, dx: f64, dy: f64) -> Section {
        let offset = Vector2::new(dx, dy);
        Section {
            matrix_regions: self
                .matrix_regions
                .iter()
                .map(|r| r.translated(&offset))
                .collect(),
            inclusions: self.inclusions.iter().map(|i| i.translated(&offset)).collect(),
            gross: OnceCell::new(),
        }
    }

    // ========================
    // Analysis Entry Points
    // ========================

    /// Elastic stress state of the uncracked section under `n`, `mx`, `my`
    pub fn uncracked_stress(&self, n: f64, mx: f64, my: f64) -> SectionResult<StressResult> {
        analysis::uncracked::uncracked_stress(self, n, mx, my)
    }

    /// Cracked section properties for a bending axis at `theta`
    pub fn cracked_properties(
        &self,
        theta: f64,
        options: &AnalysisOptions,
    ) -> SectionResult<CrackedResults> {
        analysis::cracked::cracked_properties(self, theta, options)
    }

    /// Service stress state of the cracked section under `n` and `m`
    ///
    /// `m` must be positive; bend the other way by rotating the axis angle
    /// half a turn. `cracked` must come from this section at the same angle.
    pub fn cracked_stress(
        &self,
        cracked: &CrackedResults,
        n: f64,
        m: f64,
        options: &AnalysisOptions,
    ) -> SectionResult<StressResult> {
        analysis::cracked::cracked_stress(self, cracked, n, m, options)
    }

    /// Ultimate bending capacity about the axis at `theta` under axial force `n`
    pub fn ultimate_capacity(
        &self,
        theta: f64,
        n: f64,
        options: &AnalysisOptions,
    ) -> SectionResult<UltimateResults> {
        analysis::ultimate::ultimate_capacity(self, theta, n, options)
    }

    /// Stress state at a previously solved ultimate capacity
    pub fn ultimate_stress(&self, ultimate: &UltimateResults) -> SectionResult<StressResult> {
        analysis::ultimate::ultimate_stress(self, ultimate)
    }

    /// Moment-curvature response about the axis at `theta` under constant `n`
    pub fn moment_curvature(
        &self,
        theta: f64,
        n: f64,
        options: &AnalysisOptions,
    ) -> SectionResult<MomentCurvatureResults> {
        analysis::curvature::moment_curvature(self, theta, n, options)
    }

    /// Axial force versus moment capacity diagram for the axis at `theta`
    pub fn moment_interaction(
        &self,
        theta: f64,
        n_points: usize,
    ) -> SectionResult<MomentInteractionResults> {
        analysis::diagrams::moment_interaction(self, theta, n_points)
    }

    /// Moment capacity components over a full sweep of axis angles at constant `n`
    pub fn biaxial_bending(
        &self,
        n: f64,
        n_points: usize,
        options: &AnalysisOptions,
    ) -> SectionResult<BiaxialBendingResults> {
        analysis::diagrams::biaxial_bending(self, n, n_points, options)
    }
}
