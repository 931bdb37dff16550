//! Analysis drivers and shared integration machinery
//!
//! Every nonlinear analysis in this crate reduces to the same computation:
//! impose a linear strain field over a bending-axis frame, evaluate each
//! material's stress-strain law over it, and integrate the stress field
//! exactly. The integrator below slices each matrix polygon at the field
//! levels where a law changes slope, so that the stress is affine within
//! every slab and closed-form polygon integrals apply. Root-finding drives
//! the field parameters until the section is in equilibrium.

pub mod cracked;
pub mod curvature;
pub mod diagrams;
pub mod ultimate;
pub mod uncracked;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::geometry::{Inclusion, MatrixRegion, Polygon};
use crate::material::Material;
use crate::results::ForcePoint;
use crate::section::Section;
use crate::transform::BendingAxes;

/// Options controlling the iterative analyses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Iteration cap for equilibrium root-finding
    pub max_iterations: usize,
    /// Absolute force tolerance for cracked equilibrium, in load units
    pub axial_tolerance: f64,
    /// Absolute force tolerance for ultimate equilibrium, in load units
    pub ultimate_axial_tolerance: f64,
    /// Neutral axis depth tolerance, relative to the section depth
    pub depth_tolerance: f64,
    /// Curvature step for moment-curvature sweeps
    pub curvature_increment: f64,
    /// Step cap for moment-curvature sweeps
    pub max_curvature_steps: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            max_iterations: 128,
            axial_tolerance: 5e-9,
            ultimate_axial_tolerance: 1e-4,
            depth_tolerance: 1e-12,
            curvature_increment: 1e-7,
            max_curvature_steps: 500,
        }
    }
}

impl AnalysisOptions {
    /// Set the iteration cap for root-finding
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the cracked equilibrium force tolerance
    pub fn with_axial_tolerance(mut self, tolerance: f64) -> Self {
        self.axial_tolerance = tolerance;
        self
    }

    /// Set the ultimate equilibrium force tolerance
    pub fn with_ultimate_axial_tolerance(mut self, tolerance: f64) -> Self {
        self.ultimate_axial_tolerance = tolerance;
        self
    }

    /// Set the relative neutral axis depth tolerance
    pub fn with_depth_tolerance(mut self, tolerance: f64) -> Self {
        self.depth_tolerance = tolerance;
        self
    }

    /// Set the curvature step for moment-curvature sweeps
    pub fn with_curvature_increment(mut self, increment: f64) -> Self {
        self.curvature_increment = increment;
        self
    }

    /// Set the step cap for moment-curvature sweeps
    pub fn with_max_curvature_steps(mut self, steps: usize) -> Self {
        self.max_curvature_steps = steps;
        self
    }
}

/// Linear strain field over a bending frame: `strain = kappa * (v - v_na)`
///
/// `v_na` is the neutral axis offset perpendicular to the bending axis and
/// `kappa` the curvature. Positive curvature compresses positive `v`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct StrainField {
    pub kappa: f64,
    pub v_na: f64,
}

impl StrainField {
    pub fn strain_at(&self, v: f64) -> f64 {
        self.kappa * (v - self.v_na)
    }
}

/// Which stress-strain behaviour an integration pass evaluates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LawRegime {
    /// Linearised service behaviour: `stress = E * strain`
    ServiceLinear,
    /// Full service law, used by moment-curvature analysis
    ServiceFull,
    /// Ultimate law
    Ultimate,
}

impl LawRegime {
    fn stress(self, material: &Material, strain: f64) -> f64 {
        match self {
            Self::ServiceLinear => material.elastic_modulus() * strain,
            Self::ServiceFull => material.service_law.stress(strain),
            Self::Ultimate => material.ultimate_law.stress(strain),
        }
    }

    fn tangent(self, material: &Material, strain: f64) -> f64 {
        match self {
            Self::ServiceLinear => material.elastic_modulus(),
            Self::ServiceFull => material.service_law.tangent_modulus(strain),
            Self::Ultimate => material.ultimate_law.tangent_modulus(strain),
        }
    }

    fn breakpoints(self, material: &Material) -> Vec<f64> {
        match self {
            Self::ServiceLinear => Vec::new(),
            Self::ServiceFull => material.service_law.breakpoints(),
            Self::Ultimate => material.ultimate_law.breakpoints(),
        }
    }
}

/// Matrix region with its polygon expressed in a bending-axis frame
pub(crate) struct LocalMatrixRegion<'a> {
    pub polygon: Polygon,
    pub region: &'a MatrixRegion,
}

/// Inclusion with its centroid expressed in a bending-axis frame
pub(crate) struct LocalInclusion<'a> {
    pub position: Point2<f64>,
    pub inclusion: &'a Inclusion,
}

/// Section geometry resolved into a bending-axis frame
///
/// Built once per analysis; all root-find evaluations work against it.
pub(crate) struct LocalSection<'a> {
    pub axes: BendingAxes,
    pub matrix: Vec<LocalMatrixRegion<'a>>,
    pub inclusions: Vec<LocalInclusion<'a>>,
    /// Extreme fiber offsets perpendicular to the bending axis
    pub v_min: f64,
    pub v_max: f64,
}

impl<'a> LocalSection<'a> {
    pub fn resolve(section: &'a Section, theta: f64) -> Self {
        let axes = BendingAxes::new(theta);
        let mut v_min = f64::INFINITY;
        let mut v_max = f64::NEG_INFINITY;

        let matrix: Vec<LocalMatrixRegion<'a>> = section
            .matrix_regions()
            .iter()
            .map(|region| {
                let polygon = region.polygon().rotated(-theta);
                for p in polygon.vertices() {
                    v_min = v_min.min(p.y);
                    v_max = v_max.max(p.y);
                }
                LocalMatrixRegion { polygon, region }
            })
            .collect();

        let inclusions: Vec<LocalInclusion<'a>> = section
            .inclusions()
            .iter()
            .map(|inclusion| {
                let position = axes.to_local(&inclusion.position());
                v_min = v_min.min(position.y);
                v_max = v_max.max(position.y);
                LocalInclusion {
                    position,
                    inclusion,
                }
            })
            .collect();

        Self {
            axes,
            matrix,
            inclusions,
            v_min,
            v_max,
        }
    }

    /// Overall depth perpendicular to the bending axis
    pub fn depth(&self) -> f64 {
        self.v_max - self.v_min
    }

    /// Offset of a global point from the bending axis
    pub fn v_of(&self, point: &Point2<f64>) -> f64 {
        self.axes.v(point)
    }
}

/// Integrated stress state of the whole section under one strain field
pub(crate) struct SectionState {
    pub matrix_forces: Vec<ForcePoint>,
    pub inclusion_forces: Vec<ForcePoint>,
    /// Net axial force
    pub force: f64,
    /// Net moment about the bending axis through the reference point
    pub moment: f64,
    /// Net moment about the perpendicular axis through the reference point
    pub moment_cross: f64,
}

/// Integrate the stress field over the whole section
///
/// Matrix polygons are cut into horizontal slabs at every level where the
/// governing law changes slope, making the integration exact. When
/// `exclude_matrix_tension` is set, the tension side of each matrix polygon
/// is clipped away before integration; inclusions always participate.
/// Moments are taken about `reference`, a point in the bending-axis frame.
pub(crate) fn integrate_state(
    local: &LocalSection,
    field: &StrainField,
    regime: LawRegime,
    exclude_matrix_tension: bool,
    reference: Point2<f64>,
) -> SectionState {
    let mut matrix_forces = Vec::with_capacity(local.matrix.len());
    let mut inclusion_forces = Vec::with_capacity(local.inclusions.len());
    let mut force = 0.0;
    let mut moment = 0.0;
    let mut moment_cross = 0.0;

    for lm in &local.matrix {
        let (entry, cross) =
            integrate_matrix_region(local, lm, field, regime, exclude_matrix_tension, reference);
        force += entry.force;
        moment += entry.moment;
        moment_cross += cross;
        matrix_forces.push(entry);
    }

    for li in &local.inclusions {
        let strain = field.strain_at(li.position.y);
        let stress = regime.stress(li.inclusion.material(), strain);
        let bar_force = stress * li.inclusion.area();
        let bar_moment = bar_force * (li.position.y - reference.y);
        let global = local.axes.to_global(&li.position);
        force += bar_force;
        moment += bar_moment;
        moment_cross += bar_force * (li.position.x - reference.x);
        inclusion_forces.push(ForcePoint {
            force: bar_force,
            x: global.x,
            y: global.y,
            moment: bar_moment,
            stress,
            strain,
        });
    }

    SectionState {
        matrix_forces,
        inclusion_forces,
        force,
        moment,
        moment_cross,
    }
}

/// Integrate one matrix region slab by slab
///
/// Returns the region's force entry together with its exact cross-axis
/// moment, which the entry alone cannot carry for a pure couple.
fn integrate_matrix_region(
    local: &LocalSection,
    lm: &LocalMatrixRegion,
    field: &StrainField,
    regime: LawRegime,
    exclude_tension: bool,
    reference: Point2<f64>,
) -> (ForcePoint, f64) {
    let material = lm.region.material();
    let v_ref = reference.y;

    // Drop the tension side first when the region cracks
    let working = if exclude_tension {
        if field.kappa >= 0.0 {
            lm.polygon.clip_above(field.v_na)
        } else {
            lm.polygon.clip_below(field.v_na)
        }
    } else {
        Some(lm.polygon.clone())
    };

    let working = match working {
        Some(polygon) => polygon,
        None => {
            // Fully cracked region: zero force at the geometric centroid
            let centroid_local = lm.polygon.centroid();
            let global = local.axes.to_global(&centroid_local);
            let entry = ForcePoint {
                force: 0.0,
                x: global.x,
                y: global.y,
                moment: 0.0,
                stress: 0.0,
                strain: field.strain_at(centroid_local.y),
            };
            return (entry, 0.0);
        }
    };

    // Field levels where the law changes slope inside this polygon
    let (wlo, whi) = {
        let (min, max) = working.bounds();
        (min.y, max.y)
    };
    let mut cuts: Vec<f64> = Vec::new();
    if field.kappa != 0.0 {
        for bp in regime.breakpoints(material) {
            let v = field.v_na + bp / field.kappa;
            if v > wlo && v < whi {
                cuts.push(v);
            }
        }
    }
    cuts.sort_by(f64::total_cmp);
    cuts.dedup();

    // Partition the polygon into slabs between consecutive cuts
    let mut slabs: Vec<Polygon> = Vec::with_capacity(cuts.len() + 1);
    let mut remaining = Some(working);
    for &cut in &cuts {
        if let Some(polygon) = remaining.take() {
            if let Some(below) = polygon.clip_below(cut) {
                slabs.push(below);
            }
            remaining = polygon.clip_above(cut);
        }
    }
    if let Some(last) = remaining {
        slabs.push(last);
    }

    let mut force = 0.0;
    let mut force_scale = 0.0;
    let mut moment = 0.0;
    let mut moment_cross = 0.0;
    let mut sig_u = 0.0;
    let mut sig_v = 0.0;
    let mut area = 0.0;
    let mut qu = 0.0;
    let mut qv = 0.0;

    for slab in &slabs {
        let ints = slab.integrals();
        let (smin, smax) = {
            let (min, max) = slab.bounds();
            (min.y, max.y)
        };

        // The law is affine across the slab, so the midpoint stress and
        // tangent describe the exact stress field over it
        let v_mid = 0.5 * (smin + smax);
        let sig_mid = regime.stress(material, field.strain_at(v_mid));
        let slope = regime.tangent(material, field.strain_at(v_mid)) * field.kappa;

        let a = ints.area;
        let q_u = ints.qy;
        let q_v = ints.qx;
        let i_vv = ints.ixx;
        let i_uv = ints.ixy;

        let slab_force = sig_mid * a + slope * (q_v - v_mid * a);
        let slab_sig_u = sig_mid * q_u + slope * (i_uv - v_mid * q_u);
        force += slab_force;
        force_scale += slab_force.abs();
        moment += sig_mid * (q_v - v_ref * a)
            + slope * (i_vv - (v_mid + v_ref) * q_v + v_mid * v_ref * a);
        moment_cross += slab_sig_u - reference.x * slab_force;
        sig_u += slab_sig_u;
        sig_v += sig_mid * q_v + slope * (i_vv - v_mid * q_v);
        area += a;
        qu += q_u;
        qv += q_v;
    }

    // Point of action: stress-weighted centroid where the net force supports
    // it, otherwise the centroid of the participating area
    let point_local = if force.abs() > 1e-9 * force_scale {
        Point2::new(sig_u / force, sig_v / force)
    } else if area > 0.0 {
        Point2::new(qu / area, qv / area)
    } else {
        lm.polygon.centroid()
    };

    let strain = field.strain_at(point_local.y);
    let stress = regime.stress(material, strain);
    let global = local.axes.to_global(&point_local);

    let entry = ForcePoint {
        force,
        x: global.x,
        y: global.y,
        moment,
        stress,
        strain,
    };
    (entry, moment_cross)
}
