//! Cracked section analysis
//!
//! Tension exclusion makes the crack state circular: which matrix fibers
//! carry stress depends on the neutral axis location, which depends on which
//! fibers carry stress. Both operations here resolve that with a scalar
//! root-find over the neutral axis depth, measured from the extreme
//! compression fiber along the bending direction.

use log::debug;
use nalgebra::Point2;

use crate::analysis::{integrate_state, AnalysisOptions, LawRegime, LocalSection, StrainField};
use crate::error::{SectionError, SectionResult};
use crate::geometry::PolygonIntegrals;
use crate::math::brent_root;
use crate::results::{CrackedResults, StressResult};
use crate::section::Section;

/// Smallest admissible neutral axis depth, as a fraction of the section depth
const MIN_DEPTH_FRACTION: f64 = 1e-6;

/// Cracked transformed properties for a bending axis at `theta`
///
/// Stage one of the cracked model: under pure bending the neutral axis
/// settles where the first moment of the cracked transformed section about
/// it vanishes, so the cracked centroid lies on the axis. The returned
/// properties describe the compression-side matrix plus every inclusion.
pub(crate) fn cracked_properties(
    section: &Section,
    theta: f64,
    options: &AnalysisOptions,
) -> SectionResult<CrackedResults> {
    if !theta.is_finite() {
        return Err(SectionError::InvalidInput(format!(
            "cracked properties need a finite bending angle, got {}",
            theta
        )));
    }
    debug!("Cracked properties analysis: theta={:.4}", theta);

    let local = LocalSection::resolve(section, theta);
    let depth = local.depth();

    let residual = |d: f64| {
        let field = StrainField {
            kappa: 1.0,
            v_na: local.v_max - d,
        };
        integrate_state(
            &local,
            &field,
            LawRegime::ServiceLinear,
            true,
            Point2::origin(),
        )
        .force
    };

    let root = brent_root(
        "cracked neutral axis",
        residual,
        MIN_DEPTH_FRACTION * depth,
        depth,
        options.depth_tolerance * depth,
        None,
        options.max_iterations,
    )?;
    let d_nc = root.x;
    let v_na = local.v_max - d_nc;

    // Accumulate the cracked transformed section in the global frame
    let mut e_ints = PolygonIntegrals::default();
    for lm in &local.matrix {
        if let Some(compression) = lm.polygon.clip_above(v_na) {
            let e = lm.region.material().elastic_modulus();
            e_ints += compression.rotated(theta).integrals().scaled(e);
        }
    }
    for inclusion in section.inclusions() {
        e_ints += inclusion
            .integrals()
            .scaled(inclusion.material().elastic_modulus());
    }

    let e_a_cr = e_ints.area;
    let cx = e_ints.qy / e_a_cr;
    let cy = e_ints.qx / e_a_cr;
    let centroidal = e_ints.about(&Point2::new(cx, cy));

    let half_sum = 0.5 * (centroidal.ixx + centroidal.iyy);
    let half_diff = 0.5 * (centroidal.ixx - centroidal.iyy);
    let e_iuu_cr =
        half_sum + half_diff * (2.0 * theta).cos() - centroidal.ixy * (2.0 * theta).sin();

    Ok(CrackedResults {
        theta,
        d_nc,
        m_cr: cracking_moment(section, &local),
        e_a_cr,
        e_qx_cr: e_ints.qx,
        e_qy_cr: e_ints.qy,
        cx,
        cy,
        e_ixx_g_cr: e_ints.ixx,
        e_iyy_g_cr: e_ints.iyy,
        e_ixy_g_cr: e_ints.ixy,
        e_ixx_c_cr: centroidal.ixx,
        e_iyy_c_cr: centroidal.iyy,
        e_ixy_c_cr: centroidal.ixy,
        e_iuu_cr,
    })
}

/// Moment at which the extreme tension fiber of the uncracked section first
/// reaches its material's flexural tensile strength
///
/// Regions wholly above the elastic centroid never govern; a section whose
/// matrix carries no tensile strength cracks under any moment.
fn cracking_moment(section: &Section, local: &LocalSection) -> f64 {
    let gp = section.gross_properties();
    let e_iuu = gp.e_iuu(local.axes.theta());
    let v_c = local.v_of(&gp.centroid());

    let mut m_cr = f64::INFINITY;
    for lm in &local.matrix {
        let material = lm.region.material();
        if material.flexural_tensile_strength <= 0.0 {
            continue;
        }
        let (bmin, _) = lm.polygon.bounds();
        let d_tension = v_c - bmin.y;
        if d_tension <= 0.0 {
            continue;
        }
        let m = material.flexural_tensile_strength * e_iuu
            / (material.elastic_modulus() * d_tension);
        m_cr = m_cr.min(m);
    }
    if m_cr.is_finite() {
        m_cr
    } else {
        0.0
    }
}

/// Service stress state of the cracked section under `n` and `m`
///
/// Stage two of the cracked model: the crack extent under a combined demand
/// differs from the pure-bending one, so the neutral axis depth is solved
/// again. For each trial depth the curvature is scaled so the moment about
/// the cracked centroid equals `m`, and the depth is driven until the axial
/// force matches `n`. `m` must not be negative; bending the other way is the
/// analysis at `theta + pi`.
pub(crate) fn cracked_stress(
    section: &Section,
    cracked: &CrackedResults,
    n: f64,
    m: f64,
    options: &AnalysisOptions,
) -> SectionResult<StressResult> {
    if !n.is_finite() || !m.is_finite() {
        return Err(SectionError::InvalidInput(format!(
            "cracked stress needs finite actions, got n={}, m={}",
            n, m
        )));
    }
    if m < 0.0 {
        return Err(SectionError::InvalidInput(format!(
            "cracked stress needs a non-negative moment, got {}; analyse at theta + pi instead",
            m
        )));
    }
    debug!(
        "Cracked stress analysis: theta={:.4}, n={:.3e}, m={:.3e}",
        cracked.theta, n, m
    );

    let local = LocalSection::resolve(section, cracked.theta);
    let depth = local.depth();
    let reference = local.axes.to_local(&Point2::new(cracked.cx, cracked.cy));

    // One pass at unit curvature yields both equilibrium gradients: the
    // linear service field scales multiplicatively with curvature
    let gradients = |d: f64| {
        let field = StrainField {
            kappa: 1.0,
            v_na: local.v_max - d,
        };
        let state = integrate_state(&local, &field, LawRegime::ServiceLinear, true, reference);
        (state.force, state.moment)
    };

    // Axial force residual once the curvature is scaled to deliver `m`
    let residual = |d: f64| {
        let (g, j) = gradients(d);
        if j <= 0.0 {
            // Past the moment-gradient pole; force the search back below it
            return 1e300;
        }
        m * g / j - n
    };

    // The compression zone may extend past the section for dominant axial
    // force, so the upper bracket grows until the residual changes sign
    let a = MIN_DEPTH_FRACTION * depth;
    let mut b = depth;
    let mut grows = 0;
    while residual(b) < 0.0 && grows < 40 {
        b *= 2.0;
        grows += 1;
    }

    let root = brent_root(
        "cracked equilibrium",
        residual,
        a,
        b,
        options.depth_tolerance * depth,
        Some(options.axial_tolerance),
        options.max_iterations,
    )?;

    let (_, j) = gradients(root.x);
    let field = StrainField {
        kappa: m / j,
        v_na: local.v_max - root.x,
    };
    let state = integrate_state(&local, &field, LawRegime::ServiceLinear, true, reference);

    Ok(StressResult {
        matrix_forces: state.matrix_forces,
        inclusion_forces: state.inclusion_forces,
        axial_force: n,
        moment: m,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Inclusion, MatrixRegion, Polygon};
    use crate::material::Material;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::sync::Arc;

    fn concrete() -> Arc<Material> {
        Arc::new(
            Material::concrete(
                "40 MPa",
                2.4e-6,
                32.8e3,
                40.0,
                0.85,
                0.77,
                0.003,
                0.85,
                0.6 * 40.0_f64.sqrt(),
            )
            .unwrap(),
        )
    }

    fn reinforced_rect() -> Section {
        let steel =
            Arc::new(Material::steel("500 MPa Steel", 7.85e-6, 200e3, 500.0, 0.05).unwrap());
        let region = MatrixRegion::new(Polygon::rectangle(300.0, 900.0).unwrap(), concrete());
        let mut bars = Vec::new();
        for x in [75.0, 150.0, 225.0] {
            bars.push(Inclusion::new(x, 862.0, 200.0, Arc::clone(&steel)).unwrap());
            bars.push(Inclusion::new(x, 42.0, 450.0, Arc::clone(&steel)).unwrap());
        }
        Section::new(vec![region], bars).unwrap()
    }

    #[test]
    fn test_cracked_properties_reference_values() {
        let section = reinforced_rect();
        let cracked = cracked_properties(&section, 0.0, &AnalysisOptions::default()).unwrap();

        // Root of 4.92e6*d^2 + 3.9e8*d - 2.3622e11 = 0
        assert_relative_eq!(cracked.d_nc, 183.0384, max_relative = 1e-5);

        // The cracked centroid lies on the pure-bending neutral axis
        assert_abs_diff_eq!(cracked.cy, 900.0 - cracked.d_nc, epsilon = 1e-6);
        assert_relative_eq!(cracked.cx, 150.0, max_relative = 1e-9);

        assert_relative_eq!(cracked.e_a_cr, 2.19110e9, max_relative = 1e-5);
        assert_relative_eq!(cracked.e_ixx_c_cr, 1.4564e14, max_relative = 1e-3);
        assert_relative_eq!(cracked.e_iuu_cr, cracked.e_ixx_c_cr, max_relative = 1e-12);

        // f_t * e_iuu / (E * d_tension) with the tension fiber at y = 0
        assert_relative_eq!(cracked.m_cr, 1.7290e8, max_relative = 1e-4);
    }

    #[test]
    fn test_cracked_stress_equilibrium() {
        let section = reinforced_rect();
        let options = AnalysisOptions::default();
        let cracked = cracked_properties(&section, 0.0, &options).unwrap();

        for n in [-1e3, 0.0, 1e3, 1e5] {
            let result = cracked_stress(&section, &cracked, n, 10e6, &options).unwrap();
            assert_abs_diff_eq!(result.force_residual(), 0.0, epsilon = 1e-8);
            assert_relative_eq!(result.total_moment(), 10e6, max_relative = 5e-3);
        }
    }

    #[test]
    fn test_cracked_stress_is_deterministic() {
        let section = reinforced_rect();
        let options = AnalysisOptions::default();
        let cracked = cracked_properties(&section, 0.3, &options).unwrap();

        let first = cracked_stress(&section, &cracked, 1e3, 10e6, &options).unwrap();
        let second = cracked_stress(&section, &cracked, 1e3, 10e6, &options).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_pure_axial_demand_is_ill_posed() {
        let section = reinforced_rect();
        let options = AnalysisOptions::default();
        let cracked = cracked_properties(&section, 0.0, &options).unwrap();

        let err = cracked_stress(&section, &cracked, 1e5, 0.0, &options).unwrap_err();
        assert!(matches!(err, SectionError::ConvergenceFailed { .. }));
    }

    #[test]
    fn test_negative_moment_rejected() {
        let section = reinforced_rect();
        let options = AnalysisOptions::default();
        let cracked = cracked_properties(&section, 0.0, &options).unwrap();

        let err = cracked_stress(&section, &cracked, 0.0, -10e6, &options).unwrap_err();
        assert!(matches!(err, SectionError::InvalidInput(_)));
    }

    #[test]
    fn test_unreinforced_section_cannot_crack_in_equilibrium() {
        // Without inclusions there is no tension capacity left after the
        // matrix cracks, so no neutral axis balances pure bending
        let section = Section::new(
            vec![MatrixRegion::new(
                Polygon::rectangle(300.0, 900.0).unwrap(),
                concrete(),
            )],
            Vec::new(),
        )
        .unwrap();

        let err = cracked_properties(&section, 0.0, &AnalysisOptions::default()).unwrap_err();
        assert!(matches!(err, SectionError::ConvergenceFailed { .. }));
    }
}
