//! Uncracked elastic stress analysis
//!
//! The strain plane follows in closed form from the modulus-weighted section
//! properties: solve the centroidal bending stiffness system for the two
//! curvature components, then integrate the linear stress field exactly over
//! every region. No iteration is involved.

use log::debug;
use nalgebra::{Matrix2, Point2, Vector2};

use crate::error::{SectionError, SectionResult};
use crate::results::{ForcePoint, StressResult};
use crate::section::Section;

/// Elastic stress state of the full section under `n`, `mx` and `my`
///
/// Entry moments are reported about the bending axis of the applied moment
/// pair through the elastic centroid, so they sum to `hypot(mx, my)`.
pub(crate) fn uncracked_stress(
    section: &Section,
    n: f64,
    mx: f64,
    my: f64,
) -> SectionResult<StressResult> {
    if !n.is_finite() || !mx.is_finite() || !my.is_finite() {
        return Err(SectionError::InvalidInput(format!(
            "uncracked stress needs finite actions, got n={}, mx={}, my={}",
            n, mx, my
        )));
    }
    debug!(
        "Uncracked stress analysis: n={:.3e}, mx={:.3e}, my={:.3e}",
        n, mx, my
    );

    let gp = section.gross_properties();
    let epsilon_0 = n / gp.e_a;

    // Curvature components from the centroidal bending stiffness
    let stiffness = Matrix2::new(gp.e_ixx_c, gp.e_ixy_c, gp.e_ixy_c, gp.e_iyy_c);
    let kappa = stiffness
        .lu()
        .solve(&Vector2::new(mx, my))
        .ok_or(SectionError::SingularMatrix)?;
    let (kx, ky) = (kappa.x, kappa.y);

    let theta = f64::atan2(-my, mx);
    let (sin_t, cos_t) = theta.sin_cos();
    let m = f64::hypot(mx, my);

    let strain_at = |x: f64, y: f64| epsilon_0 + kx * (y - gp.cy) + ky * (x - gp.cx);

    let mut matrix_forces = Vec::with_capacity(section.matrix_regions().len());
    for region in section.matrix_regions() {
        let e = region.material().elastic_modulus();
        let ints = region.integrals();

        // Exact integrals of stress, stress*x and stress*y over the polygon
        let force = e
            * (epsilon_0 * ints.area
                + kx * (ints.qx - gp.cy * ints.area)
                + ky * (ints.qy - gp.cx * ints.area));
        let sig_x = e
            * (epsilon_0 * ints.qy
                + kx * (ints.ixy - gp.cy * ints.qy)
                + ky * (ints.iyy - gp.cx * ints.qy));
        let sig_y = e
            * (epsilon_0 * ints.qx
                + kx * (ints.ixx - gp.cy * ints.qx)
                + ky * (ints.ixy - gp.cx * ints.qx));

        // Entry moment about the bending axis, exact even for a pure couple
        let moment = cos_t * (sig_y - gp.cy * force) - sin_t * (sig_x - gp.cx * force);

        // Point of action: stress-weighted where the net force supports it
        let (bmin, bmax) = region.polygon().bounds();
        let strain_scale = epsilon_0.abs()
            + kx.abs() * bmin.y.abs().max(bmax.y.abs())
            + ky.abs() * bmin.x.abs().max(bmax.x.abs());
        let point = if force.abs() > 1e-9 * e * ints.area * strain_scale {
            Point2::new(sig_x / force, sig_y / force)
        } else {
            region.centroid()
        };

        let strain = strain_at(point.x, point.y);
        matrix_forces.push(ForcePoint {
            force,
            x: point.x,
            y: point.y,
            moment,
            stress: e * strain,
            strain,
        });
    }

    let mut inclusion_forces = Vec::with_capacity(section.inclusions().len());
    for inclusion in section.inclusions() {
        let p = inclusion.position();
        let strain = strain_at(p.x, p.y);
        let stress = inclusion.material().elastic_modulus() * strain;
        let force = stress * inclusion.area();
        let lever = cos_t * (p.y - gp.cy) - sin_t * (p.x - gp.cx);
        inclusion_forces.push(ForcePoint {
            force,
            x: p.x,
            y: p.y,
            moment: force * lever,
            stress,
            strain,
        });
    }

    Ok(StressResult {
        matrix_forces,
        inclusion_forces,
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
            Material::concrete("40 MPa", 2.4e-6, 32.8e3, 40.0, 0.85, 0.77, 0.003, 0.85, 3.8)
                .unwrap(),
        )
    }

    fn plain_rect() -> Section {
        let region = MatrixRegion::new(Polygon::rectangle(300.0, 900.0).unwrap(), concrete());
        Section::new(vec![region], Vec::new()).unwrap()
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
    fn test_pure_bending_stress() {
        let section = plain_rect();
        let result = uncracked_stress(&section, 0.0, 10e6, 0.0).unwrap();

        assert_abs_diff_eq!(result.force_residual(), 0.0, epsilon = 1e-8);
        assert_relative_eq!(result.total_moment(), 10e6, max_relative = 1e-9);

        // The single region carries the moment as a pure couple, reported at
        // the section centroid where the linear stress passes through zero
        let entry = &result.matrix_forces[0];
        assert_abs_diff_eq!(entry.force, 0.0, epsilon = 1e-6);
        assert_relative_eq!(entry.moment, 10e6, max_relative = 1e-9);
        assert_relative_eq!(entry.x, 150.0, max_relative = 1e-12);
        assert_relative_eq!(entry.y, 450.0, max_relative = 1e-12);
        assert_abs_diff_eq!(entry.stress, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pure_axial_stress_split() {
        let section = reinforced_rect();
        let result = uncracked_stress(&section, 1e5, 0.0, 0.0).unwrap();

        // Uniform strain n / EA; stresses scale with each modulus
        let strain = 1e5 / 9.246e9;
        assert_relative_eq!(
            result.matrix_forces[0].stress,
            32.8e3 * strain,
            max_relative = 1e-9
        );
        for bar in &result.inclusion_forces {
            assert_relative_eq!(bar.stress, 200e3 * strain, max_relative = 1e-9);
            assert_relative_eq!(bar.strain, strain, max_relative = 1e-9);
        }

        assert_abs_diff_eq!(result.force_residual(), 0.0, epsilon = 1e-8);
        // Individual entries carry moments about the composite centroid; the
        // resultant of a centric axial force has none
        assert_abs_diff_eq!(result.total_moment(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_axial_with_biaxial_moments() {
        let section = reinforced_rect();
        let result = uncracked_stress(&section, 1e5, 10e6, -4e6).unwrap();

        assert_relative_eq!(result.axial_force, 1e5);
        assert_relative_eq!(result.moment, f64::hypot(10e6, 4e6));
        assert_abs_diff_eq!(result.force_residual(), 0.0, epsilon = 1e-8);
        assert_relative_eq!(result.total_moment(), f64::hypot(10e6, 4e6), max_relative = 1e-9);
    }

    #[test]
    fn test_rejects_non_finite_actions() {
        let section = plain_rect();
        assert!(matches!(
            uncracked_stress(&section, f64::NAN, 0.0, 0.0),
            Err(SectionError::InvalidInput(_))
        ));
        assert!(matches!(
            uncracked_stress(&section, 0.0, f64::INFINITY, 0.0),
            Err(SectionError::InvalidInput(_))
        ));
    }
}
