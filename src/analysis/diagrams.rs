//! Capacity diagram sweeps
//!
//! Diagrams trade the equilibrium root-find for a direct parameter sweep:
//! the interaction diagram walks the neutral axis through the section and
//! reads off the axial force and moment each depth delivers, while the
//! biaxial diagram solves the ultimate capacity once per bending angle.

use std::f64::consts::PI;

use log::debug;

use crate::analysis::ultimate::ultimate_capacity;
use crate::analysis::{integrate_state, AnalysisOptions, LawRegime, LocalSection, StrainField};
use crate::error::{SectionError, SectionResult};
use crate::math::linspace;
use crate::results::{BiaxialBendingResults, MomentInteractionResults};
use crate::section::Section;

/// Start of the interaction sweep, as a fraction of the section depth
const SWEEP_MIN_FRACTION: f64 = 1e-2;

/// Axial force against moment capacity for the bending axis at `theta`
///
/// Swept points run from a near-zero neutral axis depth to the full section
/// depth; the pure tensile and squash states anchor the two ends, so the
/// diagram always spans every admissible axial force.
pub(crate) fn moment_interaction(
    section: &Section,
    theta: f64,
    n_points: usize,
) -> SectionResult<MomentInteractionResults> {
    if !theta.is_finite() {
        return Err(SectionError::InvalidInput(format!(
            "moment interaction needs a finite bending angle, got {}",
            theta
        )));
    }
    if n_points < 2 {
        return Err(SectionError::InvalidInput(format!(
            "moment interaction needs at least 2 points, got {}",
            n_points
        )));
    }
    debug!(
        "Moment interaction diagram: theta={:.4}, {} points",
        theta, n_points
    );

    let gp = section.gross_properties();
    let local = LocalSection::resolve(section, theta);
    let depth = local.depth();
    let reference = local.axes.to_local(&gp.centroid());

    let mut n_values = Vec::with_capacity(n_points + 2);
    let mut m_values = Vec::with_capacity(n_points + 2);
    n_values.push(gp.tensile_load);
    m_values.push(0.0);

    for d_n in linspace(SWEEP_MIN_FRACTION * depth, depth, n_points) {
        let field = StrainField {
            kappa: gp.ultimate_strain / d_n,
            v_na: local.v_max - d_n,
        };
        let state = integrate_state(&local, &field, LawRegime::Ultimate, false, reference);
        n_values.push(state.force);
        m_values.push(state.moment);
    }

    n_values.push(gp.squash_load);
    m_values.push(0.0);

    Ok(MomentInteractionResults {
        theta,
        n: n_values,
        m: m_values,
    })
}

/// Moment capacity components over a full sweep of bending angles
///
/// Both sweep ends sit at the same physical axis, so the contour closes.
pub(crate) fn biaxial_bending(
    section: &Section,
    n: f64,
    n_points: usize,
    options: &AnalysisOptions,
) -> SectionResult<BiaxialBendingResults> {
    if !n.is_finite() {
        return Err(SectionError::InvalidInput(format!(
            "biaxial bending needs a finite axial force, got {}",
            n
        )));
    }
    if n_points < 2 {
        return Err(SectionError::InvalidInput(format!(
            "biaxial bending needs at least 2 points, got {}",
            n_points
        )));
    }
    debug!("Biaxial bending diagram: n={:.3e}, {} points", n, n_points);

    let mut theta_values = Vec::with_capacity(n_points);
    let mut mx_values = Vec::with_capacity(n_points);
    let mut my_values = Vec::with_capacity(n_points);

    for theta in linspace(-PI, PI, n_points) {
        let results = ultimate_capacity(section, theta, n, options)?;
        theta_values.push(theta);
        mx_values.push(results.mx);
        my_values.push(results.my);
    }

    Ok(BiaxialBendingResults {
        n,
        theta: theta_values,
        mx: mx_values,
        my: my_values,
    })
}
