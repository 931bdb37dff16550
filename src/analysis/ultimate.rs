//! Ultimate limit state analysis
//!
//! The ultimate strain profile is pinned: the extreme compression fiber sits
//! at the governing matrix ultimate strain, so the curvature follows directly
//! from the neutral axis depth. Equilibrium with the applied axial force is a
//! scalar root-find over that depth, and moments are reported about the gross
//! elastic centroid.

use log::debug;

use crate::analysis::{integrate_state, AnalysisOptions, LawRegime, LocalSection, StrainField};
use crate::error::{SectionError, SectionResult};
use crate::math::brent_root;
use crate::results::{StressResult, UltimateResults};
use crate::section::Section;

/// Smallest admissible neutral axis depth, as a fraction of the section depth
const MIN_DEPTH_FRACTION: f64 = 1e-6;

/// Largest admissible neutral axis depth, as a multiple of the section depth
///
/// Deep enough that the whole section is past the stress block threshold, so
/// the resultant exceeds the squash load and every admissible axial force
/// brackets.
const MAX_DEPTH_FACTOR: f64 = 6.0;

/// Ultimate bending capacity about the axis at `theta` under axial force `n`
pub(crate) fn ultimate_capacity(
    section: &Section,
    theta: f64,
    n: f64,
    options: &AnalysisOptions,
) -> SectionResult<UltimateResults> {
    if !theta.is_finite() || !n.is_finite() {
        return Err(SectionError::InvalidInput(format!(
            "ultimate capacity needs finite theta and axial force, got theta={}, n={}",
            theta, n
        )));
    }

    let gp = section.gross_properties();
    if n <= gp.tensile_load || n >= gp.squash_load {
        return Err(SectionError::AxialForceOutOfRange {
            n,
            tensile: gp.tensile_load,
            squash: gp.squash_load,
        });
    }
    debug!(
        "Ultimate capacity analysis: theta={:.4}, n={:.3e}",
        theta, n
    );

    let local = LocalSection::resolve(section, theta);
    let depth = local.depth();
    let reference = local.axes.to_local(&gp.centroid());
    let kappa_of = |d: f64| gp.ultimate_strain / d;

    let residual = |d: f64| {
        let field = StrainField {
            kappa: kappa_of(d),
            v_na: local.v_max - d,
        };
        integrate_state(&local, &field, LawRegime::Ultimate, false, reference).force - n
    };

    let root = brent_root(
        "ultimate equilibrium",
        residual,
        MIN_DEPTH_FRACTION * depth,
        MAX_DEPTH_FACTOR * depth,
        options.depth_tolerance * depth,
        Some(options.ultimate_axial_tolerance),
        options.max_iterations,
    )?;
    let d_n = root.x;

    let field = StrainField {
        kappa: kappa_of(d_n),
        v_na: local.v_max - d_n,
    };
    let state = integrate_state(&local, &field, LawRegime::Ultimate, false, reference);

    let (sin_t, cos_t) = theta.sin_cos();
    Ok(UltimateResults {
        theta,
        n,
        d_n,
        kappa: field.kappa,
        k_u: tensile_effective_depth(&local).map(|d| d_n / d),
        mx: sin_t * state.moment_cross + cos_t * state.moment,
        my: cos_t * state.moment_cross - sin_t * state.moment,
        mv: state.moment,
    })
}

/// Stress state of the section at a converged ultimate result
///
/// Laws evaluate with plateau extension, exactly as the capacity analysis
/// integrated them, so an inclusion past its fracture strain carries its
/// plateau stress and the recomputed state reproduces the converged
/// equilibrium.
pub(crate) fn ultimate_stress(
    section: &Section,
    results: &UltimateResults,
) -> SectionResult<StressResult> {
    if !results.theta.is_finite()
        || !results.d_n.is_finite()
        || results.d_n <= 0.0
        || !results.kappa.is_finite()
        || results.kappa < 0.0
    {
        return Err(SectionError::InvalidInput(format!(
            "ultimate stress needs a converged result, got d_n={}, kappa={}",
            results.d_n, results.kappa
        )));
    }
    debug!(
        "Ultimate stress analysis: theta={:.4}, d_n={:.3}",
        results.theta, results.d_n
    );

    let local = LocalSection::resolve(section, results.theta);
    let reference = local.axes.to_local(&section.gross_properties().centroid());
    let field = StrainField {
        kappa: results.kappa,
        v_na: local.v_max - results.d_n,
    };
    let state = integrate_state(&local, &field, LawRegime::Ultimate, false, reference);

    Ok(StressResult {
        matrix_forces: state.matrix_forces,
        inclusion_forces: state.inclusion_forces,
        axial_force: results.n,
        moment: results.mv,
    })
}

/// Depth from the extreme compression fiber to the deepest inclusion
fn tensile_effective_depth(local: &LocalSection) -> Option<f64> {
    local
        .inclusions
        .iter()
        .map(|li| local.v_max - li.position.y)
        .max_by(f64::total_cmp)
}
