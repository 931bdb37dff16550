//! Moment-curvature response
//!
//! The curvature is ramped in fixed increments. At each step the neutral
//! axis is relocated so the section carries the applied axial force through
//! the full nonlinear service laws, and the moment about the gross elastic
//! centroid is recorded. The ramp ends when a fiber or inclusion strains
//! past its service law domain; the failure curvature is then refined by
//! bisection inside the last increment.

use log::debug;

use crate::analysis::{
    integrate_state, AnalysisOptions, LawRegime, LocalSection, SectionState, StrainField,
};
use crate::error::{SectionError, SectionResult};
use crate::math::brent_root;
use crate::results::MomentCurvatureResults;
use crate::section::Section;

/// Bisection steps used to refine the failure curvature
const FAILURE_REFINEMENT_STEPS: usize = 16;

pub(crate) fn moment_curvature(
    section: &Section,
    theta: f64,
    n: f64,
    options: &AnalysisOptions,
) -> SectionResult<MomentCurvatureResults> {
    if !theta.is_finite() || !n.is_finite() {
        return Err(SectionError::InvalidInput(format!(
            "moment-curvature needs finite theta and axial force, got theta={}, n={}",
            theta, n
        )));
    }
    if !options.curvature_increment.is_finite() || options.curvature_increment <= 0.0 {
        return Err(SectionError::InvalidInput(format!(
            "moment-curvature needs a positive curvature increment, got {}",
            options.curvature_increment
        )));
    }
    debug!(
        "Moment-curvature analysis: theta={:.4}, n={:.3e}, {} steps of {:.3e}",
        theta, n, options.max_curvature_steps, options.curvature_increment
    );

    let local = LocalSection::resolve(section, theta);
    let depth = local.depth();
    let reference = local.axes.to_local(&section.gross_properties().centroid());

    // Axial equilibrium at a fixed curvature. The neutral axis may leave the
    // section for axial-dominated steps, so the bracket grows outward.
    let solve_step = |kappa: f64| -> SectionResult<(StrainField, SectionState)> {
        let residual = |v_na: f64| {
            let field = StrainField { kappa, v_na };
            integrate_state(&local, &field, LawRegime::ServiceFull, false, reference).force - n
        };

        let mut a = local.v_min;
        let mut step = depth;
        let mut grows = 0;
        while grows < 60 && residual(a) < 0.0 {
            a -= step;
            step *= 2.0;
            grows += 1;
        }
        let mut b = local.v_max;
        step = depth;
        grows = 0;
        while grows < 60 && residual(b) > 0.0 {
            b += step;
            step *= 2.0;
            grows += 1;
        }

        let root = brent_root(
            "moment-curvature equilibrium",
            residual,
            a,
            b,
            options.depth_tolerance * depth,
            None,
            options.max_iterations,
        )?;
        let field = StrainField { kappa, v_na: root.x };
        let state = integrate_state(&local, &field, LawRegime::ServiceFull, false, reference);
        Ok((field, state))
    };

    // Strain extremes of a linear field sit at the v-bounds of each region
    let within_domain = |field: &StrainField| {
        for lm in &local.matrix {
            let (lo, hi) = lm.region.material().service_law.domain();
            let (bmin, bmax) = lm.polygon.bounds();
            for strain in [field.strain_at(bmin.y), field.strain_at(bmax.y)] {
                if strain < lo || strain > hi {
                    return false;
                }
            }
        }
        for li in &local.inclusions {
            let (lo, hi) = li.inclusion.material().service_law.domain();
            let strain = field.strain_at(li.position.y);
            if strain < lo || strain > hi {
                return false;
            }
        }
        true
    };

    let mut kappa_values = Vec::new();
    let mut moments = Vec::new();
    let mut failure = false;
    let mut last_good = 0.0;

    for step in 1..=options.max_curvature_steps {
        let kappa = step as f64 * options.curvature_increment;
        let (field, state) = solve_step(kappa)?;

        if within_domain(&field) {
            kappa_values.push(kappa);
            moments.push(state.moment);
            last_good = kappa;
            continue;
        }

        let mut lo = last_good;
        let mut hi = kappa;
        let mut limit = None;
        for _ in 0..FAILURE_REFINEMENT_STEPS {
            let mid = 0.5 * (lo + hi);
            let (mid_field, mid_state) = solve_step(mid)?;
            if within_domain(&mid_field) {
                limit = Some((mid, mid_state.moment));
                lo = mid;
            } else {
                hi = mid;
            }
        }
        if let Some((limit_kappa, limit_moment)) = limit {
            kappa_values.push(limit_kappa);
            moments.push(limit_moment);
        }
        failure = true;
        break;
    }

    Ok(MomentCurvatureResults {
        theta,
        n,
        kappa: kappa_values,
        moment: moments,
        failure,
    })
}
