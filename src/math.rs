//! Numerical utilities for section analysis

use log::trace;

use crate::error::{SectionError, SectionResult};

/// Outcome of a scalar root search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootResult {
    /// Argument at which the search terminated
    pub x: f64,
    /// Residual of the objective at `x`
    pub residual: f64,
    /// Number of objective evaluations consumed
    pub iterations: usize,
}

/// Find a root of `f` inside the bracket `[a0, b0]` using Brent's method
///
/// Combines bisection, secant and inverse quadratic interpolation, so it is
/// safe on the piecewise-smooth equilibrium residuals that show up in
/// cracked and ultimate analysis while converging superlinearly near the root.
///
/// # Arguments
/// * `analysis` - Label used in convergence errors and trace logs
/// * `f` - Objective; must change sign over the bracket
/// * `a0`, `b0` - Bracket endpoints
/// * `xtol` - Absolute tolerance on the bracket width; only consulted when
///   `ftol` is `None`
/// * `ftol` - Residual tolerance. `Some(tol)` accepts only once `|f| <= tol`,
///   refining the bracket down to the floating-point width floor; `None`
///   accepts the root once the bracket width falls below `xtol`
/// * `max_iterations` - Evaluation cap
pub fn brent_root<F>(
    analysis: &'static str,
    mut f: F,
    a0: f64,
    b0: f64,
    xtol: f64,
    ftol: Option<f64>,
    max_iterations: usize,
) -> SectionResult<RootResult>
where
    F: FnMut(f64) -> f64,
{
    let mut a = a0;
    let mut b = b0;
    let mut fa = f(a);
    let mut fb = f(b);

    if !fa.is_finite() || !fb.is_finite() {
        return Err(SectionError::ConvergenceFailed {
            analysis,
            iterations: 0,
            residual: if fa.is_finite() { fb } else { fa },
        });
    }
    if fa == 0.0 {
        return Ok(RootResult {
            x: a,
            residual: 0.0,
            iterations: 0,
        });
    }
    if fb == 0.0 {
        return Ok(RootResult {
            x: b,
            residual: 0.0,
            iterations: 0,
        });
    }
    if fa.signum() == fb.signum() {
        // No sign change: report the endpoint closest to equilibrium
        let residual = if fa.abs() < fb.abs() { fa } else { fb };
        return Err(SectionError::ConvergenceFailed {
            analysis,
            iterations: 0,
            residual,
        });
    }

    let mut c = a;
    let mut fc = fa;
    let mut d = b - a;
    let mut e = b - a;

    for iteration in 1..=max_iterations {
        if fb.signum() == fc.signum() {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        // Residual-tolerance searches refine to the floating-point width
        // floor; xtol only bounds the bracket in width-converged mode.
        let floor = 2.0 * f64::EPSILON * b.abs();
        let tol1 = match ftol {
            Some(_) => floor,
            None => floor + 0.5 * xtol,
        };
        let xm = 0.5 * (c - b);

        let converged = match ftol {
            Some(tol) => fb.abs() <= tol,
            None => fb == 0.0 || xm.abs() <= tol1,
        };
        if converged {
            trace!(
                "{}: root {:.6e} after {} iterations (residual {:.3e})",
                analysis,
                b,
                iteration,
                fb
            );
            return Ok(RootResult {
                x: b,
                residual: fb,
                iterations: iteration,
            });
        }
        if xm.abs() <= tol1 {
            // Bracket collapsed without meeting the residual tolerance
            return Err(SectionError::ConvergenceFailed {
                analysis,
                iterations: iteration,
                residual: fb,
            });
        }

        if e.abs() >= tol1 && fa.abs() > fb.abs() {
            // Inverse quadratic interpolation, or secant when only two points differ
            let s = fb / fa;
            let mut p;
            let mut q;
            if a == c {
                p = 2.0 * xm * s;
                q = 1.0 - s;
            } else {
                let r0 = fa / fc;
                let r1 = fb / fc;
                p = s * (2.0 * xm * r0 * (r0 - r1) - (b - a) * (r1 - 1.0));
                q = (r0 - 1.0) * (r1 - 1.0) * (s - 1.0);
            }
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();
            let min1 = 3.0 * xm * q - (tol1 * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                // Interpolation step accepted
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }

        a = b;
        fa = fb;
        if d.abs() > tol1 {
            b += d;
        } else {
            b += tol1.copysign(xm);
        }
        fb = f(b);
        if !fb.is_finite() {
            return Err(SectionError::ConvergenceFailed {
                analysis,
                iterations: iteration,
                residual: fb,
            });
        }
    }

    Err(SectionError::ConvergenceFailed {
        analysis,
        iterations: max_iterations,
        residual: fb,
    })
}

/// Evenly spaced samples over the closed interval `[start, end]`
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}
