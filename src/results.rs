//! Result types for section analysis

use serde::{Deserialize, Serialize};

/// A stress resultant recorded at its point of action
///
/// Equilibrium checks should sum `force` and `moment` directly; the lever
/// arm is derived and degenerates for self-equilibrating entries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForcePoint {
    /// Resultant force carried by the entry
    pub force: f64,
    /// Global x coordinate of the point of action
    pub x: f64,
    /// Global y coordinate of the point of action
    pub y: f64,
    /// Moment contribution about the analysis reference axis
    pub moment: f64,
    /// Stress at the point of action
    pub stress: f64,
    /// Strain at the point of action
    pub strain: f64,
}

impl ForcePoint {
    /// Perpendicular lever arm implied by the force and moment
    ///
    /// Zero when the entry carries no net force, such as a matrix region in
    /// pure bending whose compression and tension cancel.
    pub fn lever_arm(&self) -> f64 {
        if self.force.abs() > f64::EPSILON {
            self.moment / self.force
        } else {
            0.0
        }
    }
}

/// Stress state of the whole section under one set of actions
///
/// The same shape is produced by uncracked, cracked and ultimate analysis,
/// with one entry per matrix region and per inclusion in section order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressResult {
    /// One entry per matrix region
    pub matrix_forces: Vec<ForcePoint>,
    /// One entry per inclusion
    pub inclusion_forces: Vec<ForcePoint>,
    /// Axial force the state was solved or evaluated for
    pub axial_force: f64,
    /// Reference moment about the bending axis
    pub moment: f64,
}

impl StressResult {
    /// Sum of all entry forces; equals `axial_force` at equilibrium
    pub fn total_force(&self) -> f64 {
        self.matrix_forces
            .iter()
            .chain(self.inclusion_forces.iter())
            .map(|f| f.force)
            .sum()
    }

    /// Sum of all entry moments; equals `moment` at equilibrium
    pub fn total_moment(&self) -> f64 {
        self.matrix_forces
            .iter()
            .chain(self.inclusion_forces.iter())
            .map(|f| f.moment)
            .sum()
    }

    /// Axial equilibrium defect
    pub fn force_residual(&self) -> f64 {
        self.total_force() - self.axial_force
    }

    /// Moment equilibrium defect
    pub fn moment_residual(&self) -> f64 {
        self.total_moment() - self.moment
    }
}

/// Cracked section properties for one bending axis angle
///
/// Properties are modulus-weighted over the compression side of the matrix
/// plus every inclusion. Global-frame values carry the `_g` infix, values
/// about the cracked centroid the `_c` infix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrackedResults {
    /// Bending axis angle the analysis was run for, radians
    pub theta: f64,
    /// Neutral axis depth from the extreme compression fiber
    pub d_nc: f64,
    /// Cracking moment about the bending axis
    pub m_cr: f64,
    /// Modulus-weighted cracked area
    pub e_a_cr: f64,
    /// Modulus-weighted first moment about the global x-axis
    pub e_qx_cr: f64,
    /// Modulus-weighted first moment about the global y-axis
    pub e_qy_cr: f64,
    /// Cracked centroid x
    pub cx: f64,
    /// Cracked centroid y
    pub cy: f64,
    /// Modulus-weighted second moments in the global frame
    pub e_ixx_g_cr: f64,
    pub e_iyy_g_cr: f64,
    pub e_ixy_g_cr: f64,
    /// Modulus-weighted second moments about the cracked centroid
    pub e_ixx_c_cr: f64,
    pub e_iyy_c_cr: f64,
    pub e_ixy_c_cr: f64,
    /// Modulus-weighted second moment about the bending axis through the cracked centroid
    pub e_iuu_cr: f64,
}

/// Ultimate limit state capacity for one bending axis angle and axial force
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UltimateResults {
    /// Bending axis angle, radians
    pub theta: f64,
    /// Axial force the capacity was solved for
    pub n: f64,
    /// Neutral axis depth from the extreme compression fiber
    pub d_n: f64,
    /// Curvature at the ultimate state
    pub kappa: f64,
    /// Neutral axis parameter `d_n / d_v`, where `d_v` is the depth to the
    /// extreme tension inclusion; absent for sections without inclusions
    pub k_u: Option<f64>,
    /// Moment capacity components about the global axes
    pub mx: f64,
    pub my: f64,
    /// Moment capacity about the bending axis
    pub mv: f64,
}

/// Moment-curvature response at a fixed axial force
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentCurvatureResults {
    /// Bending axis angle, radians
    pub theta: f64,
    /// Axial force held constant along the curve
    pub n: f64,
    /// Curvature samples, ascending
    pub kappa: Vec<f64>,
    /// Moment at each curvature sample
    pub moment: Vec<f64>,
    /// Whether the sweep ended by exhausting a material rather than the step cap
    pub failure: bool,
}

/// Axial force versus moment capacity curve for one bending axis angle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentInteractionResults {
    /// Bending axis angle, radians
    pub theta: f64,
    /// Axial forces, from the tensile capacity to the squash load
    pub n: Vec<f64>,
    /// Moment capacity at each axial force
    pub m: Vec<f64>,
}

/// Moment capacity components over a sweep of bending axis angles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiaxialBendingResults {
    /// Axial force held constant over the sweep
    pub n: f64,
    /// Bending axis angles, radians
    pub theta: Vec<f64>,
    /// Moment capacity components about the global axes at each angle
    pub mx: Vec<f64>,
    pub my: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_force_point_lever_arm() {
        let entry = ForcePoint {
            force: 1000.0,
            x: 0.0,
            y: 400.0,
            moment: 250_000.0,
            stress: 2.5,
            strain: 1e-4,
        };
        assert_relative_eq!(entry.lever_arm(), 250.0);

        // A pure couple has a moment but no net force
        let couple = ForcePoint {
            force: 0.0,
            moment: 1.0e6,
            ..entry
        };
        assert_relative_eq!(couple.lever_arm(), 0.0);
    }

    #[test]
    fn test_stress_result_sums() {
        let result = StressResult {
            matrix_forces: vec![
                ForcePoint {
                    force: 600.0,
                    x: 0.0,
                    y: 100.0,
                    moment: 60_000.0,
                    stress: 1.0,
                    strain: 1e-5,
                },
                ForcePoint {
                    force: -100.0,
                    x: 0.0,
                    y: -50.0,
                    moment: 5_000.0,
                    stress: -0.5,
                    strain: -5e-6,
                },
            ],
            inclusion_forces: vec![ForcePoint {
                force: 500.0,
                x: 0.0,
                y: -200.0,
                moment: -100_000.0,
                stress: 10.0,
                strain: 5e-5,
            }],
            axial_force: 1000.0,
            moment: -35_000.0,
        };
        assert_relative_eq!(result.total_force(), 1000.0);
        assert_relative_eq!(result.total_moment(), -35_000.0);
        assert_relative_eq!(result.force_residual(), 0.0);
        assert_relative_eq!(result.moment_residual(), 0.0);
    }
}
