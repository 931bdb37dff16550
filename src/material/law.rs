//! Piecewise-linear stress-strain laws
//!
//! Strain and stress are signed with compression positive. Every law
//! evaluates over the whole real line: outside its defining range the stress
//! plateaus at the nearest end value, and domain violations are policed by
//! the analyses rather than the law itself. Laws expose their slope
//! breakpoints so stress fields can be integrated exactly, piece by piece.

use serde::{Deserialize, Serialize};

use crate::error::{SectionError, SectionResult};

/// Stress-strain law variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self")]
pub enum StressStrainLaw {
    /// Linear elastic, symmetric in tension and compression
    Linear { elastic_modulus: f64 },

    /// Elastic perfectly-plastic, symmetric, valid to the fracture strain
    ElasticPlastic {
        elastic_modulus: f64,
        yield_strength: f64,
        fracture_strain: f64,
    },

    /// Compression-only law: linear rise to a peak stress, then a plateau
    Bilinear {
        peak_stress: f64,
        peak_strain: f64,
        ultimate_strain: f64,
    },

    /// Rectangular stress block for the ultimate limit state
    ///
    /// Zero stress up to `(1 - gamma) * ultimate_strain`, then a uniform
    /// `alpha * compressive_strength`. Tension carries nothing.
    RectangularBlock {
        compressive_strength: f64,
        alpha: f64,
        gamma: f64,
        ultimate_strain: f64,
    },

    /// Piecewise-linear curve through `(strain, stress)` points
    ///
    /// Strains must be strictly increasing. Outside the defined range the
    /// end stresses extend as plateaus.
    Curve {
        strains: Vec<f64>,
        stresses: Vec<f64>,
    },
}

// The remote derive keeps the generated format but leaves the trait impls to
// us, so decoded laws pass through validate() like constructed ones.
impl Serialize for StressStrainLaw {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Self::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for StressStrainLaw {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let law = Self::deserialize(deserializer)?;
        law.validate().map_err(serde::de::Error::custom)?;
        Ok(law)
    }
}

impl StressStrainLaw {
    /// Stress at a given total strain
    pub fn stress(&self, strain: f64) -> f64 {
        match self {
            Self::Linear { elastic_modulus } => elastic_modulus * strain,
            Self::ElasticPlastic {
                elastic_modulus,
                yield_strength,
                ..
            } => (elastic_modulus * strain).clamp(-yield_strength, *yield_strength),
            Self::Bilinear {
                peak_stress,
                peak_strain,
                ..
            } => {
                if strain <= 0.0 {
                    0.0
                } else if strain < *peak_strain {
                    peak_stress * strain / peak_strain
                } else {
                    *peak_stress
                }
            }
            Self::RectangularBlock {
                compressive_strength,
                alpha,
                gamma,
                ultimate_strain,
            } => {
                if strain >= (1.0 - gamma) * ultimate_strain {
                    alpha * compressive_strength
                } else {
                    0.0
                }
            }
            Self::Curve { strains, stresses } => interp(strains, stresses, strain),
        }
    }

    /// Slope of the law at a given strain, zero on plateaus
    pub fn tangent_modulus(&self, strain: f64) -> f64 {
        match self {
            Self::Linear { elastic_modulus } => *elastic_modulus,
            Self::ElasticPlastic {
                elastic_modulus,
                yield_strength,
                ..
            } => {
                if (elastic_modulus * strain).abs() < *yield_strength {
                    *elastic_modulus
                } else {
                    0.0
                }
            }
            Self::Bilinear {
                peak_stress,
                peak_strain,
                ..
            } => {
                if strain > 0.0 && strain < *peak_strain {
                    peak_stress / peak_strain
                } else {
                    0.0
                }
            }
            Self::RectangularBlock { .. } => 0.0,
            Self::Curve { strains, stresses } => {
                let last = strains.len() - 1;
                if strain < strains[0] || strain >= strains[last] {
                    return 0.0;
                }
                let i = strains.partition_point(|&s| s <= strain).min(last);
                (stresses[i] - stresses[i - 1]) / (strains[i] - strains[i - 1])
            }
        }
    }

    /// Initial compression-side modulus, used by elastic analysis
    pub fn elastic_modulus(&self) -> f64 {
        match self {
            Self::Linear { elastic_modulus } => *elastic_modulus,
            Self::ElasticPlastic {
                elastic_modulus, ..
            } => *elastic_modulus,
            Self::Bilinear {
                peak_stress,
                peak_strain,
                ..
            } => peak_stress / peak_strain,
            Self::RectangularBlock { .. } => 0.0,
            Self::Curve { strains, stresses } => {
                // Slope of the first segment reaching past zero strain
                for i in 1..strains.len() {
                    if strains[i] > 0.0 {
                        return (stresses[i] - stresses[i - 1]) / (strains[i] - strains[i - 1]);
                    }
                }
                0.0
            }
        }
    }

    /// Compressive strain at which the law (and the material) is exhausted
    pub fn ultimate_strain(&self) -> Option<f64> {
        match self {
            Self::Linear { .. } => None,
            Self::ElasticPlastic {
                fracture_strain, ..
            } => Some(*fracture_strain),
            Self::Bilinear {
                ultimate_strain, ..
            } => Some(*ultimate_strain),
            Self::RectangularBlock {
                ultimate_strain, ..
            } => Some(*ultimate_strain),
            Self::Curve { strains, .. } => {
                let last = strains[strains.len() - 1];
                (last > 0.0).then_some(last)
            }
        }
    }

    /// Strain range over which the law physically represents the material
    ///
    /// Evaluation plateaus extend past these bounds, but a fiber strained
    /// outside them has failed. Moment-curvature analysis treats leaving the
    /// domain of any service law as section failure.
    pub fn domain(&self) -> (f64, f64) {
        match self {
            Self::Linear { .. } => (f64::NEG_INFINITY, f64::INFINITY),
            Self::ElasticPlastic {
                fracture_strain, ..
            } => (-fracture_strain, *fracture_strain),
            Self::Bilinear {
                ultimate_strain, ..
            } => (f64::NEG_INFINITY, *ultimate_strain),
            Self::RectangularBlock {
                ultimate_strain, ..
            } => (f64::NEG_INFINITY, *ultimate_strain),
            Self::Curve { strains, .. } => (strains[0], strains[strains.len() - 1]),
        }
    }

    /// Largest compressive stress the law can deliver
    pub fn max_compressive_stress(&self) -> f64 {
        match self {
            Self::Linear { .. } => f64::INFINITY,
            Self::ElasticPlastic { yield_strength, .. } => *yield_strength,
            Self::Bilinear { peak_stress, .. } => *peak_stress,
            Self::RectangularBlock {
                compressive_strength,
                alpha,
                ..
            } => alpha * compressive_strength,
            Self::Curve { stresses, .. } => stresses.iter().fold(0.0, |m, &s| m.max(s)),
        }
    }

    /// Largest tensile stress magnitude the law can deliver
    pub fn max_tensile_stress(&self) -> f64 {
        match self {
            Self::Linear { .. } => f64::INFINITY,
            Self::ElasticPlastic { yield_strength, .. } => *yield_strength,
            Self::Bilinear { .. } => 0.0,
            Self::RectangularBlock { .. } => 0.0,
            Self::Curve { stresses, .. } => stresses.iter().fold(0.0, |m, &s| m.max(-s)),
        }
    }

    /// Strains at which the stress or its slope changes
    ///
    /// Between consecutive breakpoints the law is affine in strain, which is
    /// what makes slab-wise exact integration possible.
    pub fn breakpoints(&self) -> Vec<f64> {
        match self {
            Self::Linear { .. } => Vec::new(),
            Self::ElasticPlastic {
                elastic_modulus,
                yield_strength,
                ..
            } => {
                let yield_strain = yield_strength / elastic_modulus;
                vec![-yield_strain, yield_strain]
            }
            Self::Bilinear { peak_strain, .. } => vec![0.0, *peak_strain],
            Self::RectangularBlock {
                gamma,
                ultimate_strain,
                ..
            } => vec![(1.0 - gamma) * ultimate_strain],
            Self::Curve { strains, .. } => strains.clone(),
        }
    }

    /// Check the law parameters for well-formedness
    pub fn validate(&self) -> SectionResult<()> {
        let fail = |msg: String| Err(SectionError::InvalidInput(msg));
        match self {
            Self::Linear { elastic_modulus } => {
                if !elastic_modulus.is_finite() || *elastic_modulus <= 0.0 {
                    return fail(format!("linear law needs E > 0, got {}", elastic_modulus));
                }
            }
            Self::ElasticPlastic {
                elastic_modulus,
                yield_strength,
                fracture_strain,
            } => {
                if !elastic_modulus.is_finite() || *elastic_modulus <= 0.0 {
                    return fail(format!(
                        "elastic-plastic law needs E > 0, got {}",
                        elastic_modulus
                    ));
                }
                if !yield_strength.is_finite() || *yield_strength <= 0.0 {
                    return fail(format!(
                        "elastic-plastic law needs a positive yield strength, got {}",
                        yield_strength
                    ));
                }
                if !fracture_strain.is_finite() || *fracture_strain <= 0.0 {
                    return fail(format!(
                        "elastic-plastic law needs a positive fracture strain, got {}",
                        fracture_strain
                    ));
                }
            }
            Self::Bilinear {
                peak_stress,
                peak_strain,
                ultimate_strain,
            } => {
                if !peak_stress.is_finite() || *peak_stress <= 0.0 {
                    return fail(format!(
                        "bilinear law needs a positive peak stress, got {}",
                        peak_stress
                    ));
                }
                if !peak_strain.is_finite() || *peak_strain <= 0.0 {
                    return fail(format!(
                        "bilinear law needs a positive peak strain, got {}",
                        peak_strain
                    ));
                }
                if !ultimate_strain.is_finite() || ultimate_strain < peak_strain {
                    return fail(format!(
                        "bilinear law needs ultimate strain >= peak strain, got {} < {}",
                        ultimate_strain, peak_strain
                    ));
                }
            }
            Self::RectangularBlock {
                compressive_strength,
                alpha,
                gamma,
                ultimate_strain,
            } => {
                if !compressive_strength.is_finite() || *compressive_strength <= 0.0 {
                    return fail(format!(
                        "stress block needs a positive compressive strength, got {}",
                        compressive_strength
                    ));
                }
                if !alpha.is_finite() || *alpha <= 0.0 || *alpha > 1.0 {
                    return fail(format!("stress block needs alpha in (0, 1], got {}", alpha));
                }
                if !gamma.is_finite() || *gamma <= 0.0 || *gamma > 1.0 {
                    return fail(format!("stress block needs gamma in (0, 1], got {}", gamma));
                }
                if !ultimate_strain.is_finite() || *ultimate_strain <= 0.0 {
                    return fail(format!(
                        "stress block needs a positive ultimate strain, got {}",
                        ultimate_strain
                    ));
                }
            }
            Self::Curve { strains, stresses } => {
                if strains.len() < 2 || strains.len() != stresses.len() {
                    return fail(format!(
                        "curve law needs matching strain/stress lists of length >= 2, got {}/{}",
                        strains.len(),
                        stresses.len()
                    ));
                }
                if strains.iter().chain(stresses.iter()).any(|v| !v.is_finite()) {
                    return fail("curve law values must be finite".to_string());
                }
                if strains.windows(2).any(|w| w[1] <= w[0]) {
                    return fail("curve law strains must be strictly increasing".to_string());
                }
            }
        }
        Ok(())
    }
}

/// Piecewise-linear interpolation with end plateaus
fn interp(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    let last = xs.len() - 1;
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[last] {
        return ys[last];
    }
    let i = xs.partition_point(|&v| v <= x);
    let (x0, x1) = (xs[i - 1], xs[i]);
    let (y0, y1) = (ys[i - 1], ys[i]);
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_linear_law() {
        let law = StressStrainLaw::Linear {
            elastic_modulus: 32.8e3,
        };
        assert_relative_eq!(law.stress(0.001), 32.8);
        assert_relative_eq!(law.stress(-0.001), -32.8);
        assert_relative_eq!(law.tangent_modulus(0.5), 32.8e3);
        assert!(law.breakpoints().is_empty());
        assert!(law.ultimate_strain().is_none());
    }

    #[test]
    fn test_elastic_plastic_law() {
        let law = StressStrainLaw::ElasticPlastic {
            elastic_modulus: 200e3,
            yield_strength: 500.0,
            fracture_strain: 0.05,
        };
        // Elastic branch
        assert_relative_eq!(law.stress(0.001), 200.0);
        assert_relative_eq!(law.tangent_modulus(0.001), 200e3);
        // Yielded in compression and tension
        assert_relative_eq!(law.stress(0.01), 500.0);
        assert_relative_eq!(law.stress(-0.01), -500.0);
        assert_relative_eq!(law.tangent_modulus(0.01), 0.0);
        // Plateau extends beyond the fracture strain for evaluation purposes
        assert_relative_eq!(law.stress(0.1), 500.0);

        assert_eq!(law.breakpoints(), vec![-0.0025, 0.0025]);
        assert_eq!(law.domain(), (-0.05, 0.05));
        assert_relative_eq!(law.ultimate_strain().unwrap(), 0.05);
        assert_relative_eq!(law.max_tensile_stress(), 500.0);
    }

    #[test]
    fn test_rectangular_block_law() {
        let law = StressStrainLaw::RectangularBlock {
            compressive_strength: 40.0,
            alpha: 0.85,
            gamma: 0.77,
            ultimate_strain: 0.003,
        };
        let threshold = (1.0 - 0.77) * 0.003;

        assert_relative_eq!(law.stress(-0.001), 0.0);
        assert_relative_eq!(law.stress(0.5 * threshold), 0.0);
        assert_relative_eq!(law.stress(threshold), 34.0);
        assert_relative_eq!(law.stress(0.003), 34.0);
        assert_relative_eq!(law.tangent_modulus(0.002), 0.0);
        assert_relative_eq!(law.max_compressive_stress(), 34.0);
        assert_relative_eq!(law.max_tensile_stress(), 0.0);

        let bps = law.breakpoints();
        assert_eq!(bps.len(), 1);
        assert_relative_eq!(bps[0], threshold);
    }

    #[test]
    fn test_bilinear_law() {
        let law = StressStrainLaw::Bilinear {
            peak_stress: 40.0,
            peak_strain: 0.002,
            ultimate_strain: 0.0035,
        };
        assert_relative_eq!(law.stress(-0.001), 0.0);
        assert_relative_eq!(law.stress(0.001), 20.0);
        assert_relative_eq!(law.stress(0.003), 40.0);
        assert_relative_eq!(law.elastic_modulus(), 20e3);
        assert_relative_eq!(law.tangent_modulus(0.001), 20e3);
        assert_relative_eq!(law.tangent_modulus(0.003), 0.0);
    }

    #[test]
    fn test_curve_law_interpolation() {
        let law = StressStrainLaw::Curve {
            strains: vec![-0.004, 0.0, 0.002, 0.004],
            stresses: vec![-3.0, 0.0, 40.0, 42.0],
        };
        assert_relative_eq!(law.stress(0.001), 20.0);
        assert_relative_eq!(law.stress(0.003), 41.0);
        // End plateaus
        assert_relative_eq!(law.stress(0.01), 42.0);
        assert_relative_eq!(law.stress(-0.01), -3.0);
        assert_relative_eq!(law.tangent_modulus(0.01), 0.0);

        assert_relative_eq!(law.elastic_modulus(), 20e3);
        assert_relative_eq!(law.ultimate_strain().unwrap(), 0.004);
        assert_eq!(law.domain(), (-0.004, 0.004));
        assert_relative_eq!(law.max_compressive_stress(), 42.0);
        assert_relative_eq!(law.max_tensile_stress(), 3.0);
    }

    #[test]
    fn test_validation() {
        assert!(StressStrainLaw::Linear {
            elastic_modulus: 0.0
        }
        .validate()
        .is_err());

        assert!(StressStrainLaw::RectangularBlock {
            compressive_strength: 40.0,
            alpha: 1.5,
            gamma: 0.77,
            ultimate_strain: 0.003,
        }
        .validate()
        .is_err());

        assert!(StressStrainLaw::Curve {
            strains: vec![0.0, 0.0, 0.003],
            stresses: vec![0.0, 1.0, 2.0],
        }
        .validate()
        .is_err());

        assert!(StressStrainLaw::ElasticPlastic {
            elastic_modulus: 200e3,
            yield_strength: 500.0,
            fracture_strain: 0.05,
        }
        .validate()
        .is_ok());
    }

    #[test]
    fn test_deserialisation_validates() {
        // A curve with no points would panic in interp if it got through
        let empty = r#"{"Curve":{"strains":[],"stresses":[]}}"#;
        assert!(serde_json::from_str::<StressStrainLaw>(empty).is_err());

        let unordered = r#"{"Curve":{"strains":[0.002,0.001],"stresses":[40.0,20.0]}}"#;
        assert!(serde_json::from_str::<StressStrainLaw>(unordered).is_err());

        let law: StressStrainLaw =
            serde_json::from_str(r#"{"Linear":{"elastic_modulus":32800.0}}"#).unwrap();
        assert_relative_eq!(law.stress(0.001), 32.8);
    }
}
