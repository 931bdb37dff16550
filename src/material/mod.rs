//! Material definitions for composite sections

pub mod law;

pub use law::StressStrainLaw;

use serde::{Deserialize, Serialize};

use crate::error::{SectionError, SectionResult};

/// Material with separate service and ultimate stress-strain laws
///
/// The service law drives elastic (uncracked and cracked) analysis through
/// its initial modulus and moment-curvature analysis through its full shape.
/// The ultimate law drives ultimate limit state analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    /// Mass per unit volume, in mass units per length cubed
    pub density: f64,
    /// Law used by service-level analysis
    pub service_law: StressStrainLaw,
    /// Law used by ultimate limit state analysis
    pub ultimate_law: StressStrainLaw,
    /// Long-term strength factor applied to matrix areas in the squash load
    pub squash_factor: f64,
    /// Tensile stress at which a matrix region is taken to crack
    pub flexural_tensile_strength: f64,
}

impl Material {
    /// Create a validated material
    ///
    /// The service law must carry a positive initial modulus and the ultimate
    /// law a finite ultimate strain, otherwise the material cannot take part
    /// in elastic or ultimate analysis respectively.
    pub fn new(
        name: &str,
        density: f64,
        service_law: StressStrainLaw,
        ultimate_law: StressStrainLaw,
        squash_factor: f64,
        flexural_tensile_strength: f64,
    ) -> SectionResult<Self> {
        service_law.validate()?;
        ultimate_law.validate()?;

        if service_law.elastic_modulus() <= 0.0 {
            return Err(SectionError::InvalidInput(format!(
                "material '{}' needs a service law with a positive elastic modulus",
                name
            )));
        }
        if ultimate_law.ultimate_strain().is_none() {
            return Err(SectionError::InvalidInput(format!(
                "material '{}' needs an ultimate law with a finite ultimate strain",
                name
            )));
        }
        if !density.is_finite() || density < 0.0 {
            return Err(SectionError::InvalidInput(format!(
                "material '{}' needs a non-negative density, got {}",
                name, density
            )));
        }
        if !squash_factor.is_finite() || squash_factor <= 0.0 || squash_factor > 1.0 {
            return Err(SectionError::InvalidInput(format!(
                "material '{}' needs a squash factor in (0, 1], got {}",
                name, squash_factor
            )));
        }
        if !flexural_tensile_strength.is_finite() || flexural_tensile_strength < 0.0 {
            return Err(SectionError::InvalidInput(format!(
                "material '{}' needs a non-negative flexural tensile strength, got {}",
                name, flexural_tensile_strength
            )));
        }

        Ok(Self {
            name: name.to_string(),
            density,
            service_law,
            ultimate_law,
            squash_factor,
            flexural_tensile_strength,
        })
    }

    /// Linear service law with a rectangular stress block at the ultimate state
    ///
    /// The usual model for a concrete-like matrix: `alpha` and `gamma` are the
    /// stress block intensity and depth factors of the governing design code.
    pub fn concrete(
        name: &str,
        density: f64,
        elastic_modulus: f64,
        compressive_strength: f64,
        alpha: f64,
        gamma: f64,
        ultimate_strain: f64,
        squash_factor: f64,
        flexural_tensile_strength: f64,
    ) -> SectionResult<Self> {
        Self::new(
            name,
            density,
            StressStrainLaw::Linear { elastic_modulus },
            StressStrainLaw::RectangularBlock {
                compressive_strength,
                alpha,
                gamma,
                ultimate_strain,
            },
            squash_factor,
            flexural_tensile_strength,
        )
    }

    /// Elastic perfectly-plastic material using the same law at service and ultimate
    ///
    /// The usual model for reinforcement bars.
    pub fn steel(
        name: &str,
        density: f64,
        elastic_modulus: f64,
        yield_strength: f64,
        fracture_strain: f64,
    ) -> SectionResult<Self> {
        let law = StressStrainLaw::ElasticPlastic {
            elastic_modulus,
            yield_strength,
            fracture_strain,
        };
        Self::new(name, density, law.clone(), law, 1.0, 0.0)
    }

    /// Initial modulus of the service law
    pub fn elastic_modulus(&self) -> f64 {
        self.service_law.elastic_modulus()
    }

    /// Ultimate strain of the ultimate law
    ///
    /// Construction guarantees the ultimate law defines one.
    pub fn ultimate_strain(&self) -> f64 {
        self.ultimate_law.ultimate_strain().unwrap_or(f64::INFINITY)
    }
}
