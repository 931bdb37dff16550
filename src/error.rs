//! Error types for section analysis

use thiserror::Error;

/// Main error type for section analysis operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SectionError {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Singular stiffness matrix - section may have zero bending stiffness")]
    SingularMatrix,

    #[error(
        "{analysis} failed to converge after {iterations} iterations (residual {residual:.3e})"
    )]
    ConvergenceFailed {
        analysis: &'static str,
        iterations: usize,
        residual: f64,
    },

    #[error(
        "Axial force {n:.3e} is outside the section capacity range ({tensile:.3e}, {squash:.3e})"
    )]
    AxialForceOutOfRange { n: f64, tensile: f64, squash: f64 },
}

/// Result type for section analysis operations
pub type SectionResult<T> = Result<T, SectionError>;
