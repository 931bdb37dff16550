//! Section Solver - A native Rust composite cross-section analysis library
//!
//! This library computes the structural response of composite cross-sections
//! built from polygonal matrix regions (concrete and the like) with embedded
//! discrete inclusions (reinforcement bars), supporting:
//! - Gross and transformed elastic section properties
//! - Uncracked elastic stress analysis under combined actions
//! - Cracked section properties and cracked stress analysis
//! - Ultimate limit state capacity and stress analysis
//! - Moment-curvature response
//! - Moment interaction and biaxial bending diagrams
//!
//! ## Example
//! ```rust
//! use section_solver::prelude::*;
//! use std::sync::Arc;
//!
//! // 300 x 900 concrete section with three bars near the bottom edge
//! let concrete = Arc::new(
//!     Material::concrete("40 MPa Concrete", 2.4e-6, 32.8e3, 40.0, 0.85, 0.77, 0.003, 0.85, 3.8)
//!         .unwrap(),
//! );
//! let steel = Arc::new(Material::steel("500 MPa Steel", 7.85e-6, 200e3, 500.0, 0.05).unwrap());
//!
//! let slab = MatrixRegion::new(Polygon::rectangle(300.0, 900.0).unwrap(), concrete);
//! let bars = vec![
//!     Inclusion::new(75.0, 42.0, 450.0, Arc::clone(&steel)).unwrap(),
//!     Inclusion::new(150.0, 42.0, 450.0, Arc::clone(&steel)).unwrap(),
//!     Inclusion::new(225.0, 42.0, 450.0, Arc::clone(&steel)).unwrap(),
//! ];
//! let section = Section::new(vec![slab], bars).unwrap();
//!
//! // Elastic properties and an uncracked stress state
//! let gross = section.gross_properties();
//! assert!(gross.e_a > 0.0);
//!
//! let stress = section.uncracked_stress(100e3, 50e6, 0.0).unwrap();
//! assert!(stress.force_residual().abs() < 1e-6);
//!
//! // Ultimate capacity about the x axis under pure bending
//! let ultimate = section
//!     .ultimate_capacity(0.0, 0.0, &AnalysisOptions::default())
//!     .unwrap();
//! assert!(ultimate.mv > 0.0);
//! ```

pub mod analysis;
pub mod error;
pub mod geometry;
pub mod material;
pub mod math;
pub mod results;
pub mod section;
pub mod transform;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::AnalysisOptions;
    pub use crate::error::{SectionError, SectionResult};
    pub use crate::geometry::{Inclusion, MatrixRegion, Polygon, PolygonIntegrals};
    pub use crate::material::{Material, StressStrainLaw};
    pub use crate::results::{
        BiaxialBendingResults, CrackedResults, ForcePoint, MomentCurvatureResults,
        MomentInteractionResults, StressResult, UltimateResults,
    };
    pub use crate::section::{GrossProperties, Section, TransformedProperties};
    pub use crate::transform::BendingAxes;
}
