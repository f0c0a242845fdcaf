//! # SO Schema Vocabulary
//!
//! Names, namespaces and enumerations of the PharmML Standardised Output
//! schema family (SO 0.3 on top of PharmML 0.8 Dataset and CommonTypes).
//!
//! ## Element tree
//!
//! ```text
//! SO
//! ├── PharmMLRef
//! └── SOBlock* (blkId)
//!     ├── ToolSettings
//!     ├── RawResults
//!     ├── TaskInformation
//!     │   └── Message* (type)
//!     ├── Estimation
//!     │   ├── PopulationEstimates
//!     │   ├── PrecisionPopulationEstimates
//!     │   ├── IndividualEstimates
//!     │   ├── Residuals
//!     │   ├── Predictions
//!     │   └── Likelihood
//!     ├── Simulation
//!     │   └── SimulationBlock* (replicate)
//!     ├── ModelDiagnostic
//!     └── OptimalDesign
//!         └── OptimalDesignBlock* (blockNumber)
//! ```
//!
//! Leaves of the tree are tables (`ds:Definition` followed by inline rows or an
//! external file reference), matrices (`ct:Matrix`), external file references
//! and scalar text leaves. [`structure`] holds the full tree.

mod constants;
pub mod structure;
mod types;

#[cfg(test)]
mod tests;

pub use constants::*;
pub use structure::{ChildSpec, ElementSpec, NodeKind};
pub use types::{ColumnType, Delimiter, ValueType};
