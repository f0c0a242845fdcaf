//! # soxml - PharmML Standardised Output for Rust
//!
//! `soxml` reads and writes Standardised Output (SO) files, the XML format
//! in which pharmacometric tools report the results of a modelling run:
//! parameter estimates, their precision, predictions, residuals, simulated
//! profiles and the messages of the task.
//!
//! ## Key Features
//!
//! - **Typed Tables**: Dataset tables are held column-wise with a fixed
//!   value type per column (`real`, `int`, `string`, `id`, `boolean`) and a
//!   set of semantic roles (`id`, `idv`, `dv`, ...). Appending a value of the
//!   wrong type fails instead of coercing.
//!
//! - **Missing Values**: NA and NaN are different values. NA is a reserved
//!   NaN payload (see [`codec::na`]) and both round-trip through the
//!   `ct:NA` and `ct:NaN` leaves.
//!
//! - **External Data Files**: A table can keep its rows in a delimited text
//!   file next to the document instead of inline XML.
//!
//! - **Streaming Parser**: Documents are read in a single pass over
//!   quick-xml events, dispatched through an explicit stack of parse
//!   contexts.
//!
//! - **Schema Order**: The writer emits children in the order the SO schema
//!   requires, whatever order they were added in.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use soxml::document::So;
//! use soxml::schema::{ColumnType, ValueType};
//! use soxml::table::{ColumnData, Table};
//!
//! let mut so = So::new();
//! so.set_pharmml_ref("run1.xml")?;
//!
//! let mut estimates = Table::new("MLE");
//! estimates.set_number_of_rows(1)?;
//! estimates.new_column(
//!     "CL",
//!     &[ColumnType::PopParameter],
//!     ValueType::Real,
//!     &ColumnData::Real(vec![1.52]),
//! )?;
//!
//! let block = so.add_block("estim1")?;
//! block.set_table("Estimation/PopulationEstimates/MLE", estimates)?;
//! block.add_message("INFORMATION", "NONMEM", "run", "Minimization successful", 0)?;
//!
//! so.write("run1.SO.xml", true)?;
//!
//! let back = So::read("run1.SO.xml")?;
//! let cl = back
//!     .block("estim1")
//!     .and_then(|b| b.table_at("Estimation/PopulationEstimates/MLE"))
//!     .and_then(|t| t.column_by_name("CL"))
//!     .and_then(|c| c.reals());
//! assert_eq!(cl, Some(&[1.52][..]));
//! # Ok::<(), soxml::error::SoError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`codec`]: Scalar text conversions and the NA sentinel
//! - [`schema`]: Namespaces, element names, column roles and the static
//!   structure of the SO element tree
//! - [`table`]: Columns and tables, their parser, XML and CSV writers
//! - [`matrix`]: Named row-major matrices
//! - [`external`]: External file references
//! - [`estring`]: Text leaves
//! - [`document`]: The document tree and the [`document::So`] root
//! - [`reader`]: Event source and the document builder
//! - [`writer`]: Document serialization

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod codec;
pub mod document;
pub mod error;
pub mod estring;
pub mod external;
pub mod matrix;
pub mod reader;
pub mod schema;
pub mod table;
pub mod writer;

pub use document::So;
pub use error::{last_error, Result, SoError};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::codec::{is_na, is_nan_not_na, na};
    pub use crate::document::{Element, Node, So};
    pub use crate::error::{Result, SoError};
    pub use crate::estring::Estring;
    pub use crate::external::{ExternalFile, MissingData};
    pub use crate::matrix::Matrix;
    pub use crate::reader::ReaderConfig;
    pub use crate::schema::{ColumnType, Delimiter, ValueType};
    pub use crate::table::{Column, ColumnData, Table};
    pub use crate::writer::{WriterConfig, WriterStats};
}
