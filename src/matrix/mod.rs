//! # Matrices
//!
//! Dense, row-major `f64` matrices with named rows and columns, used for
//! the Fisher information, covariance and correlation matrices of an
//! estimation. In an SO document:
//!
//! ```text
//! <CovarianceMatrix>
//!   <ct:Matrix matrixType="Any">
//!     <ct:RowNames><ct:String>CL</ct:String><ct:String>V</ct:String></ct:RowNames>
//!     <ct:ColumnNames><ct:String>CL</ct:String><ct:String>V</ct:String></ct:ColumnNames>
//!     <ct:MatrixRow><ct:Real>0.010000</ct:Real><ct:Real>0.002000</ct:Real></ct:MatrixRow>
//!     <ct:MatrixRow><ct:Real>0.002000</ct:Real><ct:Real>0.040000</ct:Real></ct:MatrixRow>
//!   </ct:Matrix>
//! </CovarianceMatrix>
//! ```

mod parser;


pub(crate) use parser::MatrixParser;

use std::io::Write;

use log::debug;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use crate::error::{Result, SoError};
use crate::schema::{attributes, elements, qualified, CT_PREFIX, MATRIX_TYPE_ANY};
use crate::writer::{write_real_leaf, write_text_element};

/// A named numeric matrix
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Matrix {
    name: String,
    num_rows: usize,
    num_cols: usize,
    row_names: Vec<String>,
    column_names: Vec<String>,
    data: Vec<f64>,
    sized: bool,
}

fn filled<T: Clone>(len: usize, value: T, what: &'static str) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| SoError::Allocation { what })?;
    v.resize(len, value);
    Ok(v)
}

impl Matrix {
    /// Create an empty matrix written as element `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Element name as written
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Allocate a `rows` x `cols` matrix of zeros with empty names.
    ///
    /// Can only be called once. On allocation failure the matrix stays empty.
    pub fn set_size(&mut self, rows: usize, cols: usize) -> Result<()> {
        if self.sized {
            return Err(SoError::MatrixAlreadySized);
        }
        let cells = rows
            .checked_mul(cols)
            .ok_or(SoError::Allocation { what: "matrix data" })?;
        let data = filled(cells, 0.0, "matrix data")?;
        let row_names = filled(rows, String::new(), "matrix row names")?;
        let column_names = filled(cols, String::new(), "matrix column names")?;

        self.data = data;
        self.row_names = row_names;
        self.column_names = column_names;
        self.num_rows = rows;
        self.num_cols = cols;
        self.sized = true;
        debug!("Matrix {} sized {}x{}", self.name, rows, cols);
        Ok(())
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Number of columns
    pub fn num_columns(&self) -> usize {
        self.num_cols
    }

    /// All row names
    pub fn row_names(&self) -> &[String] {
        &self.row_names
    }

    /// All column names
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    fn check(what: &'static str, index: usize, len: usize) -> Result<()> {
        if index < len {
            Ok(())
        } else {
            Err(SoError::IndexOutOfRange { what, index, len })
        }
    }

    /// Name of row `index`
    pub fn row_name(&self, index: usize) -> Result<&str> {
        Self::check("matrix row", index, self.num_rows)?;
        Ok(&self.row_names[index])
    }

    /// Set the name of row `index`
    pub fn set_row_name(&mut self, index: usize, name: impl Into<String>) -> Result<()> {
        Self::check("matrix row", index, self.num_rows)?;
        self.row_names[index] = name.into();
        Ok(())
    }

    /// Name of column `index`
    pub fn column_name(&self, index: usize) -> Result<&str> {
        Self::check("matrix column", index, self.num_cols)?;
        Ok(&self.column_names[index])
    }

    /// Set the name of column `index`
    pub fn set_column_name(&mut self, index: usize, name: impl Into<String>) -> Result<()> {
        Self::check("matrix column", index, self.num_cols)?;
        self.column_names[index] = name.into();
        Ok(())
    }

    /// Cell values in row-major order
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Mutable cell values in row-major order
    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Value at (`row`, `col`)
    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        Self::check("matrix row", row, self.num_rows)?;
        Self::check("matrix column", col, self.num_cols)?;
        Ok(self.data[row * self.num_cols + col])
    }

    /// Set the value at (`row`, `col`)
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        Self::check("matrix row", row, self.num_rows)?;
        Self::check("matrix column", col, self.num_cols)?;
        self.data[row * self.num_cols + col] = value;
        Ok(())
    }

    /// One row of values
    pub fn row(&self, row: usize) -> Result<&[f64]> {
        Self::check("matrix row", row, self.num_rows)?;
        let start = row * self.num_cols;
        Ok(&self.data[start..start + self.num_cols])
    }

    pub(crate) fn write_xml<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let matrix_name = qualified(CT_PREFIX, elements::MATRIX);
        let row_names = qualified(CT_PREFIX, elements::ROW_NAMES);
        let column_names = qualified(CT_PREFIX, elements::COLUMN_NAMES);
        let matrix_row = qualified(CT_PREFIX, elements::MATRIX_ROW);
        let string = qualified(CT_PREFIX, elements::STRING);

        writer.write_event(Event::Start(BytesStart::new(self.name.as_str())))?;
        let mut start = BytesStart::new(matrix_name.as_str());
        start.push_attribute((attributes::MATRIX_TYPE, MATRIX_TYPE_ANY));
        writer.write_event(Event::Start(start))?;

        writer.write_event(Event::Start(BytesStart::new(row_names.as_str())))?;
        for name in &self.row_names {
            write_text_element(writer, &string, name)?;
        }
        writer.write_event(Event::End(BytesEnd::new(row_names.as_str())))?;

        writer.write_event(Event::Start(BytesStart::new(column_names.as_str())))?;
        for name in &self.column_names {
            write_text_element(writer, &string, name)?;
        }
        writer.write_event(Event::End(BytesEnd::new(column_names.as_str())))?;

        for row in 0..self.num_rows {
            writer.write_event(Event::Start(BytesStart::new(matrix_row.as_str())))?;
            for col in 0..self.num_cols {
                write_real_leaf(writer, self.data[row * self.num_cols + col])?;
            }
            writer.write_event(Event::End(BytesEnd::new(matrix_row.as_str())))?;
        }

        writer.write_event(Event::End(BytesEnd::new(matrix_name.as_str())))?;
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
        Ok(())
    }
}
