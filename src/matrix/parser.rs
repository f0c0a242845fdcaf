//! Event-driven matrix parser.
//!
//! Row and column names are appended as they are seen, so the size of the
//! matrix is only known once both name lists have been read. The data buffer
//! is allocated when the first value arrives, which means all names must
//! precede the first `ct:MatrixRow`.

use log::{debug, warn};

use super::{filled, Matrix};
use crate::codec;
use crate::error::{Result, SoError};
use crate::reader::EventHandler;
use crate::schema::elements;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Names {
    Rows,
    Columns,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Value {
    Real,
    Na,
    NaN,
    PlusInf,
    MinusInf,
}

impl Value {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            elements::REAL | elements::INT => Value::Real,
            elements::NA => Value::Na,
            elements::NAN => Value::NaN,
            elements::PLUS_INF => Value::PlusInf,
            elements::MINUS_INF => Value::MinusInf,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Matrix,
    Names(Names),
    Name(Names),
    MatrixRow,
    Value(Value),
    Ignored,
}

/// Builds a [`Matrix`] from the events inside its element
#[derive(Debug)]
pub(crate) struct MatrixParser {
    matrix: Matrix,
    stack: Vec<State>,
    current_row: usize,
    current_col: usize,
    text: String,
}

impl MatrixParser {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            matrix: Matrix::new(name),
            stack: Vec::new(),
            current_row: 0,
            current_col: 0,
            text: String::new(),
        }
    }

    pub(crate) fn finish(mut self) -> Result<Matrix> {
        let cells = self.matrix.num_rows * self.matrix.num_cols;
        if self.current_row != self.matrix.num_rows && (cells > 0 || self.current_row > 0) {
            return Err(SoError::MalformedDocument(format!(
                "Matrix {} has {} rows of values, expected {}",
                self.matrix.name, self.current_row, self.matrix.num_rows
            )));
        }
        self.matrix.sized = true;
        debug!(
            "Parsed matrix {} ({}x{})",
            self.matrix.name, self.matrix.num_rows, self.matrix.num_cols
        );
        Ok(self.matrix)
    }

    fn start_value(&mut self, value: Value) -> Result<()> {
        let rows = self.matrix.num_rows;
        let cols = self.matrix.num_cols;
        if self.matrix.data.is_empty() {
            self.matrix.data = filled(rows * cols, 0.0, "matrix data")?;
        }
        if self.current_row >= rows || self.current_col >= cols {
            return Err(SoError::MalformedDocument(format!(
                "Value ({}, {}) outside of the {}x{} matrix {}",
                self.current_row + 1,
                self.current_col + 1,
                rows,
                cols,
                self.matrix.name
            )));
        }
        self.text.clear();
        self.stack.push(State::Value(value));
        Ok(())
    }

    fn commit_value(&mut self, value: Value) {
        let x = match value {
            Value::Real => codec::string_to_double(&self.text),
            Value::Na => codec::na(),
            Value::NaN => f64::NAN,
            Value::PlusInf => f64::INFINITY,
            Value::MinusInf => f64::NEG_INFINITY,
        };
        let index = self.current_row * self.matrix.num_cols + self.current_col;
        self.matrix.data[index] = x;
        self.current_col += 1;
    }

    fn commit_name(&mut self, names: Names) -> Result<()> {
        if !self.matrix.data.is_empty() {
            return Err(SoError::MalformedDocument(format!(
                "Names of matrix {} must precede its rows",
                self.matrix.name
            )));
        }
        let name = std::mem::take(&mut self.text);
        let list = match names {
            Names::Rows => {
                self.matrix.num_rows += 1;
                &mut self.matrix.row_names
            }
            Names::Columns => {
                self.matrix.num_cols += 1;
                &mut self.matrix.column_names
            }
        };
        list.try_reserve(1)
            .map_err(|_| SoError::Allocation { what: "matrix names" })?;
        list.push(name);
        Ok(())
    }

    fn end_row(&mut self) -> Result<()> {
        if self.current_col != self.matrix.num_cols {
            return Err(SoError::MalformedDocument(format!(
                "Row {} of matrix {} has {} values, expected {}",
                self.current_row + 1,
                self.matrix.name,
                self.current_col,
                self.matrix.num_cols
            )));
        }
        self.current_row += 1;
        self.current_col = 0;
        Ok(())
    }
}

impl EventHandler for MatrixParser {
    fn on_start(&mut self, name: &str, _attrs: &[(String, String)]) -> Result<()> {
        match (self.stack.last().copied(), name) {
            (Some(State::Ignored), _) => self.stack.push(State::Ignored),
            (None, elements::MATRIX) => self.stack.push(State::Matrix),
            (Some(State::Matrix), elements::ROW_NAMES) => {
                self.stack.push(State::Names(Names::Rows))
            }
            (Some(State::Matrix), elements::COLUMN_NAMES) => {
                self.stack.push(State::Names(Names::Columns))
            }
            (Some(State::Matrix), elements::MATRIX_ROW) => {
                self.current_col = 0;
                self.stack.push(State::MatrixRow);
            }
            (Some(State::Names(names)), elements::STRING) => {
                self.text.clear();
                self.stack.push(State::Name(names));
            }
            (Some(State::MatrixRow), other) => match Value::from_name(other) {
                Some(value) => self.start_value(value)?,
                None => {
                    return Err(SoError::MalformedDocument(format!(
                        "Unexpected <{}> in row of matrix {}",
                        other, self.matrix.name
                    )))
                }
            },
            (_, other) => {
                warn!("Skipping <{}> in matrix {}", other, self.matrix.name);
                self.stack.push(State::Ignored);
            }
        }
        Ok(())
    }

    fn on_end(&mut self, name: &str) -> Result<()> {
        match self.stack.pop() {
            Some(State::Name(names)) => self.commit_name(names)?,
            Some(State::Value(value)) => self.commit_value(value),
            Some(State::MatrixRow) => self.end_row()?,
            Some(_) => {}
            None => {
                return Err(SoError::MalformedDocument(format!(
                    "Unbalanced </{}> in matrix {}",
                    name, self.matrix.name
                )))
            }
        }
        Ok(())
    }

    fn on_characters(&mut self, text: &str) -> Result<()> {
        if matches!(
            self.stack.last(),
            Some(State::Name(_)) | Some(State::Value(_))
        ) {
            self.text.push_str(text);
        }
        Ok(())
    }
}
