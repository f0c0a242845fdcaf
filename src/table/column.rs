//! A single typed column of a [`Table`](super::Table).

use crate::error::{Result, SoError};
use crate::schema::{ColumnType, ValueType};

/// Number of cells a column buffer grows by when full
pub const GROWTH_INCREMENT: usize = 256;

/// Homogeneous cell storage of a column
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// `real` cells
    Real(Vec<f64>),
    /// `int` cells
    Int(Vec<i64>),
    /// `string` and `id` cells
    Text(Vec<String>),
    /// `boolean` cells
    Boolean(Vec<bool>),
}

impl ColumnData {
    /// Empty storage for a value type
    pub fn empty(value_type: ValueType) -> Self {
        match value_type {
            ValueType::Real => ColumnData::Real(Vec::new()),
            ValueType::Int => ColumnData::Int(Vec::new()),
            ValueType::String | ValueType::Id => ColumnData::Text(Vec::new()),
            ValueType::Boolean => ColumnData::Boolean(Vec::new()),
        }
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Real(v) => v.len(),
            ColumnData::Int(v) => v.len(),
            ColumnData::Text(v) => v.len(),
            ColumnData::Boolean(v) => v.len(),
        }
    }

    /// True when there are no cells
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this storage can hold cells of `value_type`
    pub fn holds(&self, value_type: ValueType) -> bool {
        matches!(
            (self, value_type),
            (ColumnData::Real(_), ValueType::Real)
                | (ColumnData::Int(_), ValueType::Int)
                | (ColumnData::Text(_), ValueType::String | ValueType::Id)
                | (ColumnData::Boolean(_), ValueType::Boolean)
        )
    }

    /// The value type implied by the storage (`String` for text)
    pub fn implied_value_type(&self) -> ValueType {
        match self {
            ColumnData::Real(_) => ValueType::Real,
            ColumnData::Int(_) => ValueType::Int,
            ColumnData::Text(_) => ValueType::String,
            ColumnData::Boolean(_) => ValueType::Boolean,
        }
    }

    /// Deep copy that reports allocation failure instead of aborting
    pub(crate) fn try_clone(&self) -> Result<Self> {
        fn copy<T: Clone>(v: &[T]) -> Result<Vec<T>> {
            let mut out = Vec::new();
            out.try_reserve_exact(v.len())
                .map_err(|_| SoError::Allocation { what: "column copy" })?;
            out.extend_from_slice(v);
            Ok(out)
        }
        Ok(match self {
            ColumnData::Real(v) => ColumnData::Real(copy(v)?),
            ColumnData::Int(v) => ColumnData::Int(copy(v)?),
            ColumnData::Text(v) => ColumnData::Text(copy(v)?),
            ColumnData::Boolean(v) => ColumnData::Boolean(copy(v)?),
        })
    }
}

/// Grow `v` by a fixed increment when it is full.
fn reserve_one<T>(v: &mut Vec<T>) -> Result<()> {
    if v.len() == v.capacity() {
        v.try_reserve_exact(GROWTH_INCREMENT)
            .map_err(|_| SoError::Allocation { what: "column data" })?;
    }
    Ok(())
}

/// A named, typed column.
///
/// The value type is fixed at creation. Appends of a different type fail
/// with [`SoError::TypeMismatch`] and leave the column untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    column_id: String,
    column_types: Vec<ColumnType>,
    value_type: ValueType,
    data: ColumnData,
}

impl Column {
    /// Create an empty, unnamed column
    pub fn new(value_type: ValueType) -> Self {
        Self {
            column_id: String::new(),
            column_types: Vec::new(),
            value_type,
            data: ColumnData::empty(value_type),
        }
    }

    /// Create a column around existing storage
    pub(crate) fn from_parts(
        column_id: &str,
        column_types: &[ColumnType],
        value_type: ValueType,
        data: ColumnData,
    ) -> Result<Self> {
        if !data.holds(value_type) {
            return Err(SoError::TypeMismatch {
                column: column_id.to_string(),
                expected: value_type,
                found: data.implied_value_type(),
            });
        }
        let mut column = Self {
            column_id: column_id.to_string(),
            column_types: Vec::new(),
            value_type,
            data,
        };
        for t in column_types {
            column.add_column_type(*t);
        }
        Ok(column)
    }

    /// Same id, roles and value type, no cells
    pub(crate) fn empty_like(&self) -> Self {
        Self {
            column_id: self.column_id.clone(),
            column_types: self.column_types.clone(),
            value_type: self.value_type,
            data: ColumnData::empty(self.value_type),
        }
    }

    /// Column identifier (`columnId`)
    pub fn column_id(&self) -> &str {
        &self.column_id
    }

    /// Set the column identifier
    pub fn set_column_id(&mut self, column_id: impl Into<String>) {
        self.column_id = column_id.into();
    }

    /// Semantic roles of the column, in insertion order
    pub fn column_types(&self) -> &[ColumnType] {
        &self.column_types
    }

    /// Add a role. `Undefined` and roles already present are ignored.
    pub fn add_column_type(&mut self, column_type: ColumnType) {
        if column_type != ColumnType::Undefined && !self.column_types.contains(&column_type) {
            self.column_types.push(column_type);
        }
    }

    /// Drop all roles
    pub fn remove_column_types(&mut self) {
        self.column_types.clear();
    }

    /// Whether the column carries the role
    pub fn has_column_type(&self, column_type: ColumnType) -> bool {
        self.column_types.contains(&column_type)
    }

    /// Declared value type
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the column has no cells
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Cell storage
    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    /// Real cells, if this is a `real` column
    pub fn reals(&self) -> Option<&[f64]> {
        match &self.data {
            ColumnData::Real(v) => Some(v),
            _ => None,
        }
    }

    /// Integer cells, if this is an `int` column
    pub fn ints(&self) -> Option<&[i64]> {
        match &self.data {
            ColumnData::Int(v) => Some(v),
            _ => None,
        }
    }

    /// Text cells, if this is a `string` or `id` column
    pub fn strings(&self) -> Option<&[String]> {
        match &self.data {
            ColumnData::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Boolean cells, if this is a `boolean` column
    pub fn booleans(&self) -> Option<&[bool]> {
        match &self.data {
            ColumnData::Boolean(v) => Some(v),
            _ => None,
        }
    }

    fn mismatch(&self, found: ValueType) -> SoError {
        SoError::TypeMismatch {
            column: self.column_id.clone(),
            expected: self.value_type,
            found,
        }
    }

    /// Append a real value
    pub fn append_real(&mut self, value: f64) -> Result<()> {
        match &mut self.data {
            ColumnData::Real(v) => {
                reserve_one(v)?;
                v.push(value);
                Ok(())
            }
            _ => Err(self.mismatch(ValueType::Real)),
        }
    }

    /// Append an integer value
    pub fn append_int(&mut self, value: i64) -> Result<()> {
        match &mut self.data {
            ColumnData::Int(v) => {
                reserve_one(v)?;
                v.push(value);
                Ok(())
            }
            _ => Err(self.mismatch(ValueType::Int)),
        }
    }

    /// Append a text value to a `string` or `id` column
    pub fn append_string(&mut self, value: impl Into<String>) -> Result<()> {
        match &mut self.data {
            ColumnData::Text(v) => {
                reserve_one(v)?;
                v.push(value.into());
                Ok(())
            }
            _ => Err(self.mismatch(ValueType::String)),
        }
    }

    /// Append a boolean value
    pub fn append_boolean(&mut self, value: bool) -> Result<()> {
        match &mut self.data {
            ColumnData::Boolean(v) => {
                reserve_one(v)?;
                v.push(value);
                Ok(())
            }
            _ => Err(self.mismatch(ValueType::Boolean)),
        }
    }
}
