//! # Dataset tables
//!
//! A [`Table`] is an ordered set of typed [`Column`]s of equal length. In an
//! SO document it is written as a `ds:Definition` block declaring the
//! columns, followed either by inline rows:
//!
//! ```text
//! <Predictions>
//!   <ds:Definition>
//!     <ds:Column columnId="ID" columnType="id" valueType="id" columnNum="1"/>
//!     <ds:Column columnId="TIME" columnType="undefined" valueType="real" columnNum="2"/>
//!   </ds:Definition>
//!   <ds:Table>
//!     <ds:Row><ct:Id>58</ct:Id><ct:Real>60.300000</ct:Real></ds:Row>
//!   </ds:Table>
//! </Predictions>
//! ```
//!
//! or by a `ds:ExternalFile` reference to a delimited text file holding the
//! rows.

mod column;
mod external;
mod parser;
mod writer;


pub use column::{Column, ColumnData, GROWTH_INCREMENT};
pub(crate) use parser::TableParser;

use log::debug;

use crate::error::{Result, SoError};
use crate::external::ExternalFile;
use crate::schema::{ColumnType, Delimiter, ValueType};

/// A typed dataset table
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    attributes: Vec<(String, String)>,
    columns: Vec<Column>,
    num_rows: usize,
    external_file: Option<ExternalFile>,
}

impl Table {
    /// Create an empty table written as element `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            columns: Vec::new(),
            num_rows: 0,
            external_file: None,
        }
    }

    /// Element name as written
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Extra attributes of the table element (`name`, `extFileNo`, ...)
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Value of an extra attribute
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set an extra attribute, replacing an existing value
    pub fn set_attribute(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key.to_string(), value)),
        }
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Set the row count. Existing columns must already have that many cells.
    pub fn set_number_of_rows(&mut self, rows: usize) -> Result<()> {
        if let Some(column) = self.columns.iter().find(|c| c.len() != rows) {
            return Err(SoError::RowCountMismatch {
                column: column.column_id().to_string(),
                expected: rows,
                found: column.len(),
            });
        }
        self.num_rows = rows;
        Ok(())
    }

    /// Number of columns
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// All columns in order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column by position
    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Mutable column by position.
    ///
    /// Appending cells through this handle breaks the equal-length invariant
    /// until every column has been extended; [`Table::sync_rows`] restores
    /// the row count afterwards.
    pub fn column_mut(&mut self, index: usize) -> Option<&mut Column> {
        self.columns.get_mut(index)
    }

    /// First column named `column_id`
    pub fn column_by_name(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.column_id() == column_id)
    }

    /// Position of the first column named `column_id`
    pub fn column_index(&self, column_id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.column_id() == column_id)
    }

    /// First column carrying `column_type`
    pub fn column_by_type(&self, column_type: ColumnType) -> Option<&Column> {
        self.columns.iter().find(|c| c.has_column_type(column_type))
    }

    /// Subject identifier column
    pub fn id_column(&self) -> Option<&Column> {
        self.column_by_type(ColumnType::Id)
    }

    /// Independent variable column
    pub fn idv_column(&self) -> Option<&Column> {
        self.column_by_type(ColumnType::Idv)
    }

    /// Dependent variable column
    pub fn dv_column(&self) -> Option<&Column> {
        self.column_by_type(ColumnType::Dv)
    }

    fn check_new_column(&self, column_id: &str, data: &ColumnData) -> Result<()> {
        if self.column_by_name(column_id).is_some() {
            return Err(SoError::DuplicateColumn(column_id.to_string()));
        }
        if data.len() != self.num_rows {
            return Err(SoError::RowCountMismatch {
                column: column_id.to_string(),
                expected: self.num_rows,
                found: data.len(),
            });
        }
        Ok(())
    }

    /// Add a column holding a copy of `data`.
    ///
    /// `data` must have exactly [`Table::num_rows`] cells and match
    /// `value_type`. Column ids must be unique.
    pub fn new_column(
        &mut self,
        column_id: &str,
        column_types: &[ColumnType],
        value_type: ValueType,
        data: &ColumnData,
    ) -> Result<&mut Column> {
        self.check_new_column(column_id, data)?;
        let column = Column::from_parts(column_id, column_types, value_type, data.try_clone()?)?;
        Ok(self.push_column(column))
    }

    /// Add a column that takes ownership of `data`
    pub fn new_column_no_copy(
        &mut self,
        column_id: &str,
        column_types: &[ColumnType],
        value_type: ValueType,
        data: ColumnData,
    ) -> Result<&mut Column> {
        self.check_new_column(column_id, &data)?;
        let column = Column::from_parts(column_id, column_types, value_type, data)?;
        Ok(self.push_column(column))
    }

    /// Add an empty column for the parser, which fills rows afterwards
    pub(crate) fn add_empty_column(
        &mut self,
        column_id: &str,
        column_types: &[ColumnType],
        value_type: ValueType,
    ) -> Result<&mut Column> {
        if self.column_by_name(column_id).is_some() {
            return Err(SoError::DuplicateColumn(column_id.to_string()));
        }
        let column =
            Column::from_parts(column_id, column_types, value_type, ColumnData::empty(value_type))?;
        Ok(self.push_column(column))
    }

    fn push_column(&mut self, column: Column) -> &mut Column {
        self.columns.push(column);
        let last = self.columns.len() - 1;
        &mut self.columns[last]
    }

    /// Remove the column at `index`; later columns shift down
    pub fn remove_column(&mut self, index: usize) -> Result<Column> {
        if index >= self.columns.len() {
            return Err(SoError::IndexOutOfRange {
                what: "column",
                index,
                len: self.columns.len(),
            });
        }
        Ok(self.columns.remove(index))
    }

    /// Recompute the row count from the columns, which must agree
    pub fn sync_rows(&mut self) -> Result<usize> {
        let Some(first) = self.columns.first() else {
            return Ok(self.num_rows);
        };
        let rows = first.len();
        self.set_number_of_rows(rows)?;
        debug!("Table {} has {} rows", self.name, rows);
        Ok(rows)
    }

    pub(crate) fn check_row_counts(&self) -> Result<()> {
        match self.columns.iter().find(|c| c.len() != self.num_rows) {
            Some(column) => Err(SoError::RowCountMismatch {
                column: column.column_id().to_string(),
                expected: self.num_rows,
                found: column.len(),
            }),
            None => Ok(()),
        }
    }

    /// Keep the data in a delimited file next to the document.
    ///
    /// The file is written together with the document; see
    /// [`Table::set_write_external_file`].
    pub fn use_external_file(&mut self, oid: &str, path: &str, delimiter: Delimiter) {
        let mut file = ExternalFile::delimited(oid, path, delimiter);
        file.set_write_on_serialize(true);
        self.external_file = Some(file);
    }

    /// Write the data inline again
    pub fn no_external_file(&mut self) {
        self.external_file = None;
    }

    /// External data file reference, if the data is kept outside the document
    pub fn external_file(&self) -> Option<&ExternalFile> {
        self.external_file.as_ref()
    }

    pub(crate) fn set_external_file(&mut self, file: ExternalFile) {
        self.external_file = Some(file);
    }

    /// Whether the external data file is written together with the document
    pub fn set_write_external_file(&mut self, write: bool) {
        if let Some(file) = self.external_file.as_mut() {
            file.set_write_on_serialize(write);
        }
    }
}
