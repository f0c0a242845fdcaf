//! Delimited data files of tables that delegate their rows.

use std::path::{Path, PathBuf};

use log::info;

use super::{ColumnData, Table};
use crate::codec;
use crate::error::{Result, SoError};
use crate::schema::Delimiter;
use crate::writer::OutputFile;

impl Table {
    fn external_location(&self, base_dir: &Path) -> Result<(PathBuf, Delimiter)> {
        let file = self.external_file.as_ref().ok_or_else(|| {
            SoError::InvalidStructure(format!("Table {} has no external file", self.name))
        })?;
        let path = file.path().ok_or_else(|| {
            SoError::InvalidStructure(format!("External file of table {} has no path", self.name))
        })?;
        Ok((base_dir.join(path), file.delimiter().unwrap_or_default()))
    }

    /// Text of one cell as written to the data file.
    ///
    /// Reals use the plain `%f` text, so NA and NaN both come out as `nan`
    /// and infinities as `inf`/`-inf`.
    fn cell_text(data: &ColumnData, row: usize) -> String {
        match data {
            ColumnData::Real(v) => codec::double_to_string(v[row]),
            ColumnData::Int(v) => codec::int_to_string(v[row]),
            ColumnData::Text(v) => v[row].clone(),
            ColumnData::Boolean(v) => codec::bool_to_string(v[row]).to_string(),
        }
    }

    /// Text cells must fit on one line of the data file
    fn check_single_line_cells(&self) -> Result<()> {
        for column in &self.columns {
            if let ColumnData::Text(v) = column.data() {
                if let Some(row) = v.iter().position(|s| s.contains(['\n', '\r'])) {
                    return Err(SoError::InvalidStructure(format!(
                        "Row {} of column '{}' contains a line break",
                        row,
                        column.column_id()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Write the rows to the external data file, resolved against `base_dir`.
    ///
    /// One line per row, one field per column, no header line. Text cells
    /// with line breaks are rejected. With `atomic`
    /// the file is written to a temporary file first and renamed on success.
    pub fn write_external_data(&self, base_dir: &Path, atomic: bool) -> Result<()> {
        let (path, delimiter) = self.external_location(base_dir)?;
        self.check_row_counts()?;
        self.check_single_line_cells()?;

        let output = OutputFile::create(&path, atomic)?;
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter.as_byte())
            .quote_style(csv::QuoteStyle::Necessary)
            .terminator(csv::Terminator::Any(b'\n'))
            .has_headers(false)
            .from_writer(output);

        let mut record = Vec::with_capacity(self.columns.len());
        for row in 0..self.num_rows {
            record.clear();
            record.extend(self.columns.iter().map(|c| Self::cell_text(c.data(), row)));
            writer.write_record(&record)?;
        }

        let output = writer
            .into_inner()
            .map_err(|e| SoError::Io(e.into_error()))?;
        output.commit()?;

        info!(
            "Wrote {} rows of table {} to {}",
            self.num_rows,
            self.name,
            path.display()
        );
        Ok(())
    }

    /// Read the rows of the external data file into the (declared) columns.
    ///
    /// The path is resolved against `base_dir`, normally the directory of the
    /// SO document. Existing cells are replaced only when the whole file was
    /// read. Returns the number of rows.
    pub fn load_external_file(&mut self, base_dir: &Path) -> Result<usize> {
        let (path, delimiter) = self.external_location(base_dir)?;
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter.as_byte())
            .has_headers(false)
            .flexible(true)
            .from_path(&path)?;

        let mut columns: Vec<_> = self.columns.iter().map(|c| c.empty_like()).collect();
        let mut rows = 0;
        for record in reader.records() {
            let record = record?;
            if record.len() != columns.len() {
                return Err(SoError::MalformedDocument(format!(
                    "Line {} of {} has {} fields, table {} has {} columns",
                    rows + 1,
                    path.display(),
                    record.len(),
                    self.name,
                    columns.len()
                )));
            }
            for (column, field) in columns.iter_mut().zip(record.iter()) {
                match column.data() {
                    ColumnData::Real(_) => column.append_real(codec::string_to_double(field))?,
                    ColumnData::Int(_) => column.append_int(codec::string_to_int(field))?,
                    ColumnData::Text(_) => column.append_string(field)?,
                    ColumnData::Boolean(_) => column.append_boolean(codec::string_to_bool(field))?,
                }
            }
            rows += 1;
        }

        self.columns = columns;
        self.num_rows = rows;
        info!(
            "Loaded {} rows of table {} from {}",
            rows,
            self.name,
            path.display()
        );
        Ok(rows)
    }
}
