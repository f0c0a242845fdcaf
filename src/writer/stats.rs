use std::fmt;

/// Statistics from a completed document write
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriterStats {
    /// Number of container elements written
    pub elements_written: usize,
    /// Number of tables written
    pub tables_written: usize,
    /// Total number of table rows, inline or external
    pub rows_written: usize,
    /// Number of matrices written
    pub matrices_written: usize,
    /// Number of delimited data files written next to the document
    pub external_files_written: usize,
}

impl fmt::Display for WriterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} tables ({} rows), {} matrices and {} external data files",
            self.tables_written,
            self.rows_written,
            self.matrices_written,
            self.external_files_written
        )
    }
}
