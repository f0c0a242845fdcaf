/// Default number of spaces per indentation level
pub const DEFAULT_INDENT_SIZE: usize = 2;

/// Configuration for writing SO documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterConfig {
    /// Indent nested elements
    pub pretty: bool,

    /// Spaces per indentation level when `pretty` is set
    pub indent_size: usize,

    /// Write the delimited data files of tables that keep their rows
    /// outside the document (only tables flagged for it)
    pub write_external_files: bool,

    /// Write through a temporary file in the destination directory and
    /// rename it into place once complete
    pub atomic: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            indent_size: DEFAULT_INDENT_SIZE,
            write_external_files: true,
            atomic: true,
        }
    }
}

impl WriterConfig {
    /// Compact output on a single line
    pub fn compact() -> Self {
        Self {
            pretty: false,
            ..Self::default()
        }
    }

    /// Default configuration with the given indentation choice
    pub fn with_pretty(pretty: bool) -> Self {
        Self {
            pretty,
            ..Self::default()
        }
    }
}
