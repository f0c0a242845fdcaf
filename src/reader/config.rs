/// Default size of the input buffer in bytes
pub const DEFAULT_INPUT_BUFFER_SIZE: usize = 64 * 1024;

/// Configuration for reading SO documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Size of the buffered reader wrapped around input files
    pub buffer_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_INPUT_BUFFER_SIZE,
        }
    }
}
