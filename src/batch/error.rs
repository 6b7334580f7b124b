use std::path::PathBuf;

use crate::pipeline::PipelineError;

/// Errors raised by input discovery and the batch loop
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// I/O error while listing the input directory
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Input path is not a readable directory
    #[error("not a readable input directory: {}", .path.display())]
    InputDir {
        /// The offending path
        path: PathBuf,
    },

    /// A file failed a pipeline stage under the fail-fast policy
    ///
    /// Carries the zero-based position so the offending file can be located
    /// and removed before re-running.
    #[error("file {index} failed ({}): {source}", .path.display())]
    FileFailed {
        /// Zero-based position of the file in the input list
        index: usize,
        /// Path of the failing file
        path: PathBuf,
        /// The stage error
        #[source]
        source: PipelineError,
    },

    /// Consolidated tables lost the one-row-per-file alignment
    #[error("table {table} has {actual} rows, expected {expected}")]
    Misaligned {
        /// Name of the misaligned table
        table: &'static str,
        /// Length the table actually has
        actual: usize,
        /// Length of the device table
        expected: usize,
    },
}
