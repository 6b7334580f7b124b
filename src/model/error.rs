/// Errors raised by record serialization and contract checks
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Columnar table with mismatched column lengths
    #[error("column length mismatch: {column} has {actual} rows, expected {expected}")]
    ColumnLengthMismatch {
        /// Name of the offending column
        column: &'static str,
        /// Length the column actually has
        actual: usize,
        /// Length shared by the reference column
        expected: usize,
    },
}
