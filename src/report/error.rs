/// Errors raised while rendering or exporting the report
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// No runs were consolidated, so there is nothing to report on
    #[error("batch holds no runs")]
    EmptyBatch,

    /// I/O error while writing report output
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV error while exporting the consolidated tables
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}
