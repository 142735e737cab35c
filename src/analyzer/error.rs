use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Missing data: {0}")]
    MissingData(String),

    #[error("Invalid record at row {row}: {reason}")]
    InvalidRecord { row: usize, reason: String },

    #[error("Invalid game clock: {0}")]
    InvalidClock(String),

    #[error("Unexpected category in {view}: {value}")]
    UnexpectedCategory { view: &'static str, value: String },

    #[error("Empty result: {0} has no attempts to aggregate")]
    EmptyResult(&'static str),

    #[error("Chart error: {0}")]
    ChartError(String),
}
