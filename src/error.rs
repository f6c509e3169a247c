use thiserror::Error;

#[derive(Error, Debug)]
pub enum FiscalPipelineError {
    #[error("Required column '{0}' was not found in the source table")]
    MissingRequiredColumn(&'static str),

    #[error("Source could not be read as tabular data: {0}")]
    UnreadableSource(String),

    #[error("Invalid month '{0}': expected YYYY-MM")]
    InvalidMonth(String),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::XlsxError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FiscalPipelineError>;
