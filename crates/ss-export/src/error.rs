use ss_core::error::SsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported export format '{0}'")]
    UnsupportedFormat(String),
}

pub type ExportResult<T> = Result<T, ExportError>;

impl From<ExportError> for SsError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::UnsupportedFormat(format) => {
                ss_core::error::ValidationErrors::single(
                    "format",
                    format!("Unsupported export format '{}'", format),
                )
                .into()
            }
            other => SsError::Export(other.to_string()),
        }
    }
}
