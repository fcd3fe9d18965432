//! # ss-export
//!
//! Monthly report exports. An [`ExportBook`] describes the sheets; the
//! writers render it as an xlsx workbook, a CSV of the active sheet or a zip
//! holding one CSV per sheet.

pub mod archive;
pub mod csv;
pub mod error;
pub mod format;
pub mod layout;
pub mod xlsx;

pub use error::{ExportError, ExportResult};
pub use format::{file_name, ExportFormat};
pub use layout::{EmployeeSheet, ExportBook, ExportKind};

use ss_core::period::MonthPeriod;
use ss_models::{Project, ReportEntry, User};

/// A rendered export ready to be sent as an attachment
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

pub fn render(book: &ExportBook, format: ExportFormat) -> ExportResult<Vec<u8>> {
    match format {
        ExportFormat::Xlsx => xlsx::to_xlsx(book),
        ExportFormat::Csv => Ok(book
            .active_sheet()
            .map(csv::sheet_to_csv)
            .unwrap_or_default()
            .into_bytes()),
        ExportFormat::Zip => archive::to_zip(book),
    }
}

fn export(name: &str, book: &ExportBook, period: MonthPeriod, format: ExportFormat) -> ExportResult<ExportFile> {
    let bytes = render(book, format)?;
    let file_name = file_name(name, period, format);
    tracing::info!("Exported {} ({} bytes)", file_name, bytes.len());
    Ok(ExportFile {
        file_name,
        content_type: format.content_type(),
        bytes,
    })
}

/// Every report of one user in the month
pub fn export_user(
    user: &User,
    period: MonthPeriod,
    entries: &[ReportEntry],
    format: ExportFormat,
) -> ExportResult<ExportFile> {
    let book = ExportBook::for_user(user, entries);
    export(&user.export_display_name(), &book, period, format)
}

/// One sheet per project member who reported in the month
pub fn export_project(
    project: &Project,
    members: &[User],
    period: MonthPeriod,
    entries: &[ReportEntry],
    format: ExportFormat,
) -> ExportResult<ExportFile> {
    let book = ExportBook::for_project(members, entries);
    export(&project.name, &book, period, format)
}

/// A single member's reports within a project
pub fn export_project_author(
    project: &Project,
    author: &User,
    period: MonthPeriod,
    entries: &[ReportEntry],
    format: ExportFormat,
) -> ExportResult<ExportFile> {
    let book = ExportBook::for_project_author(author, entries);
    let name = format!("{}-{}", project.name, author.export_display_name());
    export(&name, &book, period, format)
}
