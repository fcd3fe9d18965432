use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::csv::sheet_to_csv;
use crate::error::ExportResult;
use crate::layout::ExportBook;

/// One `<sheet>.csv` entry per sheet
pub fn to_zip(book: &ExportBook) -> ExportResult<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for sheet in &book.sheets {
        writer.start_file(format!("{}.csv", sheet.name), options)?;
        writer.write_all(sheet_to_csv(sheet).as_bytes())?;
    }

    let bytes = writer.finish()?.into_inner();
    tracing::debug!("Generated zip with {} files, {} bytes", book.sheets.len(), bytes.len());
    Ok(bytes)
}
