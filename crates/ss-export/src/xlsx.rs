use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Formula, Workbook, Worksheet};

use crate::error::ExportResult;
use crate::layout::{
    row_height, Column, EmployeeSheet, ExportBook, FIRST_DATA_ROW, HEADER_ROW, NAME_LAST_COLUMN,
    NAME_ROW, TOTAL_LABEL,
};

const HOURS_FORMAT: &str = "[h]:mm";
const DATE_FORMAT: &str = "%Y-%m-%d";

struct Formats {
    title: Format,
    header: Format,
    hours: Format,
    description: Format,
    total: Format,
    total_hours: Format,
}

impl Formats {
    fn new() -> Self {
        let total = Format::new().set_bold().set_border_top(FormatBorder::Thin);
        Self {
            title: Format::new().set_bold(),
            header: Format::new()
                .set_bold()
                .set_align(FormatAlign::Center)
                .set_border(FormatBorder::Thin),
            hours: Format::new().set_num_format(HOURS_FORMAT),
            description: Format::new().set_text_wrap().set_align(FormatAlign::Top),
            total_hours: total.clone().set_num_format(HOURS_FORMAT),
            total,
        }
    }
}

/// Column letters for formulas, 0 is `A`
pub(crate) fn column_letter(mut col: u16) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push((b'A' + (col % 26) as u8) as char);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    letters.iter().rev().collect()
}

fn write_sheet(worksheet: &mut Worksheet, sheet: &EmployeeSheet, formats: &Formats) -> ExportResult<()> {
    worksheet.set_name(&sheet.name)?;
    worksheet.merge_range(NAME_ROW, 0, NAME_ROW, NAME_LAST_COLUMN, &sheet.title(), &formats.title)?;

    let columns = sheet.columns();
    for (index, column) in columns.iter().enumerate() {
        let col = index as u16;
        worksheet.write_string_with_format(HEADER_ROW, col, column.title(), &formats.header)?;
        worksheet.set_column_width(col, column.width())?;
    }

    for (offset, row) in sheet.rows.iter().enumerate() {
        let r = FIRST_DATA_ROW + offset as u32;
        for (index, column) in columns.iter().enumerate() {
            let col = index as u16;
            match column {
                Column::Date => {
                    if let Some(date) = row.date {
                        worksheet.write_string(r, col, date.format(DATE_FORMAT).to_string())?;
                    }
                }
                Column::DailyHours => {
                    if let Some(hours) = row.daily_hours {
                        worksheet.write_number_with_format(r, col, hours.as_day_fraction(), &formats.hours)?;
                    }
                }
                Column::Project => {
                    worksheet.write_string(r, col, &row.project)?;
                }
                Column::TaskActivity => {
                    worksheet.write_string(r, col, &row.task_activity)?;
                }
                Column::Hours => {
                    worksheet.write_number_with_format(r, col, row.hours.as_day_fraction(), &formats.hours)?;
                }
                Column::Description => {
                    worksheet.write_string_with_format(r, col, &row.description, &formats.description)?;
                    worksheet.set_row_height(r, row_height(&row.description, column.width()))?;
                }
            }
        }
    }

    let total_row = sheet.total_row();
    for index in 0..columns.len() {
        worksheet.write_blank(total_row, index as u16, &formats.total)?;
    }
    worksheet.write_string_with_format(total_row, 0, TOTAL_LABEL, &formats.total)?;

    if let Some(hours_col) = sheet.column_index(Column::Hours) {
        if sheet.rows.is_empty() {
            worksheet.write_number_with_format(total_row, hours_col, 0.0, &formats.total_hours)?;
        } else {
            let letter = column_letter(hours_col);
            let formula = format!(
                "=SUM({letter}{first}:{letter}{last})",
                first = FIRST_DATA_ROW + 1,
                last = total_row
            );
            worksheet.write_formula_with_format(
                total_row,
                hours_col,
                Formula::new(formula),
                &formats.total_hours,
            )?;
        }
    }

    Ok(())
}

/// Workbook bytes, one worksheet per sheet
pub fn to_xlsx(book: &ExportBook) -> ExportResult<Vec<u8>> {
    let formats = Formats::new();
    let mut workbook = Workbook::new();

    for sheet in &book.sheets {
        let worksheet = workbook.add_worksheet();
        write_sheet(worksheet, sheet, &formats)?;
    }
    if book.sheets.is_empty() {
        workbook.add_worksheet();
    }

    let buffer = workbook.save_to_buffer()?;
    tracing::debug!("Generated xlsx with {} sheets, {} bytes", book.sheets.len(), buffer.len());
    Ok(buffer)
}
