//! CSV rendering of a single sheet

use crate::layout::{Column, EmployeeSheet, SheetRow, TOTAL_LABEL};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Quote fields holding a separator, quote or line break; double quotes
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn push_record(out: &mut String, fields: &[String]) {
    let line: Vec<String> = fields.iter().map(|f| escape_field(f)).collect();
    out.push_str(&line.join(","));
    out.push_str("\r\n");
}

fn cell(row: &SheetRow, column: Column) -> String {
    match column {
        Column::Date => row
            .date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default(),
        Column::DailyHours => row.daily_hours.map(|h| h.to_string()).unwrap_or_default(),
        Column::Project => row.project.clone(),
        Column::TaskActivity => row.task_activity.clone(),
        Column::Hours => row.hours.to_string(),
        Column::Description => row.description.clone(),
    }
}

/// Same grid as the worksheet: name row, headers, data, totals
pub fn sheet_to_csv(sheet: &EmployeeSheet) -> String {
    let columns = sheet.columns();
    let width = columns.len();
    let mut out = String::new();

    let mut title = vec![String::new(); width];
    title[0] = sheet.title();
    push_record(&mut out, &title);

    let headers: Vec<String> = columns.iter().map(|c| c.title().to_string()).collect();
    push_record(&mut out, &headers);

    for row in &sheet.rows {
        let fields: Vec<String> = columns.iter().map(|c| cell(row, *c)).collect();
        push_record(&mut out, &fields);
    }

    let mut total = vec![String::new(); width];
    total[0] = TOTAL_LABEL.to_string();
    if let Some(hours_col) = sheet.column_index(Column::Hours) {
        total[hours_col as usize] = sheet.total().to_string();
    }
    push_record(&mut out, &total);

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::tests::{entry, member};
    use crate::layout::ExportBook;

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_user_sheet_csv() {
        let mut entries = vec![entry(1, 1, 2, "Alpha"), entry(1, 1, 1, "Beta, Inc")];
        entries[1].report.description = "Fixes, tests".into();
        let book = ExportBook::for_user(&member(1, "Jan", "Kowalski"), &entries);
        let csv = sheet_to_csv(book.active_sheet().unwrap());

        let lines: Vec<&str> = csv.split("\r\n").collect();
        assert_eq!(lines[0], "Employee: Jan K.,,,,,");
        assert_eq!(lines[1], "Date,Daily hours,Project,Task activity,Hours,Description");
        assert_eq!(lines[2], "2024-03-01,03:00,Alpha,Other,02:00,Code review");
        assert_eq!(lines[3], ",,\"Beta, Inc\",Other,01:00,\"Fixes, tests\"");
        assert_eq!(lines[4], "Total,,,,03:00,");
    }
}
