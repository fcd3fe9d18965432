//! Sheet layout shared by the xlsx and CSV writers
//!
//! Row 1 carries the employee name, row 2 the column headers, data starts on
//! row 3 and a totals row closes the sheet. Rows are zero based here.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use ss_core::traits::Id;
use ss_core::types::WorkHours;
use ss_models::{ReportEntry, User};

pub const NAME_ROW: u32 = 0;
pub const HEADER_ROW: u32 = 1;
pub const FIRST_DATA_ROW: u32 = 2;

/// Columns A to D hold the merged employee name
pub const NAME_LAST_COLUMN: u16 = 3;

pub const ROW_HEIGHT: f64 = 15.0;
pub const TOTAL_LABEL: &str = "Total";

const SHEET_NAME_MAX: usize = 31;
const SHEET_NAME_FORBIDDEN: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Date,
    DailyHours,
    Project,
    TaskActivity,
    Hours,
    Description,
}

impl Column {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::DailyHours => "Daily hours",
            Self::Project => "Project",
            Self::TaskActivity => "Task activity",
            Self::Hours => "Hours",
            Self::Description => "Description",
        }
    }

    /// Width in characters
    pub fn width(&self) -> f64 {
        match self {
            Self::Date => 12.0,
            Self::DailyHours => 12.0,
            Self::Project => 25.0,
            Self::TaskActivity => 20.0,
            Self::Hours => 8.0,
            Self::Description => 70.0,
        }
    }
}

const USER_COLUMNS: [Column; 6] = [
    Column::Date,
    Column::DailyHours,
    Column::Project,
    Column::TaskActivity,
    Column::Hours,
    Column::Description,
];

const PROJECT_COLUMNS: [Column; 5] = [
    Column::Date,
    Column::DailyHours,
    Column::TaskActivity,
    Column::Hours,
    Column::Description,
];

/// A user's own export lists the project, a project export does not
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    User,
    Project,
}

impl ExportKind {
    pub fn columns(&self) -> &'static [Column] {
        match self {
            Self::User => &USER_COLUMNS,
            Self::Project => &PROJECT_COLUMNS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    /// Blank when the previous row has the same date
    pub date: Option<NaiveDate>,
    pub daily_hours: Option<WorkHours>,
    pub project: String,
    pub task_activity: String,
    pub hours: WorkHours,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeSheet {
    pub name: String,
    pub employee: String,
    pub kind: ExportKind,
    pub rows: Vec<SheetRow>,
}

impl EmployeeSheet {
    /// Expects entries ordered by date
    pub fn build(employee: impl Into<String>, kind: ExportKind, entries: &[&ReportEntry]) -> Self {
        let mut daily: BTreeMap<NaiveDate, WorkHours> = BTreeMap::new();
        for entry in entries {
            *daily.entry(entry.report.date).or_insert(WorkHours::ZERO) += entry.report.work_hours;
        }

        let mut last_date = None;
        let rows = entries
            .iter()
            .map(|entry| {
                let date = entry.report.date;
                let first_of_day = last_date != Some(date);
                last_date = Some(date);
                SheetRow {
                    date: first_of_day.then_some(date),
                    daily_hours: if first_of_day { daily.get(&date).copied() } else { None },
                    project: entry.project_name.clone(),
                    task_activity: entry.task_activity_name.clone(),
                    hours: entry.report.work_hours,
                    description: entry.report.plain_description(),
                }
            })
            .collect();

        let employee = employee.into();
        Self {
            name: sanitize_sheet_name(&employee),
            employee,
            kind,
            rows,
        }
    }

    pub fn columns(&self) -> &'static [Column] {
        self.kind.columns()
    }

    pub fn title(&self) -> String {
        format!("Employee: {}", self.employee)
    }

    pub fn total(&self) -> WorkHours {
        self.rows.iter().map(|row| row.hours).sum()
    }

    pub fn total_row(&self) -> u32 {
        FIRST_DATA_ROW + self.rows.len() as u32
    }

    pub fn column_index(&self, column: Column) -> Option<u16> {
        self.columns()
            .iter()
            .position(|c| *c == column)
            .map(|i| i as u16)
    }
}

/// Row height fitting a wrapped description
pub fn row_height(description: &str, width: f64) -> f64 {
    let width = width.max(1.0) as usize;
    let lines: usize = description
        .lines()
        .map(|line| line.chars().count().div_ceil(width).max(1))
        .sum();
    ROW_HEIGHT * lines.max(1) as f64
}

/// Sheet names are at most 31 characters without `[]:*?/\`
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if SHEET_NAME_FORBIDDEN.contains(&c) { '_' } else { c })
        .take(SHEET_NAME_MAX)
        .collect();
    let cleaned = cleaned.trim().trim_matches('\'').to_string();
    if cleaned.is_empty() {
        "Sheet".to_string()
    } else {
        cleaned
    }
}

/// Suffix repeated names, compared case insensitively like spreadsheet apps do
fn make_unique_names(sheets: &mut [EmployeeSheet]) {
    let mut seen: HashSet<String> = HashSet::new();
    for sheet in sheets.iter_mut() {
        let mut candidate = sheet.name.clone();
        let mut counter = 2;
        while seen.contains(&candidate.to_lowercase()) {
            let suffix = format!(" ({})", counter);
            let keep = SHEET_NAME_MAX.saturating_sub(suffix.chars().count());
            let base: String = sheet.name.chars().take(keep).collect();
            candidate = format!("{}{}", base, suffix);
            counter += 1;
        }
        seen.insert(candidate.to_lowercase());
        sheet.name = candidate;
    }
}

/// Sheets of one export; the first one is the active sheet
#[derive(Debug, Clone, PartialEq)]
pub struct ExportBook {
    pub sheets: Vec<EmployeeSheet>,
}

impl ExportBook {
    /// One sheet with every report of the user
    pub fn for_user(user: &User, entries: &[ReportEntry]) -> Self {
        let entries: Vec<&ReportEntry> = entries.iter().collect();
        Self {
            sheets: vec![EmployeeSheet::build(
                user.export_display_name(),
                ExportKind::User,
                &entries,
            )],
        }
    }

    /// One sheet per member with reports, sorted by name
    pub fn for_project(members: &[User], entries: &[ReportEntry]) -> Self {
        let mut sheets: Vec<EmployeeSheet> = members
            .iter()
            .filter_map(|member| {
                let member_id: Id = member.id?;
                let own: Vec<&ReportEntry> = entries
                    .iter()
                    .filter(|e| e.report.author_id == member_id)
                    .collect();
                if own.is_empty() {
                    None
                } else {
                    Some(EmployeeSheet::build(
                        member.export_display_name(),
                        ExportKind::Project,
                        &own,
                    ))
                }
            })
            .collect();

        sheets.sort_by_key(|sheet| sheet.name.to_lowercase());
        make_unique_names(&mut sheets);
        Self { sheets }
    }

    /// Sheet of a single project member
    pub fn for_project_author(author: &User, entries: &[ReportEntry]) -> Self {
        let own: Vec<&ReportEntry> = entries
            .iter()
            .filter(|e| Some(e.report.author_id) == author.id)
            .collect();
        Self {
            sheets: vec![EmployeeSheet::build(
                author.export_display_name(),
                ExportKind::Project,
                &own,
            )],
        }
    }

    pub fn active_sheet(&self) -> Option<&EmployeeSheet> {
        self.sheets.first()
    }
}
