use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use ss_core::period::MonthPeriod;

use crate::error::ExportError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
    Zip,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
            Self::Zip => "zip",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Csv => "text/csv; charset=utf-8",
            Self::Zip => "application/zip",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "xlsx" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            "zip" => Ok(Self::Zip),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// `<name>-<year>-<month>.<ext>`, path separators replaced
pub fn file_name(name: &str, period: MonthPeriod, format: ExportFormat) -> String {
    let name: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | '"') { '_' } else { c })
        .collect();
    format!(
        "{}-{}-{:02}.{}",
        name.trim(),
        period.year,
        period.month,
        format.extension()
    )
}
