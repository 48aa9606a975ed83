use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Result, WarehouseError};
use crate::models::Period;

fn period_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?P<month>[0-9]{2})\.(?P<year>[0-9]{4})").unwrap())
}

fn department_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^DEPARTMENT\s+([0-9]+)-F\s*$").unwrap())
}

/// Reporting period from the first `mm.yyyy` in a file name.
pub fn parse_period(file_name: &str) -> Result<Period> {
    let name = Path::new(file_name)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file_name.to_string());

    let caps = period_pattern()
        .captures(&name)
        .ok_or_else(|| WarehouseError::Format(format!("Could not find mm.yyyy in filename: {name}")))?;

    let month: u32 = caps["month"]
        .parse()
        .map_err(|_| WarehouseError::Format(format!("Bad month in filename: {name}")))?;
    let year: i32 = caps["year"]
        .parse()
        .map_err(|_| WarehouseError::Format(format!("Bad year in filename: {name}")))?;

    if !(1..=12).contains(&month) {
        return Err(WarehouseError::Format(format!(
            "Month out of range in filename: {month}"
        )));
    }
    Ok(Period { year, month })
}

/// Department id from a sheet named like `DEPARTMENT 100-F`; `None` for any other sheet.
pub fn parse_department(sheet_name: &str) -> Option<String> {
    department_pattern()
        .captures(sheet_name.trim())
        .map(|caps| caps[1].to_string())
}
