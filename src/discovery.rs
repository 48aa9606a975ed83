use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::{Result, WarehouseError};

const EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls"];

/// Whether a file name looks like a monthly report rather than the warehouse
/// itself or an Office lock file.
pub fn is_monthly_candidate(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    let has_extension = Path::new(&lower)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| EXTENSIONS.contains(&e));
    has_extension && !lower.contains("data warehouse") && !lower.starts_with("~$")
}

/// Most recently modified monthly workbook in `input_dir`.
pub fn find_latest_monthly_file(input_dir: &Path) -> Result<PathBuf> {
    if !input_dir.is_dir() {
        return Err(WarehouseError::NotFound(format!(
            "Input folder not found: {}",
            input_dir.display()
        )));
    }

    let mut latest: Option<(SystemTime, PathBuf)> = None;
    for entry in std::fs::read_dir(input_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if !is_monthly_candidate(&name) {
            continue;
        }
        let modified = entry.metadata()?.modified()?;
        if latest.as_ref().map_or(true, |(best, _)| modified > *best) {
            latest = Some((modified, path));
        }
    }

    latest.map(|(_, path)| path).ok_or_else(|| {
        WarehouseError::NotFound(format!(
            "No monthly Excel files found in {} (excluding data warehouse).",
            input_dir.display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn touch(dir: &Path, name: &str, age_secs: u64) -> PathBuf {
        let path = dir.join(name);
        let file = std::fs::File::create(&path).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(age_secs))
            .unwrap();
        path
    }

    #[test]
    fn test_candidate_filter() {
        assert!(is_monthly_candidate("Jan Dept Report 01.2024.xlsx"));
        assert!(is_monthly_candidate("REPORT 02.2024.XLSX"));
        assert!(is_monthly_candidate("legacy 03.2024.xls"));
        assert!(!is_monthly_candidate("EXAMPLE Data Warehouse.xlsx"));
        assert!(!is_monthly_candidate("~$Report 01.2024.xlsx"));
        assert!(!is_monthly_candidate("notes.csv"));
        assert!(!is_monthly_candidate("xlsx"));
    }

    #[test]
    fn test_picks_newest_eligible_file() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "Report 01.2024.xlsx", 300);
        let newest = touch(dir.path(), "Report 02.2024.xlsx", 100);
        touch(dir.path(), "Company Data Warehouse.xlsx", 0);
        touch(dir.path(), "scratch.txt", 0);
        assert_eq!(find_latest_monthly_file(dir.path()).unwrap(), newest);
    }

    #[test]
    fn test_missing_dir_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = find_latest_monthly_file(&dir.path().join("input")).unwrap_err();
        assert!(matches!(err, WarehouseError::NotFound(_)));
    }

    #[test]
    fn test_no_eligible_files_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "Data Warehouse.xlsx", 0);
        let err = find_latest_monthly_file(dir.path()).unwrap_err();
        assert!(matches!(err, WarehouseError::NotFound(_)));
    }
}
