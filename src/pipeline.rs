use std::path::{Path, PathBuf};

use crate::builder::build_month_facts;
use crate::error::{Result, WarehouseError};
use crate::fact_sheet::{facts_to_sheet, unmapped_to_sheet};
use crate::merge::{append_and_dedupe, read_existing_facts};
use crate::models::{JoinedFact, Period, SheetNames};
use crate::reference::ReferenceTable;
use crate::workbook::{load_all_sheets, save_all_sheets, Workbook};

pub struct RunOptions {
    pub monthly_file: PathBuf,
    pub warehouse: PathBuf,
    pub sheets: SheetNames,
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub period: Period,
    pub departments: Vec<String>,
    pub reference_codes: usize,
    pub new_facts: usize,
    pub previous_facts: usize,
    pub total_facts: usize,
    pub unmapped: Vec<JoinedFact>,
    pub written: bool,
}

/// Merge one monthly workbook into an in-memory warehouse. Only the fact and
/// QA sheets of the returned workbook differ from `warehouse`.
pub fn update_warehouse(
    file_name: &str,
    monthly: &Workbook,
    mut warehouse: Workbook,
    sheets: &SheetNames,
) -> Result<(Workbook, RunSummary)> {
    let reference_sheet = warehouse.sheet(&sheets.reference).ok_or_else(|| {
        WarehouseError::Schema(format!(
            "Warehouse has no '{}' reference sheet.",
            sheets.reference
        ))
    })?;
    let reference = ReferenceTable::from_sheet(reference_sheet)?;

    let month = build_month_facts(file_name, monthly, &reference)?;
    let existing = read_existing_facts(&warehouse, &sheets.facts)?;
    let previous_facts = existing.len();

    let new_facts = month.facts();
    let new_count = new_facts.len();
    let merged = append_and_dedupe(existing, new_facts);
    let unmapped = month.unmapped();

    warehouse.replace_sheet(facts_to_sheet(&sheets.facts, &merged));
    warehouse.replace_sheet(unmapped_to_sheet(&sheets.qa, &unmapped));

    let summary = RunSummary {
        period: month.period,
        departments: month.departments,
        reference_codes: reference.len(),
        new_facts: new_count,
        previous_facts,
        total_facts: merged.len(),
        unmapped,
        written: false,
    };
    Ok((warehouse, summary))
}

fn require_file(path: &Path, what: &str) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(WarehouseError::NotFound(format!("{what} not found: {}", path.display())))
    }
}

/// Load both workbooks, merge, and write the warehouse back once. Nothing is
/// written if any step fails.
pub fn run(options: &RunOptions) -> Result<RunSummary> {
    require_file(&options.warehouse, "Warehouse file")?;
    require_file(&options.monthly_file, "Monthly file")?;

    let file_name = options
        .monthly_file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let monthly = load_all_sheets(&options.monthly_file)?;
    let warehouse = load_all_sheets(&options.warehouse)?;

    let (updated, mut summary) = update_warehouse(&file_name, &monthly, warehouse, &options.sheets)?;

    if !options.dry_run {
        save_all_sheets(&options.warehouse, &updated)?;
        summary.written = true;
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fact_sheet::sheet_to_facts;
    use crate::models::Category;
    use crate::workbook::{Cell, Sheet};

    fn text_row(cells: &[&str]) -> Vec<Cell> {
        cells
            .iter()
            .map(|s| if s.is_empty() { Cell::Empty } else { Cell::text(*s) })
            .collect()
    }

    fn monthly() -> Workbook {
        Workbook::new(vec![Sheet::new(
            "Department 100-F",
            vec![
                text_row(&["Department 100 Income Statement"]),
                text_row(&["REVENUES", "", ""]),
                text_row(&["4010", "Sales", "$1,000.00"]),
                text_row(&["EXPENSES", "", ""]),
                text_row(&["5010", "Rent", "(200)"]),
            ],
        )])
    }

    fn warehouse() -> Workbook {
        Workbook::new(vec![
            Sheet::new(
                "GL",
                vec![
                    text_row(&["GL code", "Description"]),
                    text_row(&["4010", "Sales Revenue"]),
                    text_row(&["5010", "Rent Expense"]),
                ],
            ),
            Sheet::new("Final", vec![text_row(&[
                "GL code", "Description", "Category", "Year", "Month", "Department", "Amount",
            ])]),
            Sheet::new("Budget", vec![text_row(&["keep", "me"])]),
        ])
    }

    const FILE: &str = "Jan Dept Report 01.2024.xlsx";

    #[test]
    fn test_end_to_end_in_memory() {
        let (updated, summary) =
            update_warehouse(FILE, &monthly(), warehouse(), &SheetNames::default()).unwrap();

        assert_eq!(summary.period, Period { year: 2024, month: 1 });
        assert_eq!(summary.new_facts, 2);
        assert_eq!(summary.total_facts, 2);
        assert!(summary.unmapped.is_empty());

        let final_sheet = updated.sheet("Final").unwrap();
        assert_eq!(final_sheet.cell(1, 4), &Cell::text("January"));
        let facts = sheet_to_facts(final_sheet).unwrap();
        assert_eq!(facts.len(), 2);
        // Expenses sorts before Revenue within a department.
        assert_eq!(facts[0].account_code, "5010");
        assert_eq!(facts[0].category, Some(Category::Expenses));
        assert_eq!(facts[0].amount, Some(-200.0));
        assert_eq!(facts[0].description.as_deref(), Some("Rent Expense"));
        assert_eq!(facts[1].account_code, "4010");
        assert_eq!(facts[1].amount, Some(1000.0));
        assert_eq!(facts[1].department, "100");

        let qa = updated.sheet("Missing_GL_Mapping").unwrap();
        assert_eq!(qa.rows.len(), 1);

        assert_eq!(updated.sheet("Budget"), warehouse().sheet("Budget"));
        assert_eq!(updated.sheet_names(), vec!["GL", "Final", "Budget", "Missing_GL_Mapping"]);
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let names = SheetNames::default();
        let (once, _) = update_warehouse(FILE, &monthly(), warehouse(), &names).unwrap();
        let (twice, summary) = update_warehouse(FILE, &monthly(), once.clone(), &names).unwrap();
        assert_eq!(summary.previous_facts, 2);
        assert_eq!(summary.total_facts, 2);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unmapped_codes_reported() {
        let mut wb = warehouse();
        wb.replace_sheet(Sheet::new(
            "GL",
            vec![text_row(&["GL code", "Description"]), text_row(&["4010", "Sales Revenue"])],
        ));
        let (updated, summary) = update_warehouse(FILE, &monthly(), wb, &SheetNames::default()).unwrap();
        assert_eq!(summary.unmapped.len(), 1);
        assert_eq!(summary.unmapped[0].fact.account_code, "5010");

        let facts = sheet_to_facts(updated.sheet("Final").unwrap()).unwrap();
        let rent = facts.iter().find(|f| f.account_code == "5010").unwrap();
        assert!(rent.is_unmapped());
        let sales = facts.iter().find(|f| f.account_code == "4010").unwrap();
        assert!(!sales.is_unmapped());

        let qa = updated.sheet("Missing_GL_Mapping").unwrap();
        assert_eq!(qa.rows.len(), 2);
        assert_eq!(qa.cell(1, 0), &Cell::text("5010"));
        assert_eq!(qa.cell(1, 7), &Cell::text("Rent"));
    }

    #[test]
    fn test_blank_reference_description_is_reported_and_persisted_as_unmapped() {
        let mut wb = warehouse();
        wb.replace_sheet(Sheet::new(
            "GL",
            vec![
                text_row(&["GL code", "Description"]),
                text_row(&["4010", "Sales Revenue"]),
                text_row(&["5010", ""]),
            ],
        ));
        let (updated, summary) = update_warehouse(FILE, &monthly(), wb, &SheetNames::default()).unwrap();
        assert_eq!(summary.unmapped.len(), 1);
        assert_eq!(summary.unmapped[0].fact.account_code, "5010");

        let persisted = sheet_to_facts(updated.sheet("Final").unwrap()).unwrap();
        let unmapped: Vec<&str> = persisted
            .iter()
            .filter(|f| f.is_unmapped())
            .map(|f| f.account_code.as_str())
            .collect();
        assert_eq!(unmapped, vec!["5010"]);
        assert_eq!(updated.sheet("Missing_GL_Mapping").unwrap().rows.len(), 2);
    }

    #[test]
    fn test_prior_rows_with_blank_amount_or_odd_category_survive() {
        let mut wb = warehouse();
        wb.replace_sheet(Sheet::new(
            "Final",
            vec![
                text_row(&["GL code", "Description", "Category", "Year", "Month", "Department", "Amount"]),
                text_row(&["4020", "Other", "Revenue", "2023", "December", "100", ""]),
                text_row(&["4030", "Misc", "Other", "2023", "December", "100", "12"]),
            ],
        ));
        let (updated, summary) = update_warehouse(FILE, &monthly(), wb, &SheetNames::default()).unwrap();
        assert_eq!(summary.previous_facts, 2);
        assert_eq!(summary.total_facts, 4);

        let facts = sheet_to_facts(updated.sheet("Final").unwrap()).unwrap();
        let blank = facts.iter().find(|f| f.account_code == "4020").unwrap();
        assert_eq!(blank.amount, None);
        let odd = facts.iter().find(|f| f.account_code == "4030").unwrap();
        assert_eq!(odd.category, None);
        assert_eq!(odd.amount, Some(12.0));
    }

    #[test]
    fn test_missing_reference_sheet_is_schema_error() {
        let wb = Workbook::new(vec![Sheet::new("Final", vec![])]);
        let err = update_warehouse(FILE, &monthly(), wb, &SheetNames::default()).unwrap_err();
        assert!(matches!(err, WarehouseError::Schema(_)));
    }

    #[test]
    fn test_custom_sheet_names() {
        let names = SheetNames {
            reference: "Chart".into(),
            facts: "Facts".into(),
            qa: "QA".into(),
        };
        let mut wb = warehouse();
        wb.sheets[0].name = "Chart".into();
        let (updated, _) = update_warehouse(FILE, &monthly(), wb, &names).unwrap();
        assert!(updated.sheet("Facts").is_some());
        assert!(updated.sheet("QA").is_some());
        // The default-named fact sheet is left alone.
        assert_eq!(updated.sheet("Final").unwrap().rows.len(), 1);
    }

    #[test]
    fn test_run_requires_warehouse() {
        let dir = tempfile::tempdir().unwrap();
        let options = RunOptions {
            monthly_file: dir.path().join("Report 01.2024.xlsx"),
            warehouse: dir.path().join("missing.xlsx"),
            sheets: SheetNames::default(),
            dry_run: false,
        };
        assert!(matches!(run(&options), Err(WarehouseError::NotFound(_))));
    }

    #[test]
    fn test_run_writes_once_and_dry_run_leaves_file() {
        let dir = tempfile::tempdir().unwrap();
        let monthly_path = dir.path().join(FILE);
        let warehouse_path = dir.path().join("Data Warehouse.xlsx");
        save_all_sheets(&monthly_path, &monthly()).unwrap();
        save_all_sheets(&warehouse_path, &warehouse()).unwrap();

        let mut options = RunOptions {
            monthly_file: monthly_path,
            warehouse: warehouse_path.clone(),
            sheets: SheetNames::default(),
            dry_run: true,
        };
        let summary = run(&options).unwrap();
        assert!(!summary.written);
        assert!(load_all_sheets(&warehouse_path).unwrap().sheet("Missing_GL_Mapping").is_none());

        options.dry_run = false;
        let summary = run(&options).unwrap();
        assert!(summary.written);
        let saved = load_all_sheets(&warehouse_path).unwrap();
        let facts = sheet_to_facts(saved.sheet("Final").unwrap()).unwrap();
        assert_eq!(facts.len(), 2);

        // A second run reads back month names and replaces rather than appends.
        let summary = run(&options).unwrap();
        assert_eq!(summary.previous_facts, 2);
        assert_eq!(summary.total_facts, 2);
    }
}
