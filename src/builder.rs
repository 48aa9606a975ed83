use crate::error::{Result, WarehouseError};
use crate::metadata::{parse_department, parse_period};
use crate::models::{FactRow, JoinedFact, Period, SheetFact};
use crate::reference::ReferenceTable;
use crate::sheet_parser::parse_department_sheet;
use crate::workbook::{Cell, Workbook};

/// Rows above the data region of a department sheet (the title row).
pub const HEADER_ROWS: usize = 1;
/// Code, description and actual-value columns.
pub const DATA_COLUMNS: usize = 3;

/// Everything one monthly workbook contributes.
#[derive(Debug, Clone)]
pub struct MonthlyFacts {
    pub period: Period,
    pub departments: Vec<String>,
    pub joined: Vec<JoinedFact>,
}

impl MonthlyFacts {
    /// Facts in the canonical schema.
    pub fn facts(&self) -> Vec<FactRow> {
        self.joined.iter().map(|j| j.fact.clone()).collect()
    }

    pub fn unmapped(&self) -> Vec<JoinedFact> {
        self.joined.iter().filter(|j| j.is_unmapped()).cloned().collect()
    }
}

/// Build this month's facts from every department sheet in `monthly`, joined
/// against the reference table.
pub fn build_month_facts(
    file_name: &str,
    monthly: &Workbook,
    reference: &ReferenceTable,
) -> Result<MonthlyFacts> {
    let period = parse_period(file_name)?;

    let mut departments = Vec::new();
    let mut parsed: Vec<SheetFact> = Vec::new();
    for sheet in &monthly.sheets {
        let Some(department) = parse_department(&sheet.name) else {
            continue;
        };
        let region: Vec<Vec<Cell>> = sheet
            .rows
            .iter()
            .skip(HEADER_ROWS)
            .map(|row| row.iter().take(DATA_COLUMNS).cloned().collect())
            .collect();
        parsed.extend(parse_department_sheet(&region, &department, period));
        departments.push(department);
    }

    if departments.is_empty() {
        return Err(WarehouseError::NoData(
            "No department sheets found (expected 'DEPARTMENT XXX-F').".into(),
        ));
    }
    if parsed.is_empty() {
        return Err(WarehouseError::NoData(format!(
            "Department sheets {} contained no GL rows with amounts.",
            departments.join(", ")
        )));
    }

    let joined = parsed.into_iter().map(|f| join_reference(f, reference)).collect();
    Ok(MonthlyFacts {
        period,
        departments,
        joined,
    })
}

/// Left join on account code; an unmatched code keeps a `None` description.
fn join_reference(fact: SheetFact, reference: &ReferenceTable) -> JoinedFact {
    let description = reference.description(&fact.account_code).map(str::to_string);
    JoinedFact {
        fact: FactRow {
            account_code: fact.account_code,
            description,
            category: fact.category,
            year: fact.period.year,
            month: fact.period.month,
            department: fact.department,
            amount: Some(fact.amount),
        },
        sheet_label: fact.label,
    }
}
