use std::cmp::Ordering;
use std::collections::HashSet;

use crate::error::Result;
use crate::fact_sheet::sheet_to_facts;
use crate::models::{Category, FactRow};
use crate::workbook::Workbook;

/// Facts already persisted in the warehouse; an absent sheet is an empty set.
pub fn read_existing_facts(warehouse: &Workbook, sheet_name: &str) -> Result<Vec<FactRow>> {
    match warehouse.sheet(sheet_name) {
        Some(sheet) => sheet_to_facts(sheet),
        None => Ok(Vec::new()),
    }
}

/// Append `new_rows` after `existing`, keep the last row per natural key and
/// sort by (year, month, department, category, code). Re-running a month
/// therefore replaces its earlier rows instead of duplicating them.
pub fn append_and_dedupe(existing: Vec<FactRow>, new_rows: Vec<FactRow>) -> Vec<FactRow> {
    let combined = existing.into_iter().chain(new_rows).map(normalize);

    let mut seen = HashSet::new();
    let mut merged: Vec<FactRow> = combined
        .rev()
        .filter(|f| seen.insert(f.key()))
        .collect();
    merged.reverse();

    merged.sort_by(compare_facts);
    merged
}

fn normalize(mut fact: FactRow) -> FactRow {
    fact.account_code = fact.account_code.trim().to_string();
    fact.department = fact.department.trim().to_string();
    fact
}

/// Unset category sorts after Expenses and Revenue.
fn category_rank(category: Option<Category>) -> (bool, Option<Category>) {
    (category.is_none(), category)
}

fn compare_facts(a: &FactRow, b: &FactRow) -> Ordering {
    a.year
        .cmp(&b.year)
        .then(a.month.cmp(&b.month))
        .then_with(|| a.department.cmp(&b.department))
        .then_with(|| category_rank(a.category).cmp(&category_rank(b.category)))
        .then_with(|| a.account_code.cmp(&b.account_code))
}
