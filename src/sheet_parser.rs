use crate::models::{Category, Period, SheetFact};
use crate::normalize::{cell_amount, is_account_code};
use crate::workbook::Cell;

const CODE_COL: usize = 0;
const LABEL_COL: usize = 1;
const ACTUAL_COL: usize = 2;

/// Pair every row with the category in force at that row. `REVENUES` and
/// `EXPENSES` markers in the code column switch the category; rows above the
/// first marker have none.
pub fn assign_categories(rows: &[Vec<Cell>]) -> Vec<(Option<Category>, &[Cell])> {
    rows.iter()
        .fold((None, Vec::with_capacity(rows.len())), |(current, mut out), row| {
            let marker = row
                .get(CODE_COL)
                .and_then(Cell::as_text)
                .and_then(|s| Category::from_marker(&s));
            let category = marker.or(current);
            out.push((category, row.as_slice()));
            (category, out)
        })
        .1
}

/// Turn one department sheet's data rows into facts. Rows without a 4-digit
/// code or without a usable amount are dropped.
pub fn parse_department_sheet(rows: &[Vec<Cell>], department: &str, period: Period) -> Vec<SheetFact> {
    assign_categories(rows)
        .into_iter()
        .filter_map(|(category, row)| {
            let code = row.get(CODE_COL)?.as_trimmed()?;
            if !is_account_code(&code) {
                return None;
            }
            let amount = cell_amount(row.get(ACTUAL_COL)?)?;
            Some(SheetFact {
                account_code: code,
                label: row.get(LABEL_COL).and_then(Cell::as_trimmed),
                category,
                period,
                department: department.to_string(),
                amount,
            })
        })
        .collect()
}
