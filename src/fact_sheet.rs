use std::collections::HashMap;

use crate::error::{Result, WarehouseError};
use crate::models::{month_from_label, month_name, Category, FactRow, JoinedFact};
use crate::normalize::cell_amount;
use crate::workbook::{Cell, Sheet, EMPTY_CELL};

pub const FACT_COLUMNS: [&str; 7] = [
    "GL code",
    "Description",
    "Category",
    "Year",
    "Month",
    "Department",
    "Amount",
];

pub const QA_EXTRA_COLUMNS: [&str; 2] = ["Sheet Description", "Missing In Reference"];

fn header_row(columns: &[&str]) -> Vec<Cell> {
    columns.iter().map(|c| Cell::text(*c)).collect()
}

fn fact_cells(fact: &FactRow) -> Vec<Cell> {
    vec![
        Cell::text(&fact.account_code),
        fact.description.as_deref().map(Cell::text).unwrap_or(Cell::Empty),
        fact.category.map(|c| Cell::text(c.as_str())).unwrap_or(Cell::Empty),
        Cell::Number(fact.year as f64),
        Cell::text(month_name(fact.month)),
        Cell::text(&fact.department),
        fact.amount.map(Cell::Number).unwrap_or(Cell::Empty),
    ]
}

/// Render the fact table. Months are written by name.
pub fn facts_to_sheet(name: &str, facts: &[FactRow]) -> Sheet {
    let mut rows = Vec::with_capacity(facts.len() + 1);
    rows.push(header_row(&FACT_COLUMNS));
    rows.extend(facts.iter().map(fact_cells));
    Sheet::new(name, rows)
}

/// Render the unmapped-codes report. Always carries a header row.
pub fn unmapped_to_sheet(name: &str, unmapped: &[JoinedFact]) -> Sheet {
    let columns: Vec<&str> = FACT_COLUMNS.iter().chain(QA_EXTRA_COLUMNS.iter()).copied().collect();
    let mut rows = Vec::with_capacity(unmapped.len() + 1);
    rows.push(header_row(&columns));
    for joined in unmapped {
        let mut cells = fact_cells(&joined.fact);
        cells.push(joined.sheet_label.as_deref().map(Cell::text).unwrap_or(Cell::Empty));
        cells.push(Cell::Bool(joined.is_unmapped()));
        rows.push(cells);
    }
    Sheet::new(name, rows)
}

/// Read a persisted fact sheet. Columns are located by header name; a blank
/// sheet is an empty fact set.
pub fn sheet_to_facts(sheet: &Sheet) -> Result<Vec<FactRow>> {
    let Some((header, data)) = sheet.rows.split_first() else {
        return Ok(Vec::new());
    };
    if sheet.is_blank() {
        return Ok(Vec::new());
    }

    let positions: HashMap<String, usize> = header
        .iter()
        .enumerate()
        .filter_map(|(i, c)| c.as_trimmed().map(|h| (h, i)))
        .collect();
    let missing: Vec<&str> = FACT_COLUMNS
        .iter()
        .copied()
        .filter(|c| !positions.contains_key(*c))
        .collect();
    if !missing.is_empty() {
        return Err(WarehouseError::Schema(format!(
            "Existing '{}' is missing columns: {}",
            sheet.name,
            missing.join(", ")
        )));
    }
    let col = |name: &str| positions[name];
    let cols = Columns {
        code: col("GL code"),
        description: col("Description"),
        category: col("Category"),
        year: col("Year"),
        month: col("Month"),
        department: col("Department"),
        amount: col("Amount"),
    };

    let mut facts = Vec::new();
    for (offset, row) in data.iter().enumerate() {
        if row.iter().all(Cell::is_blank) {
            continue;
        }
        // +2: one for the header, one for 1-based row numbers
        facts.push(read_fact(row, &cols, offset + 2, &sheet.name)?);
    }
    Ok(facts)
}

struct Columns {
    code: usize,
    description: usize,
    category: usize,
    year: usize,
    month: usize,
    department: usize,
    amount: usize,
}

fn read_fact(row: &[Cell], cols: &Columns, line: usize, sheet: &str) -> Result<FactRow> {
    let get = |i: usize| row.get(i).unwrap_or(&EMPTY_CELL);
    let bad = |what: &str, cell: &Cell| {
        WarehouseError::Format(format!(
            "'{sheet}' row {line}: invalid {what} {:?}",
            cell.as_text().unwrap_or_default()
        ))
    };

    let year_cell = get(cols.year);
    let year = integral(year_cell).ok_or_else(|| bad("Year", year_cell))?;

    let month_cell = get(cols.month);
    let month = match month_cell {
        Cell::Text(s) => month_from_label(s),
        _ => None,
    }
    .or_else(|| {
        integral(month_cell)
            .and_then(|m| u32::try_from(m).ok())
            .filter(|m| (1..=12).contains(m))
    })
    .ok_or_else(|| bad("Month", month_cell))?;

    // Only Year and Month are checked: an unknown category reads as unset and
    // a blank or unparseable amount as no amount, so the row survives the rewrite.
    let category = get(cols.category)
        .as_trimmed()
        .and_then(|label| Category::from_label(&label));
    let amount = cell_amount(get(cols.amount));

    Ok(FactRow {
        account_code: get(cols.code).as_trimmed().unwrap_or_default(),
        description: get(cols.description).as_trimmed(),
        category,
        year,
        month,
        department: get(cols.department).as_trimmed().unwrap_or_default(),
        amount,
    })
}

/// Whole number from a numeric cell or from text such as "2024" or "2024.0".
fn integral(cell: &Cell) -> Option<i32> {
    let n = match cell {
        Cell::Number(n) => *n,
        Cell::Text(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (n.is_finite() && n.fract() == 0.0 && n.abs() <= i32::MAX as f64).then_some(n as i32)
}
