use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::resolve_warehouse;
use crate::error::Result;
use crate::fmt::money;
use crate::models::month_name;
use crate::reports::{self, load_warehouse_facts};
use crate::settings::load_settings;

pub fn summary(year: Option<i32>, department: Option<String>, warehouse: Option<String>) -> Result<()> {
    let settings = load_settings();
    let path = resolve_warehouse(&settings, warehouse);
    let facts = load_warehouse_facts(&path, &settings.sheet_names())?;
    let rows = reports::summarize(&facts, year, department.as_deref());

    if rows.is_empty() {
        println!("No facts match.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Period",
        "Department",
        "Revenue",
        "Expenses",
        "Uncategorized",
        "Rows",
        "Unmapped",
    ]);
    let (mut revenue, mut expenses) = (0.0, 0.0);
    for r in &rows {
        revenue += r.revenue;
        expenses += r.expenses;
        let unmapped = if r.unmapped > 0 {
            r.unmapped.to_string().yellow().to_string()
        } else {
            r.unmapped.to_string()
        };
        table.add_row(vec![
            Cell::new(r.period),
            Cell::new(&r.department),
            Cell::new(money(r.revenue)),
            Cell::new(money(r.expenses)),
            Cell::new(money(r.uncategorized)),
            Cell::new(r.rows),
            Cell::new(unmapped),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(""),
        Cell::new(money(revenue).green()),
        Cell::new(money(expenses).red()),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
    ]);
    println!("Department Summary\n{table}");
    Ok(())
}

pub fn unmapped(warehouse: Option<String>) -> Result<()> {
    let settings = load_settings();
    let path = resolve_warehouse(&settings, warehouse);
    let facts = load_warehouse_facts(&path, &settings.sheet_names())?;
    let rows = reports::unmapped_facts(&facts);

    if rows.is_empty() {
        println!("{}", "Every GL code in the warehouse has a description.".green());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["GL code", "Category", "Period", "Department", "Amount"]);
    for f in &rows {
        table.add_row(vec![
            Cell::new(&f.account_code),
            Cell::new(f.category.map(|c| c.as_str()).unwrap_or("")),
            Cell::new(format!("{} {}", month_name(f.month), f.year)),
            Cell::new(&f.department),
            Cell::new(f.amount.map(money).unwrap_or_default()),
        ]);
    }
    println!("Unmapped GL Codes ({})\n{table}", rows.len());
    Ok(())
}
