use chrono::{DateTime, Local};

use crate::cli::resolve_warehouse;
use crate::error::Result;
use crate::fmt::format_bytes;
use crate::merge::read_existing_facts;
use crate::reports::warehouse_stats;
use crate::settings::load_settings;
use crate::workbook::load_all_sheets;

pub fn run(warehouse: Option<String>) -> Result<()> {
    let settings = load_settings();
    let sheets = settings.sheet_names();
    let warehouse = resolve_warehouse(&settings, warehouse);

    println!("Input folder: {}", settings.input_dir().display());
    println!("Warehouse:    {}", warehouse.display());
    println!(
        "Sheets:       {} / {} / {}",
        sheets.reference, sheets.facts, sheets.qa
    );

    if !warehouse.is_file() {
        println!();
        println!("Warehouse not found. Run `gl-warehouse init --warehouse <path>` to point at one.");
        return Ok(());
    }

    let meta = std::fs::metadata(&warehouse)?;
    let modified: DateTime<Local> = meta.modified()?.into();
    println!("Size:         {}", format_bytes(meta.len()));
    println!("Modified:     {}", modified.format("%Y-%m-%d %H:%M"));

    let workbook = load_all_sheets(&warehouse)?;
    println!("Tabs:         {}", workbook.sheet_names().join(", "));

    let facts = read_existing_facts(&workbook, &sheets.facts)?;
    let stats = warehouse_stats(&facts);
    println!();
    println!("Fact rows:    {}", stats.fact_rows);
    println!("Departments:  {}", stats.departments.len());
    println!("Unmapped:     {}", stats.unmapped);
    if let (Some(first), Some(last)) = (stats.periods.first(), stats.periods.last()) {
        println!(
            "Periods:      {} ({} through {})",
            stats.periods.len(),
            first,
            last
        );
    }
    Ok(())
}
