use std::path::PathBuf;

use crate::cli::resolve_warehouse;
use crate::error::Result;
use crate::fact_sheet::FACT_COLUMNS;
use crate::models::{month_name, FactRow};
use crate::reports::load_warehouse_facts;
use crate::settings::{load_settings, shellexpand_path};

fn default_path(warehouse: &std::path::Path) -> PathBuf {
    let date = chrono::Local::now().format("%Y-%m-%d").to_string();
    warehouse
        .parent()
        .map(PathBuf::from)
        .unwrap_or_default()
        .join(format!("final-{date}.csv"))
}

pub fn write_csv<W: std::io::Write>(writer: W, facts: &[FactRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(FACT_COLUMNS)?;
    for f in facts {
        wtr.write_record([
            f.account_code.clone(),
            f.description.clone().unwrap_or_default(),
            f.category.map(|c| c.to_string()).unwrap_or_default(),
            f.year.to_string(),
            month_name(f.month).to_string(),
            f.department.clone(),
            f.amount.map(|a| format!("{a:.2}")).unwrap_or_default(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn run(output: Option<String>, warehouse: Option<String>) -> Result<()> {
    let settings = load_settings();
    let path = resolve_warehouse(&settings, warehouse);
    let facts = load_warehouse_facts(&path, &settings.sheet_names())?;

    let out = output
        .map(|o| PathBuf::from(shellexpand_path(&o)))
        .unwrap_or_else(|| default_path(&path));
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)?;
    }
    write_csv(std::fs::File::create(&out)?, &facts)?;
    println!("Wrote {} rows to {}", facts.len(), out.display());
    Ok(())
}
