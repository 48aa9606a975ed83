use std::collections::BTreeSet;
use std::path::PathBuf;

use colored::Colorize;

use crate::cli::resolve_warehouse;
use crate::discovery::find_latest_monthly_file;
use crate::error::Result;
use crate::pipeline::{self, RunOptions};
use crate::settings::{load_settings, shellexpand_path};

pub fn run(
    file: Option<String>,
    input_dir: Option<String>,
    warehouse: Option<String>,
    dry_run: bool,
) -> Result<()> {
    let settings = load_settings();
    let sheets = settings.sheet_names();
    let warehouse = resolve_warehouse(&settings, warehouse);

    let monthly_file = match file {
        Some(f) => PathBuf::from(shellexpand_path(&f)),
        None => {
            let dir = input_dir
                .map(|d| PathBuf::from(shellexpand_path(&d)))
                .unwrap_or_else(|| settings.input_dir());
            let latest = find_latest_monthly_file(&dir)?;
            println!("Using latest file: {}", latest.display());
            latest
        }
    };

    let summary = pipeline::run(&RunOptions {
        monthly_file,
        warehouse: warehouse.clone(),
        sheets: sheets.clone(),
        dry_run,
    })?;

    println!("Period:       {}", summary.period);
    println!("Departments:  {}", summary.departments.join(", "));
    println!("GL reference: {} codes", summary.reference_codes);
    println!(
        "Facts:        {} new, {} previously stored, {} after merge",
        summary.new_facts, summary.previous_facts, summary.total_facts
    );
    println!();

    if summary.written {
        println!(
            "{}",
            format!("Updated '{}' in: {}", sheets.facts, warehouse.display()).green()
        );
    } else {
        println!("{}", "Dry run: warehouse not modified.".yellow());
    }

    if !summary.unmapped.is_empty() {
        let codes: BTreeSet<&str> = summary
            .unmapped
            .iter()
            .map(|j| j.fact.account_code.as_str())
            .collect();
        println!(
            "{}",
            format!(
                "{} GL code(s) missing from reference ({} rows): {}. See '{}' tab.",
                codes.len(),
                summary.unmapped.len(),
                codes.into_iter().collect::<Vec<_>>().join(", "),
                sheets.qa
            )
            .yellow()
        );
    }
    Ok(())
}
