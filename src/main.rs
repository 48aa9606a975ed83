mod builder;
mod cli;
mod discovery;
mod error;
mod fact_sheet;
mod fmt;
mod merge;
mod metadata;
mod models;
mod normalize;
mod pipeline;
mod reference;
mod reports;
mod settings;
mod sheet_parser;
mod workbook;

use clap::{CommandFactory, Parser};
use colored::Colorize;

use cli::{Cli, Commands, ReportCommands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        None => cli::build::run(None, None, None, false),
        Some(Commands::Build {
            file,
            input_dir,
            warehouse,
            dry_run,
        }) => cli::build::run(file, input_dir, warehouse, dry_run),
        Some(Commands::Init {
            input_dir,
            warehouse,
            gl_sheet,
            final_sheet,
            qa_sheet,
        }) => cli::init::run(input_dir, warehouse, gl_sheet, final_sheet, qa_sheet),
        Some(Commands::Status { warehouse }) => cli::status::run(warehouse),
        Some(Commands::Report { command }) => match command {
            ReportCommands::Summary {
                year,
                department,
                warehouse,
            } => cli::report::summary(year, department, warehouse),
            ReportCommands::Unmapped { warehouse } => cli::report::unmapped(warehouse),
        },
        Some(Commands::Export { output, warehouse }) => cli::export::run(output, warehouse),
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "gl-warehouse", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {e}", "Error:".red().bold());
        std::process::exit(e.exit_code());
    }
}
