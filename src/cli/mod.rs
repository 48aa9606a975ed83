pub mod build;
pub mod export;
pub mod init;
pub mod report;
pub mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::settings::{shellexpand_path, Settings};

/// `--warehouse` override or the configured warehouse path.
pub(crate) fn resolve_warehouse(settings: &Settings, warehouse: Option<String>) -> PathBuf {
    warehouse
        .map(|w| PathBuf::from(shellexpand_path(&w)))
        .unwrap_or_else(|| settings.warehouse_path())
}

#[derive(Parser)]
#[command(
    name = "gl-warehouse",
    about = "Load monthly departmental income statements into the GL data warehouse."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge the latest monthly workbook into the warehouse (the default).
    Build {
        /// Monthly workbook to load (default: newest file in the input folder)
        #[arg(long)]
        file: Option<String>,
        /// Folder to search for monthly workbooks
        #[arg(long = "input-dir")]
        input_dir: Option<String>,
        /// Warehouse workbook to update
        #[arg(long)]
        warehouse: Option<String>,
        /// Parse and merge without writing the warehouse
        #[arg(long = "dry-run")]
        dry_run: bool,
    },
    /// Save the input folder, warehouse path and sheet names.
    Init {
        /// Folder monthly workbooks are dropped into
        #[arg(long = "input-dir")]
        input_dir: Option<String>,
        /// Path of the warehouse workbook
        #[arg(long)]
        warehouse: Option<String>,
        /// Reference sheet name (default: GL)
        #[arg(long = "gl-sheet")]
        gl_sheet: Option<String>,
        /// Fact sheet name (default: Final)
        #[arg(long = "final-sheet")]
        final_sheet: Option<String>,
        /// Unmapped-codes sheet name (default: Missing_GL_Mapping)
        #[arg(long = "qa-sheet")]
        qa_sheet: Option<String>,
    },
    /// Show configuration and what the warehouse currently holds.
    Status {
        #[arg(long)]
        warehouse: Option<String>,
    },
    /// Summaries over the warehouse fact sheet.
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// Write the warehouse fact sheet to CSV.
    Export {
        /// Output path (default: next to the warehouse, final-YYYY-MM-DD.csv)
        #[arg(long)]
        output: Option<String>,
        #[arg(long)]
        warehouse: Option<String>,
    },
    /// Print shell completions.
    Completions {
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Revenue and expense totals per period and department.
    Summary {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        warehouse: Option<String>,
    },
    /// Fact rows whose GL code has no reference description.
    Unmapped {
        #[arg(long)]
        warehouse: Option<String>,
    },
}
