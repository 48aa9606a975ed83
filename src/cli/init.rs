use colored::Colorize;

use crate::error::Result;
use crate::settings::{load_settings, save_settings, settings_path, shellexpand_path};

pub fn run(
    input_dir: Option<String>,
    warehouse: Option<String>,
    gl_sheet: Option<String>,
    final_sheet: Option<String>,
    qa_sheet: Option<String>,
) -> Result<()> {
    let mut settings = load_settings();

    if let Some(dir) = input_dir {
        settings.input_dir = shellexpand_path(&dir);
    }
    if let Some(path) = warehouse {
        settings.warehouse_path = shellexpand_path(&path);
    }
    if let Some(name) = gl_sheet {
        settings.gl_sheet = name;
    }
    if let Some(name) = final_sheet {
        settings.final_sheet = name;
    }
    if let Some(name) = qa_sheet {
        settings.qa_sheet = name;
    }

    save_settings(&settings)?;

    let input = settings.input_dir();
    let warehouse = settings.warehouse_path();
    std::fs::create_dir_all(&input)?;
    if let Some(parent) = warehouse.parent() {
        std::fs::create_dir_all(parent)?;
    }

    println!("Input folder: {}", input.display());
    println!("Warehouse:    {}", warehouse.display());
    println!(
        "Sheets:       {} / {} / {}",
        settings.gl_sheet, settings.final_sheet, settings.qa_sheet
    );
    if !warehouse.exists() {
        println!(
            "{}",
            "Warehouse file does not exist yet; place it at the path above.".yellow()
        );
    }
    println!("Saved settings to {}", settings_path().display());
    Ok(())
}
