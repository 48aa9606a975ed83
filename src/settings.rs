use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, WarehouseError};
use crate::models::SheetNames;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_input_dir")]
    pub input_dir: String,
    #[serde(default = "default_warehouse_path")]
    pub warehouse_path: String,
    #[serde(default = "default_gl_sheet")]
    pub gl_sheet: String,
    #[serde(default = "default_final_sheet")]
    pub final_sheet: String,
    #[serde(default = "default_qa_sheet")]
    pub qa_sheet: String,
}

fn default_gl_sheet() -> String {
    SheetNames::default().reference
}

fn default_final_sheet() -> String {
    SheetNames::default().facts
}

fn default_qa_sheet() -> String {
    SheetNames::default().qa
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("gl-warehouse")
}

fn default_input_dir() -> String {
    default_data_dir().join("input").to_string_lossy().to_string()
}

fn default_warehouse_path() -> String {
    default_data_dir()
        .join("warehouse")
        .join("Data Warehouse.xlsx")
        .to_string_lossy()
        .to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            warehouse_path: default_warehouse_path(),
            gl_sheet: default_gl_sheet(),
            final_sheet: default_final_sheet(),
            qa_sheet: default_qa_sheet(),
        }
    }
}

impl Settings {
    pub fn sheet_names(&self) -> SheetNames {
        SheetNames {
            reference: self.gl_sheet.clone(),
            facts: self.final_sheet.clone(),
            qa: self.qa_sheet.clone(),
        }
    }

    pub fn input_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand_path(&self.input_dir))
    }

    pub fn warehouse_path(&self) -> PathBuf {
        PathBuf::from(shellexpand_path(&self.warehouse_path))
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("gl-warehouse")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

/// Settings from `path`, or defaults when the file is absent or unreadable.
pub fn load_settings_from(path: &Path) -> Settings {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|content| serde_json::from_str(&content).ok())
        .unwrap_or_default()
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

pub fn save_settings_to(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| WarehouseError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_settings_to(&settings_path(), settings)
}

pub fn shellexpand_path(path: &str) -> String {
    if let Some(rest) = path.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return format!("{}{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}
