use thiserror::Error;

#[derive(Error, Debug)]
pub enum WarehouseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Workbook read error: {0}")]
    Read(#[from] calamine::Error),

    #[error("Workbook write error: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("No data: {0}")]
    NoData(String),

    #[error("Settings error: {0}")]
    Settings(String),
}

impl WarehouseError {
    /// Process exit code, one per failure kind so scripts can tell them apart.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound(_) => 2,
            Self::Format(_) => 3,
            Self::Schema(_) => 4,
            Self::NoData(_) => 5,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, WarehouseError>;
