use std::path::PathBuf;
use thiserror::Error;

pub type PainelResult<T> = Result<T, PainelError>;

#[derive(Error, Debug)]
pub enum PainelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to open workbook '{path}': {message}")]
    Workbook { path: PathBuf, message: String },

    #[error("Sheet '{sheet}' not found in workbook '{path}'")]
    SheetNotFound { path: PathBuf, sheet: String },

    #[error("Sheet '{sheet}' has no column named '{column}'")]
    MissingColumn { sheet: String, column: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Excel export error: {0}")]
    Export(String),

    #[error("Watch error: {0}")]
    Watch(String),

    #[error("Background task failed: {0}")]
    Task(String),
}

impl PainelError {
    /// True for errors caused by the input workbook rather than the caller
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            PainelError::Workbook { .. }
                | PainelError::SheetNotFound { .. }
                | PainelError::MissingColumn { .. }
        )
    }
}
