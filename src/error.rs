use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("column count must be at least 1, got {0}")]
    InvalidColumns(usize),

    #[error("minimum visible rows must be at least 1, got {0}")]
    InvalidMinRows(usize),

    #[error("invalid value {value:?} for setting {key}")]
    InvalidSetting { key: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, LayoutError>;
