use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimCheckError {
    #[error("io error reading {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path:?} is empty; expected a header line")]
    MissingHeader { path: PathBuf },

    #[error("{path:?} line {line}: expected at least {expected} columns, found {found}")]
    TooFewColumns {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("{path:?} line {line}, column {column}: invalid value {value:?}")]
    InvalidValue {
        path: PathBuf,
        line: usize,
        column: usize,
        value: String,
    },

    #[error("invalid thresholds: {0}")]
    Config(String),

    #[error("error parsing thresholds: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SimCheckError>;
