//! error type shared by all modules

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("cfg error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("npz error: {0}")]
    Npz(#[from] ndarray_npy::WriteNpzError),

    #[error("cannot parse `{token}` at line {line}")]
    Parse { line: usize, token: String },

    #[error("shape mismatch: {0}")]
    Shape(String),

    #[error("plotting failed: {0}")]
    Plot(String),

    #[error("waveform generation failed: {0}")]
    Waveform(String),
}

pub type Result<T> = std::result::Result<T, Error>;
