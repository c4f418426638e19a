//! Error types for the load, aggregate and render pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the pipeline.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

/// Everything that can stop a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A source CSV does not exist.
    #[error("missing input file: {}", path.display())]
    MissingInputFile { path: PathBuf },

    /// The grouping column or an indicator column is absent from the header.
    #[error("missing column '{column}' in {}", path.display())]
    MissingColumn { path: PathBuf, column: String },

    /// A cell that is neither empty nor a number.
    #[error("invalid value '{value}' for column '{column}' at {}:{line}", path.display())]
    InvalidValue {
        path: PathBuf,
        line: u64,
        column: String,
        value: String,
    },

    /// A configured diet group has no rows in the data.
    #[error("missing group: no rows for diet group '{group}'")]
    MissingGroup { group: String },

    /// Every value of an indicator is absent for a group.
    #[error("diet group '{group}' has no values for '{column}'")]
    NoValues { group: String, column: String },

    /// A radar chart needs at least three axes.
    #[error("a radar chart needs at least 3 indicators, got {count}")]
    TooFewIndicators { count: usize },

    #[error("invalid configuration: {0}")]
    Config(String),

    /// Plotting backend failure. Stringified since the plotters error is generic
    /// over the backend.
    #[error("render error: {0}")]
    Render(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn render<E: std::fmt::Display>(err: E) -> Self {
        PipelineError::Render(err.to_string())
    }
}
