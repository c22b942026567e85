use std::path::PathBuf;

/// Error types for the simulator.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Failed to read a scenario file
    #[error("Failed to read scenario file '{}': {source}", .file.display())]
    ScenarioRead {
        /// The file path that failed to load
        file: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// Failed to parse a scenario file
    #[error("Failed to parse scenario from '{}': {source}", .file.display())]
    ScenarioParse {
        /// The file path where JSON parsing failed
        file: PathBuf,
        /// The underlying JSON parsing error
        source: serde_json::Error,
    },

    /// Failed to create the log file
    #[error("Failed to create log file '{}': {source}", .file.display())]
    LogFile {
        /// The log file path
        file: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// Failed to write the report
    #[error("Failed to write report: {0}")]
    ReportWrite(#[from] std::io::Error),

    /// Failed to serialize the report
    #[error("Failed to serialize report: {0}")]
    ReportSerialize(#[from] serde_json::Error),
}

/// Result type for the simulator.
pub type Result<T> = std::result::Result<T, SimError>;
